//! Perspective camera and orbit-style mouse controls.
//!
//! The camera looks from `position` at `target` with +Y up. Projection maps
//! world points into an egui rect; everything in front of the near plane is
//! drawable.

use crate::config::CameraConfig;
use eframe::egui;
use nalgebra::{Isometry3, Perspective3, Point3, Vector3};
use std::f64::consts::PI;

const POLAR_EPS: f64 = 1e-4;
const SCROLL_POINTS_PER_STEP: f64 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub pos: egui::Pos2,
    /// Distance along the view direction.
    pub depth: f64,
}

#[derive(Clone, Debug)]
pub struct Camera {
    pub fov_deg: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub position: Point3<f64>,
    pub target: Point3<f64>,
}

impl Camera {
    pub fn from_config(cfg: &CameraConfig) -> Self {
        Self {
            fov_deg: cfg.fov_deg,
            aspect: cfg.aspect,
            near: cfg.near,
            far: cfg.far,
            position: cfg.position,
            target: cfg.target,
        }
    }

    pub fn view(&self) -> Isometry3<f64> {
        Isometry3::look_at_rh(&self.position, &self.target, &Vector3::y())
    }

    pub fn projection(&self) -> Perspective3<f64> {
        Perspective3::new(self.aspect, self.fov_deg.to_radians(), self.near, self.far)
    }

    pub fn distance(&self) -> f64 {
        (self.position - self.target).norm()
    }

    pub fn set_aspect_from(&mut self, rect: egui::Rect) {
        if rect.height() > 0.0 && rect.width() > 0.0 {
            self.aspect = rect.width() as f64 / rect.height() as f64;
        }
    }

    pub fn project(&self, point: &Point3<f64>, rect: egui::Rect) -> Option<Projected> {
        let v = self.view().transform_point(point);
        let depth = -v.z;
        if depth < self.near || depth > self.far {
            return None;
        }
        Some(self.to_screen(&v, rect))
    }

    fn to_screen(&self, view_point: &Point3<f64>, rect: egui::Rect) -> Projected {
        let ndc = self.projection().project_point(view_point);
        let center = rect.center();
        Projected {
            pos: egui::pos2(
                center.x + (ndc.x * rect.width() as f64 / 2.0) as f32,
                center.y - (ndc.y * rect.height() as f64 / 2.0) as f32,
            ),
            depth: -view_point.z,
        }
    }

    /// Screen radius in points of a sphere of `radius` seen at `depth`.
    pub fn projected_radius(&self, radius: f64, depth: f64, rect: egui::Rect) -> f32 {
        let focal = 1.0 / (self.fov_deg.to_radians() / 2.0).tan();
        (radius / depth * focal * rect.height() as f64 / 2.0) as f32
    }

    /// Projects a world segment, clipping it against the near plane.
    pub fn project_segment(
        &self,
        a: &Point3<f64>,
        b: &Point3<f64>,
        rect: egui::Rect,
    ) -> Option<[egui::Pos2; 2]> {
        let view = self.view();
        let mut va = view.transform_point(a);
        let mut vb = view.transform_point(b);
        let (da, db) = (-va.z, -vb.z);
        if da < self.near && db < self.near {
            return None;
        }
        if da < self.near {
            let t = (self.near - da) / (db - da);
            va = va + (vb - va) * t;
        } else if db < self.near {
            let t = (self.near - db) / (da - db);
            vb = vb + (va - vb) * t;
        }
        Some([self.to_screen(&va, rect).pos, self.to_screen(&vb, rect).pos])
    }

    fn basis(&self) -> (Vector3<f64>, Vector3<f64>) {
        let forward = (self.target - self.position).normalize();
        let right = forward.cross(&Vector3::y()).normalize();
        let up = right.cross(&forward);
        (right, up)
    }
}

/// Mouse controls that orbit the camera around its target.
///
/// Primary drag rotates, secondary drag pans, the wheel dollies. There is no
/// damping: every input is applied in full on the frame it arrives.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub rotate_speed: f64,
    pub zoom_speed: f64,
    pub min_distance: f64,
    pub max_distance: f64,
}

impl OrbitControls {
    pub fn from_config(cfg: &CameraConfig) -> Self {
        Self {
            rotate_speed: cfg.rotate_speed,
            zoom_speed: cfg.zoom_speed,
            min_distance: cfg.min_distance,
            max_distance: cfg.max_distance,
        }
    }

    pub fn rotate(&self, camera: &mut Camera, dx: f64, dy: f64, viewport_height: f64) {
        let offset = camera.position - camera.target;
        let radius = offset.norm();
        if radius <= 0.0 || viewport_height <= 0.0 {
            return;
        }
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        theta -= 2.0 * PI * dx / viewport_height * self.rotate_speed;
        phi -= 2.0 * PI * dy / viewport_height * self.rotate_speed;
        phi = phi.clamp(POLAR_EPS, PI - POLAR_EPS);
        let sin_phi = phi.sin();
        let new_offset = Vector3::new(
            radius * sin_phi * theta.sin(),
            radius * phi.cos(),
            radius * sin_phi * theta.cos(),
        );
        camera.position = camera.target + new_offset;
    }

    /// Positive `scroll` moves towards the target.
    pub fn dolly(&self, camera: &mut Camera, scroll: f64) {
        let offset = camera.position - camera.target;
        let radius = offset.norm();
        if radius <= 0.0 {
            return;
        }
        let factor = 0.95_f64.powf(scroll / SCROLL_POINTS_PER_STEP * self.zoom_speed);
        let new_radius = (radius * factor).clamp(self.min_distance, self.max_distance);
        camera.position = camera.target + offset * (new_radius / radius);
    }

    pub fn pan(&self, camera: &mut Camera, dx: f64, dy: f64, viewport_height: f64) {
        if viewport_height <= 0.0 {
            return;
        }
        let (right, up) = camera.basis();
        let target_distance = camera.distance() * (camera.fov_deg.to_radians() / 2.0).tan();
        let shift = right * (-2.0 * dx * target_distance / viewport_height)
            + up * (2.0 * dy * target_distance / viewport_height);
        camera.position += shift;
        camera.target += shift;
    }

    /// Applies this frame's pointer input. Returns true when the camera moved.
    pub fn handle_input(&self, camera: &mut Camera, ui: &egui::Ui, response: &egui::Response) -> bool {
        let height = response.rect.height() as f64;
        let mut moved = false;
        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            self.rotate(camera, delta.x as f64, delta.y as f64, height);
            moved = true;
        } else if response.dragged_by(egui::PointerButton::Secondary) {
            let delta = response.drag_delta();
            self.pan(camera, delta.x as f64, delta.y as f64, height);
            moved = true;
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y) as f64;
            if scroll.abs() > 0.1 {
                self.dolly(camera, scroll);
                moved = true;
            }
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(1600.0, 900.0))
    }

    fn camera() -> Camera {
        Camera::from_config(&CameraConfig::default())
    }

    #[test]
    fn target_projects_to_center() {
        let cam = camera();
        let p = cam.project(&Point3::origin(), rect()).unwrap();
        assert!((p.pos.x - 800.0).abs() < 1e-3);
        assert!((p.pos.y - 450.0).abs() < 1e-3);
        assert!((p.depth - 14.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn points_behind_camera_are_dropped() {
        let cam = camera();
        let behind = Point3::new(2.0, 4.0, 6.0);
        assert!(cam.project(&behind, rect()).is_none());
    }

    #[test]
    fn up_is_up_on_screen() {
        let mut cam = camera();
        cam.position = Point3::new(0.0, 0.0, 10.0);
        let above = cam.project(&Point3::new(0.0, 1.0, 0.0), rect()).unwrap();
        let right = cam.project(&Point3::new(1.0, 0.0, 0.0), rect()).unwrap();
        assert!(above.pos.y < 450.0);
        assert!(right.pos.x > 800.0);
    }

    #[test]
    fn projected_radius_shrinks_with_depth() {
        let cam = camera();
        let near = cam.projected_radius(1.0, 5.0, rect());
        let far = cam.projected_radius(1.0, 10.0, rect());
        assert!((near / far - 2.0).abs() < 1e-5);
    }

    #[test]
    fn segment_crossing_near_plane_is_clipped() {
        let mut cam = camera();
        cam.position = Point3::new(0.0, 0.0, 10.0);
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(0.0, 0.0, 20.0);
        let seg = cam.project_segment(&a, &b, rect());
        assert!(seg.is_some());
        let both_behind = cam.project_segment(&Point3::new(0.0, 0.0, 11.0), &b, rect());
        assert!(both_behind.is_none());
    }

    #[test]
    fn rotation_keeps_distance() {
        let mut cam = camera();
        let controls = OrbitControls::from_config(&CameraConfig::default());
        let before = cam.distance();
        controls.rotate(&mut cam, 120.0, -40.0, 900.0);
        assert!((cam.distance() - before).abs() < 1e-9);
    }

    #[test]
    fn rotation_never_flips_over_pole() {
        let mut cam = camera();
        let controls = OrbitControls::from_config(&CameraConfig::default());
        controls.rotate(&mut cam, 0.0, 10_000.0, 900.0);
        let offset = cam.position - cam.target;
        assert!(offset.x.abs() + offset.z.abs() > 0.0);
    }

    #[test]
    fn dolly_is_clamped() {
        let cfg = CameraConfig::default();
        let controls = OrbitControls::from_config(&cfg);
        let mut cam = camera();
        controls.dolly(&mut cam, 1e6);
        assert!((cam.distance() - cfg.min_distance).abs() < 1e-9);
        controls.dolly(&mut cam, -1e6);
        assert!((cam.distance() - cfg.max_distance).abs() < 1e-6);
    }

    #[test]
    fn pan_moves_camera_and_target_together() {
        let controls = OrbitControls::from_config(&CameraConfig::default());
        let mut cam = camera();
        let offset = cam.position - cam.target;
        controls.pan(&mut cam, 30.0, 10.0, 900.0);
        assert!(cam.target != Point3::origin());
        assert!(((cam.position - cam.target) - offset).norm() < 1e-9);
    }
}
