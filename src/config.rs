//! Scene constants and the view settings persisted between sessions.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Key under which `ViewSettings` is stored by eframe.
pub const SETTINGS_KEY: &str = "solar-viz/view-settings";

#[derive(Clone, Debug)]
pub struct CameraConfig {
    pub fov_deg: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub min_distance: f64,
    pub max_distance: f64,
    pub rotate_speed: f64,
    pub zoom_speed: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 40.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 10_000.0,
            position: Point3::new(1.0, 2.0, 3.0),
            target: Point3::origin(),
            min_distance: 0.5,
            max_distance: 2_000.0,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub grid_size: f64,
    pub grid_divisions: usize,
    pub axes_length: f64,
    pub ambient_intensity: f32,
    /// Sphere radius in AU before the user scale is applied.
    pub body_radius: f64,
    pub sun_radius: f64,
    pub orbit_segments: usize,
    pub sphere_sprite_size: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            grid_size: 100.0,
            grid_divisions: 100,
            axes_length: 50.0,
            ambient_intensity: 0.1,
            body_radius: 0.1,
            sun_radius: 0.3,
            orbit_segments: 180,
            sphere_sprite_size: 128,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub show_grid: bool,
    pub show_axes: bool,
    pub show_orbits: bool,
    pub show_sun: bool,
    pub scale: f64,
    pub side_panel_open: bool,
    pub clock_speed: f64,
    pub dark_mode: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_axes: true,
            show_orbits: false,
            show_sun: true,
            scale: 1.0,
            side_panel_open: false,
            clock_speed: 10.0,
            dark_mode: true,
        }
    }
}

impl ViewSettings {
    /// Replaces restored values that the UI would never produce.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.scale.is_finite() && self.scale > 0.0) {
            log::warn!("ignoring stored scale {}", self.scale);
            self.scale = defaults.scale;
        }
        if !self.clock_speed.is_finite() {
            log::warn!("ignoring stored clock speed {}", self.clock_speed);
            self.clock_speed = defaults.clock_speed;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlays_start_visible() {
        let settings = ViewSettings::default();
        assert!(settings.show_grid);
        assert!(settings.show_axes);
        assert_eq!(settings.scale, 1.0);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let restored: ViewSettings = serde_json::from_str(r#"{"show_grid": false}"#).unwrap();
        assert!(!restored.show_grid);
        assert_eq!(restored.scale, ViewSettings::default().scale);
    }

    #[test]
    fn bad_stored_scale_falls_back_to_default() {
        for scale in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let restored = ViewSettings { scale, ..ViewSettings::default() }.sanitized();
            assert_eq!(restored.scale, 1.0);
        }
        let kept = ViewSettings { scale: 3.5, show_grid: false, ..ViewSettings::default() }.sanitized();
        assert_eq!(kept.scale, 3.5);
        assert!(!kept.show_grid);
    }

    #[test]
    fn bad_stored_clock_speed_falls_back_to_default() {
        let restored = ViewSettings { clock_speed: f64::NAN, ..ViewSettings::default() }.sanitized();
        assert_eq!(restored.clock_speed, ViewSettings::default().clock_speed);
    }

    #[test]
    fn camera_defaults() {
        let cam = CameraConfig::default();
        assert_eq!(cam.fov_deg, 40.0);
        assert_eq!(cam.near, 0.1);
        assert_eq!(cam.far, 10_000.0);
        assert_eq!(cam.position, Point3::new(1.0, 2.0, 3.0));
    }
}
