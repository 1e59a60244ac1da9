//! Painting the 3D scene onto an egui canvas.
//!
//! Helper overlays are projected segment by segment. Bodies are drawn as a
//! shared pre-shaded sphere sprite, tinted per body and painted back to
//! front.

use crate::camera::{Camera, OrbitControls, Projected};
use crate::celestial::{BodyKind, CelestialBody, KM_PER_AU, SUN_DIAMETER_KM};
use crate::config::SceneConfig;
use crate::scene::{helper_lines, scene_primitives, SceneState, SpherePrimitive, ViewFlags};
use eframe::egui;
use std::cmp::Ordering;

const MIN_SPRITE_RADIUS: f32 = 1.5;
const MIN_HIT_RADIUS: f32 = 6.0;
const LABEL_MIN_RADIUS: f32 = 2.0;

/// Unit sphere seen head-on, white with limb darkening, transparent outside.
pub fn sphere_sprite_image(size: usize) -> egui::ColorImage {
    let size = size.max(2);
    let mut rgba = vec![0u8; size * size * 4];
    let center = size as f64 / 2.0;
    let radius = center * 0.98;

    for py in 0..size {
        for px in 0..size {
            let dx = (px as f64 + 0.5 - center) / radius;
            let dy = (py as f64 + 0.5 - center) / radius;
            let dist_sq = dx * dx + dy * dy;
            if dist_sq >= 1.0 {
                continue;
            }
            let z = (1.0 - dist_sq).sqrt();
            let shade = (0.3 + 0.7 * z).clamp(0.0, 1.0);
            let v = (shade * 255.0) as u8;
            let edge = ((1.0 - dist_sq.sqrt()) * radius).clamp(0.0, 1.0);
            let i = (py * size + px) * 4;
            rgba[i] = v;
            rgba[i + 1] = v;
            rgba[i + 2] = v;
            rgba[i + 3] = (edge * 255.0) as u8;
        }
    }
    egui::ColorImage::from_rgba_unmultiplied([size, size], &rgba)
}

pub fn load_sphere_sprite(ctx: &egui::Context, size: usize) -> egui::TextureHandle {
    ctx.load_texture(
        "sphere_sprite",
        sphere_sprite_image(size),
        egui::TextureOptions::LINEAR,
    )
}

pub struct SceneView<'a> {
    pub state: &'a SceneState,
    pub flags: ViewFlags,
    pub config: &'a SceneConfig,
    pub days_since_j2000: f64,
    pub sprite: Option<&'a egui::TextureHandle>,
    pub dark_mode: bool,
}

struct ScreenSphere {
    primitive: SpherePrimitive,
    projected: Projected,
    radius: f32,
}

/// Draws the scene and handles camera input. Returns the body clicked this frame.
pub fn draw_scene_view(
    ui: &mut egui::Ui,
    camera: &mut Camera,
    controls: &OrbitControls,
    view: SceneView<'_>,
) -> Option<String> {
    let (response, painter) =
        ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
    let rect = response.rect;
    let painter = painter.with_clip_rect(rect);

    if controls.handle_input(camera, ui, &response) {
        ui.ctx().request_repaint();
    }
    camera.set_aspect_from(rect);

    let (bg, label_color) = if view.dark_mode {
        (egui::Color32::BLACK, egui::Color32::from_gray(200))
    } else {
        (egui::Color32::from_gray(235), egui::Color32::from_gray(40))
    };
    painter.rect_filled(rect, 0.0, bg);

    for seg in helper_lines(view.state, &view.flags, view.config) {
        if let Some(points) = camera.project_segment(&seg.a, &seg.b, rect) {
            painter.line_segment(points, egui::Stroke::new(1.0, seg.color));
        }
    }

    let mut spheres: Vec<ScreenSphere> = scene_primitives(
        view.state,
        &view.flags,
        view.config,
        view.days_since_j2000,
    )
    .into_iter()
    .filter_map(|primitive| {
        let projected = camera.project(&primitive.center, rect)?;
        let radius = camera
            .projected_radius(primitive.radius, projected.depth, rect)
            .max(MIN_SPRITE_RADIUS);
        Some(ScreenSphere { primitive, projected, radius })
    })
    .collect();
    spheres.sort_by(|a, b| {
        b.projected
            .depth
            .partial_cmp(&a.projected.depth)
            .unwrap_or(Ordering::Equal)
    });

    for s in &spheres {
        let pos = s.projected.pos;
        match view.sprite {
            Some(handle) => {
                painter.image(
                    handle.id(),
                    egui::Rect::from_center_size(pos, egui::Vec2::splat(s.radius * 2.0)),
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    s.primitive.color,
                );
            }
            None => {
                painter.circle_filled(pos, s.radius, s.primitive.color);
            }
        }
        if s.radius >= LABEL_MIN_RADIUS {
            let color = match s.primitive.kind {
                Some(BodyKind::Asteroid) => label_color.gamma_multiply(0.6),
                _ => label_color,
            };
            painter.text(
                egui::pos2(pos.x, pos.y - s.radius - 4.0),
                egui::Align2::CENTER_BOTTOM,
                &s.primitive.name,
                egui::FontId::proportional(12.0),
                color,
            );
        }
    }

    let hovered = response
        .hover_pos()
        .and_then(|pointer| pick_sphere(&spheres, pointer));

    if let Some(s) = hovered {
        let ring_r = s.radius * 1.15 + 2.0;
        painter.circle_stroke(
            s.projected.pos,
            ring_r,
            egui::Stroke::new(1.5, egui::Color32::from_rgb(200, 170, 120)),
        );
        let body = view.state.find(&s.primitive.name);
        show_body_tooltip(ui, &s.primitive, body, view.days_since_j2000);
    }

    if response.clicked() {
        return hovered.map(|s| s.primitive.name.clone());
    }
    None
}

/// Front-most sphere whose screen disc contains the pointer.
fn pick_sphere(spheres: &[ScreenSphere], pointer: egui::Pos2) -> Option<&ScreenSphere> {
    spheres
        .iter()
        .filter(|s| s.projected.pos.distance(pointer) <= s.radius.max(MIN_HIT_RADIUS))
        .min_by(|a, b| {
            a.projected
                .depth
                .partial_cmp(&b.projected.depth)
                .unwrap_or(Ordering::Equal)
        })
}

fn format_distance(au: f64) -> String {
    let km = au * KM_PER_AU;
    if km >= 1_000_000.0 {
        format!("{:.3} AU\n({:.1}M km)", au, km / 1_000_000.0)
    } else {
        format!("{:.3} AU\n({:.0} km)", au, km)
    }
}

fn show_body_tooltip(
    ui: &egui::Ui,
    primitive: &SpherePrimitive,
    body: Option<&CelestialBody>,
    days_since_j2000: f64,
) {
    egui::Tooltip::always_open(
        ui.ctx().clone(),
        egui::LayerId::background(),
        egui::Id::new("scene_tooltip"),
        egui::PopupAnchor::Pointer,
    )
    .gap(12.0)
    .show(|ui| {
        ui.set_min_width(180.0);
        ui.label(egui::RichText::new(&primitive.name).strong().size(15.0));
        ui.separator();
        egui::Grid::new("scene_tooltip_grid")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| match body {
                None => {
                    ui.label("Diameter:");
                    ui.label(format!("{:.0} km", SUN_DIAMETER_KM));
                    ui.end_row();
                }
                Some(body) => {
                    let el = &body.elements;
                    ui.label("Type:");
                    ui.label(format!("{} ({})", body.kind.label(), body.class_id));
                    ui.end_row();
                    ui.label("Diameter:");
                    ui.label(format!("{:.0} km", body.diameter_km));
                    ui.end_row();
                    ui.label("Albedo:");
                    ui.label(format!("{:.3}", body.albedo));
                    ui.end_row();
                    ui.label("Orbit:");
                    ui.label(format_distance(el.semimajor_axis_au));
                    ui.end_row();
                    ui.label("Perihelion:");
                    ui.label(format_distance(el.perihelion_au));
                    ui.end_row();
                    ui.label("Aphelion:");
                    ui.label(format_distance(el.aphelion_au()));
                    ui.end_row();
                    ui.label("Eccentricity:");
                    ui.label(format!("{:.4}", el.eccentricity));
                    ui.end_row();
                    ui.label("Inclination:");
                    ui.label(format!("{:.2}\u{00b0}", el.inclination_deg));
                    ui.end_row();
                    ui.label("Anomaly at J2000:");
                    ui.label(format!("{:.1}\u{00b0}", el.true_anomaly_deg));
                    ui.end_row();
                    let period = el.period_days();
                    let years = period / 365.25;
                    ui.label("Period:");
                    if years >= 1.0 {
                        ui.label(format!("{:.2} years", years));
                    } else {
                        ui.label(format!("{:.1} days", period));
                    }
                    ui.end_row();
                    let r = crate::scene::body_position(el, days_since_j2000).coords.norm();
                    ui.label("From Sun:");
                    ui.label(format_distance(r));
                    ui.end_row();
                }
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn sphere(name: &str, x: f32, depth: f64, radius: f32) -> ScreenSphere {
        ScreenSphere {
            primitive: SpherePrimitive {
                name: name.to_string(),
                kind: None,
                center: Point3::origin(),
                radius: 1.0,
                color: egui::Color32::WHITE,
            },
            projected: Projected { pos: egui::pos2(x, 100.0), depth },
            radius,
        }
    }

    #[test]
    fn sprite_is_opaque_inside_and_clear_outside() {
        let img = sphere_sprite_image(64);
        assert_eq!(img.size, [64, 64]);
        let center = img.pixels[32 * 64 + 32];
        let corner = img.pixels[0];
        assert_eq!(center.a(), 255);
        assert_eq!(corner.a(), 0);
    }

    #[test]
    fn sprite_darkens_towards_limb() {
        let img = sphere_sprite_image(64);
        let center = img.pixels[32 * 64 + 32];
        let near_edge = img.pixels[32 * 64 + 2];
        assert!(center.r() > near_edge.r());
    }

    #[test]
    fn pick_prefers_nearest_overlapping_sphere() {
        let spheres = vec![sphere("far", 100.0, 20.0, 30.0), sphere("near", 110.0, 5.0, 30.0)];
        let hit = pick_sphere(&spheres, egui::pos2(105.0, 100.0)).unwrap();
        assert_eq!(hit.primitive.name, "near");
    }

    #[test]
    fn tiny_spheres_still_have_a_hit_area() {
        let spheres = vec![sphere("dot", 100.0, 5.0, 1.0)];
        assert!(pick_sphere(&spheres, egui::pos2(104.0, 100.0)).is_some());
        assert!(pick_sphere(&spheres, egui::pos2(120.0, 100.0)).is_none());
    }

    #[test]
    fn distances_switch_to_millions_of_km() {
        assert!(format_distance(1.0).contains("149.6M km"));
        assert!(format_distance(0.001).contains("149598 km"));
    }
}
