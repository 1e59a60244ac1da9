//! Scene state and the per-frame mapping from bodies to primitives.

use crate::celestial::{BodyKind, CelestialBody, OrbitalElements};
use crate::config::{SceneConfig, ViewSettings};
use crate::orbit::{ecliptic_to_scene, heliocentric_position, orbit_path};
use eframe::egui::Color32;
use nalgebra::Point3;
use std::collections::HashSet;

pub const SUN_NAME: &str = "Sun";

const GRID_CENTER_COLOR: Color32 = Color32::from_rgb(0x44, 0x44, 0x44);
const GRID_COLOR: Color32 = Color32::from_rgb(0x88, 0x88, 0x88);
const AXIS_X_COLOR: Color32 = Color32::from_rgb(255, 0, 0);
const AXIS_Y_COLOR: Color32 = Color32::from_rgb(0, 255, 0);
const AXIS_Z_COLOR: Color32 = Color32::from_rgb(0, 0, 255);
const ORBIT_COLOR: Color32 = Color32::from_rgb(90, 110, 150);
const ASTEROID_ORBIT_COLOR: Color32 = Color32::from_rgb(150, 120, 90);
const SUN_COLOR: Color32 = Color32::from_rgb(255, 240, 200);
const MATERIAL_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// Overlay flags and scale for one frame, copied out of `ViewSettings`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewFlags {
    pub show_grid: bool,
    pub show_axes: bool,
    pub show_orbits: bool,
    pub show_sun: bool,
    pub scale: f64,
}

impl From<&ViewSettings> for ViewFlags {
    fn from(s: &ViewSettings) -> Self {
        Self {
            show_grid: s.show_grid,
            show_axes: s.show_axes,
            show_orbits: s.show_orbits,
            show_sun: s.show_sun,
            scale: s.scale,
        }
    }
}

#[derive(Default)]
pub struct SceneState {
    pub planets: Vec<CelestialBody>,
    pub asteroids: Vec<CelestialBody>,
    hidden: HashSet<String>,
    loaded: bool,
}

impl SceneState {
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Fills the scene once. Later calls are ignored.
    pub fn populate(&mut self, bodies: Vec<CelestialBody>) {
        if self.loaded {
            log::debug!("scene already populated, ignoring {} bodies", bodies.len());
            return;
        }
        for body in bodies {
            match body.kind {
                BodyKind::Planet => self.planets.push(body),
                BodyKind::Asteroid => self.asteroids.push(body),
            }
        }
        self.loaded = true;
        log::info!(
            "scene populated with {} planets and {} asteroids",
            self.planets.len(),
            self.asteroids.len()
        );
    }

    /// Appends a looked-up asteroid. Returns false if one with that name exists.
    pub fn add_asteroid(&mut self, body: CelestialBody) -> bool {
        if self.bodies().any(|b| b.name == body.name) {
            return false;
        }
        log::info!("adding asteroid {}", body.name);
        self.asteroids.push(body);
        true
    }

    pub fn bodies(&self) -> impl Iterator<Item = &CelestialBody> {
        self.planets.iter().chain(self.asteroids.iter())
    }

    pub fn find(&self, name: &str) -> Option<&CelestialBody> {
        self.bodies().find(|b| b.name == name)
    }

    pub fn is_visible(&self, name: &str) -> bool {
        !self.hidden.contains(name)
    }

    pub fn set_visible(&mut self, name: &str, visible: bool) {
        if visible {
            self.hidden.remove(name);
        } else {
            self.hidden.insert(name.to_string());
        }
    }

    fn visible_bodies(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies().filter(|b| self.is_visible(&b.name))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpherePrimitive {
    pub name: String,
    /// `None` for the Sun.
    pub kind: Option<BodyKind>,
    pub center: Point3<f64>,
    pub radius: f64,
    pub color: Color32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSegment {
    pub a: Point3<f64>,
    pub b: Point3<f64>,
    pub color: Color32,
}

/// Colour of the white standard material under the ambient light alone.
pub fn ambient_lit_color(ambient_intensity: f32) -> Color32 {
    let [r, g, b] = MATERIAL_COLOR.map(|c| (c * ambient_intensity).clamp(0.0, 1.0));
    Color32::from(eframe::egui::Rgba::from_rgb(r, g, b))
}

pub fn body_position(elements: &OrbitalElements, days_since_j2000: f64) -> Point3<f64> {
    Point3::from(ecliptic_to_scene(heliocentric_position(elements, days_since_j2000)))
}

pub fn scene_primitives(
    state: &SceneState,
    flags: &ViewFlags,
    cfg: &SceneConfig,
    days_since_j2000: f64,
) -> Vec<SpherePrimitive> {
    let lit = ambient_lit_color(cfg.ambient_intensity);
    let mut out = Vec::with_capacity(state.planets.len() + state.asteroids.len() + 1);
    if flags.show_sun && state.is_visible(SUN_NAME) {
        out.push(SpherePrimitive {
            name: SUN_NAME.to_string(),
            kind: None,
            center: Point3::origin(),
            radius: cfg.sun_radius * flags.scale,
            color: SUN_COLOR,
        });
    }
    for body in state.visible_bodies() {
        out.push(SpherePrimitive {
            name: body.name.clone(),
            kind: Some(body.kind),
            center: body_position(&body.elements, days_since_j2000),
            radius: cfg.body_radius * flags.scale,
            color: lit,
        });
    }
    out
}

pub fn grid_lines(size: f64, divisions: usize) -> Vec<LineSegment> {
    let divisions = divisions.max(1);
    let center = divisions / 2;
    let step = size / divisions as f64;
    let half = size / 2.0;
    let mut lines = Vec::with_capacity(2 * (divisions + 1));
    for i in 0..=divisions {
        let k = -half + i as f64 * step;
        let color = if i == center { GRID_CENTER_COLOR } else { GRID_COLOR };
        lines.push(LineSegment {
            a: Point3::new(-half, 0.0, k),
            b: Point3::new(half, 0.0, k),
            color,
        });
        lines.push(LineSegment {
            a: Point3::new(k, 0.0, -half),
            b: Point3::new(k, 0.0, half),
            color,
        });
    }
    lines
}

pub fn axes_lines(length: f64) -> Vec<LineSegment> {
    let o = Point3::origin();
    vec![
        LineSegment { a: o, b: Point3::new(length, 0.0, 0.0), color: AXIS_X_COLOR },
        LineSegment { a: o, b: Point3::new(0.0, length, 0.0), color: AXIS_Y_COLOR },
        LineSegment { a: o, b: Point3::new(0.0, 0.0, length), color: AXIS_Z_COLOR },
    ]
}

pub fn orbit_lines(body: &CelestialBody, segments: usize) -> Vec<LineSegment> {
    let color = match body.kind {
        BodyKind::Planet => ORBIT_COLOR,
        BodyKind::Asteroid => ASTEROID_ORBIT_COLOR,
    };
    let points: Vec<Point3<f64>> = orbit_path(&body.elements, segments)
        .into_iter()
        .map(|p| Point3::from(ecliptic_to_scene(p)))
        .collect();
    points
        .windows(2)
        .map(|w| LineSegment { a: w[0], b: w[1], color })
        .collect()
}

/// Grid, axes and orbit segments for the overlays that are switched on.
pub fn helper_lines(state: &SceneState, flags: &ViewFlags, cfg: &SceneConfig) -> Vec<LineSegment> {
    let mut lines = Vec::new();
    if flags.show_grid {
        lines.extend(grid_lines(cfg.grid_size, cfg.grid_divisions));
    }
    if flags.show_orbits {
        for body in state.visible_bodies() {
            lines.extend(orbit_lines(body, cfg.orbit_segments));
        }
    }
    if flags.show_axes {
        lines.extend(axes_lines(cfg.axes_length));
    }
    lines
}
