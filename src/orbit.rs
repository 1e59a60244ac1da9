//! Heliocentric positions from classical orbital elements.
//!
//! Positions are in AU in the J2000 ecliptic frame (x towards the vernal
//! equinox, z towards ecliptic north). `ecliptic_to_scene` converts to the
//! y-up frame the camera works in.

use crate::celestial::OrbitalElements;
use nalgebra::{Matrix3, Vector3};
use std::f64::consts::PI;

const KEPLER_TOLERANCE: f64 = 1e-12;
const KEPLER_MAX_ITER: usize = 50;

pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(2.0 * PI)
}

/// Solves `M = E - e sin E` for the eccentric anomaly.
pub fn solve_kepler(mean_anomaly: f64, e: f64) -> f64 {
    let ma = normalize_angle(mean_anomaly);
    let mut ea = if e < 0.8 { ma } else { PI };
    for _ in 0..KEPLER_MAX_ITER {
        let delta = (ea - e * ea.sin() - ma) / (1.0 - e * ea.cos());
        ea -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            break;
        }
    }
    ea
}

pub fn true_anomaly(eccentric_anomaly: f64, e: f64) -> f64 {
    let half = eccentric_anomaly / 2.0;
    2.0 * ((1.0 + e).sqrt() * half.sin()).atan2((1.0 - e).sqrt() * half.cos())
}

/// Perifocal to ecliptic rotation, `R_z(Ω) R_x(i) R_z(ω)`.
pub fn perifocal_to_ecliptic(el: &OrbitalElements) -> Matrix3<f64> {
    let (sin_o, cos_o) = el.asc_node_long_deg.to_radians().sin_cos();
    let (sin_i, cos_i) = el.inclination_deg.to_radians().sin_cos();
    let (sin_w, cos_w) = el.arg_periapsis_deg.to_radians().sin_cos();
    Matrix3::new(
        cos_o * cos_w - sin_o * sin_w * cos_i,
        -cos_o * sin_w - sin_o * cos_w * cos_i,
        sin_o * sin_i,
        sin_o * cos_w + cos_o * sin_w * cos_i,
        -sin_o * sin_w + cos_o * cos_w * cos_i,
        -cos_o * sin_i,
        sin_w * sin_i,
        cos_w * sin_i,
        cos_i,
    )
}

fn perifocal_point(el: &OrbitalElements, eccentric_anomaly: f64) -> Vector3<f64> {
    let a = el.semimajor_axis_au;
    let e = el.eccentricity;
    let (sin_ea, cos_ea) = eccentric_anomaly.sin_cos();
    Vector3::new(a * (cos_ea - e), a * (1.0 - e * e).sqrt() * sin_ea, 0.0)
}

pub fn mean_anomaly_at(el: &OrbitalElements, days_since_epoch: f64) -> f64 {
    let n = el.mean_motion_deg_per_day().to_radians();
    normalize_angle(el.mean_anomaly_rad() + n * days_since_epoch)
}

pub fn heliocentric_position(el: &OrbitalElements, days_since_epoch: f64) -> Vector3<f64> {
    let ma = mean_anomaly_at(el, days_since_epoch);
    let ea = solve_kepler(ma, el.eccentricity);
    perifocal_to_ecliptic(el) * perifocal_point(el, ea)
}

/// Closed polyline of the orbit, `segments + 1` points uniform in eccentric anomaly.
pub fn orbit_path(el: &OrbitalElements, segments: usize) -> Vec<Vector3<f64>> {
    let rot = perifocal_to_ecliptic(el);
    let segments = segments.max(3);
    (0..=segments)
        .map(|i| {
            let ea = 2.0 * PI * i as f64 / segments as f64;
            rot * perifocal_point(el, ea)
        })
        .collect()
}

pub fn ecliptic_to_scene(v: Vector3<f64>) -> Vector3<f64> {
    Vector3::new(v.x, v.z, -v.y)
}
