//! Celestial body records and their orbital elements.
//!
//! Records are built once from the catalog (or a database lookup) and are
//! read-only for the rest of the session.

use std::f64::consts::PI;

/// Gaussian gravitational constant, degrees per day for a = 1 AU.
pub const GAUSS_DEG_PER_DAY: f64 = 0.985_607_668_6;
pub const KM_PER_AU: f64 = 149_597_870.7;
pub const SUN_DIAMETER_KM: f64 = 1_392_680.0;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BodyKind {
    Planet,
    Asteroid,
}

impl BodyKind {
    pub fn label(&self) -> &'static str {
        match self {
            BodyKind::Planet => "Planet",
            BodyKind::Asteroid => "Asteroid",
        }
    }
}

/// Classical elements at the J2000 epoch. Angles in degrees, distances in AU.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitalElements {
    pub eccentricity: f64,
    pub semimajor_axis_au: f64,
    pub perihelion_au: f64,
    pub inclination_deg: f64,
    pub asc_node_long_deg: f64,
    pub arg_periapsis_deg: f64,
    pub mean_anomaly_deg: f64,
    pub true_anomaly_deg: f64,
}

impl OrbitalElements {
    pub fn mean_motion_deg_per_day(&self) -> f64 {
        GAUSS_DEG_PER_DAY / self.semimajor_axis_au.powf(1.5)
    }

    pub fn period_days(&self) -> f64 {
        360.0 / self.mean_motion_deg_per_day()
    }

    pub fn aphelion_au(&self) -> f64 {
        self.semimajor_axis_au * (1.0 + self.eccentricity)
    }

    pub(crate) fn mean_anomaly_rad(&self) -> f64 {
        self.mean_anomaly_deg * PI / 180.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CelestialBody {
    pub kind: BodyKind,
    pub name: String,
    pub diameter_km: f64,
    pub albedo: f64,
    pub elements: OrbitalElements,
    pub class_id: String,
}

impl CelestialBody {
    pub fn new(
        kind: BodyKind,
        name: impl Into<String>,
        diameter_km: f64,
        albedo: f64,
        elements: OrbitalElements,
        class_id: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            diameter_km,
            albedo,
            elements,
            class_id: class_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn earth_like() -> OrbitalElements {
        OrbitalElements {
            eccentricity: 0.0167,
            semimajor_axis_au: 1.0,
            perihelion_au: 0.9833,
            inclination_deg: 0.0,
            asc_node_long_deg: -11.26,
            arg_periapsis_deg: 114.21,
            mean_anomaly_deg: 358.6,
            true_anomaly_deg: 358.6,
        }
    }

    #[test]
    fn one_au_orbit_takes_a_year() {
        let period = earth_like().period_days();
        assert!((period - 365.256).abs() < 0.01, "period was {period}");
    }

    #[test]
    fn period_follows_third_law() {
        let mut jupiter = earth_like();
        jupiter.semimajor_axis_au = 5.2026;
        let ratio = jupiter.period_days() / earth_like().period_days();
        assert!((ratio - 5.2026_f64.powf(1.5)).abs() < 1e-9);
    }

    #[test]
    fn aphelion_mirrors_perihelion() {
        let el = earth_like();
        let q = el.semimajor_axis_au * (1.0 - el.eccentricity);
        assert!((el.aphelion_au() + q - 2.0 * el.semimajor_axis_au).abs() < 1e-12);
    }

    #[test]
    fn kind_labels() {
        assert_eq!(BodyKind::Planet.label(), "Planet");
        assert_eq!(BodyKind::Asteroid.label(), "Asteroid");
    }
}
