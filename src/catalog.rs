//! Static table of orbital parameters shipped with the binary.
//!
//! The table is a JSON object keyed by a short identifier. Entry order is
//! kept, so the scene lists bodies in the order the table declares them.
//! The entry keyed `sample` is the asteroid; everything else is a planet.

use crate::celestial::{BodyKind, CelestialBody, OrbitalElements};
use crate::error::CatalogError;
use serde::Deserialize;

const SOLAR_SYSTEM_TABLE: &str = include_str!("../assets/solar_system.json");
const ASTEROID_KEY: &str = "sample";

#[derive(Deserialize)]
struct CatalogEntry {
    name: String,
    diameter: f64,
    albedo: f64,
    eccentricity: f64,
    semimajor_axis: f64,
    perihelion: f64,
    inclination: f64,
    asc_node_long: f64,
    arg_periapsis: f64,
    mean_anomaly: f64,
    true_anomaly: f64,
    classid: String,
}

pub fn load_catalog() -> Result<Vec<CelestialBody>, CatalogError> {
    parse_catalog(SOLAR_SYSTEM_TABLE)
}

pub fn parse_catalog(json: &str) -> Result<Vec<CelestialBody>, CatalogError> {
    let table: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
    let mut bodies = Vec::with_capacity(table.len());
    for (key, value) in table {
        let entry: CatalogEntry = serde_json::from_value(value)?;
        validate(&key, &entry)?;
        let kind = classify(&key);
        bodies.push(CelestialBody::new(
            kind,
            entry.name,
            entry.diameter,
            entry.albedo,
            OrbitalElements {
                eccentricity: entry.eccentricity,
                semimajor_axis_au: entry.semimajor_axis,
                perihelion_au: entry.perihelion,
                inclination_deg: entry.inclination,
                asc_node_long_deg: entry.asc_node_long,
                arg_periapsis_deg: entry.arg_periapsis,
                mean_anomaly_deg: entry.mean_anomaly,
                true_anomaly_deg: entry.true_anomaly,
            },
            entry.classid,
        ));
    }
    Ok(bodies)
}

fn classify(key: &str) -> BodyKind {
    if key == ASTEROID_KEY {
        BodyKind::Asteroid
    } else {
        BodyKind::Planet
    }
}

fn validate(key: &str, entry: &CatalogEntry) -> Result<(), CatalogError> {
    let invalid = |reason: String| CatalogError::InvalidEntry {
        key: key.to_string(),
        reason,
    };
    let numbers = [
        ("diameter", entry.diameter),
        ("albedo", entry.albedo),
        ("eccentricity", entry.eccentricity),
        ("semimajor_axis", entry.semimajor_axis),
        ("perihelion", entry.perihelion),
        ("inclination", entry.inclination),
        ("asc_node_long", entry.asc_node_long),
        ("arg_periapsis", entry.arg_periapsis),
        ("mean_anomaly", entry.mean_anomaly),
        ("true_anomaly", entry.true_anomaly),
    ];
    if let Some((field, _)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
        return Err(invalid(format!("{field} is not finite")));
    }
    if !(0.0..1.0).contains(&entry.eccentricity) {
        return Err(invalid(format!(
            "eccentricity {} is not an ellipse",
            entry.eccentricity
        )));
    }
    if entry.semimajor_axis <= 0.0 {
        return Err(invalid(format!(
            "semimajor axis {} must be positive",
            entry.semimajor_axis
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_loads_in_order() {
        let bodies = load_catalog().expect("builtin catalog parses");
        let names: Vec<&str> = bodies.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune",
                "1 Ceres"
            ]
        );
    }

    #[test]
    fn only_sample_entry_is_an_asteroid() {
        let bodies = load_catalog().unwrap();
        let asteroids: Vec<&CelestialBody> = bodies
            .iter()
            .filter(|b| b.kind == BodyKind::Asteroid)
            .collect();
        assert_eq!(asteroids.len(), 1);
        assert_eq!(asteroids[0].name, "1 Ceres");
        assert_eq!(asteroids[0].class_id, "MBA");
    }

    #[test]
    fn builtin_perihelia_match_elements() {
        for body in load_catalog().unwrap() {
            let el = &body.elements;
            let q = el.semimajor_axis_au * (1.0 - el.eccentricity);
            assert!(
                (q - el.perihelion_au).abs() < 1e-3,
                "{}: q {} vs table {}",
                body.name,
                q,
                el.perihelion_au
            );
        }
    }

    const ONE_ENTRY: &str = r#"{
        "sample": {
            "name": "Vesta", "diameter": 525.4, "albedo": 0.42,
            "eccentricity": 0.089, "semimajor_axis": 2.36, "perihelion": 2.15,
            "inclination": 7.14, "asc_node_long": 103.8, "arg_periapsis": 151.2,
            "mean_anomaly": 20.0, "true_anomaly": 23.5, "classid": "MBA"
        }
    }"#;

    #[test]
    fn custom_table_is_parsed() {
        let bodies = parse_catalog(ONE_ENTRY).unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].kind, BodyKind::Asteroid);
        assert_eq!(bodies[0].elements.inclination_deg, 7.14);
    }

    #[test]
    fn hyperbolic_entry_is_rejected() {
        let json = ONE_ENTRY.replace("\"eccentricity\": 0.089", "\"eccentricity\": 1.2");
        match parse_catalog(&json) {
            Err(CatalogError::InvalidEntry { key, .. }) => assert_eq!(key, "sample"),
            other => panic!("expected invalid entry, got {other:?}"),
        }
    }

    #[test]
    fn non_positive_semimajor_axis_is_rejected() {
        for a in ["0.0", "-2.36"] {
            let json = ONE_ENTRY.replace("\"semimajor_axis\": 2.36", &format!("\"semimajor_axis\": {a}"));
            match parse_catalog(&json) {
                Err(CatalogError::InvalidEntry { key, reason }) => {
                    assert_eq!(key, "sample");
                    assert!(reason.contains("semimajor"), "reason was {reason}");
                }
                other => panic!("expected invalid entry for a = {a}, got {other:?}"),
            }
        }
    }

    #[test]
    fn missing_field_is_a_json_error() {
        let json = ONE_ENTRY.replace("\"albedo\": 0.42,", "");
        assert!(matches!(parse_catalog(&json), Err(CatalogError::Json(_))));
    }
}
