//! Asteroid lookup against the JPL Small-Body Database API.
//!
//! Lookups run on a background thread on native builds and report back over
//! a channel that the UI polls once per frame.

use crate::celestial::{BodyKind, CelestialBody, OrbitalElements};
use crate::error::LookupError;
use crate::orbit::{solve_kepler, true_anomaly};
use serde::Deserialize;
use std::sync::mpsc;

#[cfg(not(target_arch = "wasm32"))]
const SBDB_URL: &str = "https://ssd-api.jpl.nasa.gov/sbdb.api";
const DEFAULT_DIAMETER_KM: f64 = 1.0;
const DEFAULT_ALBEDO: f64 = 0.15;

#[derive(Deserialize)]
struct SbdbResponse {
    object: Option<SbdbObject>,
    orbit: Option<SbdbOrbit>,
    #[serde(default)]
    phys_par: Vec<NamedValue>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct SbdbObject {
    fullname: String,
    orbit_class: Option<OrbitClass>,
}

#[derive(Deserialize)]
struct OrbitClass {
    code: String,
}

#[derive(Deserialize)]
struct SbdbOrbit {
    elements: Vec<NamedValue>,
}

#[derive(Deserialize)]
struct NamedValue {
    name: String,
    value: Option<String>,
}

fn lookup(values: &[NamedValue], field: &'static str) -> Result<Option<f64>, LookupError> {
    let Some(raw) = values
        .iter()
        .find(|v| v.name == field)
        .and_then(|v| v.value.as_deref())
    else {
        return Ok(None);
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(LookupError::BadValue { field, value: raw.to_string() }),
    }
}

fn required(values: &[NamedValue], field: &'static str) -> Result<f64, LookupError> {
    lookup(values, field)?.ok_or(LookupError::MissingElement(field))
}

/// Converts an SBDB `sbdb.api` response into an asteroid record.
pub fn parse_sbdb_response(query: &str, json: &str) -> Result<CelestialBody, LookupError> {
    let resp: SbdbResponse = serde_json::from_str(json)?;
    let (Some(object), Some(orbit)) = (resp.object, resp.orbit) else {
        let detail = resp.message.unwrap_or_else(|| query.to_string());
        return Err(LookupError::NotFound(detail));
    };

    let el = &orbit.elements;
    let eccentricity = required(el, "e")?;
    let semimajor_axis_au = required(el, "a")?;
    if !(0.0..1.0).contains(&eccentricity) {
        return Err(LookupError::BadValue {
            field: "e",
            value: format!("{eccentricity} (not a bound orbit)"),
        });
    }
    if semimajor_axis_au <= 0.0 {
        return Err(LookupError::BadValue {
            field: "a",
            value: format!("{semimajor_axis_au} (must be positive)"),
        });
    }
    let perihelion_au = lookup(el, "q")?.unwrap_or(semimajor_axis_au * (1.0 - eccentricity));
    let mean_anomaly_deg = required(el, "ma")?;
    let ea = solve_kepler(mean_anomaly_deg.to_radians(), eccentricity);
    let true_anomaly_deg = true_anomaly(ea, eccentricity).to_degrees().rem_euclid(360.0);

    let elements = OrbitalElements {
        eccentricity,
        semimajor_axis_au,
        perihelion_au,
        inclination_deg: required(el, "i")?,
        asc_node_long_deg: required(el, "om")?,
        arg_periapsis_deg: required(el, "w")?,
        mean_anomaly_deg,
        true_anomaly_deg,
    };

    let diameter = lookup(&resp.phys_par, "diameter")?.unwrap_or(DEFAULT_DIAMETER_KM);
    let albedo = lookup(&resp.phys_par, "albedo")?.unwrap_or(DEFAULT_ALBEDO);
    let class_id = object
        .orbit_class
        .map(|c| c.code)
        .unwrap_or_else(|| "AST".to_string());

    Ok(CelestialBody::new(
        BodyKind::Asteroid,
        object.fullname.trim(),
        diameter,
        albedo,
        elements,
        class_id,
    ))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn fetch_asteroid(query: &str) -> Result<CelestialBody, LookupError> {
    let body = match ureq::get(SBDB_URL)
        .query("sstr", query)
        .query("phys-par", "1")
        .call()
    {
        Ok(resp) => resp.into_string(),
        Err(ureq::Error::Status(_, resp)) => resp.into_string(),
        Err(e) => return Err(LookupError::Http(e.to_string())),
    }
    .map_err(|e| LookupError::Http(format!("read error: {e}")))?;
    parse_sbdb_response(query, &body)
}

pub enum LookupState {
    Idle,
    Loading(String),
    Added(String),
    Failed(String),
}

pub struct AsteroidSearch {
    pub query: String,
    pub state: LookupState,
    rx: Option<mpsc::Receiver<Result<CelestialBody, LookupError>>>,
}

impl Default for AsteroidSearch {
    fn default() -> Self {
        Self {
            query: String::new(),
            state: LookupState::Idle,
            rx: None,
        }
    }
}

impl AsteroidSearch {
    pub fn is_loading(&self) -> bool {
        matches!(self.state, LookupState::Loading(_))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn start(&mut self) {
        let query = self.query.trim().to_string();
        if query.is_empty() || self.is_loading() {
            return;
        }
        log::info!("looking up `{query}` in the small-body database");
        let (tx, rx) = mpsc::channel();
        let thread_query = query.clone();
        std::thread::spawn(move || {
            let _ = tx.send(fetch_asteroid(&thread_query));
        });
        self.rx = Some(rx);
        self.state = LookupState::Loading(query);
    }

    #[cfg(target_arch = "wasm32")]
    pub fn start(&mut self) {
        self.state = LookupState::Failed("database search is not available in the browser build".into());
    }

    /// Returns the body once a pending lookup succeeds.
    pub fn poll(&mut self) -> Option<CelestialBody> {
        let rx = self.rx.as_ref()?;
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(mpsc::TryRecvError::Empty) => return None,
            Err(mpsc::TryRecvError::Disconnected) => Err(LookupError::Http("lookup thread stopped".into())),
        };
        self.rx = None;
        match result {
            Ok(body) => {
                log::info!("lookup found {}", body.name);
                self.state = LookupState::Added(body.name.clone());
                Some(body)
            }
            Err(e) => {
                log::warn!("lookup failed: {e}");
                self.state = LookupState::Failed(e.to_string());
                None
            }
        }
    }

    #[cfg(test)]
    fn with_receiver(rx: mpsc::Receiver<Result<CelestialBody, LookupError>>) -> Self {
        Self {
            query: "test".into(),
            state: LookupState::Loading("test".into()),
            rx: Some(rx),
        }
    }
}
