//! Error types for catalog loading, the scale form, and database lookups.

use thiserror::Error;

/// Failures while reading the embedded body table.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid catalog entry `{key}`: {reason}")]
    InvalidEntry { key: String, reason: String },
}

/// Rejected input in the scale form. The current scale is left untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScaleError {
    #[error("enter a scale value")]
    Empty,

    #[error("`{0}` is not a number")]
    NotANumber(String),

    #[error("scale must be a positive number, got {0}")]
    NonPositive(f64),
}

/// Failures of a small-body database lookup.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no object matches `{0}`")]
    NotFound(String),

    #[error("response has no `{0}` element")]
    MissingElement(&'static str),

    #[error("bad value for `{field}`: {value}")]
    BadValue { field: &'static str, value: String },
}
