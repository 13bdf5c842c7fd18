use thiserror::Error;

use crate::ephemeris::EphemerisError;

/// Errors surfaced at the library's entry points.
///
/// Most failures never reach a caller: a body the oracle cannot resolve is
/// downgraded to an error marker on the chart, a predicate with an
/// unresolvable reference evaluates false, and a malformed ruleset is skipped.
/// Only input validation is returned as a hard error.
#[derive(Error, Debug)]
pub enum JyotishError {
    #[error("Upstream data unavailable for {field}: {message}")]
    UpstreamDataUnavailable { field: String, message: String },
    #[error("Malformed ruleset {id}: {message}")]
    MalformedRuleset { id: String, message: String },
    #[error("Unresolvable reference '{reference}'")]
    UnresolvableReference { reference: String },
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    #[error("Background task failed: {0}")]
    Task(String),
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JyotishError>;
