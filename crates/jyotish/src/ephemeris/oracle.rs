use thiserror::Error;

use crate::ephemeris::ayanamsha::AyanamshaSystem;
use crate::ephemeris::riseset::solve_rise_set;
use crate::ephemeris::types::{Body, BodyPosition, GeoLocation, HouseAngles, RiseSetEvent};

/// Errors that can occur while querying an ephemeris
#[derive(Error, Debug, Clone)]
pub enum EphemerisError {
    #[error("Ephemeris file not found at path: {path}. {message}")]
    FileNotFound { path: String, message: String },
    #[error("Invalid house system: {system}. Valid systems: {valid:?}")]
    InvalidHouseSystem { system: String, valid: Vec<String> },
    #[error("Failed to calculate position for {body} at JD {jd}: {message}")]
    CalculationFailed {
        body: String,
        jd: f64,
        message: String,
    },
    #[error("House calculation failed: {message}")]
    HouseCalculationFailed { message: String },
    #[error("No {body} rise/set near JD {jd}: {message}")]
    RiseSetUnavailable {
        body: String,
        jd: f64,
        message: String,
    },
}

/// The astronomical oracle this crate consumes.
///
/// Implementations are expected to be deterministic and free of side
/// effects; chart construction calls them without any ordering requirement.
pub trait Ephemeris: Send + Sync {
    /// Tropical geocentric position of `body` at a UT Julian Day.
    fn position(&self, jd_ut: f64, body: Body) -> Result<BodyPosition, EphemerisError>;

    /// Sidereal longitude computed by the oracle's own sidereal mode, when it
    /// has one.
    fn sidereal_position(&self, _jd_ut: f64, _body: Body) -> Result<Option<f64>, EphemerisError> {
        Ok(None)
    }

    /// Tropical ascendant, MC and cusps for a location.
    fn houses(
        &self,
        jd_ut: f64,
        location: &GeoLocation,
        house_system: &str,
    ) -> Result<HouseAngles, EphemerisError>;

    /// Offset between the tropical and sidereal zodiacs, in degrees.
    fn ayanamsha(&self, jd_ut: f64) -> f64 {
        AyanamshaSystem::Lahiri.mean_deg(jd_ut)
    }

    /// Julian Day of the requested rise or set event nearest the transit
    /// around `jd_start`.
    fn rise_set(
        &self,
        jd_start: f64,
        body: Body,
        event: RiseSetEvent,
        location: &GeoLocation,
    ) -> Result<f64, EphemerisError> {
        solve_rise_set(self, jd_start, body, event, location)
    }
}
