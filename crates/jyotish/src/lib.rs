//! Sidereal (Vedic) chart core.
//!
//! Raw ephemeris output goes in through the [`ephemeris::Ephemeris`] trait
//! and comes out as a whole-sign birth chart with divisional charts, the
//! Vimshottari dasha timeline, panchang elements and planet strengths. On top
//! of a chart sit the yoga rule engine and the Ashta Koota compatibility
//! scorer.

pub mod compute;
pub mod ephemeris;
pub mod error;
pub mod service;
pub mod time;
pub mod vedic;
pub mod yoga;

pub use compute::{
    compute_chart, compute_compatibility, evaluate_all_rulesets, BirthParams, ChartOptions,
    ChartResult,
};
pub use ephemeris::{Body, Ephemeris, EphemerisError, FixedEphemeris, GeoLocation};
#[cfg(feature = "swiss")]
pub use ephemeris::SwissEphemerisAdapter;
pub use error::{JyotishError, Result};
pub use service::AstroService;
pub use time::Instant;
pub use yoga::{Ruleset, RulesetStore, YogaResult, YogaStatus};
