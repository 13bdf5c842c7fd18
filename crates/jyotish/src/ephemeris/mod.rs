pub mod ayanamsha;
pub mod fixed;
pub mod oracle;
pub mod riseset;
#[cfg(feature = "swiss")]
pub mod swiss;
pub mod types;

pub use ayanamsha::AyanamshaSystem;
pub use fixed::FixedEphemeris;
pub use oracle::{Ephemeris, EphemerisError};
#[cfg(feature = "swiss")]
pub use swiss::SwissEphemerisAdapter;
pub use types::{Body, BodyPosition, GeoLocation, HouseAngles, RiseSetEvent};
