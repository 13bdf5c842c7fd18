pub mod chart;
pub mod dashas;
pub mod dignities;
pub mod koota;
pub mod nakshatra;
pub mod panchang;
pub mod strength;
pub mod types;
pub mod vargas;

pub use chart::{Ascendant, BodyPlacement, ChartBuilder, ChartCore, FieldError, WholeSignHouse};
pub use dashas::{DashaLevel, DashaPeriod, DashaTimeline};
pub use dignities::{Dignity, Relationship};
pub use koota::{CompatibilityResult, KootaScore, MoonProfile, Verdict};
pub use nakshatra::{nakshatra_for_longitude, NakshatraRecord};
pub use panchang::{Karana, NithyaYoga, Paksha, SunEvents, Tithi};
pub use strength::{PlanetStrength, StrengthLabel};
pub use types::{HouseGroup, Modality, Sign};
pub use vargas::{DivisionalChart, Varga};
