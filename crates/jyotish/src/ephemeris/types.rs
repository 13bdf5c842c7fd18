use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The nine classical bodies of a Vedic chart.
///
/// Rahu and Ketu are the lunar nodes; only Rahu is queried from the oracle,
/// Ketu is derived as its exact opposite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Rahu,
    Ketu,
}

impl Body {
    pub const ALL: [Body; 9] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Rahu,
        Body::Ketu,
    ];

    /// The seven visible bodies, excluding the nodes.
    pub const CLASSICAL: [Body; 7] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Rahu => "Rahu",
            Body::Ketu => "Ketu",
        }
    }

    pub fn is_node(self) -> bool {
        matches!(self, Body::Rahu | Body::Ketu)
    }

    pub fn is_luminary(self) -> bool {
        matches!(self, Body::Sun | Body::Moon)
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Body {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "sun" => Ok(Body::Sun),
            "moon" => Ok(Body::Moon),
            "mercury" => Ok(Body::Mercury),
            "venus" => Ok(Body::Venus),
            "mars" => Ok(Body::Mars),
            "jupiter" => Ok(Body::Jupiter),
            "saturn" => Ok(Body::Saturn),
            "rahu" | "north_node" => Ok(Body::Rahu),
            "ketu" | "south_node" => Ok(Body::Ketu),
            _ => Err(format!("Unknown body: {s}")),
        }
    }
}

/// Geographic observer location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
    /// Altitude above sea level in meters
    #[serde(default)]
    pub alt: f64,
}

impl GeoLocation {
    pub fn new(lat: f64, lon: f64, alt: f64) -> Self {
        Self { lat, lon, alt }
    }
}

/// Tropical position of a body as reported by the oracle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPosition {
    /// Ecliptic longitude in degrees (0-360)
    pub lon: f64,
    /// Ecliptic latitude in degrees
    pub lat: f64,
    /// Distance in AU
    pub dist: f64,
    /// Speed in longitude (degrees per day)
    pub speed_lon: f64,
}

/// Tropical chart angles. Cusps are carried for completeness only: houses
/// in this crate are whole-sign and anchored at the ascendant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseAngles {
    pub system: String,
    pub cusps: Vec<f64>,
    pub ascendant: f64,
    pub mc: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiseSetEvent {
    Rise,
    Set,
}
