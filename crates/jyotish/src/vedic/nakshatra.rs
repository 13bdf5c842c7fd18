//! Nakshatra utilities.
//!
//! Nakshatras are 27 lunar mansions, each spanning 13°20' (360/27 degrees).
//! Each nakshatra is divided into 4 padas (quarters). Lords follow the
//! Vimshottari order, repeated three times around the zodiac.

use serde::{Deserialize, Serialize};

use crate::ephemeris::Body;
use crate::time::normalize_degrees;

pub const NAKSHATRA_SEGMENT_SIZE: f64 = 360.0 / 27.0;
pub const PADA_SIZE: f64 = NAKSHATRA_SEGMENT_SIZE / 4.0;

pub const NAKSHATRA_NAMES: [&str; 27] = [
    "Ashwini",
    "Bharani",
    "Krittika",
    "Rohini",
    "Mrigashirsha",
    "Ardra",
    "Punarvasu",
    "Pushya",
    "Ashlesha",
    "Magha",
    "Purva Phalguni",
    "Uttara Phalguni",
    "Hasta",
    "Chitra",
    "Swati",
    "Vishakha",
    "Anuradha",
    "Jyeshtha",
    "Mula",
    "Purvashada",
    "Uttarashada",
    "Shravana",
    "Dhanishta",
    "Shatabhisha",
    "Purva Bhadrapada",
    "Uttara Bhadrapada",
    "Revati",
];

/// Lords of one third of the zodiac; the sequence repeats three times.
pub const NAKSHATRA_LORD_CYCLE: [Body; 9] = [
    Body::Ketu,
    Body::Venus,
    Body::Sun,
    Body::Moon,
    Body::Mars,
    Body::Rahu,
    Body::Jupiter,
    Body::Saturn,
    Body::Mercury,
];

#[derive(Debug, Clone)]
struct BaseNakshatraRecord {
    name: &'static str,
    lord: Body,
    start: f64,
}

lazy_static::lazy_static! {
    static ref NAKSHATRA_TABLE: Vec<BaseNakshatraRecord> = NAKSHATRA_NAMES
        .iter()
        .enumerate()
        .map(|(idx, name)| BaseNakshatraRecord {
            name,
            lord: NAKSHATRA_LORD_CYCLE[idx % NAKSHATRA_LORD_CYCLE.len()],
            start: idx as f64 * NAKSHATRA_SEGMENT_SIZE,
        })
        .collect();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NakshatraRecord {
    /// Zero-based index, Ashwini = 0
    pub index: usize,
    pub name: String,
    pub lord: Body,
    /// Quarter of the segment, 1-4
    pub pada: u8,
    /// Fraction of the segment already traversed, in [0, 1)
    pub fraction: f64,
}

/// Return the nakshatra record for a sidereal longitude.
pub fn nakshatra_for_longitude(longitude: f64) -> NakshatraRecord {
    let lon = normalize_degrees(longitude);
    let position = lon / NAKSHATRA_SEGMENT_SIZE;
    let index = (position.floor() as usize).min(NAKSHATRA_TABLE.len() - 1);
    let entry = &NAKSHATRA_TABLE[index];
    let fraction = (position - index as f64).clamp(0.0, 1.0 - f64::EPSILON);
    let pada = ((fraction * 4.0).floor() as u8 + 1).min(4);

    NakshatraRecord {
        index,
        name: entry.name.to_string(),
        lord: entry.lord,
        pada,
        fraction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nakshatra_at_zero() {
        let record = nakshatra_for_longitude(0.0);
        assert_eq!(record.index, 0);
        assert_eq!(record.name, "Ashwini");
        assert_eq!(record.lord, Body::Ketu);
        assert_eq!(record.pada, 1);
    }

    #[test]
    fn test_moon_in_pushya() {
        let record = nakshatra_for_longitude(95.5);
        assert_eq!(record.index, 7);
        assert_eq!(record.name, "Pushya");
        assert_eq!(record.lord, Body::Saturn);
        let expected_fraction = 95.5 / NAKSHATRA_SEGMENT_SIZE - 7.0;
        assert!((record.fraction - expected_fraction).abs() < 1e-12);
        assert_eq!(record.pada, (expected_fraction * 4.0).floor() as u8 + 1);
    }

    #[test]
    fn test_last_segment() {
        let record = nakshatra_for_longitude(359.99);
        assert_eq!(record.index, 26);
        assert_eq!(record.name, "Revati");
        assert_eq!(record.lord, Body::Mercury);
        assert_eq!(record.pada, 4);
    }

    #[test]
    fn test_lords_repeat_every_nine() {
        for idx in 0..18 {
            let a = nakshatra_for_longitude(idx as f64 * NAKSHATRA_SEGMENT_SIZE + 1.0);
            let b = nakshatra_for_longitude((idx + 9) as f64 * NAKSHATRA_SEGMENT_SIZE + 1.0);
            assert_eq!(a.lord, b.lord);
        }
    }
}
