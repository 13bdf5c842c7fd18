//! Panchang elements of the birth moment: tithi, karana, nithya yoga and the
//! day's sunrise and sunset.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::ephemeris::{Body, Ephemeris, GeoLocation, RiseSetEvent};
use crate::error::{JyotishError, Result};
use crate::time::{from_julian_day, normalize_degrees, Instant};
use crate::vedic::nakshatra::NAKSHATRA_SEGMENT_SIZE;

pub const TITHI_SIZE: f64 = 12.0;
pub const KARANA_SIZE: f64 = 6.0;

pub const TITHI_NAMES: [&str; 30] = [
    "Pratipada",
    "Dwitiya",
    "Tritiya",
    "Chaturthi",
    "Panchami",
    "Shashthi",
    "Saptami",
    "Ashtami",
    "Navami",
    "Dashami",
    "Ekadashi",
    "Dwadashi",
    "Trayodashi",
    "Chaturdashi",
    "Purnima",
    "Pratipada",
    "Dwitiya",
    "Tritiya",
    "Chaturthi",
    "Panchami",
    "Shashthi",
    "Saptami",
    "Ashtami",
    "Navami",
    "Dashami",
    "Ekadashi",
    "Dwadashi",
    "Trayodashi",
    "Chaturdashi",
    "Amavasya",
];

pub const KARANA_NAMES: [&str; 11] = [
    "Bava",
    "Balava",
    "Kaulava",
    "Taitila",
    "Gara",
    "Vanija",
    "Vishti",
    "Shakuni",
    "Chatushpada",
    "Naga",
    "Kimstughna",
];

pub const NITHYA_YOGA_NAMES: [&str; 27] = [
    "Vishkumbha",
    "Priti",
    "Ayushman",
    "Saubhagya",
    "Shobhana",
    "Atiganda",
    "Sukarma",
    "Dhriti",
    "Shula",
    "Ganda",
    "Vriddhi",
    "Dhruva",
    "Vyaghata",
    "Harshana",
    "Vajra",
    "Siddhi",
    "Vyatipata",
    "Variyan",
    "Parigha",
    "Shiva",
    "Siddha",
    "Sadhya",
    "Shubha",
    "Shukla",
    "Brahma",
    "Indra",
    "Vaidhriti",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Paksha {
    #[serde(rename = "Shukla Paksha")]
    Shukla,
    #[serde(rename = "Krishna Paksha")]
    Krishna,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tithi {
    /// 1-30
    pub index: u8,
    pub name: String,
    pub paksha: Paksha,
    pub fraction: f64,
    pub degrees_left: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Karana {
    /// 0-10
    pub index: usize,
    pub name: String,
    pub moon_sun_diff: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NithyaYoga {
    /// 1-27
    pub index: u8,
    pub name: String,
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunEvents {
    pub sunrise_jd: f64,
    pub sunset_jd: f64,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub sunrise_local: DateTime<FixedOffset>,
    pub sunset_local: DateTime<FixedOffset>,
}

pub fn tithi(moon_sidereal: f64, sun_sidereal: f64) -> Tithi {
    let value = normalize_degrees(moon_sidereal - sun_sidereal) / TITHI_SIZE;
    let index = (value.floor() as usize).min(TITHI_NAMES.len() - 1);
    let fraction = value - index as f64;
    Tithi {
        index: index as u8 + 1,
        name: TITHI_NAMES[index].to_string(),
        paksha: if index < 15 {
            Paksha::Shukla
        } else {
            Paksha::Krishna
        },
        fraction,
        degrees_left: (1.0 - fraction) * TITHI_SIZE,
    }
}

/// Half-tithi; the eleven names repeat through the lunar month.
pub fn karana(moon_sidereal: f64, sun_sidereal: f64) -> Karana {
    let diff = normalize_degrees(moon_sidereal - sun_sidereal);
    let index = (diff / KARANA_SIZE).floor() as usize % KARANA_NAMES.len();
    Karana {
        index,
        name: KARANA_NAMES[index].to_string(),
        moon_sun_diff: diff,
    }
}

pub fn nithya_yoga(moon_sidereal: f64, sun_sidereal: f64) -> NithyaYoga {
    let value = normalize_degrees(moon_sidereal + sun_sidereal) / NAKSHATRA_SEGMENT_SIZE;
    let index = (value.floor() as usize).min(NITHYA_YOGA_NAMES.len() - 1);
    NithyaYoga {
        index: index as u8 + 1,
        name: NITHYA_YOGA_NAMES[index].to_string(),
        fraction: value - index as f64,
    }
}

/// Sunrise and sunset of the instant's local civil day, searched from local
/// noon.
pub fn sun_events(
    ephemeris: &dyn Ephemeris,
    instant: &Instant,
    location: &GeoLocation,
) -> Result<SunEvents> {
    let tz = instant.tz()?;
    let noon = instant.local_noon_jd()?;
    let sunrise_jd = ephemeris.rise_set(noon, Body::Sun, RiseSetEvent::Rise, location)?;
    let sunset_jd = ephemeris.rise_set(noon, Body::Sun, RiseSetEvent::Set, location)?;

    let to_utc = |jd: f64| {
        from_julian_day(jd).ok_or_else(|| JyotishError::UpstreamDataUnavailable {
            field: "sunrise/sunset".to_string(),
            message: format!("JD {jd} is outside the supported date range"),
        })
    };
    let sunrise = to_utc(sunrise_jd)?;
    let sunset = to_utc(sunset_jd)?;
    let to_local = |utc: DateTime<Utc>| {
        let local = utc.with_timezone(&tz);
        local.with_timezone(&local.offset().fix())
    };

    Ok(SunEvents {
        sunrise_jd,
        sunset_jd,
        sunrise,
        sunset,
        sunrise_local: to_local(sunrise),
        sunset_local: to_local(sunset),
    })
}
