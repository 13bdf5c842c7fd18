//! Sidereal chart builder.
//!
//! Turns oracle output into per-body sidereal placements, an ascendant and
//! twelve whole-sign houses. A body the oracle cannot resolve is recorded in
//! `errors` and left out of `placements`; the rest of the chart still builds.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ephemeris::{Body, BodyPosition, Ephemeris, EphemerisError, GeoLocation};
use crate::time::{angular_distance, normalize_degrees, Instant};
use crate::vedic::dignities::{combustion_orb, Dignity};
use crate::vedic::nakshatra::{nakshatra_for_longitude, NakshatraRecord};
use crate::vedic::types::{degree_in_sign, Sign, SIGN_SIZE};

pub const DEFAULT_HOUSE_SYSTEM: &str = "placidus";

/// One body's D1 placement.
///
/// `lon_sidereal` is tropical minus ayanamsha and is authoritative for every
/// sign, house, lordship and combustion decision. `lon_sidereal_flag` is the
/// oracle's own sidereal figure, kept for comparison only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyPlacement {
    pub body: Body,
    pub lon_tropical: f64,
    pub lon_sidereal: f64,
    pub lon_sidereal_flag: Option<f64>,
    pub speed_lon: f64,
    pub retrograde: bool,
    pub combust: bool,
    #[serde(flatten)]
    pub dignity: Dignity,
    pub sign: Sign,
    pub degree_in_sign: f64,
    pub sign_lord: Body,
    pub nakshatra: NakshatraRecord,
}

impl BodyPlacement {
    fn from_sidereal(
        body: Body,
        lon_tropical: f64,
        lon_sidereal: f64,
        lon_sidereal_flag: Option<f64>,
        speed_lon: f64,
        retrograde: bool,
        combust: bool,
    ) -> Self {
        let sign = Sign::from_longitude(lon_sidereal);
        Self {
            body,
            lon_tropical,
            lon_sidereal,
            lon_sidereal_flag,
            speed_lon,
            retrograde,
            combust,
            dignity: Dignity::of(body, sign),
            sign,
            degree_in_sign: degree_in_sign(lon_sidereal),
            sign_lord: sign.lord(),
            nakshatra: nakshatra_for_longitude(lon_sidereal),
        }
    }

    /// Sign according to the oracle's sidereal mode, when available.
    pub fn sign_flag(&self) -> Option<Sign> {
        self.lon_sidereal_flag.map(Sign::from_longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ascendant {
    pub lon_tropical: f64,
    pub lon_sidereal: f64,
    pub sign: Sign,
    pub degree_in_sign: f64,
    pub sign_lord: Body,
    pub nakshatra: NakshatraRecord,
}

impl Ascendant {
    pub fn from_tropical(lon_tropical: f64, ayanamsha: f64) -> Self {
        let lon_sidereal = normalize_degrees(lon_tropical - ayanamsha);
        let sign = Sign::from_longitude(lon_sidereal);
        Self {
            lon_tropical,
            lon_sidereal,
            sign,
            degree_in_sign: degree_in_sign(lon_sidereal),
            sign_lord: sign.lord(),
            nakshatra: nakshatra_for_longitude(lon_sidereal),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WholeSignHouse {
    pub house: u8,
    pub sign: Sign,
    pub start_deg: f64,
    pub end_deg: f64,
}

/// Twelve houses, house 1 spanning the whole of `first`.
pub fn whole_sign_houses(first: Sign) -> Vec<WholeSignHouse> {
    (1..=12u8)
        .map(|house| {
            let sign = first.nth(usize::from(house));
            let start_deg = sign.index() as f64 * SIGN_SIZE;
            WholeSignHouse {
                house,
                sign,
                start_deg,
                end_deg: normalize_degrees(start_deg + SIGN_SIZE),
            }
        })
        .collect()
}

/// A field downgraded because the oracle could not resolve it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartCore {
    pub instant: Instant,
    pub location: GeoLocation,
    pub ayanamsha: f64,
    pub placements: BTreeMap<Body, BodyPlacement>,
    pub ascendant: Option<Ascendant>,
    pub houses: Vec<WholeSignHouse>,
    pub errors: Vec<FieldError>,
}

impl ChartCore {
    pub fn placement(&self, body: Body) -> Option<&BodyPlacement> {
        self.placements.get(&body)
    }

    pub fn sign_of(&self, body: Body) -> Option<Sign> {
        self.placement(body).map(|p| p.sign)
    }

    pub fn longitude_of(&self, body: Body) -> Option<f64> {
        self.placement(body).map(|p| p.lon_sidereal)
    }

    pub fn ascendant_sign(&self) -> Option<Sign> {
        self.ascendant.as_ref().map(|a| a.sign)
    }

    /// Whole-sign house (1-12) of a sign, counted from the ascendant.
    pub fn house_of_sign(&self, sign: Sign) -> Option<u8> {
        let asc = self.ascendant_sign()?;
        Some(((sign.index() + 12 - asc.index()) % 12 + 1) as u8)
    }

    /// Whole-sign house (1-12) occupied by a body.
    pub fn house_of(&self, body: Body) -> Option<u8> {
        self.house_of_sign(self.sign_of(body)?)
    }

    pub fn house_sign(&self, house: u8) -> Option<Sign> {
        if !(1..=12).contains(&house) {
            return None;
        }
        Some(self.ascendant_sign()?.nth(usize::from(house)))
    }

    /// Lord of a house under the whole-sign scheme.
    pub fn house_lord(&self, house: u8) -> Option<Body> {
        self.house_sign(house).map(Sign::lord)
    }

    /// Bodies occupying a house.
    pub fn occupants(&self, house: u8) -> Vec<Body> {
        self.placements
            .keys()
            .copied()
            .filter(|body| self.house_of(*body) == Some(house))
            .collect()
    }

    pub fn moon(&self) -> Option<&BodyPlacement> {
        self.placement(Body::Moon)
    }
}

/// Builds [`ChartCore`] values from an oracle.
pub struct ChartBuilder<'a> {
    ephemeris: &'a dyn Ephemeris,
    house_system: String,
}

impl<'a> ChartBuilder<'a> {
    pub fn new(ephemeris: &'a dyn Ephemeris) -> Self {
        Self {
            ephemeris,
            house_system: DEFAULT_HOUSE_SYSTEM.to_string(),
        }
    }

    /// House system passed to the oracle. Only the ascendant is consumed.
    pub fn with_house_system(mut self, house_system: &str) -> Self {
        self.house_system = house_system.to_string();
        self
    }

    pub fn build(&self, instant: &Instant, location: GeoLocation, bodies: &[Body]) -> ChartCore {
        let jd = instant.jd_ut;
        let ayanamsha = self.ephemeris.ayanamsha(jd);
        let mut errors = Vec::new();

        let sun_sidereal = match self.ephemeris.position(jd, Body::Sun) {
            Ok(sun) => Some(normalize_degrees(sun.lon - ayanamsha)),
            Err(e) => {
                log::warn!("Sun unavailable, combustion cannot be assessed: {e}");
                None
            }
        };

        let mut requested: Vec<Body> = bodies.to_vec();
        requested.sort();
        requested.dedup();

        let mut placements = BTreeMap::new();
        for body in requested {
            match self.place_body(jd, body, ayanamsha, sun_sidereal) {
                Ok(placement) => {
                    placements.insert(body, placement);
                }
                Err(e) => {
                    log::warn!("{body} excluded from chart: {e}");
                    errors.push(FieldError {
                        field: body.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let ascendant = match self.ephemeris.houses(jd, &location, &self.house_system) {
            Ok(angles) => Some(Ascendant::from_tropical(angles.ascendant, ayanamsha)),
            Err(e) => {
                log::warn!("Ascendant unavailable: {e}");
                errors.push(FieldError {
                    field: "ascendant".to_string(),
                    message: e.to_string(),
                });
                None
            }
        };
        let houses = ascendant
            .as_ref()
            .map(|asc| whole_sign_houses(asc.sign))
            .unwrap_or_default();

        ChartCore {
            instant: instant.clone(),
            location,
            ayanamsha,
            placements,
            ascendant,
            houses,
            errors,
        }
    }

    fn place_body(
        &self,
        jd: f64,
        body: Body,
        ayanamsha: f64,
        sun_sidereal: Option<f64>,
    ) -> Result<BodyPlacement, EphemerisError> {
        match body {
            Body::Rahu | Body::Ketu => self.place_node(jd, body, ayanamsha),
            _ => {
                let position = self.ephemeris.position(jd, body)?;
                let lon_sidereal = normalize_degrees(position.lon - ayanamsha);
                let combust = match (combustion_orb(body), sun_sidereal) {
                    (Some(orb), Some(sun)) => angular_distance(lon_sidereal, sun) <= orb,
                    _ => false,
                };
                Ok(BodyPlacement::from_sidereal(
                    body,
                    position.lon,
                    lon_sidereal,
                    self.flag_sidereal(jd, body),
                    position.speed_lon,
                    position.speed_lon < 0.0,
                    combust,
                ))
            }
        }
    }

    /// Rahu is queried; Ketu is placed exactly opposite in both frames.
    /// Both are always retrograde and never combust.
    fn place_node(
        &self,
        jd: f64,
        body: Body,
        ayanamsha: f64,
    ) -> Result<BodyPlacement, EphemerisError> {
        let rahu: BodyPosition = self.ephemeris.position(jd, Body::Rahu)?;
        let rahu_flag = self.flag_sidereal(jd, Body::Rahu);
        let shift = if body == Body::Ketu { 180.0 } else { 0.0 };
        let lon_tropical = normalize_degrees(rahu.lon + shift);
        Ok(BodyPlacement::from_sidereal(
            body,
            lon_tropical,
            normalize_degrees(lon_tropical - ayanamsha),
            rahu_flag.map(|lon| normalize_degrees(lon + shift)),
            rahu.speed_lon,
            true,
            false,
        ))
    }

    fn flag_sidereal(&self, jd: f64, body: Body) -> Option<f64> {
        match self.ephemeris.sidereal_position(jd, body) {
            Ok(lon) => lon.map(normalize_degrees),
            Err(e) => {
                log::debug!("No flag-derived sidereal longitude for {body}: {e}");
                None
            }
        }
    }
}
