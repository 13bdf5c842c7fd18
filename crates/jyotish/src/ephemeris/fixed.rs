//! A table-driven oracle.
//!
//! Positions are tabulated per body at an epoch and advanced linearly by
//! their daily speed. Used by the test suite and for offline demos where no
//! ephemeris files are installed.

use std::collections::{HashMap, HashSet};

use crate::ephemeris::oracle::{Ephemeris, EphemerisError};
use crate::ephemeris::types::{Body, BodyPosition, GeoLocation, HouseAngles};
use crate::time::normalize_degrees;

#[derive(Debug, Clone, Default)]
pub struct FixedEphemeris {
    positions: HashMap<Body, BodyPosition>,
    failing: HashSet<Body>,
    ascendant: Option<f64>,
    ayanamsha: f64,
    epoch_jd: Option<f64>,
}

impl FixedEphemeris {
    /// An empty table with a constant ayanamsha.
    pub fn new(ayanamsha: f64) -> Self {
        Self {
            ayanamsha,
            ..Self::default()
        }
    }

    /// Tabulate a body's tropical longitude and daily speed.
    pub fn with_body(mut self, body: Body, lon: f64, speed_lon: f64) -> Self {
        self.positions.insert(
            body,
            BodyPosition {
                lon: normalize_degrees(lon),
                lat: 0.0,
                dist: 1.0,
                speed_lon,
            },
        );
        self
    }

    /// Tabulate a body by its sidereal longitude under this table's ayanamsha.
    pub fn with_sidereal(self, body: Body, sidereal_lon: f64, speed_lon: f64) -> Self {
        let tropical = sidereal_lon + self.ayanamsha;
        self.with_body(body, tropical, speed_lon)
    }

    /// Tropical ascendant returned for every location.
    pub fn with_ascendant(mut self, tropical_lon: f64) -> Self {
        self.ascendant = Some(normalize_degrees(tropical_lon));
        self
    }

    pub fn with_sidereal_ascendant(self, sidereal_lon: f64) -> Self {
        let tropical = sidereal_lon + self.ayanamsha;
        self.with_ascendant(tropical)
    }

    /// Make queries for `body` fail, as an unavailable upstream would.
    pub fn failing(mut self, body: Body) -> Self {
        self.failing.insert(body);
        self
    }

    /// Advance tabulated positions by speed from this epoch.
    pub fn at_epoch(mut self, jd: f64) -> Self {
        self.epoch_jd = Some(jd);
        self
    }

    fn lookup(&self, jd_ut: f64, body: Body) -> Result<BodyPosition, EphemerisError> {
        if self.failing.contains(&body) {
            return Err(EphemerisError::CalculationFailed {
                body: body.to_string(),
                jd: jd_ut,
                message: "position not tabulated".to_string(),
            });
        }
        let mut position = self.positions.get(&body).copied().ok_or_else(|| {
            EphemerisError::CalculationFailed {
                body: body.to_string(),
                jd: jd_ut,
                message: "position not tabulated".to_string(),
            }
        })?;
        if let Some(epoch) = self.epoch_jd {
            position.lon = normalize_degrees(position.lon + position.speed_lon * (jd_ut - epoch));
        }
        Ok(position)
    }
}

impl Ephemeris for FixedEphemeris {
    fn position(&self, jd_ut: f64, body: Body) -> Result<BodyPosition, EphemerisError> {
        if body == Body::Ketu && !self.positions.contains_key(&Body::Ketu) {
            let rahu = self.lookup(jd_ut, Body::Rahu)?;
            return Ok(BodyPosition {
                lon: normalize_degrees(rahu.lon + 180.0),
                lat: -rahu.lat,
                ..rahu
            });
        }
        self.lookup(jd_ut, body)
    }

    fn houses(
        &self,
        _jd_ut: f64,
        _location: &GeoLocation,
        house_system: &str,
    ) -> Result<HouseAngles, EphemerisError> {
        let ascendant = self.ascendant.ok_or_else(|| EphemerisError::HouseCalculationFailed {
            message: "ascendant not tabulated".to_string(),
        })?;
        let cusps = (0..12)
            .map(|i| normalize_degrees(ascendant + 30.0 * i as f64))
            .collect();
        Ok(HouseAngles {
            system: house_system.to_string(),
            cusps,
            ascendant,
            mc: normalize_degrees(ascendant + 270.0),
        })
    }

    fn ayanamsha(&self, _jd_ut: f64) -> f64 {
        self.ayanamsha
    }
}
