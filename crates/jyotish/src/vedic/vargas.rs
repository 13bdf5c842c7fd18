//! Divisional chart (varga) mapping.
//!
//! A varga divides each sign into N equal parts and sends each part to a
//! sign chosen by the D1 sign's classification. Divisional charts have no
//! independent longitude: placements keep the D1 value and only the sign
//! (and so the dignity) changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::ephemeris::Body;
use crate::time::normalize_degrees;
use crate::vedic::chart::{whole_sign_houses, BodyPlacement, ChartCore, WholeSignHouse};
use crate::vedic::dignities::Dignity;
use crate::vedic::types::{degree_in_sign, Modality, Sign, SIGN_SIZE};

/// Supported divisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Varga {
    /// D9
    Navamsa,
    /// D10
    Dashamsha,
}

impl Varga {
    pub const ALL: [Varga; 2] = [Varga::Navamsa, Varga::Dashamsha];

    pub fn division(self) -> u8 {
        match self {
            Varga::Navamsa => 9,
            Varga::Dashamsha => 10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Varga::Navamsa => "Navamsa",
            Varga::Dashamsha => "Dashamsha",
        }
    }

    pub fn from_division(division: u8) -> Option<Varga> {
        Self::ALL.into_iter().find(|v| v.division() == division)
    }

    /// Divisional sign for a D1 sidereal longitude.
    pub fn sign_for(self, longitude: f64) -> Sign {
        let lon = normalize_degrees(longitude);
        let d1 = Sign::from_longitude(lon);
        let part = part_index(degree_in_sign(lon), self.division());
        let start = match self {
            Varga::Navamsa => match d1.modality() {
                Modality::Movable => d1,
                Modality::Fixed => d1.nth(9),
                Modality::Dual => d1.nth(5),
            },
            Varga::Dashamsha => {
                if d1.is_odd() {
                    d1
                } else {
                    d1.nth(9)
                }
            }
        };
        start.nth(part + 1)
    }
}

impl fmt::Display for Varga {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.division())
    }
}

impl FromStr for Varga {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "d9" | "navamsa" => Ok(Varga::Navamsa),
            "d10" | "dashamsha" | "dasamsa" => Ok(Varga::Dashamsha),
            _ => Err(format!("Unsupported varga: {s}")),
        }
    }
}

/// Zero-based part of the sign, clamped so 29.999... never spills over.
fn part_index(within_sign: f64, division: u8) -> usize {
    let segment = SIGN_SIZE / f64::from(division);
    ((within_sign / segment).floor() as usize).min(usize::from(division) - 1)
}

/// Navamsa (D9) sign of a sidereal longitude.
pub fn navamsa_sign(longitude: f64) -> Sign {
    Varga::Navamsa.sign_for(longitude)
}

/// Dashamsha (D10) sign of a sidereal longitude.
pub fn dashamsha_sign(longitude: f64) -> Sign {
    Varga::Dashamsha.sign_for(longitude)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionalPlacement {
    pub body: Body,
    /// Carried over unchanged from D1
    pub lon_sidereal: f64,
    pub sign: Sign,
    pub sign_lord: Body,
    #[serde(flatten)]
    pub dignity: Dignity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionalAscendant {
    pub sign: Sign,
    /// D1 degree within sign, preserved
    pub degree_in_sign: f64,
    pub sign_lord: Body,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionalChart {
    pub varga: Varga,
    pub division: u8,
    pub ascendant: Option<DivisionalAscendant>,
    pub houses: Vec<WholeSignHouse>,
    pub placements: BTreeMap<Body, DivisionalPlacement>,
}

impl DivisionalChart {
    pub fn sign_of(&self, body: Body) -> Option<Sign> {
        self.placements.get(&body).map(|p| p.sign)
    }

    pub fn house_of(&self, body: Body) -> Option<u8> {
        let asc = self.ascendant.as_ref()?.sign;
        let sign = self.sign_of(body)?;
        Some(((sign.index() + 12 - asc.index()) % 12 + 1) as u8)
    }
}

/// Map an ascendant and a set of D1 placements into a divisional chart.
pub fn map<'a, I>(asc_sidereal: Option<f64>, placements: I, varga: Varga) -> DivisionalChart
where
    I: IntoIterator<Item = &'a BodyPlacement>,
{
    let ascendant = asc_sidereal.map(|lon| {
        let sign = varga.sign_for(lon);
        DivisionalAscendant {
            sign,
            degree_in_sign: degree_in_sign(lon),
            sign_lord: sign.lord(),
        }
    });
    let houses = ascendant
        .as_ref()
        .map(|asc| whole_sign_houses(asc.sign))
        .unwrap_or_default();

    let placements = placements
        .into_iter()
        .map(|p| {
            let sign = varga.sign_for(p.lon_sidereal);
            (
                p.body,
                DivisionalPlacement {
                    body: p.body,
                    lon_sidereal: p.lon_sidereal,
                    sign,
                    sign_lord: sign.lord(),
                    dignity: Dignity::of(p.body, sign),
                },
            )
        })
        .collect();

    DivisionalChart {
        varga,
        division: varga.division(),
        ascendant,
        houses,
        placements,
    }
}

/// Divisional chart of a whole D1 chart.
pub fn map_chart(chart: &ChartCore, varga: Varga) -> DivisionalChart {
    map(
        chart.ascendant.as_ref().map(|a| a.lon_sidereal),
        chart.placements.values(),
        varga,
    )
}
