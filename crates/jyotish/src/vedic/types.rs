use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ephemeris::Body;
use crate::time::normalize_degrees;

pub const SIGN_SIZE: f64 = 30.0;

/// The twelve sidereal signs, Aries first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// Sign classification by quality, used by the navamsa mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Movable,
    Fixed,
    Dual,
}

impl Sign {
    pub const ALL: [Sign; 12] = [
        Sign::Aries,
        Sign::Taurus,
        Sign::Gemini,
        Sign::Cancer,
        Sign::Leo,
        Sign::Virgo,
        Sign::Libra,
        Sign::Scorpio,
        Sign::Sagittarius,
        Sign::Capricorn,
        Sign::Aquarius,
        Sign::Pisces,
    ];

    /// Zero-based index, Aries = 0.
    pub fn index(self) -> usize {
        self as usize
    }

    /// One-based sign number, Aries = 1.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_index(index: usize) -> Sign {
        Self::ALL[index % 12]
    }

    /// Sign for a one-based number; out-of-range numbers wrap cyclically.
    pub fn from_number(number: u8) -> Sign {
        Self::from_index((usize::from(number) + 11) % 12)
    }

    /// The sign containing a (sidereal) longitude.
    pub fn from_longitude(lon: f64) -> Sign {
        let index = (normalize_degrees(lon) / SIGN_SIZE).floor() as usize;
        Self::from_index(index.min(11))
    }

    /// The sign `count` places ahead, where 1 is the sign itself.
    pub fn nth(self, count: usize) -> Sign {
        Self::from_index(self.index() + (count + 11) % 12)
    }

    pub fn opposite(self) -> Sign {
        self.nth(7)
    }

    pub fn modality(self) -> Modality {
        match self.index() % 3 {
            0 => Modality::Movable,
            1 => Modality::Fixed,
            _ => Modality::Dual,
        }
    }

    /// Odd signs by one-based number (Aries, Gemini, Leo...).
    pub fn is_odd(self) -> bool {
        self.number() % 2 == 1
    }

    pub fn lord(self) -> Body {
        match self {
            Sign::Aries | Sign::Scorpio => Body::Mars,
            Sign::Taurus | Sign::Libra => Body::Venus,
            Sign::Gemini | Sign::Virgo => Body::Mercury,
            Sign::Cancer => Body::Moon,
            Sign::Leo => Body::Sun,
            Sign::Sagittarius | Sign::Pisces => Body::Jupiter,
            Sign::Capricorn | Sign::Aquarius => Body::Saturn,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Sign::Aries => "Aries",
            Sign::Taurus => "Taurus",
            Sign::Gemini => "Gemini",
            Sign::Cancer => "Cancer",
            Sign::Leo => "Leo",
            Sign::Virgo => "Virgo",
            Sign::Libra => "Libra",
            Sign::Scorpio => "Scorpio",
            Sign::Sagittarius => "Sagittarius",
            Sign::Capricorn => "Capricorn",
            Sign::Aquarius => "Aquarius",
            Sign::Pisces => "Pisces",
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sign::ALL
            .iter()
            .find(|sign| sign.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Unknown sign: {s}"))
    }
}

/// Degrees within the sign, in [0, 30).
pub fn degree_in_sign(lon: f64) -> f64 {
    let within = normalize_degrees(lon) % SIGN_SIZE;
    if within >= SIGN_SIZE {
        0.0
    } else {
        within
    }
}

/// The `count`-th house counted from `from`, where 1 is `from` itself.
pub fn house_offset(from: u8, count: u8) -> u8 {
    ((u16::from(from) + u16::from(count) + 22) % 12 + 1) as u8
}

/// House groups measured from the ascendant (or any reference house).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HouseGroup {
    Kendra,
    Trikona,
    Dusthana,
    Upachaya,
}

impl HouseGroup {
    pub fn houses(self) -> &'static [u8] {
        match self {
            HouseGroup::Kendra => &[1, 4, 7, 10],
            HouseGroup::Trikona => &[1, 5, 9],
            HouseGroup::Dusthana => &[6, 8, 12],
            HouseGroup::Upachaya => &[3, 6, 10, 11],
        }
    }

    pub fn contains(self, house: u8) -> bool {
        self.houses().contains(&house)
    }
}

impl FromStr for HouseGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kendra" => Ok(HouseGroup::Kendra),
            "trikona" => Ok(HouseGroup::Trikona),
            "dusthana" => Ok(HouseGroup::Dusthana),
            "upachaya" => Ok(HouseGroup::Upachaya),
            _ => Err(format!("Unknown house group: {s}")),
        }
    }
}
