//! Weighted-dialect predicates.
//!
//! A predicate arrives as a name plus a JSON params object and is decoded
//! once, at ruleset load time, into a typed [`Predicate`]. Evaluation never
//! fails: anything the chart cannot answer is false.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ephemeris::Body;
use crate::error::JyotishError;
use crate::time::angular_distance;
use crate::vedic::types::HouseGroup;
use crate::yoga::context::YogaContext;

pub const DEFAULT_CONNECTION_ORB: f64 = 8.0;

lazy_static! {
    static ref LORD_OF: Regex = Regex::new(r"^lord\((\d+)\)$").expect("lord reference pattern");
}

/// A body named directly or through house lordship (`lord(9)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Reference {
    Body(Body),
    LordOf(u8),
}

impl Reference {
    /// The body this reference names in `ctx`; house lordship needs an
    /// ascendant.
    pub fn require(self, ctx: &YogaContext<'_>) -> Result<Body, JyotishError> {
        match self {
            Reference::Body(body) => Ok(body),
            Reference::LordOf(house) => {
                ctx.house_lord(house)
                    .ok_or_else(|| JyotishError::UnresolvableReference {
                        reference: self.to_string(),
                    })
            }
        }
    }

    pub fn resolve(self, ctx: &YogaContext<'_>) -> Option<Body> {
        match self.require(ctx) {
            Ok(body) => Some(body),
            Err(e) => {
                log::debug!("{e}");
                None
            }
        }
    }
}

impl FromStr for Reference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(caps) = LORD_OF.captures(s) {
            let house: u8 = caps[1]
                .parse()
                .map_err(|_| format!("House out of range in '{s}'"))?;
            if !(1..=12).contains(&house) {
                return Err(format!("House out of range in '{s}'"));
            }
            return Ok(Reference::LordOf(house));
        }
        s.parse::<Body>().map(Reference::Body)
    }
}

impl TryFrom<String> for Reference {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Reference> for String {
    fn from(value: Reference) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Body(body) => write!(f, "{body}"),
            Reference::LordOf(house) => write!(f, "lord({house})"),
        }
    }
}

fn default_connection_orb() -> f64 {
    DEFAULT_CONNECTION_ORB
}

/// Decoded from `{"predicate": <name>, "params": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "predicate", content = "params", rename_all = "snake_case")]
pub enum Predicate {
    /// `a` sits 1/4/7/10 houses from `b`, optionally within an angular orb.
    KendraFrom {
        a: Reference,
        b: Reference,
        #[serde(default)]
        include_conjunction: bool,
        #[serde(default)]
        orb_deg: f64,
    },
    /// Sign numbers are 1-based (Aries = 1).
    PlanetInSigns { planet: Reference, signs: Vec<u8> },
    PlanetDebilitated { planet: Reference },
    PlanetExalted { planet: Reference },
    PlanetCombust { planet: Reference },
    /// Within orb, or in mutual seventh houses.
    AnyConnection {
        a: Reference,
        b: Reference,
        #[serde(default = "default_connection_orb")]
        orb_deg: f64,
    },
    Conjunction {
        a: Reference,
        b: Reference,
        #[serde(default = "default_connection_orb")]
        orb_deg: f64,
    },
    PlanetInHouseGroupFromAsc { planet: Reference, group: HouseGroup },
    LordExchange { a: Reference, b: Reference },
    AnyYogakaraka {},
    YogakarakaInGroupFromAsc { group: HouseGroup },
    YogakarakaStrongPlace {},
}

impl Predicate {
    /// Decodes a predicate by name; unknown names and bad params are errors.
    pub fn from_parts(name: &str, params: serde_json::Value) -> Result<Self, serde_json::Error> {
        let params = if params.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            params
        };
        serde_json::from_value(serde_json::json!({ "predicate": name, "params": params }))
    }

    pub fn evaluate(&self, ctx: &YogaContext<'_>) -> bool {
        match self {
            Predicate::KendraFrom {
                a,
                b,
                include_conjunction,
                orb_deg,
            } => kendra_from(ctx, *a, *b, *include_conjunction, *orb_deg),
            Predicate::PlanetInSigns { planet, signs } => planet
                .resolve(ctx)
                .and_then(|body| ctx.sign_of(body))
                .is_some_and(|sign| signs.contains(&sign.number())),
            Predicate::PlanetDebilitated { planet } => {
                planet.resolve(ctx).is_some_and(|b| ctx.is_debilitated(b))
            }
            Predicate::PlanetExalted { planet } => {
                planet.resolve(ctx).is_some_and(|b| ctx.is_exalted(b))
            }
            Predicate::PlanetCombust { planet } => {
                planet.resolve(ctx).is_some_and(|b| ctx.is_combust(b))
            }
            Predicate::AnyConnection { a, b, orb_deg } => any_connection(ctx, *a, *b, *orb_deg),
            Predicate::Conjunction { a, b, orb_deg } => {
                separation(ctx, *a, *b).is_some_and(|d| d <= *orb_deg)
            }
            Predicate::PlanetInHouseGroupFromAsc { planet, group } => {
                planet.resolve(ctx).is_some_and(|b| ctx.in_group(b, *group))
            }
            Predicate::LordExchange { a, b } => match (a.resolve(ctx), b.resolve(ctx)) {
                (Some(a), Some(b)) => {
                    ctx.dispositor(a) == Some(b) && ctx.dispositor(b) == Some(a)
                }
                _ => false,
            },
            Predicate::AnyYogakaraka {} => !ctx.yogakarakas().is_empty(),
            Predicate::YogakarakaInGroupFromAsc { group } => ctx
                .placed_yogakaraka()
                .is_some_and(|b| ctx.in_group(b, *group)),
            Predicate::YogakarakaStrongPlace {} => ctx.placed_yogakaraka().is_some_and(|b| {
                ctx.in_group(b, HouseGroup::Kendra) || ctx.in_group(b, HouseGroup::Trikona)
            }),
        }
    }
}

fn separation(ctx: &YogaContext<'_>, a: Reference, b: Reference) -> Option<f64> {
    let lon_a = ctx.longitude_of(a.resolve(ctx)?)?;
    let lon_b = ctx.longitude_of(b.resolve(ctx)?)?;
    Some(angular_distance(lon_a, lon_b))
}

fn houses(ctx: &YogaContext<'_>, a: Reference, b: Reference) -> Option<(u8, u8)> {
    Some((ctx.house_of(a.resolve(ctx)?)?, ctx.house_of(b.resolve(ctx)?)?))
}

pub(crate) fn kendra_from(
    ctx: &YogaContext<'_>,
    a: Reference,
    b: Reference,
    include_conjunction: bool,
    orb_deg: f64,
) -> bool {
    let Some((house_a, house_b)) = houses(ctx, a, b) else {
        return false;
    };
    let diff = (i16::from(house_a) - i16::from(house_b)).rem_euclid(12);
    if !matches!(diff, 0 | 3 | 6 | 9) {
        return false;
    }
    if diff == 0 && !include_conjunction {
        return false;
    }
    if orb_deg > 0.0 {
        // Separation is folded into [0, 180], so 270 shows up as 90.
        return separation(ctx, a, b)
            .is_some_and(|d| [0.0, 90.0, 180.0].iter().any(|k| (d - k).abs() <= orb_deg));
    }
    true
}

fn any_connection(ctx: &YogaContext<'_>, a: Reference, b: Reference, orb_deg: f64) -> bool {
    if separation(ctx, a, b).is_some_and(|d| d <= orb_deg) {
        return true;
    }
    houses(ctx, a, b).is_some_and(|(ha, hb)| ha.abs_diff(hb) == 6)
}
