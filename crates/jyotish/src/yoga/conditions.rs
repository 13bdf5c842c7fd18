//! Conditions dialect: a ruleset is active only when every condition holds.

use serde::{Deserialize, Serialize};

use crate::ephemeris::Body;
use crate::vedic::types::HouseGroup;
use crate::yoga::context::YogaContext;
use crate::yoga::patterns::NamedPattern;
use crate::yoga::predicates::{kendra_from, Reference};

/// A scalar or a list of scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T: PartialEq> OneOrMany<T> {
    pub fn contains(&self, value: &T) -> bool {
        match self {
            OneOrMany::One(one) => one == value,
            OneOrMany::Many(many) => many.contains(value),
        }
    }

    pub fn any<F: Fn(&T) -> bool>(&self, check: F) -> bool {
        match self {
            OneOrMany::One(one) => check(one),
            OneOrMany::Many(many) => many.iter().any(check),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignType {
    Own,
    #[serde(alias = "exalted")]
    Exaltation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanetRelation {
    #[serde(rename = "kendra_from_moon")]
    KendraFromMoon,
    #[serde(rename = "kendra_from")]
    KendraFrom,
    #[serde(rename = "6_8_12_from")]
    DusthanaFrom,
    #[serde(rename = "conjunction")]
    Conjunction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LordStrength {
    /// Exalted, in its own sign, or in a kendra from the ascendant.
    Strong,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetCondition {
    pub planet: Body,
    #[serde(default)]
    pub house: Option<OneOrMany<u8>>,
    #[serde(default)]
    pub sign_type: Option<OneOrMany<SignType>>,
    #[serde(default)]
    pub relationship: Option<PlanetRelation>,
    #[serde(default)]
    pub target: Option<Body>,
    #[serde(default)]
    pub conjunct_with: Option<OneOrMany<Body>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LordCondition {
    pub lord_of: u8,
    #[serde(default)]
    pub sign_type: Option<OneOrMany<SignType>>,
    #[serde(default)]
    pub strength: Option<LordStrength>,
    #[serde(default)]
    pub house: Option<OneOrMany<u8>>,
}

fn yes() -> bool {
    true
}

/// One entry of a `conditions` list. Shapes are tried in declaration order,
/// so an entry carrying both `planet` and `lord_of` is a planet check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    Pattern {
        condition: NamedPattern,
    },
    MoonHouse {
        house_from_moon: i32,
        #[serde(default = "yes")]
        has_planets: bool,
        #[serde(default)]
        exclude_planets: Vec<Body>,
    },
    Planet(PlanetCondition),
    Lord(LordCondition),
}

impl Condition {
    pub fn from_value(value: serde_json::Value) -> Result<Self, String> {
        let shape = value
            .as_object()
            .ok_or_else(|| "condition must be an object".to_string())?;
        let known = ["condition", "house_from_moon", "planet", "lord_of"];
        if !known.iter().any(|key| shape.contains_key(*key)) {
            return Err(format!("unrecognised condition shape: {value}"));
        }
        serde_json::from_value(value.clone()).map_err(|e| format!("invalid condition {value}: {e}"))
    }

    pub fn evaluate(&self, ctx: &YogaContext<'_>) -> bool {
        match self {
            Condition::Pattern { condition } => condition.holds(ctx),
            Condition::MoonHouse {
                house_from_moon,
                has_planets,
                exclude_planets,
            } => {
                let Some(moon) = ctx.house_of(Body::Moon) else {
                    return false;
                };
                let target = (i32::from(moon) - 1 + house_from_moon - 1).rem_euclid(12) as u8 + 1;
                let occupied = ctx
                    .occupants(target)
                    .iter()
                    .any(|b| !exclude_planets.contains(b));
                occupied == *has_planets
            }
            Condition::Planet(check) => check.evaluate(ctx),
            Condition::Lord(check) => check.evaluate(ctx),
        }
    }
}

fn sign_type_holds(ctx: &YogaContext<'_>, body: Body, sign_type: &OneOrMany<SignType>) -> bool {
    sign_type.any(|t| match t {
        SignType::Own => ctx.in_own_sign(body),
        SignType::Exaltation => ctx.is_exalted(body),
    })
}

impl PlanetCondition {
    pub fn evaluate(&self, ctx: &YogaContext<'_>) -> bool {
        let body = self.planet;
        if let Some(houses) = &self.house {
            if !ctx.house_of(body).is_some_and(|h| houses.contains(&h)) {
                return false;
            }
        }
        if let Some(sign_type) = &self.sign_type {
            if !sign_type_holds(ctx, body, sign_type) {
                return false;
            }
        }
        if let Some(relation) = self.relationship {
            if !self.relation_holds(ctx, relation) {
                return false;
            }
        }
        if let Some(partners) = &self.conjunct_with {
            let house = ctx.house_of(body);
            let together = partners.any(|p| house.is_some() && ctx.house_of(*p) == house);
            if !together {
                return false;
            }
        }
        true
    }

    fn relation_holds(&self, ctx: &YogaContext<'_>, relation: PlanetRelation) -> bool {
        let body = Reference::Body(self.planet);
        match relation {
            PlanetRelation::KendraFromMoon => {
                kendra_from(ctx, body, Reference::Body(Body::Moon), true, 0.0)
            }
            PlanetRelation::KendraFrom => self
                .target
                .is_some_and(|t| kendra_from(ctx, body, Reference::Body(t), true, 0.0)),
            PlanetRelation::DusthanaFrom => {
                let Some(target) = self.target else {
                    return false;
                };
                match (ctx.house_of(self.planet), ctx.house_of(target)) {
                    (Some(hp), Some(ht)) => {
                        let distance = (i16::from(hp) - i16::from(ht)).rem_euclid(12) + 1;
                        matches!(distance, 6 | 8 | 12)
                    }
                    _ => false,
                }
            }
            PlanetRelation::Conjunction => self.target.is_some_and(|t| {
                ctx.house_of(self.planet).is_some() && ctx.house_of(self.planet) == ctx.house_of(t)
            }),
        }
    }
}

impl LordCondition {
    pub fn evaluate(&self, ctx: &YogaContext<'_>) -> bool {
        let Some(lord) = ctx.house_lord(self.lord_of) else {
            return false;
        };
        if let Some(sign_type) = &self.sign_type {
            if !sign_type_holds(ctx, lord, sign_type) {
                return false;
            }
        }
        if self.strength == Some(LordStrength::Strong)
            && !(ctx.is_exalted(lord)
                || ctx.in_own_sign(lord)
                || ctx.in_group(lord, HouseGroup::Kendra))
        {
            return false;
        }
        if let Some(houses) = &self.house {
            if !ctx.house_of(lord).is_some_and(|h| houses.contains(&h)) {
                return false;
            }
        }
        true
    }
}
