//! Fixed dignity tables: exaltation, debilitation, rulership, combustion orbs
//! and natural planetary friendship.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ephemeris::Body;
use crate::vedic::types::Sign;

/// Exaltation/debilitation status of a body in a sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dignity {
    pub exalted: bool,
    pub debilitated: bool,
}

impl Dignity {
    pub fn of(body: Body, sign: Sign) -> Self {
        Self {
            exalted: is_exalted(body, sign),
            debilitated: is_debilitated(body, sign),
        }
    }
}

pub fn exaltation_sign(body: Body) -> Sign {
    match body {
        Body::Sun => Sign::Aries,
        Body::Moon => Sign::Taurus,
        Body::Mercury => Sign::Virgo,
        Body::Venus => Sign::Pisces,
        Body::Mars => Sign::Capricorn,
        Body::Jupiter => Sign::Cancer,
        Body::Saturn => Sign::Libra,
        Body::Rahu => Sign::Taurus,
        Body::Ketu => Sign::Scorpio,
    }
}

/// Always the sign opposite exaltation.
pub fn debilitation_sign(body: Body) -> Sign {
    exaltation_sign(body).opposite()
}

pub fn is_exalted(body: Body, sign: Sign) -> bool {
    exaltation_sign(body) == sign
}

pub fn is_debilitated(body: Body, sign: Sign) -> bool {
    debilitation_sign(body) == sign
}

pub fn is_own_sign(body: Body, sign: Sign) -> bool {
    sign.lord() == body
}

/// Signs ruled by a body; empty for the nodes.
pub fn own_signs(body: Body) -> Vec<Sign> {
    Sign::ALL.iter().copied().filter(|s| s.lord() == body).collect()
}

/// Maximum separation from the Sun at which a body counts as combust.
/// Luminaries and nodes are never combust.
pub fn combustion_orb(body: Body) -> Option<f64> {
    match body {
        Body::Mercury => Some(13.0),
        Body::Venus => Some(9.0),
        Body::Mars => Some(17.0),
        Body::Jupiter => Some(11.0),
        Body::Saturn => Some(15.0),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Same,
    Friend,
    Neutral,
    Enemy,
}

struct Friendship {
    friends: &'static [Body],
    enemies: &'static [Body],
}

lazy_static::lazy_static! {
    /// Natural (permanent) friendship. Not symmetric: Moon counts Mercury a
    /// friend while Mercury counts the Moon an enemy.
    static ref NATURAL_FRIENDSHIP: HashMap<Body, Friendship> = HashMap::from([
        (Body::Sun, Friendship {
            friends: &[Body::Moon, Body::Mars, Body::Jupiter],
            enemies: &[Body::Venus, Body::Saturn],
        }),
        (Body::Moon, Friendship {
            friends: &[Body::Sun, Body::Mercury],
            enemies: &[],
        }),
        (Body::Mars, Friendship {
            friends: &[Body::Sun, Body::Moon, Body::Jupiter],
            enemies: &[Body::Mercury],
        }),
        (Body::Mercury, Friendship {
            friends: &[Body::Sun, Body::Venus],
            enemies: &[Body::Moon],
        }),
        (Body::Jupiter, Friendship {
            friends: &[Body::Sun, Body::Moon, Body::Mars],
            enemies: &[Body::Mercury, Body::Venus],
        }),
        (Body::Venus, Friendship {
            friends: &[Body::Mercury, Body::Saturn],
            enemies: &[Body::Sun, Body::Moon],
        }),
        (Body::Saturn, Friendship {
            friends: &[Body::Mercury, Body::Venus],
            enemies: &[Body::Sun, Body::Moon, Body::Mars],
        }),
    ]);
}

/// How `from` regards `to`. Bodies without a table entry (the nodes) regard
/// everything as neutral.
pub fn relationship(from: Body, to: Body) -> Relationship {
    if from == to {
        return Relationship::Same;
    }
    match NATURAL_FRIENDSHIP.get(&from) {
        Some(table) if table.friends.contains(&to) => Relationship::Friend,
        Some(table) if table.enemies.contains(&to) => Relationship::Enemy,
        _ => Relationship::Neutral,
    }
}
