//! Heuristic planet strength from D1 placement confirmed by the navamsa.

use serde::{Deserialize, Serialize};

use crate::ephemeris::Body;
use crate::vedic::chart::{BodyPlacement, ChartCore};
use crate::vedic::dignities::{is_debilitated, is_exalted, is_own_sign, relationship, Relationship};
use crate::vedic::types::{HouseGroup, Sign};
use crate::vedic::vargas::DivisionalChart;

const SCORE_EXALTED: f64 = 100.0;
const SCORE_OWN_SIGN: f64 = 75.0;
const SCORE_FRIEND_SIGN: f64 = 60.0;
const SCORE_ENEMY_SIGN: f64 = 30.0;
const SCORE_DEBILITATED: f64 = 0.0;

const SCORE_KENDRA: f64 = 20.0;
const SCORE_TRIKONA: f64 = 15.0;
const SCORE_DUSTHANA: f64 = -15.0;
const SCORE_DIGBALA: f64 = 30.0;
const SCORE_RETROGRADE: f64 = 20.0;

const SCORE_VARGOTTAMA: f64 = 40.0;
const SCORE_D9_REDEMPTION: f64 = 50.0;
const SCORE_D9_FALL: f64 = -40.0;
const SCORE_D9_EXALTED: f64 = 20.0;
const SCORE_D9_DEBILITATED: f64 = -20.0;

const SCORE_CAP: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignNature {
    Exalted,
    Debilitated,
    #[serde(rename = "Own Sign")]
    OwnSign,
    #[serde(rename = "Friend Sign")]
    FriendSign,
    /// Anything that is not a friend's sign
    #[serde(rename = "Enemy Sign")]
    EnemySign,
}

impl SignNature {
    pub fn of(body: Body, sign: Sign) -> Self {
        if is_exalted(body, sign) {
            SignNature::Exalted
        } else if is_debilitated(body, sign) {
            SignNature::Debilitated
        } else if is_own_sign(body, sign) {
            SignNature::OwnSign
        } else if relationship(body, sign.lord()) == Relationship::Friend {
            SignNature::FriendSign
        } else {
            SignNature::EnemySign
        }
    }

    fn points(self) -> f64 {
        match self {
            SignNature::Exalted => SCORE_EXALTED,
            SignNature::Debilitated => SCORE_DEBILITATED,
            SignNature::OwnSign => SCORE_OWN_SIGN,
            SignNature::FriendSign => SCORE_FRIEND_SIGN,
            SignNature::EnemySign => SCORE_ENEMY_SIGN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrengthLabel {
    #[serde(rename = "Very Strong")]
    VeryStrong,
    Strong,
    Moderate,
    Weak,
}

impl StrengthLabel {
    fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            StrengthLabel::VeryStrong
        } else if score >= 65.0 {
            StrengthLabel::Strong
        } else if score <= 35.0 {
            StrengthLabel::Weak
        } else {
            StrengthLabel::Moderate
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetStrength {
    pub body: Body,
    /// 0-100, rounded to one decimal
    pub score: f64,
    pub label: StrengthLabel,
    pub nature: SignNature,
    pub reasons: Vec<String>,
}

fn digbala_house(body: Body) -> Option<u8> {
    match body {
        Body::Sun | Body::Mars => Some(10),
        Body::Moon | Body::Venus => Some(4),
        Body::Jupiter | Body::Mercury => Some(1),
        Body::Saturn => Some(7),
        Body::Rahu | Body::Ketu => None,
    }
}

/// Strength of one placement. `house` is the whole-sign house when the
/// ascendant is known; `d9_sign` the navamsa sign when available.
pub fn evaluate(
    placement: &BodyPlacement,
    house: Option<u8>,
    d9_sign: Option<Sign>,
) -> PlanetStrength {
    let body = placement.body;
    let nature = SignNature::of(body, placement.sign);
    let mut score = nature.points();
    let mut reasons = Vec::new();
    match nature {
        SignNature::Exalted => reasons.push("Exalted in D1".to_string()),
        SignNature::Debilitated => reasons.push("Debilitated in D1".to_string()),
        SignNature::OwnSign => reasons.push("Own sign".to_string()),
        SignNature::EnemySign => reasons.push("Enemy sign".to_string()),
        SignNature::FriendSign => {}
    }

    if let Some(house) = house {
        if HouseGroup::Kendra.contains(house) {
            score += SCORE_KENDRA;
            reasons.push("In kendra".to_string());
        }
        if HouseGroup::Trikona.contains(house) {
            score += SCORE_TRIKONA;
            if house != 1 {
                reasons.push("In trikona".to_string());
            }
        }
        if HouseGroup::Dusthana.contains(house) {
            score += SCORE_DUSTHANA;
            reasons.push("In dusthana".to_string());
        }
        if digbala_house(body) == Some(house) {
            score += SCORE_DIGBALA;
            reasons.push(format!("Digbala in house {house}"));
        }
    }

    if placement.retrograde {
        score += SCORE_RETROGRADE;
        reasons.push("Retrograde".to_string());
    }

    if let Some(d9_sign) = d9_sign {
        let d9_nature = SignNature::of(body, d9_sign);
        if d9_sign == placement.sign {
            score += SCORE_VARGOTTAMA;
            reasons.push("Vargottama".to_string());
        }
        match (nature, d9_nature) {
            (SignNature::Debilitated, SignNature::Exalted | SignNature::OwnSign) => {
                score += SCORE_D9_REDEMPTION;
                reasons.push("Debility redeemed in navamsa".to_string());
            }
            (SignNature::Exalted, SignNature::Debilitated) => {
                score += SCORE_D9_FALL;
                reasons.push("Weak in navamsa".to_string());
            }
            (_, SignNature::Exalted) => {
                score += SCORE_D9_EXALTED;
                reasons.push("Exalted in navamsa".to_string());
            }
            (_, SignNature::Debilitated) => {
                score += SCORE_D9_DEBILITATED;
                reasons.push("Debilitated in navamsa".to_string());
            }
            _ => {}
        }
    }

    let normalized = (score.min(SCORE_CAP) / 1.2).max(0.0);
    let score = (normalized * 10.0).round() / 10.0;
    PlanetStrength {
        body,
        score,
        label: StrengthLabel::from_score(score),
        nature,
        reasons,
    }
}

/// Strengths of the seven classical bodies present in the chart.
pub fn chart_strengths(chart: &ChartCore, d9: Option<&DivisionalChart>) -> Vec<PlanetStrength> {
    Body::CLASSICAL
        .iter()
        .filter_map(|body| chart.placement(*body))
        .map(|placement| {
            evaluate(
                placement,
                chart.house_of(placement.body),
                d9.and_then(|d9| d9.sign_of(placement.body)),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_nature_uses_lord_friendship() {
        assert_eq!(SignNature::of(Body::Sun, Sign::Aries), SignNature::Exalted);
        assert_eq!(SignNature::of(Body::Sun, Sign::Libra), SignNature::Debilitated);
        assert_eq!(SignNature::of(Body::Sun, Sign::Leo), SignNature::OwnSign);
        // Cancer is ruled by the Moon, a friend of the Sun
        assert_eq!(SignNature::of(Body::Sun, Sign::Cancer), SignNature::FriendSign);
        assert_eq!(SignNature::of(Body::Sun, Sign::Taurus), SignNature::EnemySign);
    }

    #[test]
    fn labels_follow_thresholds() {
        assert_eq!(StrengthLabel::from_score(80.0), StrengthLabel::VeryStrong);
        assert_eq!(StrengthLabel::from_score(65.0), StrengthLabel::Strong);
        assert_eq!(StrengthLabel::from_score(50.0), StrengthLabel::Moderate);
        assert_eq!(StrengthLabel::from_score(35.0), StrengthLabel::Weak);
    }
}
