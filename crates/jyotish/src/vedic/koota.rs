//! Ashta Koota compatibility.
//!
//! Eight factors compare the Moon of two charts. Chart A is taken as the
//! groom for the directional factors (Varna, Vashya, Tara distances).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::ephemeris::Body;
use crate::error::{JyotishError, Result};
use crate::vedic::chart::ChartCore;
use crate::vedic::dignities::{relationship, Relationship};
use crate::vedic::nakshatra::NAKSHATRA_NAMES;
use crate::vedic::types::Sign;

pub const MAX_TOTAL: f64 = 36.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Koota {
    Varna,
    Vashya,
    Tara,
    Yoni,
    #[serde(rename = "Graha Maitri")]
    GrahaMaitri,
    Gana,
    Rashi,
    Nadi,
}

impl Koota {
    pub const ALL: [Koota; 8] = [
        Koota::Varna,
        Koota::Vashya,
        Koota::Tara,
        Koota::Yoni,
        Koota::GrahaMaitri,
        Koota::Gana,
        Koota::Rashi,
        Koota::Nadi,
    ];

    pub fn max(self) -> f64 {
        match self {
            Koota::Varna => 1.0,
            Koota::Vashya => 2.0,
            Koota::Tara => 3.0,
            Koota::Yoni => 4.0,
            Koota::GrahaMaitri => 5.0,
            Koota::Gana => 6.0,
            Koota::Rashi => 7.0,
            Koota::Nadi => 8.0,
        }
    }
}

/// Caste class; declaration order is the hierarchy, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Varna {
    Shudra,
    Vaishya,
    Kshatriya,
    Brahmin,
}

impl Varna {
    pub fn of(sign: Sign) -> Varna {
        match sign {
            Sign::Aries | Sign::Leo | Sign::Sagittarius => Varna::Kshatriya,
            Sign::Taurus | Sign::Virgo | Sign::Capricorn => Varna::Vaishya,
            Sign::Gemini | Sign::Libra | Sign::Aquarius => Varna::Shudra,
            Sign::Cancer | Sign::Scorpio | Sign::Pisces => Varna::Brahmin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VashyaGroup {
    Chatushpada,
    Manava,
    Jalachara,
    Vanachara,
    Keeta,
}

impl VashyaGroup {
    pub fn of(sign: Sign) -> VashyaGroup {
        match sign {
            Sign::Aries | Sign::Taurus | Sign::Leo | Sign::Capricorn => VashyaGroup::Chatushpada,
            Sign::Gemini | Sign::Virgo | Sign::Libra | Sign::Aquarius => VashyaGroup::Manava,
            Sign::Cancer | Sign::Pisces => VashyaGroup::Jalachara,
            Sign::Sagittarius => VashyaGroup::Vanachara,
            Sign::Scorpio => VashyaGroup::Keeta,
        }
    }

    /// Whether `other` is under this group's control.
    fn controls(self, other: VashyaGroup) -> bool {
        match self {
            VashyaGroup::Manava => other == VashyaGroup::Chatushpada,
            VashyaGroup::Chatushpada => other == VashyaGroup::Jalachara,
            VashyaGroup::Jalachara => other == VashyaGroup::Manava,
            VashyaGroup::Vanachara => true,
            VashyaGroup::Keeta => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Yoni {
    Horse,
    Elephant,
    Goat,
    Snake,
    Dog,
    Cat,
    Rat,
    Cow,
    Buffalo,
    Tiger,
    Deer,
    Monkey,
    Mongoose,
    Lion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gana {
    Deva,
    Manushya,
    Rakshasa,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nadi {
    Adi,
    Madhya,
    Antya,
}

macro_rules! display_as_debug {
    ($($t:ty),*) => {
        $(impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        })*
    };
}

display_as_debug!(Varna, VashyaGroup, Yoni, Gana, Nadi);

use Gana::{Deva as D, Manushya as M, Rakshasa as R};

const GANA_BY_NAKSHATRA: [Gana; 27] = [
    D, M, R, M, D, M, D, D, R, R, M, M, D, R, D, R, D, R, R, M, M, D, R, R, M, M, D,
];

const NADI_BY_NAKSHATRA: [Nadi; 27] = {
    use Nadi::{Adi as A, Antya as N, Madhya as Md};
    [
        A, A, A, Md, Md, Md, N, N, N, A, A, A, Md, Md, Md, N, N, N, A, A, A, Md, Md, Md, N, N, N,
    ]
};

const YONI_BY_NAKSHATRA: [Yoni; 27] = [
    Yoni::Horse,
    Yoni::Elephant,
    Yoni::Goat,
    Yoni::Snake,
    Yoni::Snake,
    Yoni::Dog,
    Yoni::Cat,
    Yoni::Goat,
    Yoni::Cat,
    Yoni::Rat,
    Yoni::Rat,
    Yoni::Cow,
    Yoni::Buffalo,
    Yoni::Tiger,
    Yoni::Buffalo,
    Yoni::Tiger,
    Yoni::Deer,
    Yoni::Deer,
    Yoni::Dog,
    Yoni::Monkey,
    Yoni::Mongoose,
    Yoni::Monkey,
    Yoni::Lion,
    Yoni::Horse,
    Yoni::Lion,
    Yoni::Cow,
    Yoni::Elephant,
];

/// Favourable positions counted inclusively around the 27 nakshatras.
const FAVORABLE_TARA: [u8; 14] = [1, 3, 6, 7, 9, 10, 13, 15, 18, 19, 21, 22, 25, 27];

lazy_static::lazy_static! {
    /// Incomplete by tradition; unlisted pairs fall back to the neutral tier.
    static ref YONI_ENEMIES: HashSet<(Yoni, Yoni)> = symmetric(&[
        (Yoni::Cat, Yoni::Rat),
        (Yoni::Cow, Yoni::Tiger),
        (Yoni::Snake, Yoni::Mongoose),
        (Yoni::Elephant, Yoni::Lion),
        (Yoni::Dog, Yoni::Deer),
        (Yoni::Monkey, Yoni::Goat),
    ]);
    static ref YONI_FRIENDS: HashSet<(Yoni, Yoni)> = symmetric(&[
        (Yoni::Horse, Yoni::Elephant),
        (Yoni::Lion, Yoni::Tiger),
        (Yoni::Dog, Yoni::Monkey),
        (Yoni::Cow, Yoni::Buffalo),
    ]);
}

fn symmetric(pairs: &[(Yoni, Yoni)]) -> HashSet<(Yoni, Yoni)> {
    pairs.iter().flat_map(|&(a, b)| [(a, b), (b, a)]).collect()
}

/// The Moon data a koota comparison needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoonProfile {
    pub sign: Sign,
    /// 0-26
    pub nakshatra_index: usize,
}

impl MoonProfile {
    pub fn new(sign: Sign, nakshatra_index: usize) -> Self {
        Self {
            sign,
            nakshatra_index: nakshatra_index % 27,
        }
    }

    pub fn from_chart(chart: &ChartCore) -> Result<Self> {
        let moon = chart.moon().ok_or_else(|| JyotishError::UpstreamDataUnavailable {
            field: "Moon".to_string(),
            message: "compatibility needs the Moon's sign and nakshatra".to_string(),
        })?;
        Ok(Self::new(moon.sign, moon.nakshatra.index))
    }

    pub fn nakshatra_name(&self) -> &'static str {
        NAKSHATRA_NAMES[self.nakshatra_index]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KootaScore {
    pub koota: Koota,
    pub max: f64,
    pub score: f64,
    /// Attribute compared on the groom (chart A) side
    pub groom: String,
    /// Attribute compared on the bride (chart B) side
    pub bride: String,
}

impl KootaScore {
    fn new(koota: Koota, score: f64, groom: impl ToString, bride: impl ToString) -> Self {
        Self {
            koota,
            max: koota.max(),
            score,
            groom: groom.to_string(),
            bride: bride.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Excellent,
    #[serde(rename = "Very Good")]
    VeryGood,
    Acceptable,
    #[serde(rename = "Not Compatible")]
    NotCompatible,
}

impl Verdict {
    pub fn from_total(total: f64) -> Verdict {
        if total >= 30.0 {
            Verdict::Excellent
        } else if total >= 24.0 {
            Verdict::VeryGood
        } else if total >= 18.0 {
            Verdict::Acceptable
        } else {
            Verdict::NotCompatible
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    pub kootas: Vec<KootaScore>,
    pub total: f64,
    pub max: f64,
    pub verdict: Verdict,
}

pub fn varna(groom: Sign, bride: Sign) -> KootaScore {
    let (g, b) = (Varna::of(groom), Varna::of(bride));
    KootaScore::new(Koota::Varna, if g >= b { 1.0 } else { 0.0 }, g, b)
}

pub fn vashya(groom: Sign, bride: Sign) -> KootaScore {
    let (g, b) = (VashyaGroup::of(groom), VashyaGroup::of(bride));
    let score = if g == b || g.controls(b) {
        2.0
    } else if b.controls(g) {
        1.0
    } else {
        0.0
    };
    KootaScore::new(Koota::Vashya, score, g, b)
}

/// Inclusive count from one nakshatra to another; the same nakshatra is 27.
fn tara_distance(from: usize, to: usize) -> u8 {
    match (to + 27 - from % 27) % 27 {
        0 => 27,
        d => d as u8,
    }
}

pub fn tara(groom: usize, bride: usize) -> KootaScore {
    let g2b = tara_distance(groom, bride);
    let b2g = tara_distance(bride, groom);
    let half = |d: u8| if FAVORABLE_TARA.contains(&d) { 1.5 } else { 0.0 };
    KootaScore::new(Koota::Tara, half(g2b) + half(b2g), g2b, b2g)
}

pub fn yoni(groom: usize, bride: usize) -> KootaScore {
    let g = YONI_BY_NAKSHATRA[groom % 27];
    let b = YONI_BY_NAKSHATRA[bride % 27];
    let score = if g == b {
        4.0
    } else if YONI_ENEMIES.contains(&(g, b)) {
        0.0
    } else if YONI_FRIENDS.contains(&(g, b)) {
        3.0
    } else {
        2.0
    };
    KootaScore::new(Koota::Yoni, score, g, b)
}

/// Score a pair of sign lords from both directions of natural friendship.
fn lord_pair_score(a: Body, b: Body, table: &LordPairTable) -> f64 {
    use Relationship::{Enemy, Friend, Neutral, Same};
    if a == b {
        return table.same;
    }
    match (relationship(a, b), relationship(b, a)) {
        (Same, _) | (_, Same) => table.same,
        (Friend, Friend) => table.friend_friend,
        (Friend, Neutral) | (Neutral, Friend) => table.friend_neutral,
        (Neutral, Neutral) => table.neutral_neutral,
        (Friend, Enemy) | (Enemy, Friend) => table.friend_enemy,
        (Enemy, Enemy) => table.enemy_enemy,
        (Neutral, Enemy) | (Enemy, Neutral) => table.neutral_enemy,
    }
}

struct LordPairTable {
    same: f64,
    friend_friend: f64,
    friend_neutral: f64,
    neutral_neutral: f64,
    friend_enemy: f64,
    enemy_enemy: f64,
    neutral_enemy: f64,
}

const MAITRI_TABLE: LordPairTable = LordPairTable {
    same: 5.0,
    friend_friend: 5.0,
    friend_neutral: 4.0,
    neutral_neutral: 3.0,
    friend_enemy: 1.0,
    enemy_enemy: 0.0,
    neutral_enemy: 2.0,
};

const RASHI_TABLE: LordPairTable = LordPairTable {
    same: 7.0,
    friend_friend: 7.0,
    friend_neutral: 6.0,
    neutral_neutral: 4.0,
    friend_enemy: 2.0,
    enemy_enemy: 0.0,
    neutral_enemy: 3.0,
};

pub fn graha_maitri(groom: Sign, bride: Sign) -> KootaScore {
    let (g, b) = (groom.lord(), bride.lord());
    KootaScore::new(Koota::GrahaMaitri, lord_pair_score(g, b, &MAITRI_TABLE), g, b)
}

/// Sign-lord comparison with the southern thresholds.
pub fn rashi(groom: Sign, bride: Sign) -> KootaScore {
    let (g, b) = (groom.lord(), bride.lord());
    KootaScore::new(Koota::Rashi, lord_pair_score(g, b, &RASHI_TABLE), g, b)
}

pub fn gana(groom: usize, bride: usize) -> KootaScore {
    let g = GANA_BY_NAKSHATRA[groom % 27];
    let b = GANA_BY_NAKSHATRA[bride % 27];
    let score = match (g, b) {
        _ if g == b => 6.0,
        (Gana::Deva, Gana::Manushya) | (Gana::Manushya, Gana::Deva) => 5.0,
        (Gana::Manushya, Gana::Rakshasa) | (Gana::Rakshasa, Gana::Manushya) => 1.0,
        _ => 0.0,
    };
    KootaScore::new(Koota::Gana, score, g, b)
}

/// Binary: full marks when both Moons share a nadi.
pub fn nadi(groom: usize, bride: usize) -> KootaScore {
    let g = NADI_BY_NAKSHATRA[groom % 27];
    let b = NADI_BY_NAKSHATRA[bride % 27];
    KootaScore::new(Koota::Nadi, if g == b { 8.0 } else { 0.0 }, g, b)
}

/// All eight factors for two Moons, chart A as groom.
pub fn score_moons(a: &MoonProfile, b: &MoonProfile) -> CompatibilityResult {
    let kootas = vec![
        varna(a.sign, b.sign),
        vashya(a.sign, b.sign),
        tara(a.nakshatra_index, b.nakshatra_index),
        yoni(a.nakshatra_index, b.nakshatra_index),
        graha_maitri(a.sign, b.sign),
        gana(a.nakshatra_index, b.nakshatra_index),
        rashi(a.sign, b.sign),
        nadi(a.nakshatra_index, b.nakshatra_index),
    ];
    let total = kootas.iter().map(|k| k.score).sum::<f64>();
    let total = (total * 100.0).round() / 100.0;
    CompatibilityResult {
        kootas,
        total,
        max: MAX_TOTAL,
        verdict: Verdict::from_total(total),
    }
}

pub fn score(chart_a: &ChartCore, chart_b: &ChartCore) -> Result<CompatibilityResult> {
    Ok(score_moons(
        &MoonProfile::from_chart(chart_a)?,
        &MoonProfile::from_chart(chart_b)?,
    ))
}
