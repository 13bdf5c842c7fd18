//! Chart queries shared by predicates, conditions and named patterns.
//!
//! Every house, lordship and angle is measured from the ascendant's whole
//! sign. Lookups return `None` when the chart cannot answer them (missing
//! ascendant, body excluded by an oracle failure); callers treat that as a
//! false check.

use crate::ephemeris::Body;
use crate::vedic::chart::ChartCore;
use crate::vedic::dignities::{is_debilitated, is_exalted};
use crate::vedic::types::{house_offset, HouseGroup, Sign};
use crate::vedic::vargas::DivisionalChart;

pub const BENEFICS: [Body; 4] = [Body::Jupiter, Body::Venus, Body::Mercury, Body::Moon];
pub const MALEFICS: [Body; 5] = [Body::Sun, Body::Mars, Body::Saturn, Body::Rahu, Body::Ketu];

const KENDRA_HOUSES: [u8; 4] = [1, 4, 7, 10];
const TRIKONA_HOUSES: [u8; 3] = [1, 5, 9];

pub struct YogaContext<'a> {
    chart: &'a ChartCore,
    navamsa: Option<&'a DivisionalChart>,
}

impl<'a> YogaContext<'a> {
    pub fn new(chart: &'a ChartCore, navamsa: Option<&'a DivisionalChart>) -> Self {
        Self { chart, navamsa }
    }

    pub fn chart(&self) -> &ChartCore {
        self.chart
    }

    pub fn bodies(&self) -> impl Iterator<Item = Body> + '_ {
        self.chart.placements.keys().copied()
    }

    pub fn sign_of(&self, body: Body) -> Option<Sign> {
        self.chart.sign_of(body)
    }

    pub fn house_of(&self, body: Body) -> Option<u8> {
        self.chart.house_of(body)
    }

    pub fn longitude_of(&self, body: Body) -> Option<f64> {
        self.chart.longitude_of(body)
    }

    pub fn house_lord(&self, house: u8) -> Option<Body> {
        self.chart.house_lord(house)
    }

    pub fn navamsa_sign(&self, body: Body) -> Option<Sign> {
        self.navamsa?.sign_of(body)
    }

    pub fn is_combust(&self, body: Body) -> bool {
        self.chart.placement(body).is_some_and(|p| p.combust)
    }

    pub fn is_exalted(&self, body: Body) -> bool {
        self.sign_of(body).is_some_and(|s| is_exalted(body, s))
    }

    pub fn is_debilitated(&self, body: Body) -> bool {
        self.sign_of(body).is_some_and(|s| is_debilitated(body, s))
    }

    pub fn in_own_sign(&self, body: Body) -> bool {
        self.sign_of(body).is_some_and(|s| s.lord() == body)
    }

    /// Lord of the sign a body occupies.
    pub fn dispositor(&self, body: Body) -> Option<Body> {
        self.sign_of(body).map(Sign::lord)
    }

    pub fn in_group(&self, body: Body, group: HouseGroup) -> bool {
        self.house_of(body).is_some_and(|h| group.contains(h))
    }

    /// Bodies occupying a house.
    pub fn occupants(&self, house: u8) -> Vec<Body> {
        self.bodies().filter(|b| self.house_of(*b) == Some(house)).collect()
    }

    /// Whether any of `set` occupies `house`.
    pub fn house_has_any(&self, house: u8, set: &[Body]) -> bool {
        self.occupants(house).iter().any(|b| set.contains(b))
    }

    /// The four kendra houses counted from `house`.
    pub fn kendras_from(house: u8) -> [u8; 4] {
        [
            house,
            house_offset(house, 4),
            house_offset(house, 7),
            house_offset(house, 10),
        ]
    }

    /// Bodies ruling both a kendra and a trikona, in the order their houses
    /// are met from the ascendant. The lagna lord always qualifies and comes
    /// first.
    pub fn yogakarakas(&self) -> Vec<Body> {
        let rules = |body: Body, houses: &[u8]| {
            houses.iter().any(|h| self.house_lord(*h) == Some(body))
        };
        let mut found = Vec::new();
        for lord in (1..=12).filter_map(|h| self.house_lord(h)) {
            if found.contains(&lord) {
                continue;
            }
            if rules(lord, &KENDRA_HOUSES) && rules(lord, &TRIKONA_HOUSES) {
                found.push(lord);
            }
        }
        found
    }

    /// The first yogakaraka that is actually placed in the chart.
    pub fn placed_yogakaraka(&self) -> Option<Body> {
        self.yogakarakas()
            .into_iter()
            .find(|b| self.house_of(*b).is_some())
    }

    /// Pairs of bodies occupying each other's signs.
    pub fn exchanges(&self) -> Vec<(Body, Body)> {
        let bodies: Vec<Body> = self.bodies().collect();
        let mut pairs = Vec::new();
        for (i, a) in bodies.iter().enumerate() {
            for b in &bodies[i + 1..] {
                if self.dispositor(*a) == Some(*b) && self.dispositor(*b) == Some(*a) {
                    pairs.push((*a, *b));
                }
            }
        }
        pairs
    }
}
