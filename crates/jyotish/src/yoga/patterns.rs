//! Named multi-body patterns referenced from the conditions dialect.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ephemeris::Body;
use crate::vedic::dignities::{debilitation_sign, exaltation_sign, own_signs};
use crate::vedic::types::{house_offset, HouseGroup, Sign};
use crate::yoga::context::{YogaContext, BENEFICS, MALEFICS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedPattern {
    HariPattern,
    HaraPattern,
    GandharvaPattern,
    ShivaPattern,
    VishnuPattern,
    #[serde(alias = "brahma_complex")]
    BrahmaPattern,
    #[serde(alias = "complex_placement_indra")]
    IndraPattern,
    MatsyaPattern,
    KurmaPattern,
    ViparitaRajaYogaCheck,
    AkhandaSamrajyaCheck,
    #[serde(alias = "benefics_kendra_quad")]
    BeneficsInKendras,
    BeneficsInUpachaya,
    DhanaYogaCheck,
    DispositorExalt,
    KalpadrumaChain,
    MaleficsInKendras,
    MoonNavamsaExalt,
    MridangaComplex,
    NeechabhangaCheck,
    #[serde(rename = "parivartana_3rd")]
    Parivartana3rd,
    ParivartanaDusthana,
    ParivartanaKendraTrikona,
    ParvataDef,
    PushkalaDef,
    #[serde(rename = "raja_yoga_9_10")]
    RajaYogaNineTen,
}

impl NamedPattern {
    pub fn holds(self, ctx: &YogaContext<'_>) -> bool {
        match self {
            NamedPattern::HariPattern => benefics_around_lord(ctx, 2, [2, 8, 12]),
            NamedPattern::HaraPattern => benefics_around_lord(ctx, 7, [4, 8, 9]),
            NamedPattern::GandharvaPattern => gandharva(ctx),
            NamedPattern::ShivaPattern => {
                lord_in(ctx, 5, 9) && lord_in(ctx, 9, 10) && lord_in(ctx, 10, 5)
            }
            NamedPattern::VishnuPattern => lord_in(ctx, 9, 2) && lord_in(ctx, 10, 2),
            NamedPattern::BrahmaPattern => brahma(ctx),
            NamedPattern::IndraPattern => indra(ctx),
            NamedPattern::MatsyaPattern => {
                ctx.house_has_any(1, &MALEFICS)
                    && ctx.house_has_any(9, &MALEFICS)
                    && ctx.house_has_any(5, &BENEFICS)
            }
            NamedPattern::KurmaPattern => {
                [5, 6, 7].iter().all(|h| ctx.house_has_any(*h, &BENEFICS))
                    && [1, 3, 11].iter().all(|h| ctx.house_has_any(*h, &MALEFICS))
            }
            NamedPattern::ViparitaRajaYogaCheck => HouseGroup::Dusthana
                .houses()
                .iter()
                .filter_map(|h| ctx.house_lord(*h))
                .any(|lord| ctx.in_group(lord, HouseGroup::Dusthana)),
            NamedPattern::AkhandaSamrajyaCheck => akhanda_samrajya(ctx),
            NamedPattern::BeneficsInKendras => occupied_kendras(ctx, &BENEFICS) >= 2,
            NamedPattern::BeneficsInUpachaya => BENEFICS
                .iter()
                .all(|b| ctx.in_group(*b, HouseGroup::Upachaya)),
            NamedPattern::DhanaYogaCheck => dhana(ctx),
            NamedPattern::DispositorExalt => ctx
                .house_lord(1)
                .and_then(|l1| ctx.dispositor(l1))
                .is_some_and(|d| ctx.is_exalted(d)),
            NamedPattern::KalpadrumaChain => kalpadruma(ctx),
            NamedPattern::MaleficsInKendras => occupied_kendras(ctx, &MALEFICS) >= 3,
            NamedPattern::MoonNavamsaExalt => ctx.navamsa_sign(Body::Moon) == Some(Sign::Taurus),
            NamedPattern::MridangaComplex => ctx
                .house_lord(1)
                .is_some_and(|l1| ctx.is_exalted(l1) || ctx.in_own_sign(l1)),
            NamedPattern::NeechabhangaCheck => neechabhanga(ctx),
            NamedPattern::Parivartana3rd => {
                let l3 = ctx.house_lord(3);
                ctx.exchanges()
                    .iter()
                    .any(|(a, b)| l3 == Some(*a) || l3 == Some(*b))
            }
            NamedPattern::ParivartanaDusthana => {
                let lords = lords_of(ctx, HouseGroup::Dusthana.houses());
                ctx.exchanges()
                    .iter()
                    .any(|(a, b)| lords.contains(a) || lords.contains(b))
            }
            NamedPattern::ParivartanaKendraTrikona => {
                let lords = lords_of(ctx, &[1, 2, 4, 5, 7, 9, 10, 11]);
                ctx.exchanges()
                    .iter()
                    .any(|(a, b)| lords.contains(a) && lords.contains(b))
            }
            NamedPattern::ParvataDef => {
                occupied_kendras(ctx, &BENEFICS) >= 1
                    && ctx.occupants(6).is_empty()
                    && ctx.occupants(8).is_empty()
            }
            NamedPattern::PushkalaDef => pushkala(ctx),
            NamedPattern::RajaYogaNineTen => match (ctx.house_lord(9), ctx.house_lord(10)) {
                (Some(l9), Some(l10)) => {
                    let together =
                        ctx.house_of(l9).is_some() && ctx.house_of(l9) == ctx.house_of(l10);
                    let exchanged =
                        ctx.dispositor(l9) == Some(l10) && ctx.dispositor(l10) == Some(l9);
                    together || exchanged
                }
                _ => false,
            },
        }
    }

    pub fn id(self) -> String {
        serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    }
}

impl fmt::Display for NamedPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

/// Whether the lord of `house` occupies `target`.
fn lord_in(ctx: &YogaContext<'_>, house: u8, target: u8) -> bool {
    ctx.house_lord(house)
        .and_then(|lord| ctx.house_of(lord))
        .is_some_and(|h| h == target)
}

fn lords_of(ctx: &YogaContext<'_>, houses: &[u8]) -> Vec<Body> {
    houses.iter().filter_map(|h| ctx.house_lord(*h)).collect()
}

fn occupied_kendras(ctx: &YogaContext<'_>, set: &[Body]) -> usize {
    HouseGroup::Kendra
        .houses()
        .iter()
        .filter(|h| ctx.house_has_any(**h, set))
        .count()
}

/// Benefics in each of the given houses counted from the lord of `house`.
fn benefics_around_lord(ctx: &YogaContext<'_>, house: u8, offsets: [u8; 3]) -> bool {
    let Some(base) = ctx.house_lord(house).and_then(|lord| ctx.house_of(lord)) else {
        return false;
    };
    offsets
        .iter()
        .all(|offset| ctx.house_has_any(house_offset(base, *offset), &BENEFICS))
}

fn gandharva(ctx: &YogaContext<'_>) -> bool {
    let tenth_lord_ok = ctx
        .house_lord(10)
        .and_then(|lord| ctx.house_of(lord))
        .is_some_and(|h| matches!(h, 3 | 7 | 11));
    let sun_ok = matches!(ctx.sign_of(Body::Sun), Some(Sign::Leo | Sign::Aries));
    tenth_lord_ok && sun_ok && ctx.house_of(Body::Moon) == Some(9)
}

fn brahma(ctx: &YogaContext<'_>) -> bool {
    let Some(base) = ctx.house_lord(1).and_then(|l1| ctx.house_of(l1)) else {
        return false;
    };
    let kendras = YogaContext::kendras_from(base);
    [Body::Jupiter, Body::Venus, Body::Mercury]
        .iter()
        .all(|b| ctx.house_of(*b).is_some_and(|h| kendras.contains(&h)))
}

fn indra(ctx: &YogaContext<'_>) -> bool {
    let at = |body: Body| ctx.house_of(body);
    match (at(Body::Moon), at(Body::Mars), at(Body::Saturn), at(Body::Venus)) {
        (Some(moon), Some(mars), Some(saturn), Some(venus)) => {
            mars == house_offset(moon, 3)
                && saturn == house_offset(mars, 7)
                && venus == house_offset(saturn, 7)
        }
        _ => false,
    }
}

fn akhanda_samrajya(ctx: &YogaContext<'_>) -> bool {
    let jupiter_rules = [2, 5, 11]
        .iter()
        .any(|h| ctx.house_lord(*h) == Some(Body::Jupiter));
    if !jupiter_rules {
        return false;
    }
    let Some(moon) = ctx.house_of(Body::Moon) else {
        return false;
    };
    let kendras = YogaContext::kendras_from(moon);
    [11, 2, 9]
        .iter()
        .filter_map(|h| ctx.house_lord(*h))
        .any(|lord| ctx.house_of(lord).is_some_and(|h| kendras.contains(&h)))
}

fn dhana(ctx: &YogaContext<'_>) -> bool {
    let mut lords = lords_of(ctx, &[1, 2, 5, 9, 11]);
    lords.sort();
    lords.dedup();
    for (i, a) in lords.iter().enumerate() {
        for b in &lords[i + 1..] {
            if let (Some(ha), Some(hb)) = (ctx.house_of(*a), ctx.house_of(*b)) {
                if ha == hb || ha.abs_diff(hb) == 6 {
                    return true;
                }
            }
        }
    }
    false
}

fn kalpadruma(ctx: &YogaContext<'_>) -> bool {
    let Some(final_dispositor) = ctx
        .house_lord(1)
        .and_then(|l1| ctx.dispositor(l1))
        .and_then(|d| ctx.dispositor(d))
    else {
        return false;
    };
    ctx.in_group(final_dispositor, HouseGroup::Kendra)
        || ctx.in_group(final_dispositor, HouseGroup::Trikona)
        || ctx.is_exalted(final_dispositor)
}

fn neechabhanga(ctx: &YogaContext<'_>) -> bool {
    let moon_kendras = ctx.house_of(Body::Moon).map(YogaContext::kendras_from);
    let in_kendra = |body: Body| {
        ctx.house_of(body).is_some_and(|h| {
            HouseGroup::Kendra.contains(h) || moon_kendras.is_some_and(|k| k.contains(&h))
        })
    };
    Body::CLASSICAL
        .iter()
        .copied()
        .filter(|b| ctx.is_debilitated(*b))
        .any(|body| {
            let debilitation_lord = debilitation_sign(body).lord();
            let exaltation_lord = exaltation_sign(body).lord();
            let lord_in_own = ctx
                .sign_of(debilitation_lord)
                .is_some_and(|s| own_signs(body).contains(&s));
            in_kendra(debilitation_lord) || in_kendra(exaltation_lord) || lord_in_own
        })
}

fn pushkala(ctx: &YogaContext<'_>) -> bool {
    let moon_sign_lord = ctx.sign_of(Body::Moon).map(Sign::lord);
    match (moon_sign_lord, ctx.house_lord(1)) {
        (Some(a), Some(l1)) => match (ctx.house_of(a), ctx.house_of(l1)) {
            (Some(ha), Some(hl)) => ha == hl && HouseGroup::Kendra.contains(ha),
            _ => false,
        },
        _ => false,
    }
}
