mod common;

use std::fs;
use std::path::PathBuf;

use jyotish::ephemeris::Body;
use jyotish::yoga::{
    evaluate, evaluate_all, NamedPattern, Reference, Ruleset, RulesetStore, YogaContext, YogaStatus,
};
use jyotish::{compute_chart, evaluate_all_rulesets, ChartResult, JyotishError};

use common::{birth, chart, ephemeris, options};

fn shipped_rulesets() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../rulesets/yogas")
}

fn ruleset(json: &str) -> Ruleset {
    Ruleset::from_json(json, "inline").expect("ruleset parses")
}

fn holds(result: &ChartResult, pattern: NamedPattern) -> bool {
    pattern.holds(&result.yoga_context())
}

const GAJA_KESARI: &str = r#"{
    "id": "gaja_kesari",
    "signals": [
        { "id": "kendra", "predicate": "kendra_from", "params": { "a": "Jupiter", "b": "Moon", "include_conjunction": true } },
        { "id": "exalted", "predicate": "planet_exalted", "params": { "planet": "Jupiter" } },
        { "id": "angular", "predicate": "planet_in_house_group_from_asc", "params": { "planet": "Jupiter", "group": "kendra" } }
    ],
    "weights": { "kendra": 3, "exalted": 1, "angular": 1 },
    "strong_if": "kendra and exalted",
    "active_if": "kendra"
}"#;

#[test]
fn test_weighted_all_true_scores_100() {
    // Aries rising, Moon in 1, exalted Jupiter in 4
    let result = chart(5.0, &[(Body::Sun, 200.0), (Body::Moon, 5.0), (Body::Jupiter, 95.0)]);
    let yoga = evaluate(&ruleset(GAJA_KESARI), &result.yoga_context());
    assert_eq!(yoga.score, 100.0);
    assert_eq!(yoga.status, YogaStatus::Strong);
    assert!(yoga.is_strong && yoga.is_active);
    assert_eq!(yoga.signal_results.get("kendra"), Some(&true));
    assert_eq!(yoga.trace.len(), 3);
}

#[test]
fn test_weighted_all_false_scores_0() {
    // Moon in 2, Jupiter in 9: seven houses apart
    let result = chart(5.0, &[(Body::Sun, 200.0), (Body::Moon, 35.0), (Body::Jupiter, 245.0)]);
    let yoga = evaluate(&ruleset(GAJA_KESARI), &result.yoga_context());
    assert_eq!(yoga.score, 0.0);
    assert_eq!(yoga.status, YogaStatus::Inactive);
    assert!(!yoga.is_active);
}

#[test]
fn test_weighted_partial_score_and_active_status() {
    // Jupiter in Libra in 7, Moon in 1
    let result = chart(5.0, &[(Body::Sun, 100.0), (Body::Moon, 5.0), (Body::Jupiter, 185.0)]);
    let yoga = evaluate(&ruleset(GAJA_KESARI), &result.yoga_context());
    assert_eq!(yoga.score, 80.0);
    assert_eq!(yoga.status, YogaStatus::Active);
    assert!(!yoga.is_strong && yoga.is_active);
}

#[test]
fn test_kendra_excludes_conjunction_unless_asked() {
    let json = r#"{
        "id": "k",
        "signals": [
            { "id": "strict", "predicate": "kendra_from", "params": { "a": "Jupiter", "b": "Moon" } },
            { "id": "loose", "predicate": "kendra_from", "params": { "a": "Jupiter", "b": "Moon", "include_conjunction": true } },
            { "id": "orb", "predicate": "kendra_from", "params": { "a": "Jupiter", "b": "Moon", "include_conjunction": true, "orb_deg": 5 } }
        ],
        "weights": { "strict": 1, "loose": 1, "orb": 1 }
    }"#;
    let result = chart(5.0, &[(Body::Moon, 2.0), (Body::Jupiter, 25.0)]);
    let yoga = evaluate(&ruleset(json), &result.yoga_context());
    assert_eq!(yoga.signal_results["strict"], false);
    assert_eq!(yoga.signal_results["loose"], true);
    // 23 degrees apart is outside a 5 degree orb
    assert_eq!(yoga.signal_results["orb"], false);
}

#[test]
fn test_lord_references_and_connections() {
    let json = r#"{
        "id": "raja",
        "signals": [
            { "id": "conj", "predicate": "conjunction", "params": { "a": "lord(9)", "b": "lord(10)" } },
            { "id": "conn", "predicate": "any_connection", "params": { "a": "lord(9)", "b": "lord(10)" } },
            { "id": "swap", "predicate": "lord_exchange", "params": { "a": "lord(9)", "b": "lord(10)" } }
        ],
        "weights": { "conj": 1, "conn": 1, "swap": 1 },
        "strong_if": "swap",
        "active_if": "conn"
    }"#;
    // Aries rising: Jupiter rules 9, Saturn rules 10; opposite each other
    let result = chart(5.0, &[(Body::Jupiter, 15.0), (Body::Saturn, 195.0)]);
    let yoga = evaluate(&ruleset(json), &result.yoga_context());
    assert_eq!(yoga.signal_results["conj"], false);
    assert_eq!(yoga.signal_results["conn"], true);
    assert_eq!(yoga.signal_results["swap"], false);
    assert_eq!(yoga.status, YogaStatus::Active);
    assert!((yoga.score - 33.3).abs() < 1e-9);

    // Jupiter in Capricorn and Saturn in Sagittarius exchange signs
    let swapped = chart(5.0, &[(Body::Jupiter, 275.0), (Body::Saturn, 245.0)]);
    let yoga = evaluate(&ruleset(json), &swapped.yoga_context());
    assert_eq!(yoga.signal_results["swap"], true);
    assert_eq!(yoga.status, YogaStatus::Strong);
}

#[test]
fn test_unresolvable_lord_is_false() {
    let json = r#"{
        "id": "no_asc",
        "signals": [ { "id": "k", "predicate": "kendra_from", "params": { "a": "lord(9)", "b": "Moon" } } ],
        "weights": { "k": 1 },
        "active_if": "k or not k"
    }"#;
    let bodies = [(Body::Moon, 10.0), (Body::Jupiter, 100.0)];
    let eph = ephemeris(None, &bodies);
    let result = compute_chart(&eph, &birth(), &options(&bodies)).unwrap();
    let yoga = evaluate(&ruleset(json), &result.yoga_context());
    assert_eq!(yoga.signal_results["k"], false);
    assert_eq!(yoga.score, 0.0);
    assert_eq!(yoga.status, YogaStatus::Active);

    let err = Reference::LordOf(9).require(&result.yoga_context()).unwrap_err();
    assert!(matches!(err, JyotishError::UnresolvableReference { .. }));
}

const YOGAKARAKA: &str = r#"{
    "id": "yk",
    "signals": [
        { "id": "exists", "predicate": "any_yogakaraka" },
        { "id": "kendra", "predicate": "yogakaraka_in_group_from_asc", "params": { "group": "kendra" } },
        { "id": "strong", "predicate": "yogakaraka_strong_place" }
    ],
    "weights": { "exists": 1, "kendra": 1, "strong": 1 }
}"#;

#[test]
fn test_yogakaraka_for_taurus_rising() {
    // Venus (lagna lord) is unplaced, so Saturn, lord of 9 and 10, is checked in the 10th
    let taurus = chart(35.0, &[(Body::Saturn, 305.0)]);
    let ctx = taurus.yoga_context();
    assert_eq!(ctx.yogakarakas(), vec![Body::Venus, Body::Saturn]);
    let yoga = evaluate(&ruleset(YOGAKARAKA), &ctx);
    assert_eq!(yoga.score, 100.0);
}

#[test]
fn test_lagna_lord_is_a_yogakaraka() {
    // Aries rising with Mars in the 1st
    let aries = chart(5.0, &[(Body::Mars, 5.0)]);
    let yoga = evaluate(&ruleset(YOGAKARAKA), &aries.yoga_context());
    assert_eq!(yoga.score, 100.0);
    assert_eq!(yoga.signal_results.get("exists"), Some(&true));

    // Mars unplaced: it still exists, but has no house to occupy
    let aries = chart(5.0, &[(Body::Saturn, 305.0)]);
    let yoga = evaluate(&ruleset(YOGAKARAKA), &aries.yoga_context());
    assert_eq!(yoga.score, 33.3);
    assert_eq!(yoga.signal_results.get("kendra"), Some(&false));
}

#[test]
fn test_placed_lagna_lord_is_checked_before_other_yogakarakas() {
    // Taurus rising: Venus in Libra (6th) wins over Saturn in the 10th
    let taurus = chart(35.0, &[(Body::Venus, 185.0), (Body::Saturn, 305.0)]);
    let ctx = taurus.yoga_context();
    assert_eq!(ctx.placed_yogakaraka(), Some(Body::Venus));
    let yoga = evaluate(&ruleset(YOGAKARAKA), &ctx);
    assert_eq!(yoga.signal_results.get("kendra"), Some(&false));
    assert_eq!(yoga.signal_results.get("strong"), Some(&false));
    assert_eq!(yoga.score, 33.3);
}

#[test]
fn test_conditions_all_must_hold() {
    let json = r#"{
        "id": "durudhara",
        "conditions": [
            { "house_from_moon": 2, "exclude_planets": ["Sun"] },
            { "house_from_moon": 12, "exclude_planets": ["Sun"] }
        ]
    }"#;
    let one_side = chart(5.0, &[(Body::Moon, 5.0), (Body::Mars, 35.0)]);
    let yoga = evaluate(&ruleset(json), &one_side.yoga_context());
    assert_eq!(yoga.status, YogaStatus::Inactive);
    assert_eq!(yoga.score, 0.0);
    assert_eq!(yoga.trace.iter().filter(|t| t.result).count(), 1);

    let both_sides = chart(5.0, &[(Body::Moon, 5.0), (Body::Mars, 35.0), (Body::Venus, 335.0)]);
    let yoga = evaluate(&ruleset(json), &both_sides.yoga_context());
    assert_eq!(yoga.status, YogaStatus::Active);
    assert_eq!(yoga.score, 100.0);
    assert!(!yoga.is_strong);
}

#[test]
fn test_planet_and_lord_conditions() {
    let hamsa = r#"{ "id": "hamsa", "conditions": [ { "planet": "Jupiter", "house": [1, 4, 7, 10], "sign_type": ["own", "exaltation"] } ] }"#;
    let shakata = r#"{ "id": "shakata", "conditions": [ { "planet": "Moon", "relationship": "6_8_12_from", "target": "Jupiter" } ] }"#;
    let lord = r#"{ "id": "l9", "conditions": [ { "lord_of": 9, "strength": "strong", "house": 4 } ] }"#;

    // Aries rising, exalted Jupiter in 4; Moon in Sagittarius, the 6th from Jupiter
    let result = chart(5.0, &[(Body::Jupiter, 95.0), (Body::Moon, 245.0)]);
    let ctx = result.yoga_context();
    assert_eq!(evaluate(&ruleset(hamsa), &ctx).status, YogaStatus::Active);
    assert_eq!(evaluate(&ruleset(shakata), &ctx).status, YogaStatus::Active);
    assert_eq!(evaluate(&ruleset(lord), &ctx).status, YogaStatus::Active);

    let weak = chart(5.0, &[(Body::Jupiter, 275.0), (Body::Moon, 5.0)]);
    let ctx = weak.yoga_context();
    assert_eq!(evaluate(&ruleset(hamsa), &ctx).status, YogaStatus::Inactive);
    assert_eq!(evaluate(&ruleset(shakata), &ctx).status, YogaStatus::Inactive);
}

#[test]
fn test_named_patterns() {
    // Aries rising: 9th lord Jupiter and 10th lord Saturn both in Taurus
    let vishnu = chart(5.0, &[(Body::Jupiter, 45.0), (Body::Saturn, 50.0)]);
    assert!(holds(&vishnu, NamedPattern::VishnuPattern));
    assert!(holds(&vishnu, NamedPattern::RajaYogaNineTen));
    assert!(!holds(&vishnu, NamedPattern::ShivaPattern));

    // 5th lord Sun in 9, 9th lord Jupiter in 10, 10th lord Saturn in 5
    let shiva = chart(5.0, &[(Body::Sun, 245.0), (Body::Jupiter, 275.0), (Body::Saturn, 125.0)]);
    assert!(holds(&shiva, NamedPattern::ShivaPattern));

    // Mars 3rd from the Moon, Saturn 7th from Mars, Venus 7th from Saturn
    let indra = chart(
        5.0,
        &[
            (Body::Moon, 5.0),
            (Body::Mars, 65.0),
            (Body::Saturn, 245.0),
            (Body::Venus, 70.0),
        ],
    );
    assert!(holds(&indra, NamedPattern::IndraPattern));

    // Sun debilitated in Libra; the exaltation-sign lord Mars is in a kendra
    let neecha = chart(5.0, &[(Body::Sun, 185.0), (Body::Mars, 10.0), (Body::Moon, 65.0)]);
    assert!(holds(&neecha, NamedPattern::NeechabhangaCheck));

    // Moon at 5 Aries falls in the Taurus navamsa
    let chamara = chart(5.0, &[(Body::Moon, 5.0)]);
    assert!(holds(&chamara, NamedPattern::MoonNavamsaExalt));
    assert!(!holds(&chamara, NamedPattern::MaleficsInKendras));
}

#[test]
fn test_neechabhanga_ignores_debilitated_nodes() {
    // Rahu in Scorpio and Ketu in Taurus are debilitated; Mars and Venus sit in kendras
    let nodes = [
        (Body::Rahu, 215.0),
        (Body::Ketu, 35.0),
        (Body::Mars, 5.0),
        (Body::Venus, 95.0),
        (Body::Moon, 65.0),
    ];
    let result = chart(5.0, &nodes);
    assert!(result.yoga_context().is_debilitated(Body::Rahu));
    assert!(!holds(&result, NamedPattern::NeechabhangaCheck));

    // A debilitated Sun with Mars angular still cancels
    let mut with_sun = nodes.to_vec();
    with_sun.push((Body::Sun, 185.0));
    assert!(holds(&chart(5.0, &with_sun), NamedPattern::NeechabhangaCheck));
}

#[test]
fn test_parivartana_variants() {
    // Mars in Taurus and Venus in Aries: lords of 1 (and 8) and 2 (and 7) swap
    let result = chart(5.0, &[(Body::Mars, 40.0), (Body::Venus, 15.0), (Body::Mercury, 200.0)]);
    assert!(holds(&result, NamedPattern::ParivartanaKendraTrikona));
    assert!(holds(&result, NamedPattern::ParivartanaDusthana));
    assert!(!holds(&result, NamedPattern::Parivartana3rd));

    let none = chart(5.0, &[(Body::Mars, 10.0), (Body::Venus, 15.0)]);
    assert!(!holds(&none, NamedPattern::ParivartanaKendraTrikona));
}

#[test]
fn test_named_pattern_via_conditions_dialect() {
    let json = r#"{ "id": "brahma", "conditions": [ { "condition": "brahma_complex" } ] }"#;
    // Aries rising, lagna lord Mars in 1; benefics in 1, 4 and 7
    let result = chart(
        5.0,
        &[
            (Body::Mars, 10.0),
            (Body::Jupiter, 95.0),
            (Body::Venus, 190.0),
            (Body::Mercury, 20.0),
        ],
    );
    let yoga = evaluate(&ruleset(json), &result.yoga_context());
    assert_eq!(yoga.status, YogaStatus::Active);
    assert_eq!(yoga.name, "brahma");
}

#[test]
fn test_shipped_store_loads_every_document() {
    let store = RulesetStore::load_dir(&shipped_rulesets()).unwrap();
    let count = fs::read_dir(shipped_rulesets())
        .unwrap()
        .filter(|e| {
            e.as_ref()
                .map(|e| e.path().extension().is_some_and(|x| x == "json"))
                .unwrap_or(false)
        })
        .count();
    assert_eq!(store.len(), count);
    assert!(store.get("gaja_kesari").is_some());
    assert!(store.get("hamsa").is_some());
}

#[test]
fn test_store_skips_malformed_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("b_good.json"),
        r#"{ "id": "good", "conditions": [ { "condition": "parvata_def" } ] }"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("a_bad.json"),
        r#"{ "id": "bad", "signals": [ { "id": "x", "predicate": "mystery" } ] }"#,
    )
    .unwrap();
    fs::write(dir.path().join("c_broken.json"), "{ not json").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let store = RulesetStore::load_dir(dir.path()).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.iter().next().unwrap().id, "good");

    let missing = RulesetStore::load_dir(&dir.path().join("nope")).unwrap();
    assert!(missing.is_empty());
}

#[test]
fn test_evaluate_all_sorts_by_score() {
    let store = RulesetStore::load_dir(&shipped_rulesets()).unwrap();
    let result = chart(
        5.0,
        &[
            (Body::Sun, 10.0),
            (Body::Moon, 5.0),
            (Body::Mars, 65.0),
            (Body::Mercury, 20.0),
            (Body::Jupiter, 95.0),
            (Body::Venus, 335.0),
            (Body::Saturn, 185.0),
            (Body::Rahu, 120.0),
            (Body::Ketu, 300.0),
        ],
    );
    let results = evaluate_all_rulesets(&store, &result);
    assert_eq!(results.len(), store.len());
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));

    let direct = evaluate_all(&store, &YogaContext::new(&result.chart, Some(&result.d9)));
    let ids: Vec<&str> = direct.iter().map(|r| r.id.as_str()).collect();
    let via_chart: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, via_chart);

    let hamsa = results.iter().find(|r| r.id == "hamsa").unwrap();
    assert!(hamsa.is_active);
}

#[test]
fn test_inactive_rulesets_tie_at_positive_zero() {
    let weighted = ruleset(
        r#"{
            "id": "weighted_first",
            "signals": [ { "id": "exalted", "predicate": "planet_exalted", "params": { "planet": "Jupiter" } } ],
            "weights": { "exalted": 1 }
        }"#,
    );
    let conditions = ruleset(
        r#"{ "id": "conditions_second", "conditions": [ { "planet": "Jupiter", "house": [10] } ] }"#,
    );
    // Jupiter in Sagittarius, the 9th from Aries
    let result = chart(5.0, &[(Body::Moon, 35.0), (Body::Jupiter, 245.0)]);
    let results = evaluate_all([&weighted, &conditions], &result.yoga_context());

    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["weighted_first", "conditions_second"]);
    for yoga in &results {
        assert!(yoga.score.is_sign_positive(), "{} scored {}", yoga.id, yoga.score);
        assert_eq!(yoga.status, YogaStatus::Inactive);
    }
    let json = serde_json::to_value(&results[0]).unwrap();
    assert_eq!(json["score"].to_string(), "0.0");
}
