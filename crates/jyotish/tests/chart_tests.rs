mod common;

use chrono::NaiveDate;
use jyotish::ephemeris::Body;
use jyotish::time::{angular_distance, normalize_degrees};
use jyotish::vedic::Sign;
use jyotish::{compute_chart, BirthParams, JyotishError};

use common::{birth, chart, ephemeris, options};

#[test]
fn test_normalize_is_periodic() {
    for lon in [-725.5, -0.0001, 0.0, 359.9999, 360.0, 1234.5] {
        let n = normalize_degrees(lon);
        assert!((0.0..360.0).contains(&n), "{lon} -> {n}");
        for k in [-3.0, 1.0, 5.0] {
            let shifted = normalize_degrees(lon + 360.0 * k);
            assert!(angular_distance(n, shifted) < 1e-9);
        }
    }
}

#[test]
fn test_moon_in_pushya() {
    let result = chart(0.0, &[(Body::Sun, 10.0), (Body::Moon, 95.5)]);
    let nakshatra = result.moon_nakshatra.as_ref().unwrap();
    assert_eq!(nakshatra.index, 7);
    assert_eq!(nakshatra.name, "Pushya");
    assert_eq!(nakshatra.lord, Body::Saturn);
    assert_eq!(nakshatra.pada, 1);
    assert_eq!(result.moon_sign, Some(Sign::Cancer));
}

#[test]
fn test_whole_sign_houses_from_ascendant() {
    let result = chart(125.0, &[(Body::Sun, 10.0)]);
    let asc = result.chart.ascendant.as_ref().unwrap();
    assert_eq!(asc.sign, Sign::Leo);
    assert!((asc.degree_in_sign - 5.0).abs() < 1e-9);
    assert_eq!(result.chart.houses.len(), 12);
    assert_eq!(result.chart.houses[0].sign, Sign::Leo);
    assert_eq!(result.chart.houses[11].sign, Sign::Cancer);
    // Aries is the 9th from Leo
    assert_eq!(result.chart.house_of(Body::Sun), Some(9));
    assert_eq!(result.chart.house_lord(9), Some(Body::Mars));
}

#[test]
fn test_sign_and_degree_ranges() {
    let bodies: Vec<(Body, f64)> = vec![
        (Body::Sun, 0.0),
        (Body::Moon, 29.999_999),
        (Body::Mercury, 359.999_999),
        (Body::Venus, 180.0),
    ];
    let result = chart(0.0, &bodies);
    for placement in result.chart.placements.values() {
        assert!(placement.sign.index() <= 11);
        assert!((0.0..30.0).contains(&placement.degree_in_sign));
    }
    assert_eq!(result.chart.sign_of(Body::Moon), Some(Sign::Aries));
    assert_eq!(result.chart.sign_of(Body::Mercury), Some(Sign::Pisces));
}

#[test]
fn test_nodes_are_opposite_and_retrograde() {
    let result = chart(0.0, &[(Body::Sun, 10.0), (Body::Rahu, 100.0), (Body::Ketu, 0.0)]);
    let rahu = result.chart.placement(Body::Rahu).unwrap();
    let ketu = result.chart.placement(Body::Ketu).unwrap();
    assert!((angular_distance(rahu.lon_sidereal, ketu.lon_sidereal) - 180.0).abs() < 1e-9);
    assert!((angular_distance(rahu.lon_tropical, ketu.lon_tropical) - 180.0).abs() < 1e-9);
    assert!(rahu.retrograde && ketu.retrograde);
    assert!(!rahu.combust && !ketu.combust);
}

#[test]
fn test_combustion_uses_body_orbs() {
    let result = chart(
        0.0,
        &[
            (Body::Sun, 100.0),
            (Body::Mercury, 112.0),
            (Body::Venus, 110.0),
            (Body::Moon, 101.0),
        ],
    );
    assert!(result.chart.placement(Body::Mercury).unwrap().combust);
    // Venus orb is 9
    assert!(!result.chart.placement(Body::Venus).unwrap().combust);
    assert!(!result.chart.placement(Body::Moon).unwrap().combust);
}

#[test]
fn test_dignity_flags() {
    let result = chart(0.0, &[(Body::Sun, 10.0), (Body::Saturn, 10.0), (Body::Jupiter, 95.0)]);
    let sun = result.chart.placement(Body::Sun).unwrap();
    let saturn = result.chart.placement(Body::Saturn).unwrap();
    let jupiter = result.chart.placement(Body::Jupiter).unwrap();
    assert!(sun.dignity.exalted && !sun.dignity.debilitated);
    assert!(saturn.dignity.debilitated);
    assert!(jupiter.dignity.exalted);
}

#[test]
fn test_failed_body_is_reported_not_fatal() {
    let bodies = [(Body::Sun, 10.0), (Body::Moon, 50.0), (Body::Mars, 70.0)];
    let eph = ephemeris(Some(0.0), &bodies).failing(Body::Mars);
    let result = compute_chart(&eph, &birth(), &options(&bodies)).unwrap();
    assert!(result.chart.placement(Body::Mars).is_none());
    assert!(result.chart.placement(Body::Moon).is_some());
    assert!(result.errors.iter().any(|e| e.field == "Mars"));
    assert!(result.strengths.iter().all(|s| s.body != Body::Mars));
}

#[test]
fn test_missing_ascendant_leaves_houses_empty() {
    let bodies = [(Body::Sun, 10.0), (Body::Moon, 50.0)];
    let eph = ephemeris(None, &bodies);
    let result = compute_chart(&eph, &birth(), &options(&bodies)).unwrap();
    assert!(result.chart.ascendant.is_none());
    assert!(result.chart.houses.is_empty());
    assert!(result.errors.iter().any(|e| e.field == "ascendant"));
    assert_eq!(result.chart.house_of(Body::Sun), None);
    assert!(result.dashas.is_some());
}

#[test]
fn test_missing_moon_skips_dashas_and_panchang() {
    let bodies = [(Body::Sun, 10.0)];
    let result = chart(0.0, &bodies);
    assert!(result.dashas.is_none());
    assert!(result.tithi.is_none());
    assert!(result.errors.iter().any(|e| e.field == "dashas"));
}

#[test]
fn test_invalid_inputs_are_configuration_errors() {
    let bodies = [(Body::Sun, 10.0)];
    let eph = ephemeris(Some(0.0), &bodies);

    let mut bad_zone = birth();
    bad_zone.timezone = "Mars/Olympus_Mons".to_string();
    assert!(matches!(
        compute_chart(&eph, &bad_zone, &options(&bodies)),
        Err(JyotishError::Configuration(_))
    ));

    let mut bad_lat = birth();
    bad_lat.lat = 123.0;
    assert!(matches!(
        compute_chart(&eph, &bad_lat, &options(&bodies)),
        Err(JyotishError::Configuration(_))
    ));

    // Clocks in New York skipped from 02:00 to 03:00 that night
    let gap = NaiveDate::from_ymd_opt(2021, 3, 14)
        .and_then(|d| d.and_hms_opt(2, 30, 0))
        .unwrap();
    let params = BirthParams::new(gap, "America/New_York", 40.7, -74.0);
    assert!(matches!(
        compute_chart(&eph, &params, &options(&bodies)),
        Err(JyotishError::Configuration(_))
    ));
}

#[test]
fn test_civil_time_converts_through_timezone() {
    let civil = NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(17, 30, 0))
        .unwrap();
    let params = BirthParams::new(civil, "Asia/Kolkata", 28.61, 77.21);
    let instant = params.instant().unwrap();
    // 17:30 IST is 12:00 UTC, which is J2000.0
    assert!((instant.jd_ut - 2_451_545.0).abs() < 1e-9);
}
