#![allow(dead_code)]

use chrono::NaiveDate;
use jyotish::ephemeris::{Body, FixedEphemeris};
use jyotish::{compute_chart, BirthParams, ChartOptions, ChartResult};

pub const NOW_JD: f64 = 2_460_000.5;

/// Noon UTC on 1 January 2000.
pub fn birth() -> BirthParams {
    let datetime = NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid date");
    BirthParams::new(datetime, "UTC", 28.61, 77.21)
}

/// Oracle with zero ayanamsha so tropical and sidereal agree.
pub fn ephemeris(ascendant: Option<f64>, bodies: &[(Body, f64)]) -> FixedEphemeris {
    let mut eph = FixedEphemeris::new(0.0);
    for (body, lon) in bodies {
        eph = eph.with_sidereal(*body, *lon, 1.0);
    }
    match ascendant {
        Some(asc) => eph.with_sidereal_ascendant(asc),
        None => eph,
    }
}

pub fn options(bodies: &[(Body, f64)]) -> ChartOptions {
    ChartOptions {
        bodies: bodies.iter().map(|(b, _)| *b).collect(),
        now_jd: Some(NOW_JD),
        ..ChartOptions::default()
    }
}

/// A full chart result with every listed body at the given sidereal longitude.
pub fn chart(ascendant: f64, bodies: &[(Body, f64)]) -> ChartResult {
    let eph = ephemeris(Some(ascendant), bodies);
    compute_chart(&eph, &birth(), &options(bodies)).expect("chart computes")
}
