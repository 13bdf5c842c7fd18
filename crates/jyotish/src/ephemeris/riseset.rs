//! Rise/set search from the oracle's own positions.
//!
//! Standard spherical astronomy: the body's ecliptic position is rotated to
//! equatorial coordinates, the hour angle at the target altitude is solved,
//! and the event time is refined iteratively from an estimate around the
//! local transit closest to the starting instant.

use crate::ephemeris::oracle::{Ephemeris, EphemerisError};
use crate::ephemeris::types::{Body, GeoLocation, RiseSetEvent};
use crate::time::{normalize_degrees, J2000_JD};

const MAX_ITERATIONS: usize = 5;
/// ~0.086 seconds
const CONVERGENCE_DAYS: f64 = 1.0e-6;
/// Mean obliquity of the ecliptic at J2000.0
const OBLIQUITY_DEG: f64 = 23.439_291_1;
/// Earth rotation relative to the equinox, degrees per day
const SIDEREAL_RATE_DEG: f64 = 360.985_647_366_29;
/// Refraction plus solar semidiameter
const SUN_HORIZON_DEG: f64 = -0.8333;
/// Refraction only
const STAR_HORIZON_DEG: f64 = -0.5667;

fn gmst_deg(jd_ut: f64) -> f64 {
    normalize_degrees(280.460_618_37 + SIDEREAL_RATE_DEG * (jd_ut - J2000_JD))
}

/// Wrap an angle to (-180, 180].
fn signed_degrees(value: f64) -> f64 {
    let wrapped = normalize_degrees(value);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Ecliptic (lon, lat) to equatorial (ra, dec), all in degrees.
fn ecliptic_to_equatorial(lon: f64, lat: f64) -> (f64, f64) {
    let eps = OBLIQUITY_DEG.to_radians();
    let (lon, lat) = (lon.to_radians(), lat.to_radians());
    let sin_dec = lat.sin() * eps.cos() + lat.cos() * eps.sin() * lon.sin();
    let ra = (lon.sin() * eps.cos() - lat.tan() * eps.sin()).atan2(lon.cos());
    (normalize_degrees(ra.to_degrees()), sin_dec.asin().to_degrees())
}

fn target_altitude_deg(body: Body, altitude_m: f64) -> f64 {
    let horizon = if body == Body::Sun {
        SUN_HORIZON_DEG
    } else {
        STAR_HORIZON_DEG
    };
    // observer above sea level sees past the geometric horizon
    horizon - 0.0347 * altitude_m.max(0.0).sqrt()
}

fn hour_angle_at_altitude(
    body: Body,
    dec_deg: f64,
    location: &GeoLocation,
    jd: f64,
) -> Result<f64, EphemerisError> {
    let phi = location.lat.to_radians();
    let dec = dec_deg.to_radians();
    let h0 = target_altitude_deg(body, location.alt).to_radians();
    let cos_h = (h0.sin() - phi.sin() * dec.sin()) / (phi.cos() * dec.cos());
    if cos_h > 1.0 {
        return Err(EphemerisError::RiseSetUnavailable {
            body: body.to_string(),
            jd,
            message: "body stays below the horizon".to_string(),
        });
    }
    if cos_h < -1.0 {
        return Err(EphemerisError::RiseSetUnavailable {
            body: body.to_string(),
            jd,
            message: "body stays above the horizon".to_string(),
        });
    }
    Ok(cos_h.acos().to_degrees())
}

/// Find the rise or set of `body` nearest to the transit around `jd_start`.
///
/// Seeded with local noon this yields the morning rise and evening set of
/// that civil day.
pub fn solve_rise_set<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    jd_start: f64,
    body: Body,
    event: RiseSetEvent,
    location: &GeoLocation,
) -> Result<f64, EphemerisError> {
    let start = ephemeris.position(jd_start, body)?;
    let (ra, dec) = ecliptic_to_equatorial(start.lon, start.lat);

    let ha_start = signed_degrees(gmst_deg(jd_start) + location.lon - ra);
    let jd_transit = jd_start - ha_start / SIDEREAL_RATE_DEG;
    let h0 = hour_angle_at_altitude(body, dec, location, jd_start)?;

    let mut jd_event = match event {
        RiseSetEvent::Rise => jd_transit - h0 / SIDEREAL_RATE_DEG,
        RiseSetEvent::Set => jd_transit + h0 / SIDEREAL_RATE_DEG,
    };

    for _ in 0..MAX_ITERATIONS {
        let position = ephemeris.position(jd_event, body)?;
        let (ra_i, dec_i) = ecliptic_to_equatorial(position.lon, position.lat);
        let h_target = hour_angle_at_altitude(body, dec_i, location, jd_event)?;
        let ha_target = match event {
            RiseSetEvent::Rise => -h_target,
            RiseSetEvent::Set => h_target,
        };
        let ha_actual = signed_degrees(gmst_deg(jd_event) + location.lon - ra_i);
        let correction = signed_degrees(ha_target - ha_actual) / SIDEREAL_RATE_DEG;
        jd_event += correction;
        if correction.abs() < CONVERGENCE_DAYS {
            break;
        }
    }

    Ok(jd_event)
}
