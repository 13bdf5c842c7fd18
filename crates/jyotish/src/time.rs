//! Civil time to absolute instant normalization, Julian Day arithmetic and
//! angle helpers shared by every other module.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{JyotishError, Result};

/// Julian Day of the Unix epoch (1970-01-01T00:00:00Z).
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;
pub const J2000_JD: f64 = 2_451_545.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Normalize degrees to [0, 360).
pub fn normalize_degrees(value: f64) -> f64 {
    let normalized = value.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Shortest arc between two longitudes, in [0, 180].
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let diff = normalize_degrees(a - b);
    diff.min(360.0 - diff)
}

/// Convert a UTC instant to a Julian Day (UT).
pub fn to_julian_day(dt: DateTime<Utc>) -> f64 {
    let seconds = dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) / 1.0e9;
    UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY
}

/// Convert a Julian Day (UT) back to a UTC instant, rounded to the millisecond.
///
/// Returns `None` when the day lies outside chrono's representable range.
pub fn from_julian_day(jd: f64) -> Option<DateTime<Utc>> {
    if !jd.is_finite() {
        return None;
    }
    let millis = ((jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY * 1000.0).round();
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    Utc.timestamp_millis_opt(millis as i64).single()
}

/// An absolute instant derived from a civil birth time and its timezone.
///
/// Immutable once built; every downstream computation keys off `jd_ut`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instant {
    pub jd_ut: f64,
    pub utc: DateTime<Utc>,
    pub civil: NaiveDateTime,
    pub timezone: String,
}

impl Instant {
    /// Resolve a civil datetime in an IANA timezone.
    ///
    /// Ambiguous local times (DST fall-back) resolve to the earlier instant;
    /// local times skipped by a DST jump are rejected.
    pub fn from_civil(civil: NaiveDateTime, timezone: &str) -> Result<Self> {
        let tz = parse_timezone(timezone)?;
        let local = tz.from_local_datetime(&civil).earliest().ok_or_else(|| {
            JyotishError::Configuration(format!(
                "local time {civil} does not exist in timezone {timezone}"
            ))
        })?;
        let utc = local.with_timezone(&Utc);
        Ok(Self {
            jd_ut: to_julian_day(utc),
            utc,
            civil,
            timezone: tz.name().to_string(),
        })
    }

    /// Build from calendar fields, validating ranges.
    pub fn from_fields(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        timezone: &str,
    ) -> Result<Self> {
        let civil = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .ok_or_else(|| {
                JyotishError::Configuration(format!(
                    "invalid civil datetime {year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
                ))
            })?;
        Self::from_civil(civil, timezone)
    }

    /// An instant already expressed in UTC.
    pub fn from_utc(utc: DateTime<Utc>) -> Self {
        Self {
            jd_ut: to_julian_day(utc),
            utc,
            civil: utc.naive_utc(),
            timezone: "UTC".to_string(),
        }
    }

    pub fn tz(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }

    /// Julian Day of 12:00 local civil time on this instant's local date.
    pub fn local_noon_jd(&self) -> Result<f64> {
        let tz = self.tz()?;
        let noon = self
            .civil
            .date()
            .and_hms_opt(12, 0, 0)
            .and_then(|naive| tz.from_local_datetime(&naive).earliest())
            .ok_or_else(|| {
                JyotishError::Configuration(format!(
                    "no local noon on {} in {}",
                    self.civil.date(),
                    self.timezone
                ))
            })?;
        Ok(to_julian_day(noon.with_timezone(&Utc)))
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| JyotishError::Configuration(format!("unknown timezone '{name}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_wraps_into_range() {
        for k in -3..=3 {
            let value = normalize_degrees(45.5 + 360.0 * k as f64);
            assert!((value - 45.5).abs() < 1e-9, "k={k} gave {value}");
        }
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert!(normalize_degrees(-1e-15) < 360.0);
        assert!((normalize_degrees(-30.0) - 330.0).abs() < 1e-12);
    }

    #[test]
    fn angular_distance_takes_short_arc() {
        assert!((angular_distance(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((angular_distance(10.0, 350.0) - 20.0).abs() < 1e-9);
        assert!((angular_distance(0.0, 180.0) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn julian_day_of_j2000() {
        let dt = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert!((to_julian_day(dt) - J2000_JD).abs() < 1e-9);
        let back = from_julian_day(J2000_JD).unwrap();
        assert_eq!(back, dt);
    }

    #[test]
    fn civil_time_resolves_through_timezone() {
        let instant = Instant::from_fields(1990, 6, 15, 10, 30, 0, "Asia/Kolkata").unwrap();
        assert_eq!(
            instant.utc,
            Utc.with_ymd_and_hms(1990, 6, 15, 5, 0, 0).unwrap()
        );
        assert_eq!(instant.timezone, "Asia/Kolkata");
    }

    #[test]
    fn rejects_unknown_timezone_and_bad_dates() {
        assert!(matches!(
            Instant::from_fields(1990, 6, 15, 10, 30, 0, "Mars/Olympus"),
            Err(JyotishError::Configuration(_))
        ));
        assert!(matches!(
            Instant::from_fields(1990, 2, 30, 10, 30, 0, "UTC"),
            Err(JyotishError::Configuration(_))
        ));
    }

    #[test]
    fn rejects_time_skipped_by_dst() {
        // 2021-03-14 02:30 does not exist in New York
        let result = Instant::from_fields(2021, 3, 14, 2, 30, 0, "America/New_York");
        assert!(matches!(result, Err(JyotishError::Configuration(_))));
    }
}
