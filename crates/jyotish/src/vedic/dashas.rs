//! Vimshottari dasha calculation.
//!
//! Dashas are time periods ruled by the nine bodies, keyed to the Moon's
//! nakshatra at birth. The 120-year cycle is subdivided three levels deep:
//! Mahadasha, Antardasha and Pratyantardasha. The first Mahadasha is partial;
//! its sub-periods are generated from the true pre-birth start and clipped to
//! the part that falls after birth.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ephemeris::Body;
use crate::error::{JyotishError, Result};
use crate::time::{from_julian_day, to_julian_day};
use crate::vedic::nakshatra::{nakshatra_for_longitude, NakshatraRecord};

pub const VIMSHOTTARI_TOTAL_YEARS: f64 = 120.0;
pub const DASHA_YEAR_DAYS: f64 = 365.2425;
pub const DEFAULT_HORIZON_YEARS: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashaLevel {
    Mahadasha,
    Antardasha,
    Pratyantardasha,
}

impl DashaLevel {
    fn child(self) -> Option<DashaLevel> {
        match self {
            DashaLevel::Mahadasha => Some(DashaLevel::Antardasha),
            DashaLevel::Antardasha => Some(DashaLevel::Pratyantardasha),
            DashaLevel::Pratyantardasha => None,
        }
    }
}

const VIMSHOTTARI_SEQUENCE: [(Body, f64); 9] = [
    (Body::Ketu, 7.0),
    (Body::Venus, 20.0),
    (Body::Sun, 6.0),
    (Body::Moon, 10.0),
    (Body::Mars, 7.0),
    (Body::Rahu, 18.0),
    (Body::Jupiter, 16.0),
    (Body::Saturn, 19.0),
    (Body::Mercury, 17.0),
];

/// Full Mahadasha length of a body.
pub fn vimshottari_years(body: Body) -> f64 {
    VIMSHOTTARI_SEQUENCE[sequence_index(body)].1
}

fn sequence_index(body: Body) -> usize {
    VIMSHOTTARI_SEQUENCE
        .iter()
        .position(|(b, _)| *b == body)
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashaPeriod {
    pub lord: Body,
    pub level: DashaLevel,
    pub start_jd: f64,
    pub end_jd: f64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub years: f64,
    pub is_current: bool,
    /// Only the first Mahadasha (and its clipped descendants) are partial
    pub is_partial: bool,
    pub start_age: f64,
    pub end_age: f64,
    pub children: Vec<DashaPeriod>,
}

impl DashaPeriod {
    pub fn contains(&self, jd: f64) -> bool {
        self.start_jd <= jd && jd < self.end_jd
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashaTimeline {
    pub moon_nakshatra: NakshatraRecord,
    pub birth_jd: f64,
    /// Where the birth Mahadasha would have started, before birth
    pub true_start_jd: f64,
    pub periods: Vec<DashaPeriod>,
    pub total_years_calculated: f64,
    pub cycle_years: f64,
}

impl DashaTimeline {
    /// Reset and recompute the current flags for `now_jd`.
    ///
    /// Outside the generated span the first (before) or last (after)
    /// Mahadasha is marked and no sub-period is.
    pub fn mark_current(&mut self, now_jd: f64) {
        fn clear(periods: &mut [DashaPeriod]) {
            for period in periods {
                period.is_current = false;
                clear(&mut period.children);
            }
        }
        fn descend(periods: &mut [DashaPeriod], now_jd: f64) -> bool {
            match periods.iter_mut().find(|p| p.contains(now_jd)) {
                Some(period) => {
                    period.is_current = true;
                    descend(&mut period.children, now_jd);
                    true
                }
                None => false,
            }
        }

        clear(&mut self.periods);
        if descend(&mut self.periods, now_jd) {
            return;
        }
        let fallback = match (self.periods.first(), self.periods.last()) {
            (Some(first), _) if now_jd < first.start_jd => self.periods.first_mut(),
            (_, Some(last)) if now_jd >= last.end_jd => self.periods.last_mut(),
            _ => None,
        };
        if let Some(period) = fallback {
            period.is_current = true;
        }
    }

    /// Current Mahadasha, Antardasha and Pratyantardasha, as far as marked.
    pub fn current_path(&self) -> Vec<&DashaPeriod> {
        let mut path = Vec::new();
        let mut level = &self.periods;
        while let Some(period) = level.iter().find(|p| p.is_current) {
            path.push(period);
            level = &period.children;
        }
        path
    }
}

struct Generator {
    birth_jd: f64,
}

impl Generator {
    fn node(
        &self,
        lord: Body,
        level: DashaLevel,
        start_jd: f64,
        end_jd: f64,
        years: f64,
    ) -> Result<DashaPeriod> {
        let to_date = |jd: f64| {
            from_julian_day(jd).ok_or_else(|| {
                JyotishError::Configuration(format!(
                    "dasha boundary JD {jd} is outside the supported date range"
                ))
            })
        };
        Ok(DashaPeriod {
            lord,
            level,
            start_jd,
            end_jd,
            start: to_date(start_jd)?,
            end: to_date(end_jd)?,
            years,
            is_current: false,
            is_partial: false,
            start_age: (start_jd - self.birth_jd) / DASHA_YEAR_DAYS,
            end_age: (end_jd - self.birth_jd) / DASHA_YEAR_DAYS,
            children: Vec::new(),
        })
    }

    /// A full period with all nine sub-periods down to Pratyantardasha.
    /// Sub-periods start from the period's own lord.
    fn full(
        &self,
        lord: Body,
        level: DashaLevel,
        start_jd: f64,
        years: f64,
    ) -> Result<DashaPeriod> {
        let end_jd = start_jd + years * DASHA_YEAR_DAYS;
        let mut period = self.node(lord, level, start_jd, end_jd, years)?;
        if let Some(child_level) = level.child() {
            let first = sequence_index(lord);
            let mut cursor = start_jd;
            for offset in 0..VIMSHOTTARI_SEQUENCE.len() {
                let (child_lord, child_table_years) =
                    VIMSHOTTARI_SEQUENCE[(first + offset) % VIMSHOTTARI_SEQUENCE.len()];
                let child_years = child_table_years * years / VIMSHOTTARI_TOTAL_YEARS;
                let child = self.full(child_lord, child_level, cursor, child_years)?;
                cursor = child.end_jd;
                period.children.push(child);
            }
        }
        Ok(period)
    }

    /// Intersect a generated period (and its descendants) with [lo, hi).
    fn clip(&self, period: &DashaPeriod, lo: f64, hi: f64) -> Result<Option<DashaPeriod>> {
        let start_jd = period.start_jd.max(lo);
        let end_jd = period.end_jd.min(hi);
        if start_jd >= end_jd {
            return Ok(None);
        }
        let mut clipped = self.node(
            period.lord,
            period.level,
            start_jd,
            end_jd,
            (end_jd - start_jd) / DASHA_YEAR_DAYS,
        )?;
        clipped.is_partial = true;
        for child in &period.children {
            if let Some(child) = self.clip(child, start_jd, end_jd)? {
                clipped.children.push(child);
            }
        }
        Ok(Some(clipped))
    }
}

/// Generate the Vimshottari timeline from birth out to `horizon_years`,
/// marking periods current for `now_jd`.
pub fn timeline_at(
    birth_jd: f64,
    moon_sidereal: f64,
    horizon_years: f64,
    now_jd: f64,
) -> Result<DashaTimeline> {
    if !horizon_years.is_finite() || horizon_years < 0.0 {
        return Err(JyotishError::Configuration(format!(
            "dasha horizon must be a non-negative number of years, got {horizon_years}"
        )));
    }

    let nakshatra = nakshatra_for_longitude(moon_sidereal);
    let birth_lord = nakshatra.lord;
    let full_years = vimshottari_years(birth_lord);
    let remaining_years = (1.0 - nakshatra.fraction) * full_years;
    let true_start_jd = birth_jd - (full_years - remaining_years) * DASHA_YEAR_DAYS;

    let generator = Generator { birth_jd };
    let mut periods = Vec::new();

    let first_end = birth_jd + remaining_years * DASHA_YEAR_DAYS;
    let birth_maha = generator.full(birth_lord, DashaLevel::Mahadasha, true_start_jd, full_years)?;
    if let Some(first) = generator.clip(&birth_maha, birth_jd, first_end)? {
        periods.push(first);
    }

    let mut cursor = first_end;
    let mut index = sequence_index(birth_lord);
    while cursor - birth_jd < horizon_years * DASHA_YEAR_DAYS {
        index = (index + 1) % VIMSHOTTARI_SEQUENCE.len();
        let (lord, years) = VIMSHOTTARI_SEQUENCE[index];
        let period = generator.full(lord, DashaLevel::Mahadasha, cursor, years)?;
        cursor = period.end_jd;
        periods.push(period);
    }

    let mut timeline = DashaTimeline {
        moon_nakshatra: nakshatra,
        birth_jd,
        true_start_jd,
        periods,
        total_years_calculated: (cursor - birth_jd) / DASHA_YEAR_DAYS,
        cycle_years: VIMSHOTTARI_TOTAL_YEARS,
    };
    timeline.mark_current(now_jd);
    log::debug!(
        "Generated {} mahadashas from {birth_lord} covering {:.2} years",
        timeline.periods.len(),
        timeline.total_years_calculated
    );
    Ok(timeline)
}

/// [`timeline_at`] with the current wall-clock time.
pub fn timeline(birth_jd: f64, moon_sidereal: f64, horizon_years: f64) -> Result<DashaTimeline> {
    timeline_at(birth_jd, moon_sidereal, horizon_years, to_julian_day(Utc::now()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::J2000_JD;
    use crate::vedic::nakshatra::NAKSHATRA_SEGMENT_SIZE;

    #[test]
    fn sequence_sums_to_cycle() {
        let total: f64 = VIMSHOTTARI_SEQUENCE.iter().map(|(_, y)| y).sum();
        assert_eq!(total, VIMSHOTTARI_TOTAL_YEARS);
        assert_eq!(vimshottari_years(Body::Venus), 20.0);
    }

    #[test]
    fn moon_at_nakshatra_start_gives_full_first_period() {
        let t = timeline_at(J2000_JD, 0.0, 100.0, J2000_JD + 1.0).unwrap();
        let first = &t.periods[0];
        assert_eq!(first.lord, Body::Ketu);
        assert!((first.years - 7.0).abs() < 1e-9);
        assert_eq!(first.children.len(), 9);
        assert_eq!(first.children[0].lord, Body::Ketu);
        assert_eq!(t.periods[1].lord, Body::Venus);
    }

    #[test]
    fn partial_first_period_clips_sub_periods() {
        // Halfway through Bharani (Venus)
        let moon = NAKSHATRA_SEGMENT_SIZE * 1.5;
        let t = timeline_at(J2000_JD, moon, 100.0, J2000_JD + 1.0).unwrap();
        let first = &t.periods[0];
        assert_eq!(first.lord, Body::Venus);
        assert!(first.is_partial);
        assert!((first.years - 10.0).abs() < 1e-6);
        assert!((t.true_start_jd - (J2000_JD - 10.0 * DASHA_YEAR_DAYS)).abs() < 1e-6);
        // Venus, Sun, Moon and Mars antars take 7.1667 years and Rahu runs
        // to 10.1667, so a two-month Rahu slice opens the clipped set
        assert_eq!(first.children[0].lord, Body::Rahu);
        assert!((first.children[0].start_jd - J2000_JD).abs() < 1e-6);
        assert!((first.children[0].years - 1.0 / 6.0).abs() < 1e-6);
        assert_eq!(first.children.len(), 5);
        let sum: f64 = first.children.iter().map(|c| c.years).sum();
        assert!((sum - first.years).abs() < 1e-6);
    }

    #[test]
    fn children_sum_to_parent_years() {
        let t = timeline_at(J2000_JD, 200.0, 100.0, J2000_JD).unwrap();
        for maha in t.periods.iter().skip(1) {
            let antar_sum: f64 = maha.children.iter().map(|c| c.years).sum();
            assert!((antar_sum - maha.years).abs() < 1e-6);
            for antar in &maha.children {
                let praty_sum: f64 = antar.children.iter().map(|c| c.years).sum();
                assert!((praty_sum - antar.years).abs() < 1e-6);
                assert_eq!(antar.children[0].lord, antar.lord);
            }
        }
    }

    #[test]
    fn generation_stops_past_horizon() {
        let t = timeline_at(J2000_JD, 0.0, 30.0, J2000_JD).unwrap();
        // Ketu 7 + Venus 20 + Sun 6 = 33 crosses 30
        assert_eq!(t.periods.len(), 3);
        assert!((t.total_years_calculated - 33.0).abs() < 1e-6);
        assert!(timeline_at(J2000_JD, 0.0, -1.0, J2000_JD).is_err());
    }

    #[test]
    fn exactly_one_current_per_level() {
        let now = J2000_JD + 40.0 * DASHA_YEAR_DAYS + 3.3;
        let t = timeline_at(J2000_JD, 77.7, 100.0, now).unwrap();
        let path = t.current_path();
        assert_eq!(path.len(), 3);
        assert_eq!(t.periods.iter().filter(|p| p.is_current).count(), 1);
        for period in &path {
            assert!(period.contains(now));
        }
        assert_eq!(path[1].children.iter().filter(|p| p.is_current).count(), 1);
    }

    #[test]
    fn falls_back_outside_span() {
        let mut t = timeline_at(J2000_JD, 10.0, 20.0, J2000_JD - 5.0).unwrap();
        assert!(t.periods[0].is_current);
        assert_eq!(t.current_path().len(), 1);

        t.mark_current(J2000_JD + 500.0 * DASHA_YEAR_DAYS);
        assert!(t.periods.last().unwrap().is_current);
        assert!(!t.periods[0].is_current);
    }
}
