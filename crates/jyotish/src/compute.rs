//! Entry points: birth parameters in, full chart result out.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::ephemeris::{Body, Ephemeris, GeoLocation};
use crate::error::{JyotishError, Result};
use crate::time::{to_julian_day, Instant};
use crate::vedic::chart::{ChartBuilder, ChartCore, FieldError, DEFAULT_HOUSE_SYSTEM};
use crate::vedic::dashas::{self, DashaTimeline, DEFAULT_HORIZON_YEARS};
use crate::vedic::koota::{self, CompatibilityResult};
use crate::vedic::nakshatra::NakshatraRecord;
use crate::vedic::panchang::{self, Karana, NithyaYoga, SunEvents, Tithi};
use crate::vedic::strength::{chart_strengths, PlanetStrength};
use crate::vedic::types::Sign;
use crate::vedic::vargas::{map_chart, DivisionalChart, Varga};
use crate::yoga::{self, RulesetStore, YogaContext, YogaResult};

/// Civil birth moment and place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthParams {
    pub datetime: NaiveDateTime,
    pub timezone: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub alt: f64,
}

impl BirthParams {
    pub fn new(datetime: NaiveDateTime, timezone: &str, lat: f64, lon: f64) -> Self {
        Self {
            datetime,
            timezone: timezone.to_string(),
            lat,
            lon,
            alt: 0.0,
        }
    }

    pub fn with_altitude(mut self, alt: f64) -> Self {
        self.alt = alt;
        self
    }

    pub fn instant(&self) -> Result<Instant> {
        Instant::from_civil(self.datetime, &self.timezone)
    }

    /// Validated observer location.
    pub fn location(&self) -> Result<GeoLocation> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(JyotishError::Configuration(format!(
                "latitude {} is outside [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(JyotishError::Configuration(format!(
                "longitude {} is outside [-180, 180]",
                self.lon
            )));
        }
        if !self.alt.is_finite() {
            return Err(JyotishError::Configuration("altitude must be finite".to_string()));
        }
        Ok(GeoLocation::new(self.lat, self.lon, self.alt))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub bodies: Vec<Body>,
    pub house_system: String,
    pub dasha_horizon_years: f64,
    /// Julian Day the dasha "current" flags resolve against; wall clock when unset.
    pub now_jd: Option<f64>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            bodies: Body::ALL.to_vec(),
            house_system: DEFAULT_HOUSE_SYSTEM.to_string(),
            dasha_horizon_years: DEFAULT_HORIZON_YEARS,
            now_jd: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartResult {
    pub chart: ChartCore,
    pub d9: DivisionalChart,
    pub d10: DivisionalChart,
    pub moon_sign: Option<Sign>,
    pub moon_nakshatra: Option<NakshatraRecord>,
    pub tithi: Option<Tithi>,
    pub karana: Option<Karana>,
    pub nithya_yoga: Option<NithyaYoga>,
    pub sun_events: Option<SunEvents>,
    pub dashas: Option<DashaTimeline>,
    pub strengths: Vec<PlanetStrength>,
    /// Chart-level errors plus anything downstream that had to be skipped
    pub errors: Vec<FieldError>,
}

impl ChartResult {
    pub fn yoga_context(&self) -> YogaContext<'_> {
        YogaContext::new(&self.chart, Some(&self.d9))
    }

    pub fn divisional(&self, varga: Varga) -> &DivisionalChart {
        match varga {
            Varga::Navamsa => &self.d9,
            Varga::Dashamsha => &self.d10,
        }
    }
}

fn skipped(field: &str, message: impl Into<String>) -> FieldError {
    let message = message.into();
    log::warn!("{field} skipped: {message}");
    FieldError {
        field: field.to_string(),
        message,
    }
}

/// Build the full chart for a birth.
///
/// Only invalid input is an error; anything the oracle cannot resolve is
/// reported in `errors` and the affected fields are left empty.
pub fn compute_chart(
    ephemeris: &dyn Ephemeris,
    params: &BirthParams,
    options: &ChartOptions,
) -> Result<ChartResult> {
    if !options.dasha_horizon_years.is_finite() || options.dasha_horizon_years < 0.0 {
        return Err(JyotishError::Configuration(format!(
            "dasha horizon must be a non-negative number of years, got {}",
            options.dasha_horizon_years
        )));
    }
    let instant = params.instant()?;
    let location = params.location()?;

    let chart = ChartBuilder::new(ephemeris)
        .with_house_system(&options.house_system)
        .build(&instant, location, &options.bodies);
    let mut errors = chart.errors.clone();

    let d9 = map_chart(&chart, Varga::Navamsa);
    let d10 = map_chart(&chart, Varga::Dashamsha);

    let moon = chart.moon();
    let sun = chart.placement(Body::Sun);

    let dashas = match moon {
        Some(moon) => {
            let now_jd = options.now_jd.unwrap_or_else(|| to_julian_day(chrono::Utc::now()));
            Some(dashas::timeline_at(
                instant.jd_ut,
                moon.lon_sidereal,
                options.dasha_horizon_years,
                now_jd,
            )?)
        }
        None => {
            errors.push(skipped("dashas", "the Moon is unavailable"));
            None
        }
    };

    let (tithi, karana, nithya_yoga) = match (moon, sun) {
        (Some(moon), Some(sun)) => (
            Some(panchang::tithi(moon.lon_sidereal, sun.lon_sidereal)),
            Some(panchang::karana(moon.lon_sidereal, sun.lon_sidereal)),
            Some(panchang::nithya_yoga(moon.lon_sidereal, sun.lon_sidereal)),
        ),
        _ => {
            errors.push(skipped("panchang", "the Sun and Moon are both required"));
            (None, None, None)
        }
    };

    let sun_events = match panchang::sun_events(ephemeris, &instant, &location) {
        Ok(events) => Some(events),
        Err(e) => {
            errors.push(skipped("sunrise/sunset", e.to_string()));
            None
        }
    };

    let strengths = chart_strengths(&chart, Some(&d9));

    Ok(ChartResult {
        moon_sign: moon.map(|m| m.sign),
        moon_nakshatra: moon.map(|m| m.nakshatra.clone()),
        d9,
        d10,
        tithi,
        karana,
        nithya_yoga,
        sun_events,
        dashas,
        strengths,
        errors,
        chart,
    })
}

/// Ashta Koota score of two births, `a` taken as the groom side.
pub fn compute_compatibility(
    ephemeris: &dyn Ephemeris,
    a: &BirthParams,
    b: &BirthParams,
) -> Result<CompatibilityResult> {
    let chart_a = moon_chart(ephemeris, a)?;
    let chart_b = moon_chart(ephemeris, b)?;
    koota::score(&chart_a, &chart_b)
}

/// A chart holding just the Moon, which is all koota scoring reads.
pub fn moon_chart(ephemeris: &dyn Ephemeris, params: &BirthParams) -> Result<ChartCore> {
    let instant = params.instant()?;
    let location = params.location()?;
    Ok(ChartBuilder::new(ephemeris).build(&instant, location, &[Body::Moon]))
}

/// Every ruleset against one chart, highest score first.
pub fn evaluate_all_rulesets(store: &RulesetStore, chart: &ChartResult) -> Vec<YogaResult> {
    yoga::evaluate_all(store, &chart.yoga_context())
}
