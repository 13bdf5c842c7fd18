use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use jyotish::ephemeris::{Body, Ephemeris, FixedEphemeris};
use jyotish::{AstroService, BirthParams, RulesetStore};
use jyotish_config::JyotishSettings;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(author, version, about = "Sidereal charts, yogas and Ashta Koota matching as JSON")]
struct Args {
    #[arg(long, help = "Settings file (default: configs/jyotish.toml)")]
    config: Option<PathBuf>,

    #[arg(
        long,
        help = "JSON table of sidereal positions to use instead of the Swiss Ephemeris"
    )]
    positions: Option<PathBuf>,

    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Full chart: placements, vargas, dashas, panchang and strengths
    Chart {
        #[arg(value_parser = parse_birth, help = "DATETIME,TIMEZONE,LAT,LON[,ALT]")]
        birth: BirthParams,
    },
    /// Ashta Koota compatibility, first birth taken as the groom side
    Match {
        #[arg(value_parser = parse_birth)]
        groom: BirthParams,
        #[arg(value_parser = parse_birth)]
        bride: BirthParams,
    },
    /// Every ruleset evaluated against one chart, highest score first
    Yogas {
        #[arg(value_parser = parse_birth)]
        birth: BirthParams,

        #[arg(long, help = "Override the configured ruleset directory")]
        rulesets: Option<PathBuf>,

        #[arg(long, help = "Only ACTIVE and STRONG results")]
        active_only: bool,

        #[arg(long, help = "Drop the per-check trace")]
        no_trace: bool,
    },
}

/// `2000-01-01T12:00:00,Asia/Kolkata,28.61,77.21` with an optional altitude.
fn parse_birth(value: &str) -> Result<BirthParams, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if !(4..=5).contains(&parts.len()) {
        return Err(format!(
            "expected DATETIME,TIMEZONE,LAT,LON[,ALT], got {} fields",
            parts.len()
        ));
    }
    let datetime = NaiveDateTime::parse_from_str(parts[0], "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(parts[0], "%Y-%m-%dT%H:%M"))
        .map_err(|e| format!("bad datetime '{}': {e}", parts[0]))?;
    let number = |s: &str, what: &str| {
        s.parse::<f64>()
            .map_err(|e| format!("bad {what} '{s}': {e}"))
    };
    let lat = number(parts[2], "latitude")?;
    let lon = number(parts[3], "longitude")?;
    let mut params = BirthParams::new(datetime, parts[1], lat, lon);
    if let Some(alt) = parts.get(4) {
        params = params.with_altitude(number(alt, "altitude")?);
    }
    Ok(params)
}

/// Sidereal longitudes for a demo chart, keyed by body name.
#[derive(Debug, Deserialize)]
struct PositionTable {
    #[serde(default)]
    ayanamsha: f64,
    #[serde(default)]
    ascendant: Option<f64>,
    bodies: BTreeMap<Body, f64>,
    #[serde(default)]
    speeds: BTreeMap<Body, f64>,
}

fn fixed_ephemeris(path: &Path) -> anyhow::Result<FixedEphemeris> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read positions from {}", path.display()))?;
    let table: PositionTable = serde_json::from_str(&text)
        .with_context(|| format!("Invalid positions table {}", path.display()))?;
    let mut eph = FixedEphemeris::new(table.ayanamsha);
    for (body, lon) in &table.bodies {
        let speed = table.speeds.get(body).copied().unwrap_or(1.0);
        eph = eph.with_sidereal(*body, *lon, speed);
    }
    if let Some(asc) = table.ascendant {
        eph = eph.with_sidereal_ascendant(asc);
    }
    log::info!(
        "Using {} tabulated positions from {}",
        table.bodies.len(),
        path.display()
    );
    Ok(eph)
}

#[cfg(feature = "swiss")]
fn swiss_ephemeris(settings: &JyotishSettings) -> anyhow::Result<Arc<dyn Ephemeris>> {
    let adapter = jyotish::SwissEphemerisAdapter::new(settings.ephemeris.path.clone())?
        .with_ayanamsha(settings.ephemeris.ayanamsha);
    Ok(Arc::new(adapter))
}

#[cfg(not(feature = "swiss"))]
fn swiss_ephemeris(_settings: &JyotishSettings) -> anyhow::Result<Arc<dyn Ephemeris>> {
    anyhow::bail!("built without the `swiss` feature; pass --positions <FILE>")
}

fn load_rulesets(dir: &Path) -> anyhow::Result<RulesetStore> {
    let dir = jyotish_config::resolve_ruleset_dir(dir);
    RulesetStore::load_dir(&dir)
        .with_context(|| format!("Failed to load rulesets from {}", dir.display()))
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => jyotish_config::load_settings_from(path)?,
        None => jyotish_config::load_settings()?,
    };
    let ephemeris: Arc<dyn Ephemeris> = match &args.positions {
        Some(path) => Arc::new(fixed_ephemeris(path)?),
        None => swiss_ephemeris(&settings)?,
    };

    match args.command {
        Command::Chart { birth } => {
            let options = settings.chart_options();
            let service = AstroService::new(ephemeris, RulesetStore::default(), options);
            let chart = service.chart(birth).await?;
            emit(&chart, args.pretty)
        }
        Command::Match { groom, bride } => {
            let options = settings.chart_options();
            let service = AstroService::new(ephemeris, RulesetStore::default(), options);
            let result = service.compatibility(groom, bride).await?;
            emit(&result, args.pretty)
        }
        Command::Yogas {
            birth,
            rulesets,
            active_only,
            no_trace,
        } => {
            let dir = rulesets.unwrap_or_else(|| settings.yogas.ruleset_dir.clone());
            let store = load_rulesets(&dir)?;
            if store.is_empty() {
                log::warn!("No rulesets loaded from {}", dir.display());
            }
            let service = AstroService::new(ephemeris, store, settings.chart_options());
            let chart = Arc::new(service.chart(birth).await?);
            let mut results = service.yogas(chart).await;
            if active_only {
                results.retain(|r| r.is_active);
            }
            if no_trace {
                for result in &mut results {
                    result.trace.clear();
                }
            }
            emit(&results, args.pretty)
        }
    }
}
