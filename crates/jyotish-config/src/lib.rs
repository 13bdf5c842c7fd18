use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use jyotish::ephemeris::{AyanamshaSystem, Body};
use jyotish::ChartOptions;

pub const CONFIG_PATHS: [&str; 2] = ["configs/jyotish.toml", "../../configs/jyotish.toml"];
pub const DEFAULT_RULESET_DIR: &str = "rulesets/yogas";

#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisSettings {
    /// Swiss Ephemeris data directory; the adapter falls back to
    /// `SWISS_EPHEMERIS_PATH` when unset.
    pub path: Option<PathBuf>,
    pub ayanamsha: AyanamshaSystem,
    pub house_system: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSettings {
    pub bodies: Vec<Body>,
    pub dasha_horizon_years: f64,
}

impl ChartSettings {
    pub fn chart_options(&self, house_system: &str) -> ChartOptions {
        ChartOptions {
            bodies: self.bodies.clone(),
            house_system: house_system.to_string(),
            dasha_horizon_years: self.dasha_horizon_years,
            now_jd: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct YogaSettings {
    pub ruleset_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JyotishSettings {
    pub ephemeris: EphemerisSettings,
    pub chart: ChartSettings,
    pub yogas: YogaSettings,
}

impl JyotishSettings {
    pub fn chart_options(&self) -> ChartOptions {
        self.chart.chart_options(&self.ephemeris.house_system)
    }
}

impl Default for JyotishSettings {
    fn default() -> Self {
        Self {
            ephemeris: EphemerisSettings {
                path: None,
                ayanamsha: AyanamshaSystem::default(),
                house_system: "placidus".to_string(),
            },
            chart: ChartSettings {
                bodies: Body::ALL.to_vec(),
                dasha_horizon_years: 100.0,
            },
            yogas: YogaSettings {
                ruleset_dir: PathBuf::from(DEFAULT_RULESET_DIR),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct EphemerisToml {
    path: Option<PathBuf>,
    ayanamsha: String,
    house_system: String,
}

impl Default for EphemerisToml {
    fn default() -> Self {
        Self {
            path: None,
            ayanamsha: "lahiri".to_string(),
            house_system: "placidus".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct ChartToml {
    bodies: Option<Vec<String>>,
    dasha_horizon_years: f64,
}

impl Default for ChartToml {
    fn default() -> Self {
        Self {
            bodies: None,
            dasha_horizon_years: 100.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct YogasToml {
    ruleset_dir: PathBuf,
}

impl Default for YogasToml {
    fn default() -> Self {
        Self {
            ruleset_dir: PathBuf::from(DEFAULT_RULESET_DIR),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RootConfigToml {
    ephemeris: EphemerisToml,
    chart: ChartToml,
    yogas: YogasToml,
}

/// Try the common relative paths for `configs/jyotish.toml`. `None` when no
/// candidate exists.
pub fn read_config_toml_text() -> Option<(PathBuf, String)> {
    for p in &CONFIG_PATHS {
        if let Ok(c) = fs::read_to_string(p) {
            return Some((PathBuf::from(p), c));
        }
    }
    None
}

pub fn parse_settings(text: &str) -> anyhow::Result<JyotishSettings> {
    let root: RootConfigToml =
        toml::from_str(text).map_err(|e| anyhow::anyhow!("Failed to parse jyotish.toml: {e}"))?;
    build(root)
}

fn build(root: RootConfigToml) -> anyhow::Result<JyotishSettings> {
    let RootConfigToml {
        ephemeris,
        chart,
        yogas,
    } = root;

    let ayanamsha: AyanamshaSystem = ephemeris
        .ayanamsha
        .parse()
        .map_err(|e: String| anyhow::anyhow!("ephemeris.ayanamsha: {e}"))?;
    if ephemeris.house_system.trim().is_empty() {
        anyhow::bail!("ephemeris.house_system must not be empty");
    }

    let bodies = match chart.bodies {
        None => Body::ALL.to_vec(),
        Some(names) => {
            let mut bodies = Vec::with_capacity(names.len());
            for name in &names {
                let body: Body = name
                    .parse()
                    .map_err(|e| anyhow::anyhow!("chart.bodies: {e}"))?;
                if !bodies.contains(&body) {
                    bodies.push(body);
                }
            }
            bodies
        }
    };
    if !chart.dasha_horizon_years.is_finite() || chart.dasha_horizon_years < 0.0 {
        anyhow::bail!(
            "chart.dasha_horizon_years must be a non-negative number, got {}",
            chart.dasha_horizon_years
        );
    }

    Ok(JyotishSettings {
        ephemeris: EphemerisSettings {
            path: ephemeris.path,
            ayanamsha,
            house_system: ephemeris.house_system,
        },
        chart: ChartSettings {
            bodies,
            dasha_horizon_years: chart.dasha_horizon_years,
        },
        yogas: YogaSettings {
            ruleset_dir: yogas.ruleset_dir,
        },
    })
}

/// Settings from an explicit file. A missing file means defaults.
pub fn load_settings_from(path: &Path) -> anyhow::Result<JyotishSettings> {
    match fs::read_to_string(path) {
        Ok(text) => {
            log::info!("Loading settings from {}", path.display());
            parse_settings(&text)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("{} not found, using defaults", path.display());
            Ok(JyotishSettings::default())
        }
        Err(e) => anyhow::bail!("Failed to read {}: {e}", path.display()),
    }
}

/// Settings from the first of [`CONFIG_PATHS`] that exists, else defaults.
pub fn load_settings() -> anyhow::Result<JyotishSettings> {
    match read_config_toml_text() {
        Some((path, text)) => {
            log::info!("Loading settings from {}", path.display());
            parse_settings(&text)
        }
        None => {
            log::info!("No jyotish.toml found in {:?}, using defaults", CONFIG_PATHS);
            Ok(JyotishSettings::default())
        }
    }
}

/// Matches the config lookup: a relative ruleset dir is tried as given and
/// then from two levels up.
pub fn resolve_ruleset_dir(dir: &Path) -> PathBuf {
    if dir.is_absolute() || dir.exists() {
        return dir.to_path_buf();
    }
    let fallback = Path::new("../..").join(dir);
    if fallback.exists() {
        return fallback;
    }
    dir.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let settings = parse_settings("").unwrap();
        assert_eq!(settings, JyotishSettings::default());
        assert_eq!(settings.ephemeris.ayanamsha, AyanamshaSystem::Lahiri);
        assert_eq!(settings.ephemeris.house_system, "placidus");
        assert_eq!(settings.chart.bodies.len(), 9);
        assert_eq!(settings.chart.dasha_horizon_years, 100.0);
        assert_eq!(settings.yogas.ruleset_dir, PathBuf::from("rulesets/yogas"));
    }

    #[test]
    fn sections_override_defaults() {
        let settings = parse_settings(
            r#"
            [ephemeris]
            path = "/opt/ephe"
            ayanamsha = "kp"

            [chart]
            bodies = ["Sun", "Moon", "Moon"]
            dasha_horizon_years = 80.0

            [yogas]
            ruleset_dir = "/srv/yogas"
            "#,
        )
        .unwrap();
        assert_eq!(settings.ephemeris.path, Some(PathBuf::from("/opt/ephe")));
        assert_eq!(settings.ephemeris.ayanamsha, AyanamshaSystem::Krishnamurti);
        assert_eq!(settings.chart.bodies, vec![Body::Sun, Body::Moon]);

        let options = settings.chart_options();
        assert_eq!(options.dasha_horizon_years, 80.0);
        assert_eq!(options.house_system, "placidus");
        assert!(options.now_jd.is_none());
    }

    #[test]
    fn bad_values_are_errors() {
        assert!(parse_settings("[ephemeris]\nayanamsha = \"galactic\"").is_err());
        assert!(parse_settings("[chart]\nbodies = [\"Pluto\"]").is_err());
        assert!(parse_settings("[chart]\ndasha_horizon_years = -1.0").is_err());
        assert!(parse_settings("[chart\nbodies = 3").is_err());
    }

    #[test]
    fn missing_file_uses_defaults_and_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load_settings_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(missing, JyotishSettings::default());

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "ephemeris = [").unwrap();
        assert!(load_settings_from(&broken).is_err());
    }
}
