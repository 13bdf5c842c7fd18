use std::env;
use std::path::PathBuf;

use swisseph::swe::{calc_ut, houses_ex};
use swisseph::{AscMc, Cusp};

use crate::ephemeris::ayanamsha::AyanamshaSystem;
use crate::ephemeris::oracle::{Ephemeris, EphemerisError};
use crate::ephemeris::types::{Body, BodyPosition, GeoLocation, HouseAngles};
use crate::time::normalize_degrees;

/// FLG_SWIEPH: use Swiss Ephemeris data files
const FLG_SWIEPH: i32 = 2;
/// FLG_SPEED: include daily motion in the result
const FLG_SPEED: i32 = 256;
/// FLG_SIDEREAL: apply the library's configured sidereal mode
const FLG_SIDEREAL: i32 = 64 * 1024;

/// Swiss Ephemeris body codes. The nodes use TRUE_NODE; Ketu is never
/// queried directly.
const BODY_CODES: &[(Body, i32)] = &[
    (Body::Sun, 0),
    (Body::Moon, 1),
    (Body::Mercury, 2),
    (Body::Venus, 3),
    (Body::Mars, 4),
    (Body::Jupiter, 5),
    (Body::Saturn, 6),
    (Body::Rahu, 11),
];

/// House system names accepted by `houses`, with the one-letter code
/// `houses_ex` expects.
const HOUSE_SYSTEMS: &[(&str, char)] = &[
    ("placidus", 'P'),
    ("whole_sign", 'W'),
    ("koch", 'K'),
    ("equal", 'E'),
    ("regiomontanus", 'R'),
    ("campanus", 'C'),
    ("porphyry", 'O'),
];

const DATA_DIR_ENV: &str = "SWISS_EPHEMERIS_PATH";
const DEFAULT_DATA_DIR: &str = "/usr/local/share/swisseph";

/// Oracle backed by the Swiss Ephemeris.
pub struct SwissEphemerisAdapter {
    ephemeris_path: PathBuf,
    ayanamsha: AyanamshaSystem,
}

impl SwissEphemerisAdapter {
    /// Opens the data directory given, else `$SWISS_EPHEMERIS_PATH`, else
    /// the system default.
    pub fn new(ephemeris_path: Option<PathBuf>) -> Result<Self, EphemerisError> {
        let path = data_dir(ephemeris_path)?;
        log::info!("Swiss ephemeris data at {}", path.display());
        Ok(Self {
            ephemeris_path: path,
            ayanamsha: AyanamshaSystem::default(),
        })
    }

    /// Ayanamsha model used for the manual sidereal conversion.
    pub fn with_ayanamsha(mut self, ayanamsha: AyanamshaSystem) -> Self {
        self.ayanamsha = ayanamsha;
        self
    }

    pub fn ephemeris_path(&self) -> &PathBuf {
        &self.ephemeris_path
    }

    fn body_code(body: Body, jd: f64) -> Result<i32, EphemerisError> {
        BODY_CODES
            .iter()
            .find(|(b, _)| *b == body)
            .map(|(_, code)| *code)
            .ok_or_else(|| EphemerisError::CalculationFailed {
                body: body.to_string(),
                jd,
                message: format!("No Swiss Ephemeris code for {body}"),
            })
    }

    fn calc(&self, jd: f64, body: Body, flags: i32) -> Result<BodyPosition, EphemerisError> {
        // Ketu is the point opposite the true node
        let (query, opposite) = match body {
            Body::Ketu => (Body::Rahu, true),
            other => (other, false),
        };
        let code = Self::body_code(query, jd)?;
        let result = calc_ut(jd, code as u32, flags as u32).map_err(|e| {
            EphemerisError::CalculationFailed {
                body: body.to_string(),
                jd,
                message: format!("Swiss Ephemeris error: {}", e),
            }
        })?;

        let out = result.out;
        let lon = if opposite { out[0] + 180.0 } else { out[0] };
        Ok(BodyPosition {
            lon: normalize_degrees(lon),
            lat: if opposite { -out[1] } else { out[1] },
            dist: out[2],
            speed_lon: out[3],
        })
    }
}

impl Ephemeris for SwissEphemerisAdapter {
    fn position(&self, jd_ut: f64, body: Body) -> Result<BodyPosition, EphemerisError> {
        self.calc(jd_ut, body, FLG_SWIEPH | FLG_SPEED)
    }

    fn ayanamsha(&self, jd_ut: f64) -> f64 {
        self.ayanamsha.mean_deg(jd_ut)
    }

    fn sidereal_position(&self, jd_ut: f64, body: Body) -> Result<Option<f64>, EphemerisError> {
        let position = self.calc(jd_ut, body, FLG_SWIEPH | FLG_SPEED | FLG_SIDEREAL)?;
        Ok(Some(position.lon))
    }

    fn houses(
        &self,
        jd_ut: f64,
        location: &GeoLocation,
        house_system: &str,
    ) -> Result<HouseAngles, EphemerisError> {
        let code = house_system_code(house_system)?;
        let (c, a) = houses_ex(jd_ut, FLG_SWIEPH, location.lat, location.lon, code as i32);
        let cusps = Cusp::from_array(c);
        let ascmc = AscMc::from_array(a);

        let cusp_values = [
            cusps.first, cusps.second, cusps.third, cusps.fourth,
            cusps.fifth, cusps.sixth, cusps.seventh, cusps.eighth,
            cusps.ninth, cusps.tenth, cusps.eleventh, cusps.twelfth,
        ];
        if !ascmc.ascendant.is_finite() {
            return Err(EphemerisError::HouseCalculationFailed {
                message: format!("non-finite ascendant at JD {jd_ut}"),
            });
        }

        Ok(HouseAngles {
            system: house_system.to_string(),
            cusps: cusp_values.iter().map(|c| normalize_degrees(*c)).collect(),
            ascendant: normalize_degrees(ascmc.ascendant),
            mc: normalize_degrees(ascmc.mc),
        })
    }
}

fn data_dir(explicit: Option<PathBuf>) -> Result<PathBuf, EphemerisError> {
    let (path, source) = match explicit {
        Some(path) => (path, "configured path"),
        None => match env::var_os(DATA_DIR_ENV) {
            Some(value) => (PathBuf::from(value), DATA_DIR_ENV),
            None => (PathBuf::from(DEFAULT_DATA_DIR), "default path"),
        },
    };
    if path.is_dir() {
        return Ok(path);
    }
    Err(EphemerisError::FileNotFound {
        path: path.display().to_string(),
        message: format!("no Swiss Ephemeris data directory at the {source}"),
    })
}

/// `"Whole Sign"`, `"whole-sign"` and `"whole_sign"` all name the same system.
fn house_system_code(name: &str) -> Result<char, EphemerisError> {
    let key: String = name
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect();
    match HOUSE_SYSTEMS.iter().find(|(known, _)| *known == key) {
        Some((_, code)) => Ok(*code),
        None => Err(EphemerisError::InvalidHouseSystem {
            system: name.to_string(),
            valid: HOUSE_SYSTEMS.iter().map(|(known, _)| known.to_string()).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn house_system_names_are_normalized() {
        assert_eq!(house_system_code("Placidus").unwrap(), 'P');
        assert_eq!(house_system_code("Whole Sign").unwrap(), 'W');
        assert_eq!(house_system_code(" whole-sign ").unwrap(), 'W');
        match house_system_code("topocentric") {
            Err(EphemerisError::InvalidHouseSystem { system, valid }) => {
                assert_eq!(system, "topocentric");
                assert!(valid.contains(&"porphyry".to_string()));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn configured_data_dir_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(data_dir(Some(dir.path().to_path_buf())).unwrap(), dir.path());

        let missing = dir.path().join("missing");
        match data_dir(Some(missing.clone())) {
            Err(EphemerisError::FileNotFound { path, message }) => {
                assert_eq!(path, missing.display().to_string());
                assert!(message.contains("configured path"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
