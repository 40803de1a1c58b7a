// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{location::default_location, Location, APP_DIR};
use error::Error;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerSource {
  Diyanet,
  Mwl,
}

impl Default for PrayerSource {
  fn default() -> Self {
    PrayerSource::Diyanet
  }
}

impl std::fmt::Display for PrayerSource {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      PrayerSource::Diyanet => write!(f, "diyanet"),
      PrayerSource::Mwl => write!(f, "mwl"),
    }
  }
}

impl FromStr for PrayerSource {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "diyanet" => Ok(PrayerSource::Diyanet),
      "mwl" => Ok(PrayerSource::Mwl),
      other => Err(Error::ConfigError(format!(
        "method must be either 'diyanet' or 'mwl', got '{}'",
        other
      ))),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFormat {
  #[serde(rename = "12h")]
  H12,
  #[serde(rename = "24h")]
  H24,
}

impl Default for TimeFormat {
  fn default() -> Self {
    TimeFormat::H24
  }
}

impl std::fmt::Display for TimeFormat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      TimeFormat::H12 => write!(f, "12h"),
      TimeFormat::H24 => write!(f, "24h"),
    }
  }
}

impl FromStr for TimeFormat {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "12h" => Ok(TimeFormat::H12),
      "24h" => Ok(TimeFormat::H24),
      other => Err(Error::ConfigError(format!(
        "time format must be either '12h' or '24h', got '{}'",
        other
      ))),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
  #[serde(default = "default_location")]
  pub location: Location,
  #[serde(default)]
  pub prayer_source: PrayerSource,
  #[serde(default)]
  pub time_format: TimeFormat,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      location: default_location(),
      prayer_source: PrayerSource::default(),
      time_format: TimeFormat::default(),
    }
  }
}

impl Config {
  /// Loads the configuration, seeding the file with defaults when it does
  /// not exist yet. A file that exists but cannot be parsed is an error;
  /// the user has to fix or re-run `config` rather than lose their edits.
  pub fn load(path: &Path) -> Result<Self, Error> {
    if !path.exists() {
      let config = Config::default();
      config.save(path)?;
      return Ok(config);
    }

    let content = fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content).map_err(|e| {
      Error::ConfigError(format!(
        "Malformed config file {}: {}. Run `salahnow config` to rewrite it.",
        path.display(),
        e
      ))
    })?;
    debug!("Loaded configuration from {}", path.display());
    Ok(config)
  }

  pub fn save(&self, path: &Path) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }

    let mut content = serde_json::to_string_pretty(self)?;
    content.push('\n');

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, &content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
  }
}

pub fn config_path() -> Result<PathBuf, Error> {
  dirs::config_dir()
    .map(|dir| dir.join(APP_DIR).join("config.json"))
    .ok_or_else(|| Error::ConfigError("Could not determine user config directory".into()))
}

pub fn cache_path() -> Result<PathBuf, Error> {
  dirs::cache_dir()
    .map(|dir| dir.join(APP_DIR).join("prayer_cache.json"))
    .ok_or_else(|| Error::ConfigError("Could not determine user cache directory".into()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn save_then_load_roundtrips_every_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let config = Config {
      location: Location {
        city: "Ankara".into(),
        country: "Türkiye".into(),
        country_code: "TR".into(),
        lat: 39.9334,
        lon: 32.8597,
        address_label: Some("Ankara, Türkiye".into()),
        diyanet_district_id: Some("9206".into()),
      },
      prayer_source: PrayerSource::Diyanet,
      time_format: TimeFormat::H12,
    };

    config.save(&path).unwrap();
    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded, config);
  }

  #[test]
  fn missing_file_seeds_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let config = Config::load(&path).unwrap();
    assert_eq!(config, Config::default());
    assert!(path.exists());
  }

  #[test]
  fn malformed_file_is_an_error_and_left_intact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{not json").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, Error::ConfigError(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), "{not json");
  }

  #[test]
  fn partial_file_fills_in_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"time_format": "12h"}"#).unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.time_format, TimeFormat::H12);
    assert_eq!(config.prayer_source, PrayerSource::Diyanet);
    assert_eq!(config.location, default_location());
  }

  #[test]
  fn enums_use_wire_spellings() {
    assert_eq!(
      serde_json::to_string(&PrayerSource::Mwl).unwrap(),
      "\"mwl\""
    );
    assert_eq!(serde_json::to_string(&TimeFormat::H24).unwrap(), "\"24h\"");
    assert_eq!("12h".parse::<TimeFormat>().unwrap(), TimeFormat::H12);
    assert!("15h".parse::<TimeFormat>().is_err());
  }
}
