// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::models::PrayerTimes;
use crate::DIYANET_TIME_ZONE;
use chrono::{Local, Utc};
use chrono_tz::Tz;
use config::{Location, PrayerSource};
use error::Error;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

/// One cached day of prayer times for a location/source pair. Only ever
/// consulted when the live fetch cannot serve today's data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedBundle {
  pub times: PrayerTimes,
  pub tomorrow_fajr: String,
  pub time_zone: Option<String>,
  pub date: String,
  pub fetched_at: String,
}

pub struct CacheStore {
  path: PathBuf,
}

impl CacheStore {
  pub fn new(path: PathBuf) -> Self {
    Self { path }
  }

  fn key(location: &Location, source: PrayerSource) -> String {
    format!(
      "{}-{}-{:.5}-{:.5}-{}",
      location.city, location.country_code, location.lat, location.lon, source
    )
  }

  /// A cache that cannot be read or parsed is treated as empty. Individual
  /// entries that fail to parse are skipped, not fatal.
  fn read_all(&self) -> HashMap<String, serde_json::Value> {
    let Ok(raw) = fs::read_to_string(&self.path) else {
      return HashMap::new();
    };
    serde_json::from_str(&raw).unwrap_or_default()
  }

  fn entry(&self, location: &Location, source: PrayerSource) -> Option<CachedBundle> {
    let mut data = self.read_all();
    let value = data.remove(&Self::key(location, source))?;
    serde_json::from_value(value).ok()
  }

  /// Returns the cached entry only when it is stamped with today's date in
  /// the entry's own time zone.
  pub fn fresh(&self, location: &Location, source: PrayerSource) -> Option<CachedBundle> {
    let entry = self.entry(location, source)?;
    let expected = date_in_zone(entry.time_zone.as_deref(), source);
    if entry.date == expected {
      Some(entry)
    } else {
      None
    }
  }

  /// Returns the cached entry regardless of its date. Last resort when the
  /// network is down.
  pub fn stale(&self, location: &Location, source: PrayerSource) -> Option<CachedBundle> {
    self.entry(location, source)
  }

  pub fn store(
    &self,
    location: &Location,
    source: PrayerSource,
    times: &PrayerTimes,
    tomorrow_fajr: &str,
    time_zone: Option<&str>,
  ) -> Result<(), Error> {
    let mut data = self.read_all();

    let bundle = CachedBundle {
      times: times.clone(),
      tomorrow_fajr: tomorrow_fajr.to_string(),
      time_zone: time_zone.map(String::from),
      date: date_in_zone(time_zone, source),
      fetched_at: Local::now().to_rfc3339(),
    };
    data.insert(Self::key(location, source), serde_json::to_value(&bundle)?);

    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent)?;
    }
    let mut content = serde_json::to_string_pretty(&data)?;
    content.push('\n');

    let temp_path = self.path.with_extension("tmp");
    fs::write(&temp_path, &content)?;
    fs::rename(&temp_path, &self.path)?;
    debug!("Cached prayer times at {}", self.path.display());
    Ok(())
  }
}

/// Today's date string as seen from the entry's zone. Diyanet data is always
/// Istanbul-local; anything else without an explicit zone uses local time.
fn date_in_zone(time_zone: Option<&str>, source: PrayerSource) -> String {
  if let Some(zone) = time_zone {
    if let Ok(tz) = Tz::from_str(zone) {
      return Utc::now().with_timezone(&tz).date_naive().to_string();
    }
  }
  if source == PrayerSource::Diyanet {
    if let Ok(tz) = Tz::from_str(DIYANET_TIME_ZONE) {
      return Utc::now().with_timezone(&tz).date_naive().to_string();
    }
  }
  Local::now().date_naive().to_string()
}

#[cfg(test)]
mod tests {
  use super::*;
  use config::location::default_location;

  fn sample_times() -> PrayerTimes {
    PrayerTimes {
      fajr: "06:22".into(),
      sunrise: "07:48".into(),
      dhuhr: "13:23".into(),
      asr: "16:19".into(),
      maghrib: "18:48".into(),
      isha: "20:08".into(),
    }
  }

  #[test]
  fn store_then_fresh_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let store = CacheStore::new(dir.path().join("prayer_cache.json"));
    let location = default_location();

    store
      .store(
        &location,
        PrayerSource::Diyanet,
        &sample_times(),
        "06:21",
        Some("Europe/Istanbul"),
      )
      .unwrap();

    let fresh = store.fresh(&location, PrayerSource::Diyanet).unwrap();
    assert_eq!(fresh.times.isha, "20:08");
    assert_eq!(fresh.tomorrow_fajr, "06:21");
    assert_eq!(fresh.time_zone.as_deref(), Some("Europe/Istanbul"));
  }

  #[test]
  fn entries_are_keyed_by_source() {
    let dir = tempfile::tempdir().unwrap();
    let store = CacheStore::new(dir.path().join("prayer_cache.json"));
    let location = default_location();

    store
      .store(&location, PrayerSource::Mwl, &sample_times(), "06:21", None)
      .unwrap();

    assert!(store.fresh(&location, PrayerSource::Mwl).is_some());
    assert!(store.fresh(&location, PrayerSource::Diyanet).is_none());
  }

  #[test]
  fn outdated_entry_is_stale_but_not_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prayer_cache.json");
    let store = CacheStore::new(path.clone());
    let location = default_location();

    store
      .store(
        &location,
        PrayerSource::Diyanet,
        &sample_times(),
        "06:21",
        Some("Europe/Istanbul"),
      )
      .unwrap();

    // Age the entry by rewriting its date stamp.
    let mut data: HashMap<String, serde_json::Value> =
      serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    for value in data.values_mut() {
      value["date"] = serde_json::Value::String("2000-01-01".into());
    }
    fs::write(&path, serde_json::to_string(&data).unwrap()).unwrap();

    assert!(store.fresh(&location, PrayerSource::Diyanet).is_none());
    let stale = store.stale(&location, PrayerSource::Diyanet).unwrap();
    assert_eq!(stale.times.maghrib, "18:48");
  }

  #[test]
  fn corrupt_cache_file_reads_as_empty_and_is_recoverable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prayer_cache.json");
    fs::write(&path, "{broken").unwrap();
    let store = CacheStore::new(path);
    let location = default_location();

    assert!(store.stale(&location, PrayerSource::Diyanet).is_none());

    store
      .store(&location, PrayerSource::Diyanet, &sample_times(), "06:21", None)
      .unwrap();
    assert!(store.fresh(&location, PrayerSource::Diyanet).is_some());
  }

  #[test]
  fn unparsable_entry_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prayer_cache.json");
    let location = default_location();
    let key = CacheStore::key(&location, PrayerSource::Diyanet);
    fs::write(&path, format!(r#"{{"{}": {{"times": 42}}}}"#, key)).unwrap();

    let store = CacheStore::new(path);
    assert!(store.stale(&location, PrayerSource::Diyanet).is_none());
  }
}
