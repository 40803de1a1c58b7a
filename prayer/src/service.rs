// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::api::{HttpPrayerApi, PrayerApi};
use crate::cache::{CacheStore, CachedBundle};
use crate::models::PrayerTimes;
use crate::DIYANET_TIME_ZONE;
use config::{nearest_in_country, Location, PrayerSource, TURKEY_COUNTRY_CODE};
use error::Error;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct PrayerBundle {
  pub times: PrayerTimes,
  pub tomorrow_fajr: String,
  pub time_zone: Option<String>,
  pub requested_source: PrayerSource,
  pub resolved_source: PrayerSource,
}

/// Diyanet is only ever used inside Türkiye; any other location is forced to
/// the worldwide MWL calculation.
pub fn resolve_source(location: &Location, requested: PrayerSource) -> PrayerSource {
  if location.is_turkiye() {
    requested
  } else {
    PrayerSource::Mwl
  }
}

/// An explicitly configured district id wins; otherwise the nearest built-in
/// Turkish city supplies one.
pub fn district_id(location: &Location) -> Option<String> {
  if let Some(id) = &location.diyanet_district_id {
    return Some(id.clone());
  }
  if !location.is_turkiye() {
    return None;
  }
  nearest_in_country(location.lat, location.lon, TURKEY_COUNTRY_CODE)?.diyanet_district_id
}

pub struct PrayerService {
  api: Box<dyn PrayerApi>,
  cache: CacheStore,
}

impl PrayerService {
  pub fn new(cache_path: PathBuf) -> Self {
    Self {
      api: Box::new(HttpPrayerApi::new()),
      cache: CacheStore::new(cache_path),
    }
  }

  #[cfg(test)]
  pub fn with_api(api: Box<dyn PrayerApi>, cache: CacheStore) -> Self {
    Self { api, cache }
  }

  /// Today's times plus tomorrow's Fajr. Order of preference: today's cache
  /// entry, live API (cached on success), then any stale cache entry once
  /// the live fetch has failed.
  #[instrument(skip(self, location), fields(city = %location.city))]
  pub async fn fetch_bundle(
    &self,
    location: &Location,
    requested: PrayerSource,
  ) -> Result<PrayerBundle, Error> {
    let resolved = resolve_source(location, requested);

    if let Some(cached) = self.cache.fresh(location, resolved) {
      info!("Serving prayer times from today's cache");
      return Ok(bundle_from_cache(cached, requested, resolved));
    }

    match self.fetch_live(location, resolved).await {
      Ok((times, tomorrow_fajr, time_zone)) => {
        if let Err(e) =
          self
            .cache
            .store(location, resolved, &times, &tomorrow_fajr, time_zone.as_deref())
        {
          warn!("Failed to write prayer cache: {}", e);
        }
        Ok(PrayerBundle {
          times,
          tomorrow_fajr,
          time_zone,
          requested_source: requested,
          resolved_source: resolved,
        })
      }
      Err(e) => {
        warn!("Live fetch failed: {}. Falling back to cached data.", e);
        match self.cache.stale(location, resolved) {
          Some(cached) => Ok(bundle_from_cache(cached, requested, resolved)),
          None => Err(e),
        }
      }
    }
  }

  async fn fetch_live(
    &self,
    location: &Location,
    source: PrayerSource,
  ) -> Result<(PrayerTimes, String, Option<String>), Error> {
    match source {
      PrayerSource::Diyanet => {
        let district = district_id(location).ok_or_else(|| {
          Error::LocationResolution("No Diyanet district id for this location".into())
        })?;
        let times = self.api.diyanet_day(&district, 0).await?;
        let tomorrow = self.api.diyanet_day(&district, 1).await?;
        Ok((times, tomorrow.fajr, Some(DIYANET_TIME_ZONE.to_string())))
      }
      PrayerSource::Mwl => {
        let (times, time_zone) = self.api.aladhan_day(location, 0).await?;
        let (tomorrow, _) = self.api.aladhan_day(location, 1).await?;
        Ok((times, tomorrow.fajr, time_zone))
      }
    }
  }
}

fn bundle_from_cache(
  cached: CachedBundle,
  requested: PrayerSource,
  resolved: PrayerSource,
) -> PrayerBundle {
  PrayerBundle {
    times: cached.times,
    tomorrow_fajr: cached.tomorrow_fajr,
    time_zone: cached.time_zone,
    requested_source: requested,
    resolved_source: resolved,
  }
}
