// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::models::PrayerTimes;
use crate::{ALADHAN_BASE_URL, DIYANET_BASE_URL, MAX_RETRIES, REQUEST_TIMEOUT, RETRY_BASE_DELAY};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use config::Location;
use error::Error;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

static TIME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2}):(\d{2})").unwrap());
static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

const USER_AGENT: &str = "SalahNow CLI";

/// Extracts an `HH:MM` value from whatever the upstream sends
/// ("5:07", "05:07 (+03)", "05:07:00"). Anything without a plausible
/// hour/minute pair is rejected.
pub fn normalize_time(value: &str) -> Result<String, Error> {
  let caps = TIME_RE
    .captures(value)
    .ok_or_else(|| Error::InvalidTime(value.to_string()))?;

  let hours: u32 = caps[1]
    .parse()
    .map_err(|_| Error::InvalidTime(value.to_string()))?;
  let minutes: u32 = caps[2]
    .parse()
    .map_err(|_| Error::InvalidTime(value.to_string()))?;

  if hours > 23 || minutes > 59 {
    return Err(Error::InvalidTime(value.to_string()));
  }
  Ok(format!("{:02}:{:02}", hours, minutes))
}

/// Diyanet dates come as "30.08.2026" but the separator has varied over the
/// years, so any three numbers in day-month-year order are accepted.
pub(crate) fn parse_diyanet_date(value: &str) -> Option<NaiveDate> {
  let mut numbers = DIGITS_RE.find_iter(value);
  let day: u32 = numbers.next()?.as_str().parse().ok()?;
  let month: u32 = numbers.next()?.as_str().parse().ok()?;
  let year: i32 = numbers.next()?.as_str().parse().ok()?;
  NaiveDate::from_ymd_opt(year, month, day)
}

#[derive(Debug, Deserialize)]
struct DiyanetDay {
  #[serde(rename = "MiladiTarihKisa", default)]
  date: String,
  #[serde(rename = "Imsak", default)]
  imsak: String,
  #[serde(rename = "Gunes", default)]
  gunes: String,
  #[serde(rename = "Ogle", default)]
  ogle: String,
  #[serde(rename = "Ikindi", default)]
  ikindi: String,
  #[serde(rename = "Aksam", default)]
  aksam: String,
  #[serde(rename = "Yatsi", default)]
  yatsi: String,
}

impl DiyanetDay {
  fn to_prayer_times(&self) -> Result<PrayerTimes, Error> {
    Ok(PrayerTimes {
      fajr: normalize_time(&self.imsak)?,
      sunrise: normalize_time(&self.gunes)?,
      dhuhr: normalize_time(&self.ogle)?,
      asr: normalize_time(&self.ikindi)?,
      maghrib: normalize_time(&self.aksam)?,
      isha: normalize_time(&self.yatsi)?,
    })
  }
}

#[derive(Debug, Deserialize)]
struct AladhanResponse {
  data: AladhanData,
}

#[derive(Debug, Deserialize)]
struct AladhanData {
  timings: AladhanTimings,
  #[serde(default)]
  meta: AladhanMeta,
}

#[derive(Debug, Deserialize)]
struct AladhanTimings {
  #[serde(rename = "Fajr")]
  fajr: String,
  #[serde(rename = "Sunrise")]
  sunrise: String,
  #[serde(rename = "Dhuhr")]
  dhuhr: String,
  #[serde(rename = "Asr")]
  asr: String,
  #[serde(rename = "Maghrib")]
  maghrib: String,
  #[serde(rename = "Isha")]
  isha: String,
}

#[derive(Debug, Default, Deserialize)]
struct AladhanMeta {
  timezone: Option<String>,
}

impl AladhanTimings {
  fn to_prayer_times(&self) -> Result<PrayerTimes, Error> {
    Ok(PrayerTimes {
      fajr: normalize_time(&self.fajr)?,
      sunrise: normalize_time(&self.sunrise)?,
      dhuhr: normalize_time(&self.dhuhr)?,
      asr: normalize_time(&self.asr)?,
      maghrib: normalize_time(&self.maghrib)?,
      isha: normalize_time(&self.isha)?,
    })
  }
}

#[async_trait]
pub trait PrayerApi: Send + Sync {
  /// Prayer times for Istanbul-local today plus `days_ahead`, from the
  /// Diyanet district feed.
  async fn diyanet_day(&self, district_id: &str, days_ahead: i64) -> Result<PrayerTimes, Error>;

  /// Prayer times for today plus `days_ahead` from AlAdhan (MWL method,
  /// Hanafi school), along with the IANA zone the API reports.
  async fn aladhan_day(
    &self,
    location: &Location,
    days_ahead: i64,
  ) -> Result<(PrayerTimes, Option<String>), Error>;
}

#[derive(Debug, Clone)]
pub struct HttpPrayerApi {
  client: reqwest::Client,
  aladhan_base: String,
  diyanet_base: String,
}

impl Default for HttpPrayerApi {
  fn default() -> Self {
    Self::new()
  }
}

impl HttpPrayerApi {
  pub fn new() -> Self {
    let client = reqwest::Client::builder()
      .timeout(REQUEST_TIMEOUT)
      .user_agent(USER_AGENT)
      .build()
      .expect("Failed to create HTTP client");

    Self {
      client,
      aladhan_base: ALADHAN_BASE_URL.into(),
      diyanet_base: DIYANET_BASE_URL.into(),
    }
  }

  #[cfg(test)]
  pub fn with_base_urls(aladhan_base: &str, diyanet_base: &str) -> Self {
    let mut api = Self::new();
    api.aladhan_base = aladhan_base.to_string();
    api.diyanet_base = diyanet_base.to_string();
    api
  }

  async fn get_with_retries(&self, url: &str) -> Result<reqwest::Response, Error> {
    for attempt in 0..=MAX_RETRIES {
      match self.client.get(url).send().await {
        Ok(response) => {
          if response.status().is_server_error() && attempt < MAX_RETRIES {
            warn!(
              "Upstream returned {}, retrying (attempt {})",
              response.status(),
              attempt + 1
            );
            tokio::time::sleep(RETRY_BASE_DELAY * (attempt + 1)).await;
            continue;
          }
          return Ok(response);
        }
        Err(e) => {
          if attempt < MAX_RETRIES {
            warn!("Request failed: {}. Retrying (attempt {})", e, attempt + 1);
            tokio::time::sleep(RETRY_BASE_DELAY * (attempt + 1)).await;
            continue;
          }
          return Err(Error::HttpError(e));
        }
      }
    }
    Err(Error::ApiError("Max retry attempts reached".into()))
  }

  fn check_status(response: reqwest::Response) -> Result<reqwest::Response, Error> {
    match response.status() {
      status if status == reqwest::StatusCode::TOO_MANY_REQUESTS => Err(Error::RateLimitExceeded),
      status if !status.is_success() => {
        Err(Error::ApiError(format!("API request failed: {}", status)))
      }
      _ => Ok(response),
    }
  }

  fn istanbul_today() -> NaiveDate {
    Utc::now()
      .with_timezone(&chrono_tz::Europe::Istanbul)
      .date_naive()
  }
}

#[async_trait]
impl PrayerApi for HttpPrayerApi {
  #[instrument(skip(self))]
  async fn diyanet_day(&self, district_id: &str, days_ahead: i64) -> Result<PrayerTimes, Error> {
    let url = format!("{}/{}", self.diyanet_base, district_id);
    let response = Self::check_status(self.get_with_retries(&url).await?)?;

    // The Diyanet feed occasionally ships with a UTF-8 BOM.
    let text = response.text().await?;
    let days: Vec<DiyanetDay> = serde_json::from_str(text.trim_start_matches('\u{feff}'))
      .map_err(|e| Error::ParseError(format!("Invalid Diyanet response: {}", e)))?;

    let target = Self::istanbul_today() + Duration::days(days_ahead);
    debug!("Looking for Diyanet entry dated {}", target);

    let day = days
      .iter()
      .find(|entry| parse_diyanet_date(&entry.date) == Some(target))
      .ok_or_else(|| {
        Error::ApiError(format!("No Diyanet prayer times found for {}", target))
      })?;

    day.to_prayer_times()
  }

  #[instrument(skip(self, location), fields(city = %location.city))]
  async fn aladhan_day(
    &self,
    location: &Location,
    days_ahead: i64,
  ) -> Result<(PrayerTimes, Option<String>), Error> {
    let timestamp = (Utc::now() + Duration::days(days_ahead)).timestamp();
    let url = format!(
      "{}/timings/{}?latitude={}&longitude={}&method=3&school=1",
      self.aladhan_base, timestamp, location.lat, location.lon
    );

    let response = Self::check_status(self.get_with_retries(&url).await?)?;
    let payload: AladhanResponse = response
      .json()
      .await
      .map_err(|e| Error::ParseError(format!("Invalid AlAdhan response: {}", e)))?;

    let times = payload.data.timings.to_prayer_times()?;
    Ok((times, payload.data.meta.timezone))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use config::location::default_location;

  #[test]
  fn normalize_time_accepts_suffixed_and_unpadded_values() {
    assert_eq!(normalize_time("5:07 (+03)").unwrap(), "05:07");
    assert_eq!(normalize_time("05:07").unwrap(), "05:07");
    assert_eq!(normalize_time("23:59:59").unwrap(), "23:59");
  }

  #[test]
  fn normalize_time_rejects_garbage() {
    assert!(matches!(normalize_time(""), Err(Error::InvalidTime(_))));
    assert!(matches!(normalize_time("soon"), Err(Error::InvalidTime(_))));
    assert!(matches!(normalize_time("25:00"), Err(Error::InvalidTime(_))));
    assert!(matches!(normalize_time("12:75"), Err(Error::InvalidTime(_))));
  }

  #[test]
  fn diyanet_dates_parse_leniently() {
    let expected = NaiveDate::from_ymd_opt(2026, 8, 30);
    assert_eq!(parse_diyanet_date("30.08.2026"), expected);
    assert_eq!(parse_diyanet_date("30/08/2026"), expected);
    assert_eq!(parse_diyanet_date("not a date"), None);
    assert_eq!(parse_diyanet_date("31.02.2026"), None);
  }

  fn diyanet_body_for(dates: &[NaiveDate]) -> String {
    let entries: Vec<String> = dates
      .iter()
      .map(|d| {
        format!(
          r#"{{"MiladiTarihKisa":"{}","Imsak":"05:43","Gunes":"07:12","Ogle":"13:05","Ikindi":"16:40","Aksam":"19:48","Yatsi":"21:10"}}"#,
          d.format("%d.%m.%Y")
        )
      })
      .collect();
    format!("[{}]", entries.join(","))
  }

  #[tokio::test]
  async fn diyanet_day_selects_the_requested_date() {
    let today = HttpPrayerApi::istanbul_today();
    let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("GET", "/9541")
      .with_status(200)
      .with_body(diyanet_body_for(&[today, today + Duration::days(1)]))
      .create_async()
      .await;

    let api = HttpPrayerApi::with_base_urls("http://unused", &server.url());
    let times = api.diyanet_day("9541", 0).await.unwrap();
    assert_eq!(times.fajr, "05:43");
    assert_eq!(times.isha, "21:10");

    let tomorrow = api.diyanet_day("9541", 1).await.unwrap();
    assert_eq!(tomorrow.fajr, "05:43");
  }

  #[tokio::test]
  async fn diyanet_day_strips_a_leading_bom() {
    let today = HttpPrayerApi::istanbul_today();
    let body = format!("\u{feff}{}", diyanet_body_for(&[today]));
    let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("GET", "/9541")
      .with_status(200)
      .with_body(body)
      .create_async()
      .await;

    let api = HttpPrayerApi::with_base_urls("http://unused", &server.url());
    assert!(api.diyanet_day("9541", 0).await.is_ok());
  }

  #[tokio::test]
  async fn diyanet_day_without_matching_entry_is_an_api_error() {
    let yesterday = HttpPrayerApi::istanbul_today() - Duration::days(1);
    let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("GET", "/9541")
      .with_status(200)
      .with_body(diyanet_body_for(&[yesterday]))
      .create_async()
      .await;

    let api = HttpPrayerApi::with_base_urls("http://unused", &server.url());
    assert!(matches!(
      api.diyanet_day("9541", 0).await,
      Err(Error::ApiError(_))
    ));
  }

  #[tokio::test]
  async fn aladhan_day_parses_timings_and_timezone() {
    let body = r#"{
      "data": {
        "timings": {
          "Fajr": "05:07 (+03)",
          "Sunrise": "06:33",
          "Dhuhr": "12:44",
          "Asr": "16:12",
          "Maghrib": "18:55",
          "Isha": "20:16"
        },
        "meta": {"timezone": "Europe/London"}
      }
    }"#;
    let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("GET", mockito::Matcher::Regex("^/timings/".into()))
      .with_status(200)
      .with_body(body)
      .create_async()
      .await;

    let api = HttpPrayerApi::with_base_urls(&server.url(), "http://unused");
    let (times, zone) = api.aladhan_day(&default_location(), 0).await.unwrap();
    assert_eq!(times.fajr, "05:07");
    assert_eq!(zone.as_deref(), Some("Europe/London"));
  }

  #[tokio::test]
  async fn http_errors_surface_as_api_errors() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("GET", "/9541")
      .with_status(404)
      .create_async()
      .await;

    let api = HttpPrayerApi::with_base_urls("http://unused", &server.url());
    assert!(matches!(
      api.diyanet_day("9541", 0).await,
      Err(Error::ApiError(_))
    ));
  }

  #[tokio::test]
  async fn malformed_payload_is_a_parse_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("GET", "/9541")
      .with_status(200)
      .with_body("{\"unexpected\": true}")
      .create_async()
      .await;

    let api = HttpPrayerApi::with_base_urls("http://unused", &server.url());
    assert!(matches!(
      api.diyanet_day("9541", 0).await,
      Err(Error::ParseError(_))
    ));
  }
}
