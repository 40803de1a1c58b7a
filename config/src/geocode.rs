// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{location::nearest_location, Location, USER_AGENT};
use error::Error;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

const IP_GEOLOCATION_URL: &str = "https://ipapi.co/json/";
const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct IpGeolocation {
  latitude: f64,
  longitude: f64,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
  lat: String,
  lon: String,
  display_name: Option<String>,
  #[serde(default)]
  address: NominatimAddress,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
  city: Option<String>,
  town: Option<String>,
  village: Option<String>,
  municipality: Option<String>,
  state: Option<String>,
  country: Option<String>,
  country_code: Option<String>,
}

pub struct Geocoder {
  client: reqwest::Client,
  ip_url: String,
  nominatim_url: String,
}

impl Default for Geocoder {
  fn default() -> Self {
    Self::new()
  }
}

impl Geocoder {
  pub fn new() -> Self {
    let client = reqwest::Client::builder()
      .timeout(REQUEST_TIMEOUT)
      .user_agent(USER_AGENT)
      .build()
      .expect("Failed to create HTTP client");

    Self {
      client,
      ip_url: IP_GEOLOCATION_URL.into(),
      nominatim_url: NOMINATIM_URL.into(),
    }
  }

  #[cfg(test)]
  pub fn with_base_urls(ip_url: &str, nominatim_url: &str) -> Self {
    let mut geocoder = Self::new();
    geocoder.ip_url = ip_url.to_string();
    geocoder.nominatim_url = nominatim_url.to_string();
    geocoder
  }

  /// Detects rough coordinates from the caller's public IP and maps them to
  /// the nearest built-in city.
  pub async fn detect_from_ip(&self) -> Result<Location, Error> {
    let response = self.client.get(&self.ip_url).send().await?;
    if !response.status().is_success() {
      return Err(Error::LocationResolution(format!(
        "IP geolocation request failed: {}",
        response.status()
      )));
    }

    let geo: IpGeolocation = response
      .json()
      .await
      .map_err(|e| Error::ParseError(format!("Invalid IP geolocation response: {}", e)))?;

    debug!("IP geolocation resolved to {}, {}", geo.latitude, geo.longitude);
    Ok(nearest_location(geo.latitude, geo.longitude))
  }

  /// Free-text location search via OpenStreetMap Nominatim.
  pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Location>, Error> {
    let url = Url::parse_with_params(
      &self.nominatim_url,
      &[
        ("format", "json"),
        ("limit", &limit.to_string()),
        ("addressdetails", "1"),
        ("q", query),
      ],
    )
    .map_err(|e| Error::LocationResolution(format!("Failed to build search URL: {}", e)))?;

    let response = self.client.get(url).send().await?;
    if !response.status().is_success() {
      return Err(Error::LocationResolution(format!(
        "Geocoding request failed: {}",
        response.status()
      )));
    }

    let places: Vec<NominatimPlace> = response
      .json()
      .await
      .map_err(|e| Error::ParseError(format!("Invalid geocoding response: {}", e)))?;

    Ok(places.into_iter().filter_map(location_from_place).collect())
  }
}

fn location_from_place(place: NominatimPlace) -> Option<Location> {
  let lat: f64 = place.lat.parse().ok()?;
  let lon: f64 = place.lon.parse().ok()?;

  let address = place.address;
  let city = address
    .city
    .or(address.town)
    .or(address.village)
    .or(address.municipality)
    .or(address.state)
    .unwrap_or_else(|| "Unknown".into());
  let country = address.country.unwrap_or_else(|| "Unknown".into());
  let country_code = address
    .country_code
    .map(|code| code.to_uppercase())
    .unwrap_or_else(|| "XX".into());

  Some(Location {
    city,
    country,
    country_code,
    lat,
    lon,
    address_label: place.display_name,
    diyanet_district_id: None,
  })
}
