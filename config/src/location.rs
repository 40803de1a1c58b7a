// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::TURKEY_COUNTRY_CODE;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static BUILTIN_LOCATIONS: Lazy<Vec<Location>> = Lazy::new(|| {
  serde_json::from_str(include_str!("../data/locations.json"))
    .expect("built-in location table must be valid JSON")
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
  pub city: String,
  pub country: String,
  #[serde(rename = "countryCode")]
  pub country_code: String,
  pub lat: f64,
  pub lon: f64,
  #[serde(rename = "addressLabel", skip_serializing_if = "Option::is_none")]
  pub address_label: Option<String>,
  #[serde(rename = "diyanetIlceId", skip_serializing_if = "Option::is_none")]
  pub diyanet_district_id: Option<String>,
}

impl Location {
  /// Diyanet is only valid inside Türkiye; everything else uses the
  /// worldwide calculation service.
  pub fn is_turkiye(&self) -> bool {
    if self.country_code.eq_ignore_ascii_case(TURKEY_COUNTRY_CODE) {
      return true;
    }
    let country = self.country.trim().to_lowercase();
    country == "türkiye" || country == "turkiye"
  }

  pub fn label(&self) -> String {
    self
      .address_label
      .clone()
      .unwrap_or_else(|| format!("{}, {}", self.city, self.country))
  }
}

pub fn builtin_locations() -> &'static [Location] {
  &BUILTIN_LOCATIONS
}

pub fn default_location() -> Location {
  BUILTIN_LOCATIONS
    .iter()
    .find(|loc| loc.city == "İstanbul")
    .unwrap_or(&BUILTIN_LOCATIONS[0])
    .clone()
}

fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
  const EARTH_RADIUS_KM: f64 = 6371.0;
  let d_lat = (lat2 - lat1).to_radians();
  let d_lon = (lon2 - lon1).to_radians();
  let a = (d_lat / 2.0).sin().powi(2)
    + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
  let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
  EARTH_RADIUS_KM * c
}

pub fn nearest_location(lat: f64, lon: f64) -> Location {
  BUILTIN_LOCATIONS
    .iter()
    .min_by(|a, b| {
      let da = haversine_km(lat, lon, a.lat, a.lon);
      let db = haversine_km(lat, lon, b.lat, b.lon);
      da.total_cmp(&db)
    })
    .cloned()
    .unwrap_or_else(default_location)
}

pub fn nearest_in_country(lat: f64, lon: f64, country_code: &str) -> Option<Location> {
  BUILTIN_LOCATIONS
    .iter()
    .filter(|loc| loc.country_code.eq_ignore_ascii_case(country_code))
    .min_by(|a, b| {
      let da = haversine_km(lat, lon, a.lat, a.lon);
      let db = haversine_km(lat, lon, b.lat, b.lon);
      da.total_cmp(&db)
    })
    .cloned()
}

pub fn nearest_locations(lat: f64, lon: f64, limit: usize) -> Vec<Location> {
  let mut ranked: Vec<(f64, &Location)> = BUILTIN_LOCATIONS
    .iter()
    .map(|loc| (haversine_km(lat, lon, loc.lat, loc.lon), loc))
    .collect();
  ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
  ranked.into_iter().take(limit).map(|(_, loc)| loc.clone()).collect()
}
