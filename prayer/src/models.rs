// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrayerName {
  Fajr,
  Sunrise,
  Dhuhr,
  Asr,
  Maghrib,
  Isha,
}

impl PrayerName {
  /// Chronological order within a day.
  pub const ALL: [PrayerName; 6] = [
    PrayerName::Fajr,
    PrayerName::Sunrise,
    PrayerName::Dhuhr,
    PrayerName::Asr,
    PrayerName::Maghrib,
    PrayerName::Isha,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      PrayerName::Fajr => "Fajr",
      PrayerName::Sunrise => "Sunrise",
      PrayerName::Dhuhr => "Dhuhr",
      PrayerName::Asr => "Asr",
      PrayerName::Maghrib => "Maghrib",
      PrayerName::Isha => "Isha",
    }
  }
}

impl std::fmt::Display for PrayerName {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// One day's prayer times, each as a normalized `HH:MM` string. Field names
/// on the wire match the cache format of previous releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerTimes {
  #[serde(rename = "Fajr")]
  pub fajr: String,
  #[serde(rename = "Sunrise")]
  pub sunrise: String,
  #[serde(rename = "Dhuhr")]
  pub dhuhr: String,
  #[serde(rename = "Asr")]
  pub asr: String,
  #[serde(rename = "Maghrib")]
  pub maghrib: String,
  #[serde(rename = "Isha")]
  pub isha: String,
}

impl PrayerTimes {
  pub fn get(&self, name: PrayerName) -> &str {
    match name {
      PrayerName::Fajr => &self.fajr,
      PrayerName::Sunrise => &self.sunrise,
      PrayerName::Dhuhr => &self.dhuhr,
      PrayerName::Asr => &self.asr,
      PrayerName::Maghrib => &self.maghrib,
      PrayerName::Isha => &self.isha,
    }
  }
}
