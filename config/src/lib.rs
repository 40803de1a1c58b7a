// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
pub mod config;
pub mod geocode;
pub mod location;

pub use config::{cache_path, config_path, Config, PrayerSource, TimeFormat};
pub use geocode::Geocoder;
pub use location::{
  default_location, nearest_in_country, nearest_location, nearest_locations, Location,
};

pub const TURKEY_COUNTRY_CODE: &str = "TR";
pub(crate) const APP_DIR: &str = "salahnow";
pub(crate) const USER_AGENT: &str = "SalahNow CLI";
