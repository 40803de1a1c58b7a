// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
pub mod api;
pub mod cache;
pub mod models;
pub mod schedule;
pub mod service;

pub use api::{HttpPrayerApi, PrayerApi};
pub use cache::{CacheStore, CachedBundle};
pub use models::{PrayerName, PrayerTimes};
pub use schedule::{format_countdown, format_time_for_display, CurrentInfo};
pub use service::{resolve_source, PrayerBundle, PrayerService};

pub(crate) const ALADHAN_BASE_URL: &str = "https://api.aladhan.com/v1";
pub(crate) const DIYANET_BASE_URL: &str = "https://ezanvakti.emushaf.net/vakitler";
pub const DIYANET_TIME_ZONE: &str = "Europe/Istanbul";
pub(crate) const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(20);
pub(crate) const MAX_RETRIES: u32 = 2;
pub(crate) const RETRY_BASE_DELAY: std::time::Duration = std::time::Duration::from_millis(800);
