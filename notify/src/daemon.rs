// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{send_system_notification, NOTIFICATION_TITLE, POST_NOTIFY_PAUSE, RETRY_AFTER_ERROR};
use config::{Config, Location, PrayerSource, TimeFormat};
use error::Error;
use prayer::{format_time_for_display, schedule, PrayerService};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Indefinite notification loop: sleep until the next prayer, notify,
/// recompute, repeat. No state survives a restart; cancellation is process
/// termination.
pub struct NotifyDaemon {
  service: PrayerService,
  location: Location,
  source: PrayerSource,
  time_format: TimeFormat,
}

impl NotifyDaemon {
  pub fn new(service: PrayerService, config: &Config) -> Self {
    Self {
      service,
      location: config.location.clone(),
      source: config.prayer_source,
      time_format: config.time_format,
    }
  }

  #[instrument(skip(self), fields(city = %self.location.city))]
  pub async fn run(&self) -> Result<(), Error> {
    println!("Notification daemon started. Press Ctrl+C to stop.");

    loop {
      let bundle = match self.service.fetch_bundle(&self.location, self.source).await {
        Ok(bundle) => bundle,
        Err(e) => {
          warn!("Prayer API error: {}. Retrying in 60 seconds.", e);
          tokio::time::sleep(RETRY_AFTER_ERROR).await;
          continue;
        }
      };

      let info = match schedule::current_info(
        &bundle.times,
        Some(&bundle.tomorrow_fajr),
        bundle.time_zone.as_deref(),
      ) {
        Ok(info) => info,
        Err(e) => {
          warn!("Unusable prayer times: {}. Retrying in 60 seconds.", e);
          tokio::time::sleep(RETRY_AFTER_ERROR).await;
          continue;
        }
      };

      let wait = info
        .until_next
        .to_std()
        .unwrap_or_default()
        .max(Duration::from_secs(1));
      let next_display = format_time_for_display(&info.next_prayer_time, self.time_format);
      info!("Waiting for {} at {} ({}s)", info.next_prayer, next_display, wait.as_secs());
      println!("Waiting for {} at {}.", info.next_prayer, next_display);
      tokio::time::sleep(wait).await;

      let message = format!("It's time for {} ({})", info.next_prayer, next_display);
      if !send_system_notification(NOTIFICATION_TITLE, &message) {
        println!("{}", message);
      }

      // Short pause so small clock drifts don't re-trigger the same prayer.
      tokio::time::sleep(POST_NOTIFY_PAUSE).await;
    }
  }
}
