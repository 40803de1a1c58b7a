// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::output;
use chrono::Duration;
use config::{cache_path, config_path, Config};
use error::Error;
use prayer::{schedule, PrayerService};
use std::io::{self, Write};

pub async fn run(once: bool) -> Result<(), Error> {
  let config = Config::load(&config_path()?)?;
  let service = PrayerService::new(cache_path()?);

  let mut bundle = service
    .fetch_bundle(&config.location, config.prayer_source)
    .await?;

  if once {
    let info = schedule::current_info(
      &bundle.times,
      Some(&bundle.tomorrow_fajr),
      bundle.time_zone.as_deref(),
    )?;
    println!(
      "{}",
      output::render_next(&config.location, &info, config.time_format, bundle.resolved_source)
    );
    return Ok(());
  }

  // In-place countdown, one redraw per second. Ctrl+C terminates the
  // process; when the countdown hits zero the bundle is refetched so the
  // loop rolls over to the following prayer.
  loop {
    let info = schedule::current_info(
      &bundle.times,
      Some(&bundle.tomorrow_fajr),
      bundle.time_zone.as_deref(),
    )?;

    print!("\r{}\x1b[K", output::next_line(&info, config.time_format));
    io::stdout().flush()?;

    if info.until_next <= Duration::seconds(1) {
      println!("\nIt's time for {}.", info.next_prayer);
      if let Ok(fresh) = service
        .fetch_bundle(&config.location, config.prayer_source)
        .await
      {
        bundle = fresh;
      }
    }

    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
  }
}
