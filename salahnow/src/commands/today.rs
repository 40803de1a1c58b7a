// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::output;
use config::{cache_path, config_path, Config};
use error::Error;
use prayer::{schedule, PrayerService};

pub async fn run() -> Result<(), Error> {
  let config = Config::load(&config_path()?)?;
  let service = PrayerService::new(cache_path()?);

  let bundle = service
    .fetch_bundle(&config.location, config.prayer_source)
    .await?;
  let info = schedule::current_info(
    &bundle.times,
    Some(&bundle.tomorrow_fajr),
    bundle.time_zone.as_deref(),
  )?;

  print!(
    "{}",
    output::render_today(
      &config.location,
      &bundle.times,
      &info,
      config.time_format,
      bundle.time_zone.as_deref(),
      bundle.resolved_source,
    )
  );
  Ok(())
}
