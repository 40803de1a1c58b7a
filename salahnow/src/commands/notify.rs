// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use config::{cache_path, config_path, Config};
use error::Error;
use notify::NotifyDaemon;
use prayer::PrayerService;

pub async fn run() -> Result<(), Error> {
  let config = Config::load(&config_path()?)?;
  let service = PrayerService::new(cache_path()?);
  NotifyDaemon::new(service, &config).run().await
}
