// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
pub mod daemon;
pub mod system;

pub use daemon::NotifyDaemon;
pub use system::send_system_notification;

pub(crate) const NOTIFICATION_TITLE: &str = "SalahNow";
pub(crate) const RETRY_AFTER_ERROR: std::time::Duration = std::time::Duration::from_secs(60);
pub(crate) const POST_NOTIFY_PAUSE: std::time::Duration = std::time::Duration::from_secs(2);
