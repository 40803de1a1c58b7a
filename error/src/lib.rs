// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
  #[error("API error: {0}")]
  ApiError(String),
  #[error("Configuration error: {0}")]
  ConfigError(String),
  #[error("IO error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("HTTP error: {0}")]
  HttpError(#[from] reqwest::Error),
  #[error("JSON error: {0}")]
  JsonError(#[from] serde_json::Error),
  #[error("Failed to parse response: {0}")]
  ParseError(String),
  #[error("Invalid time value: {0}")]
  InvalidTime(String),
  #[error("Coordinates out of range (lat must be within ±90, lon within ±180)")]
  InvalidCoordinates,
  #[error("Failed to resolve location: {0}")]
  LocationResolution(String),
  #[error("Rate limit exceeded")]
  RateLimitExceeded,
}
