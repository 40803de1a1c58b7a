// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use std::process::{Command, Stdio};
use tracing::debug;

/// AppleScript source for a banner notification. Title and body are embedded
/// as JSON string literals, which AppleScript accepts for double-quoted text.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn applescript_payload(title: &str, body: &str) -> String {
  format!(
    "display notification {} with title {}",
    serde_json::to_string(body).unwrap_or_else(|_| "\"\"".into()),
    serde_json::to_string(title).unwrap_or_else(|_| "\"\"".into()),
  )
}

fn run_silent(command: &str, args: &[&str]) -> bool {
  Command::new(command)
    .args(args)
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .status()
    .map(|status| status.success())
    .unwrap_or(false)
}

/// Delegates to the platform notification command. Returns false when no
/// notifier is available so the caller can fall back to plain output.
pub fn send_system_notification(title: &str, body: &str) -> bool {
  #[cfg(target_os = "macos")]
  {
    let script = applescript_payload(title, body);
    return run_silent("osascript", &["-e", &script]);
  }

  #[cfg(target_os = "linux")]
  {
    return run_silent("notify-send", &[title, body]);
  }

  #[allow(unreachable_code)]
  {
    debug!("No system notifier on this platform ({} / {})", title, body);
    false
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn applescript_payload_quotes_safely() {
    let script = applescript_payload("SalahNow", "It's time for \"Fajr\" (05:43)");
    assert_eq!(
      script,
      r#"display notification "It's time for \"Fajr\" (05:43)" with title "SalahNow""#
    );
  }
}
