// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use config::{Location, PrayerSource, TimeFormat};
use prayer::schedule::{self, CurrentInfo};
use prayer::{format_countdown, format_time_for_display, PrayerName, PrayerTimes};

pub fn source_label(source: PrayerSource) -> &'static str {
  match source {
    PrayerSource::Diyanet => "Diyanet",
    PrayerSource::Mwl => "Muslim World League (AlAdhan)",
  }
}

/// Full day view: header, one row per prayer with the next one marked, and
/// a countdown footer.
pub fn render_today(
  location: &Location,
  times: &PrayerTimes,
  info: &CurrentInfo,
  time_format: TimeFormat,
  time_zone: Option<&str>,
  source: PrayerSource,
) -> String {
  let mut out = String::new();

  out.push_str(&format!("{}, {}\n", location.city, location.country));
  out.push_str(&format!("Source: {}\n", source_label(source)));
  if let Some(zone) = time_zone {
    let now = schedule::zone_now(Some(zone));
    out.push_str(&format!(
      "Timezone: {} (local there {})\n",
      zone,
      now.format("%H:%M:%S")
    ));
  }
  out.push('\n');

  for &name in &PrayerName::ALL {
    let is_next = name == info.next_prayer;
    let marker = if is_next { "→" } else { " " };
    let label = if is_next && info.after_isha && name == PrayerName::Fajr {
      "Fajr (tomorrow)".to_string()
    } else {
      name.to_string()
    };
    let display = format_time_for_display(times.get(name), time_format);
    out.push_str(&format!("  {} {:<16} {:>8}\n", marker, label, display));
  }

  out.push('\n');
  out.push_str(&format!(
    "Next: {} at {} (in {})\n",
    info.next_prayer,
    format_time_for_display(&info.next_prayer_time, time_format),
    format_countdown(info.until_next)
  ));
  out
}

/// Multi-line snapshot for `next --once`.
pub fn render_next(
  location: &Location,
  info: &CurrentInfo,
  time_format: TimeFormat,
  source: PrayerSource,
) -> String {
  format!(
    "Location: {}, {}\nSource: {}\nNext prayer: {}\nAt: {}\nCountdown: {}",
    location.city,
    location.country,
    source_label(source),
    info.next_prayer,
    format_time_for_display(&info.next_prayer_time, time_format),
    format_countdown(info.until_next)
  )
}

/// Single line for the in-place live countdown.
pub fn next_line(info: &CurrentInfo, time_format: TimeFormat) -> String {
  format!(
    "Next: {} at {} in {}",
    info.next_prayer,
    format_time_for_display(&info.next_prayer_time, time_format),
    format_countdown(info.until_next)
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;
  use config::location::default_location;
  use prayer::schedule::current_info_at;

  fn sample_times() -> PrayerTimes {
    PrayerTimes {
      fajr: "05:00".into(),
      sunrise: "06:30".into(),
      dhuhr: "12:15".into(),
      asr: "15:45".into(),
      maghrib: "18:20".into(),
      isha: "19:45".into(),
    }
  }

  fn info_at(h: u32, m: u32) -> CurrentInfo {
    let now = NaiveDate::from_ymd_opt(2026, 8, 28)
      .unwrap()
      .and_hms_opt(h, m, 0)
      .unwrap();
    current_info_at(&sample_times(), Some("05:01"), now).unwrap()
  }

  #[test]
  fn today_view_marks_the_next_prayer() {
    let rendered = render_today(
      &default_location(),
      &sample_times(),
      &info_at(14, 0),
      TimeFormat::H24,
      None,
      PrayerSource::Diyanet,
    );
    assert!(rendered.contains("İstanbul, Türkiye"));
    assert!(rendered.contains("Source: Diyanet"));
    assert!(rendered.contains("→ Asr"));
    assert!(rendered.contains("Next: Asr at 15:45 (in 01:45:00)"));
  }

  #[test]
  fn today_view_labels_tomorrows_fajr_after_isha() {
    let rendered = render_today(
      &default_location(),
      &sample_times(),
      &info_at(21, 0),
      TimeFormat::H24,
      None,
      PrayerSource::Diyanet,
    );
    assert!(rendered.contains("Fajr (tomorrow)"));
    assert!(rendered.contains("Next: Fajr at 05:01"));
  }

  #[test]
  fn twelve_hour_format_applies_to_all_rows() {
    let rendered = render_today(
      &default_location(),
      &sample_times(),
      &info_at(14, 0),
      TimeFormat::H12,
      None,
      PrayerSource::Mwl,
    );
    assert!(rendered.contains("Muslim World League (AlAdhan)"));
    assert!(rendered.contains("12:15 PM"));
    assert!(rendered.contains("3:45 PM"));
  }

  #[test]
  fn next_line_is_compact() {
    assert_eq!(
      next_line(&info_at(14, 0), TimeFormat::H24),
      "Next: Asr at 15:45 in 01:45:00"
    );
  }
}
