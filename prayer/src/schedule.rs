// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::models::{PrayerName, PrayerTimes};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use config::TimeFormat;
use error::Error;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct PrayerPoint {
  pub name: PrayerName,
  pub time: String,
  pub at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct CurrentInfo {
  pub current_prayer: PrayerName,
  pub next_prayer: PrayerName,
  pub next_prayer_time: String,
  pub until_next: Duration,
  /// True once today's Isha has passed; the next prayer is then tomorrow's
  /// Fajr.
  pub after_isha: bool,
}

fn parse_hhmm(value: &str) -> Result<NaiveTime, Error> {
  NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| Error::InvalidTime(value.to_string()))
}

fn time_on(date: NaiveDate, time: &str) -> Result<NaiveDateTime, Error> {
  Ok(date.and_time(parse_hhmm(time)?))
}

pub fn prayer_points(times: &PrayerTimes, date: NaiveDate) -> Result<Vec<PrayerPoint>, Error> {
  PrayerName::ALL
    .iter()
    .map(|&name| {
      let time = times.get(name).to_string();
      Ok(PrayerPoint {
        name,
        at: time_on(date, &time)?,
        time,
      })
    })
    .collect()
}

/// Wall-clock "now" in the given zone, falling back to the machine's local
/// time when the zone is absent or unknown.
pub fn zone_now(time_zone: Option<&str>) -> NaiveDateTime {
  if let Some(zone) = time_zone {
    if let Ok(tz) = Tz::from_str(zone) {
      return Utc::now().with_timezone(&tz).naive_local();
    }
  }
  Local::now().naive_local()
}

pub fn current_info(
  times: &PrayerTimes,
  tomorrow_fajr: Option<&str>,
  time_zone: Option<&str>,
) -> Result<CurrentInfo, Error> {
  current_info_at(times, tomorrow_fajr, zone_now(time_zone))
}

/// Determines the current and next prayer for a fixed `now`, walking the day
/// latest-first. After Isha the target rolls over to tomorrow's Fajr (using
/// the fetched value when available); before Fajr it counts down to today's.
pub fn current_info_at(
  times: &PrayerTimes,
  tomorrow_fajr: Option<&str>,
  now: NaiveDateTime,
) -> Result<CurrentInfo, Error> {
  let points = prayer_points(times, now.date())?;

  for (i, point) in points.iter().enumerate().rev() {
    if now < point.at {
      continue;
    }

    if let Some(next) = points.get(i + 1) {
      return Ok(CurrentInfo {
        current_prayer: point.name,
        next_prayer: next.name,
        next_prayer_time: next.time.clone(),
        until_next: clamp(next.at - now),
        after_isha: false,
      });
    }

    let fajr_time = tomorrow_fajr.unwrap_or(&times.fajr).to_string();
    let fajr_at = time_on(now.date() + Duration::days(1), &fajr_time)?;
    return Ok(CurrentInfo {
      current_prayer: PrayerName::Isha,
      next_prayer: PrayerName::Fajr,
      next_prayer_time: fajr_time,
      until_next: clamp(fajr_at - now),
      after_isha: true,
    });
  }

  // Early morning: yesterday's Isha is still "current".
  Ok(CurrentInfo {
    current_prayer: PrayerName::Isha,
    next_prayer: PrayerName::Fajr,
    next_prayer_time: times.fajr.clone(),
    until_next: clamp(points[0].at - now),
    after_isha: false,
  })
}

fn clamp(duration: Duration) -> Duration {
  if duration < Duration::zero() {
    Duration::zero()
  } else {
    duration
  }
}

pub fn format_countdown(duration: Duration) -> String {
  let total = duration.num_seconds().max(0);
  format!(
    "{:02}:{:02}:{:02}",
    total / 3600,
    (total % 3600) / 60,
    total % 60
  )
}

pub fn format_time_for_display(value: &str, format: TimeFormat) -> String {
  match format {
    TimeFormat::H24 => value.to_string(),
    TimeFormat::H12 => match parse_hhmm(value) {
      Ok(time) => {
        let hour = time.hour();
        let display_hour = match hour % 12 {
          0 => 12,
          h => h,
        };
        let meridiem = if hour >= 12 { "PM" } else { "AM" };
        format!("{}:{:02} {}", display_hour, time.minute(), meridiem)
      }
      Err(_) => value.to_string(),
    },
  }
}
