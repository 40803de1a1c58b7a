// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::cli::ConfigArgs;
use config::{config_path, Config, Geocoder, Location};
use error::Error;
use std::io::{self, Write};
use std::path::Path;

pub async fn run(args: ConfigArgs) -> Result<(), Error> {
  let path = config_path()?;
  let mut config = Config::load(&path)?;

  let manual_location = args.city.is_some()
    || args.country.is_some()
    || args.country_code.is_some()
    || args.lat.is_some()
    || args.lon.is_some();
  let has_updates = args.auto_location
    || args.search.is_some()
    || manual_location
    || args.method.is_some()
    || args.time_format.is_some()
    || args.address_label.is_some()
    || args.diyanet_district_id.is_some();

  if args.show && !has_updates {
    return print_config(&config, &path);
  }

  if !has_updates {
    interactive(&mut config).await?;
    config.save(&path)?;
    println!("Configuration saved.");
    return print_config(&config, &path);
  }

  if args.auto_location {
    config.location = Geocoder::new().detect_from_ip().await?;
  }

  if let Some(query) = &args.search {
    let results = Geocoder::new().search(query, 5).await?;
    if results.is_empty() {
      return Err(Error::LocationResolution("No search results".into()));
    }
    if args.search_index < 1 || args.search_index > results.len() {
      return Err(Error::ConfigError(format!(
        "search-index out of range, pick 1..{}",
        results.len()
      )));
    }
    config.location = results[args.search_index - 1].clone();
  }

  if manual_location {
    let (Some(city), Some(country), Some(country_code), Some(lat), Some(lon)) = (
      args.city.clone(),
      args.country.clone(),
      args.country_code.clone(),
      args.lat,
      args.lon,
    ) else {
      return Err(Error::ConfigError(
        "Manual location requires --city --country --country-code --lat --lon".into(),
      ));
    };

    validate_coordinates(lat, lon)?;
    config.location = Location {
      city,
      country,
      country_code: country_code.to_uppercase(),
      lat,
      lon,
      address_label: args.address_label.clone(),
      diyanet_district_id: args.diyanet_district_id.clone(),
    };
  } else {
    if let Some(label) = args.address_label.clone() {
      config.location.address_label = Some(label);
    }
    if let Some(id) = args.diyanet_district_id.clone() {
      config.location.diyanet_district_id = Some(id);
    }
  }

  if let Some(method) = args.method {
    config.prayer_source = method;
  }
  if let Some(format) = args.time_format {
    config.time_format = format;
  }

  config.save(&path)?;
  println!("Configuration saved.");
  print_config(&config, &path)
}

fn validate_coordinates(lat: f64, lon: f64) -> Result<(), Error> {
  if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
    return Err(Error::InvalidCoordinates);
  }
  Ok(())
}

fn print_config(config: &Config, path: &Path) -> Result<(), Error> {
  println!("{}", serde_json::to_string_pretty(config)?);
  println!("Config path: {}", path.display());
  Ok(())
}

fn prompt(label: &str, default: &str) -> Result<String, Error> {
  if default.is_empty() {
    print!("{}: ", label);
  } else {
    print!("{} [{}]: ", label, default);
  }
  io::stdout().flush()?;

  let mut line = String::new();
  io::stdin().read_line(&mut line)?;
  let value = line.trim();
  Ok(if value.is_empty() {
    default.to_string()
  } else {
    value.to_string()
  })
}

fn prompt_choice(label: &str, choices: &[&str], default: &str) -> Result<String, Error> {
  loop {
    let value = prompt(&format!("{} ({})", label, choices.join("/")), default)?;
    if choices.contains(&value.as_str()) {
      return Ok(value);
    }
    println!("Invalid choice: {}", value);
  }
}

async fn interactive(config: &mut Config) -> Result<(), Error> {
  println!("Interactive configuration");

  let mode = prompt_choice("Location mode", &["keep", "auto", "search", "manual"], "keep")?;
  match mode.as_str() {
    "auto" => {
      let location = Geocoder::new().detect_from_ip().await?;
      println!("Detected location: {}, {}", location.city, location.country);
      config.location = location;
    }
    "search" => {
      let query = prompt("Search query", "")?;
      if query.is_empty() {
        return Err(Error::ConfigError("Search query cannot be empty".into()));
      }

      let results = Geocoder::new().search(&query, 5).await?;
      if results.is_empty() {
        return Err(Error::LocationResolution("No results from geocoding API".into()));
      }

      println!("Select location:");
      for (i, location) in results.iter().enumerate() {
        println!("  {}. {}", i + 1, location.label());
      }

      let raw = prompt("Result number", "1")?;
      let index: usize = raw
        .parse()
        .map_err(|_| Error::ConfigError("Result number must be an integer".into()))?;
      if index < 1 || index > results.len() {
        return Err(Error::ConfigError("Result number out of range".into()));
      }
      config.location = results[index - 1].clone();
    }
    "manual" => {
      let city = prompt("City", &config.location.city)?;
      let country = prompt("Country", &config.location.country)?;
      let country_code = prompt("Country code", &config.location.country_code)?.to_uppercase();
      let lat: f64 = prompt("Latitude", &config.location.lat.to_string())?
        .parse()
        .map_err(|_| Error::ConfigError("Latitude must be a number".into()))?;
      let lon: f64 = prompt("Longitude", &config.location.lon.to_string())?
        .parse()
        .map_err(|_| Error::ConfigError("Longitude must be a number".into()))?;
      validate_coordinates(lat, lon)?;

      let address_label = prompt(
        "Address label (optional)",
        config.location.address_label.as_deref().unwrap_or(""),
      )?;
      let district_id = prompt(
        "Diyanet district id (optional)",
        config.location.diyanet_district_id.as_deref().unwrap_or(""),
      )?;

      config.location = Location {
        city,
        country,
        country_code,
        lat,
        lon,
        address_label: (!address_label.is_empty()).then_some(address_label),
        diyanet_district_id: (!district_id.is_empty()).then_some(district_id),
      };
    }
    _ => {}
  }

  let method = prompt_choice(
    "Calculation method",
    &["diyanet", "mwl"],
    &config.prayer_source.to_string(),
  )?;
  config.prayer_source = method.parse()?;

  let format = prompt_choice("Time format", &["12h", "24h"], &config.time_format.to_string())?;
  config.time_format = format.parse()?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn coordinates_are_range_checked() {
    assert!(validate_coordinates(41.0, 28.9).is_ok());
    assert!(validate_coordinates(90.0, -180.0).is_ok());
    assert!(matches!(
      validate_coordinates(90.5, 0.0),
      Err(Error::InvalidCoordinates)
    ));
    assert!(matches!(
      validate_coordinates(0.0, 181.0),
      Err(Error::InvalidCoordinates)
    ));
  }
}
