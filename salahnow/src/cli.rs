// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use config::{PrayerSource, TimeFormat};

/// Running without a subcommand prints today's prayer times.
#[derive(Parser, Debug)]
#[command(name = "salahnow", version, about = "Prayer times in your terminal")]
pub struct Cli {
  #[command(subcommand)]
  pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Show the next prayer with a live countdown.
  Next {
    /// Print a single snapshot and exit.
    #[arg(long)]
    once: bool,
  },
  /// Show or update location, calculation method, and time format.
  Config(ConfigArgs),
  /// Daemon mode: send a system notification at each prayer time.
  Notify,
  /// Generate shell completions.
  Completions {
    #[arg(value_enum)]
    shell: Shell,
  },
}

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
  /// Print the current configuration.
  #[arg(long)]
  pub show: bool,

  /// Detect location from IP and map it to the nearest built-in city.
  #[arg(long)]
  pub auto_location: bool,

  /// Search a location using OpenStreetMap Nominatim.
  #[arg(long)]
  pub search: Option<String>,

  /// Result index used with --search (1-based).
  #[arg(long, default_value_t = 1)]
  pub search_index: usize,

  #[arg(long)]
  pub city: Option<String>,

  #[arg(long)]
  pub country: Option<String>,

  #[arg(long)]
  pub country_code: Option<String>,

  #[arg(long)]
  pub lat: Option<f64>,

  #[arg(long)]
  pub lon: Option<f64>,

  #[arg(long)]
  pub address_label: Option<String>,

  /// Diyanet district id, only meaningful for Turkish locations.
  #[arg(long)]
  pub diyanet_district_id: Option<String>,

  /// Calculation source preference: diyanet or mwl.
  #[arg(long)]
  pub method: Option<PrayerSource>,

  /// Display format: 12h or 24h.
  #[arg(long)]
  pub time_format: Option<TimeFormat>,
}

pub fn print_completions(shell: Shell) {
  let mut cmd = Cli::command();
  let name = cmd.get_name().to_string();
  clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
  }

  #[test]
  fn parses_config_flags() {
    let cli = Cli::parse_from([
      "salahnow",
      "config",
      "--city",
      "Ankara",
      "--country",
      "Türkiye",
      "--country-code",
      "tr",
      "--lat",
      "39.9334",
      "--lon",
      "32.8597",
      "--method",
      "diyanet",
      "--time-format",
      "12h",
    ]);

    let Some(Commands::Config(args)) = cli.command else {
      panic!("expected config subcommand");
    };
    assert_eq!(args.city.as_deref(), Some("Ankara"));
    assert_eq!(args.method, Some(PrayerSource::Diyanet));
    assert_eq!(args.time_format, Some(TimeFormat::H12));
  }

  #[test]
  fn rejects_unknown_method() {
    let result = Cli::try_parse_from(["salahnow", "config", "--method", "isna"]);
    assert!(result.is_err());
  }
}
