// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_target(false)
    .init();

  let cli = Cli::parse();

  let result = match cli.command {
    None => commands::today::run().await,
    Some(Commands::Next { once }) => commands::next::run(once).await,
    Some(Commands::Config(args)) => commands::config::run(args).await,
    Some(Commands::Notify) => commands::notify::run().await,
    Some(Commands::Completions { shell }) => {
      cli::print_completions(shell);
      Ok(())
    }
  };

  if let Err(e) = result {
    error!("Command failed: {:?}", e);
    eprintln!("Error: {}", e);
    std::process::exit(1);
  }

  Ok(())
}
