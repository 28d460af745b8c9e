use anyhow::{Context, Result};
use browseros_dev::config::Config;
use clap::Parser;
use log::info;

mod cli;

use cli::Cli;
use cli::app::Commands;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config_dir {
        Some(dir) => Config::load_from_dir(dir.clone())?,
        None => Config::load()?,
    };

    // Initialize logger to file (truncate on each run)
    let log_path = config.config_dir().join("browseros-dev.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {:?}", log_path))?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    info!("Starting browseros-dev");

    match cli.command {
        Commands::Prefs(prefs_args) => {
            let revision = config.settings.resolve_revision(cli.revision)?;
            cli::commands::handle_prefs_command(prefs_args, &config, revision).await?;
        }
        Commands::Patch(patch_args) => {
            cli::commands::handle_patch_command(patch_args, &config)?;
        }
        Commands::Settings(settings_args) => {
            cli::commands::handle_settings_command(settings_args, &mut config)?;
        }
    }

    Ok(())
}
