use super::commands::{PatchCommands, PrefsCommands, SettingsCommands};
use browseros_dev::prefs::Revision;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "browseros-dev")]
#[command(about = "BrowserOS developer tools: server preference defaults and Chromium patches")]
pub struct Cli {
    /// Server preference revision to register (overrides settings.toml)
    #[arg(long, global = true, value_enum)]
    pub revision: Option<Revision>,

    /// Read settings and the preference database from this directory
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect and override server preferences
    Prefs(PrefsCommands),
    /// Manage per-file Chromium patches
    Patch(PatchCommands),
    /// Show or change settings.toml
    Settings(SettingsCommands),
}
