use anyhow::Result;
use browseros_dev::config::Config;
use browseros_dev::prefs::Revision;
use clap::{Args, Subcommand, ValueEnum};
use colored::Colorize;
use log::info;
use std::path::PathBuf;

#[derive(Args)]
pub struct SettingsCommands {
    #[command(subcommand)]
    pub command: SettingsSubcommands,
}

#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Show current settings
    Show,
    /// Set the value of a specific setting
    Set {
        /// Setting name (revision, chromium-src, patch-root)
        name: String,
        /// Setting value
        value: String,
    },
    /// Clear a setting so the built-in fallback applies
    Unset {
        /// Setting name
        name: String,
    },
}

/// Handle settings command
pub fn handle_settings_command(cmd: SettingsCommands, config: &mut Config) -> Result<()> {
    match cmd.command {
        SettingsSubcommands::Show => show_command(config),
        SettingsSubcommands::Set { name, value } => set_command(config, &name, &value),
        SettingsSubcommands::Unset { name } => unset_command(config, &name),
    }
}

fn show_command(config: &Config) -> Result<()> {
    let settings = &config.settings;
    let unset = || "(unset)".dimmed().to_string();

    println!("{} {}", "Settings file".bold(), config.settings_path().display());
    println!(
        "  revision: {}",
        settings.revision.map(|r| r.to_string().cyan().to_string()).unwrap_or_else(unset)
    );
    println!(
        "  chromium-src: {}",
        settings.chromium_src.as_ref().map(|p| p.display().to_string()).unwrap_or_else(unset)
    );
    println!(
        "  patch-root: {}",
        settings.patch_root.as_ref().map(|p| p.display().to_string()).unwrap_or_else(unset)
    );
    Ok(())
}

fn set_command(config: &mut Config, name: &str, value: &str) -> Result<()> {
    info!("Setting {} to {}", name, value);

    match name {
        "revision" => {
            let revision = Revision::from_str(value, true)
                .map_err(|_| anyhow::anyhow!("Invalid value for revision: '{}'. Must be 'a' or 'b'.", value))?;
            config.settings.revision = Some(revision);
        }
        "chromium-src" => config.settings.chromium_src = Some(PathBuf::from(value)),
        "patch-root" => config.settings.patch_root = Some(PathBuf::from(value)),
        _ => anyhow::bail!("Unknown setting: {}", name),
    }

    config.save()?;
    println!("{} Set {} to {}", "✓".bright_green().bold(), name, value.bright_green().bold());
    Ok(())
}

fn unset_command(config: &mut Config, name: &str) -> Result<()> {
    info!("Clearing setting: {}", name);

    match name {
        "revision" => config.settings.revision = None,
        "chromium-src" => config.settings.chromium_src = None,
        "patch-root" => config.settings.patch_root = None,
        _ => anyhow::bail!("Unknown setting: {}", name),
    }

    config.save()?;
    println!("{} Cleared {}", "✓".bright_green().bold(), name);
    Ok(())
}
