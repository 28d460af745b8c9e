use anyhow::Result;
use browseros_dev::config::Config;
use browseros_dev::prefs::{PrefDefinition, PrefStore, PrefValue, Revision, ServerPrefDefaults};
use clap::{Args, Subcommand};
use colored::Colorize;
use dialoguer::Confirm;
use log::info;
use std::collections::BTreeMap;

#[derive(Args)]
pub struct PrefsCommands {
    #[command(subcommand)]
    pub command: PrefsSubcommands,
}

#[derive(Subcommand)]
pub enum PrefsSubcommands {
    /// List every registered preference with its current value
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the registered defaults for the selected revision
    Defaults {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get the current value of a preference
    Get {
        /// Preference key (e.g. browseros.server.cdp_port)
        key: String,
    },
    /// Override a preference
    Set {
        /// Preference key
        key: String,
        /// New value (integer or true/false)
        value: String,
    },
    /// Drop the override for a preference
    Reset {
        /// Preference key
        key: String,
    },
    /// Drop every override
    ResetAll {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle prefs command
pub async fn handle_prefs_command(cmd: PrefsCommands, config: &Config, revision: Revision) -> Result<()> {
    match cmd.command {
        // Defaults never touch the database
        PrefsSubcommands::Defaults { json } => defaults_command(revision, json),
        PrefsSubcommands::List { json } => list_command(&config.open_prefs(revision).await?, revision, json).await,
        PrefsSubcommands::Get { key } => get_command(&config.open_prefs(revision).await?, &key).await,
        PrefsSubcommands::Set { key, value } => set_command(&config.open_prefs(revision).await?, &key, &value).await,
        PrefsSubcommands::Reset { key } => reset_command(&config.open_prefs(revision).await?, &key).await,
        PrefsSubcommands::ResetAll { force } => reset_all_command(&config.open_prefs(revision).await?, force).await,
    }
}

fn defaults_command(revision: Revision, json: bool) -> Result<()> {
    let entries = ServerPrefDefaults::for_revision(revision).entries();

    if json {
        let map: BTreeMap<_, _> = entries.into_iter().collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    println!("{} {}", "Revision".bold(), revision.to_string().cyan());
    for (key, value) in entries {
        println!("  {} = {}", key, value.to_string().green());
    }
    Ok(())
}

async fn list_command(store: &PrefStore, revision: Revision, json: bool) -> Result<()> {
    let registry = store.registry();

    if json {
        let mut rows = Vec::with_capacity(registry.count());
        for def in registry.list_all() {
            rows.push(serde_json::json!({
                "key": def.key,
                "type": def.ty,
                "default": def.default,
                "value": store.get(&def.key).await?,
                "overridden": !store.is_default(&def.key).await?,
            }));
        }
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{} {}", "Revision".bold(), revision.to_string().cyan());
    for namespace in registry.namespaces() {
        println!("{}", namespace.bold());
        for def in registry.list_namespace(&namespace) {
            let value = store.get(&def.key).await?;
            let overridden = !store.is_default(&def.key).await?;
            print_entry(def, &value, overridden);
        }
    }
    Ok(())
}

fn print_entry(def: &PrefDefinition, value: &PrefValue, overridden: bool) {
    if overridden {
        println!(
            "  {} ({}) = {} {}",
            def.local_key,
            def.ty,
            value.to_string().yellow().bold(),
            format!("(override, default {})", def.default).dimmed()
        );
    } else {
        println!("  {} ({}) = {}", def.local_key, def.ty, value.to_string().green());
    }
}

async fn get_command(store: &PrefStore, key: &str) -> Result<()> {
    info!("Getting preference: {}", key);
    println!("{}", store.get(key).await?);
    Ok(())
}

async fn set_command(store: &PrefStore, key: &str, raw: &str) -> Result<()> {
    info!("Setting {} to {}", key, raw);

    let def = store
        .registry()
        .get(key)
        .ok_or_else(|| anyhow::anyhow!("Unknown preference: {}", key))?;
    let value = PrefValue::parse(raw, def.ty)?;

    if value == PrefValue::Integer(0) && key.ends_with("_port") {
        println!("{}", "Port 0: the server will pick a random port at startup.".dimmed());
    }

    store.set(key, value).await?;
    println!("{} Set {} to {}", "✓".bright_green().bold(), key, value.to_string().bright_green().bold());
    Ok(())
}

async fn reset_command(store: &PrefStore, key: &str) -> Result<()> {
    info!("Resetting preference: {}", key);

    store.reset(key).await?;
    let value = store.get(key).await?;
    println!("{} Reset {} to {}", "✓".bright_green().bold(), key, value.to_string().green());
    Ok(())
}

async fn reset_all_command(store: &PrefStore, force: bool) -> Result<()> {
    info!("Resetting all preferences to defaults");

    if !force
        && !Confirm::new()
            .with_prompt("Reset all preferences to their default values?")
            .default(false)
            .interact()?
    {
        println!("Operation cancelled.");
        return Ok(());
    }

    let removed = store.reset_all().await?;
    println!("{} Removed {} override(s)", "✓".bright_green().bold(), removed);
    for (def, value) in store.entries().await? {
        print_entry(&def, &value, false);
    }
    Ok(())
}
