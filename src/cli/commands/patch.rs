use anyhow::Result;
use browseros_dev::config::Config;
use browseros_dev::patches;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args)]
pub struct PatchCommands {
    #[command(subcommand)]
    pub command: PatchSubcommands,
}

#[derive(Subcommand)]
pub enum PatchSubcommands {
    /// Split a monolithic patch into per-file patches
    Split {
        /// Monolithic patch file to split
        #[arg(long = "patch")]
        patch_file: PathBuf,
        /// Directory to write per-file patches into (mirrors Chromium paths)
        #[arg(long = "into")]
        into_dir: Option<PathBuf>,
    },
    /// Apply all per-file patches to a Chromium checkout
    Apply {
        /// Path to Chromium checkout (repo root)
        #[arg(long)]
        chromium_src: Option<PathBuf>,
        /// Root directory containing per-file patches
        #[arg(long)]
        patch_root: Option<PathBuf>,
    },
    /// Import changes from a Chromium commit into per-file patches
    Import {
        /// Path to Chromium checkout (repo root)
        #[arg(long)]
        chromium_src: Option<PathBuf>,
        /// Commit hash/ref to import (defaults to HEAD)
        #[arg(long)]
        commit: Option<String>,
        /// Root directory to write per-file patches into
        #[arg(long)]
        patch_root: Option<PathBuf>,
    },
}

/// Handle patch command
pub fn handle_patch_command(cmd: PatchCommands, config: &Config) -> Result<()> {
    let settings = &config.settings;

    match cmd.command {
        PatchSubcommands::Split { patch_file, into_dir } => {
            let into_dir = settings.resolve_patch_root(into_dir);
            let mapping = patches::split_monolithic_patch(&patch_file, &into_dir)?;
            println!(
                "{} Split complete: {} file(s) in {}",
                "✓".bright_green().bold(),
                mapping.len(),
                into_dir.display()
            );
        }
        PatchSubcommands::Apply { chromium_src, patch_root } => {
            let chromium_src = settings.resolve_chromium_src(chromium_src)?;
            let patch_root = settings.resolve_patch_root(patch_root);
            let report = patches::apply_per_file_patches(&chromium_src, &patch_root)?;

            if !report.is_success() {
                for failure in &report.failures {
                    eprintln!("{} {}: {}", "✗".red().bold(), failure.patch.display(), failure.error);
                }
                anyhow::bail!(
                    "{} of {} patch(es) failed to apply",
                    report.failures.len(),
                    report.applied + report.failures.len()
                );
            }
            println!("{} Applied {} patch(es)", "✓".bright_green().bold(), report.applied);
        }
        PatchSubcommands::Import { chromium_src, commit, patch_root } => {
            let chromium_src = settings.resolve_chromium_src(chromium_src)?;
            let patch_root = settings.resolve_patch_root(patch_root);
            let mapping = patches::import_commit_as_per_file_patches(&chromium_src, commit.as_deref(), &patch_root)?;
            for path in mapping.values() {
                println!("  {}", path.display().to_string().dimmed());
            }
            println!("{} Imported {} patch(es)", "✓".bright_green().bold(), mapping.len());
        }
    }

    Ok(())
}
