//! Thin wrapper around the `git` binary

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Run `git <args>` inside `cwd` and return its stdout.
///
/// A non-zero exit becomes an error carrying git's stderr.
pub fn run_git(args: &[&str], cwd: &Path) -> Result<String> {
    log::debug!("git {} (in {})", args.join(" "), cwd.display());

    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .with_context(|| format!("Failed to run git {}", args.join(" ")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "git {} exited with {}: {}",
            args.join(" "),
            output.status,
            stderr.trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Whether `path` is inside a git work tree
pub fn is_work_tree(path: &Path) -> bool {
    run_git(&["rev-parse", "--is-inside-work-tree"], path)
        .map(|out| out.trim() == "true")
        .unwrap_or(false)
}
