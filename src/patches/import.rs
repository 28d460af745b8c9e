//! Import a Chromium commit as per-file patches

use super::git::{is_work_tree, run_git};
use super::patch_file_path;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Write one patch per file changed in `commit` (default `HEAD`) under `patch_root`.
///
/// Returns chromium-relative path -> written patch file. Files whose diff is
/// empty (mode-only changes, for instance) are skipped.
pub fn import_commit_as_per_file_patches(
    chromium_src: &Path,
    commit: Option<&str>,
    patch_root: &Path,
) -> Result<BTreeMap<String, PathBuf>> {
    if !chromium_src.exists() {
        anyhow::bail!("Chromium source not found: {}", chromium_src.display());
    }
    if !is_work_tree(chromium_src) {
        anyhow::bail!("{} is not a git repository", chromium_src.display());
    }

    let commit_ref = commit.unwrap_or("HEAD");

    let names = run_git(&["show", "--pretty=format:", "--name-only", commit_ref], chromium_src)?;
    let files: Vec<&str> = names
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if files.is_empty() {
        log::warn!("No changed files found in commit {}", commit_ref);
        return Ok(BTreeMap::new());
    }

    fs::create_dir_all(patch_root)
        .with_context(|| format!("Failed to create patch directory: {}", patch_root.display()))?;
    log::info!("Importing {} file(s) from {} into {}", files.len(), commit_ref, patch_root.display());

    let mut mapping = BTreeMap::new();
    for rel in files {
        let diff = run_git(
            &["show", commit_ref, "--pretty=format:", "--unified=3", "--", rel],
            chromium_src,
        )?;
        let diff = diff.trim();
        if diff.is_empty() {
            log::warn!("No diff produced for {}; skipping", rel);
            continue;
        }

        let out_path = patch_file_path(patch_root, rel);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&out_path, format!("{}\n", diff))
            .with_context(|| format!("Failed to write {}", out_path.display()))?;

        log::info!("Wrote patch: {}", out_path.display());
        mapping.insert(rel.to_string(), out_path);
    }

    log::info!("Imported {} per-file patch(es) from {}", mapping.len(), commit_ref);
    Ok(mapping)
}
