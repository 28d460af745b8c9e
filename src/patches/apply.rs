//! Apply per-file patches to a Chromium checkout

use super::git::run_git;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A patch that `git apply` rejected
#[derive(Debug)]
pub struct ApplyFailure {
    pub patch: PathBuf,
    pub error: String,
}

/// Outcome of applying every patch under a root
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub applied: usize,
    pub failures: Vec<ApplyFailure>,
}

impl ApplyReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Every `*.patch` file under `root`, sorted
///
/// Symlinked directories are not descended into; symlinked patch files are kept.
pub fn collect_patches(root: &Path) -> Result<Vec<PathBuf>> {
    let mut patches = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry.with_context(|| format!("Failed to walk patch root: {}", root.display()))?;
        let path = entry.path();
        if !entry.file_type().is_dir() && path.is_file() && path.extension().is_some_and(|ext| ext == "patch") {
            patches.push(entry.into_path());
        }
    }

    patches.sort();
    Ok(patches)
}

/// Apply all per-file patches under `patch_root` to `chromium_src`.
///
/// A patch that fails is recorded in the report and the rest still run.
pub fn apply_per_file_patches(chromium_src: &Path, patch_root: &Path) -> Result<ApplyReport> {
    if !chromium_src.exists() {
        anyhow::bail!("Chromium source not found: {}", chromium_src.display());
    }
    if !patch_root.exists() {
        log::warn!("Patch root does not exist: {}", patch_root.display());
        return Ok(ApplyReport::default());
    }

    let patches = collect_patches(patch_root)?;
    if patches.is_empty() {
        log::warn!("No patches found under: {}", patch_root.display());
        return Ok(ApplyReport::default());
    }

    log::info!("Applying {} patch(es) to {}", patches.len(), chromium_src.display());
    let mut report = ApplyReport::default();

    for patch in &patches {
        let rel_display = patch.strip_prefix(patch_root).unwrap_or(patch);
        log::info!("Applying {}", rel_display.display());

        // Absolute path, since git runs with the checkout as its cwd
        let patch_arg = fs::canonicalize(patch).unwrap_or_else(|_| patch.clone());
        let patch_arg = patch_arg.to_string_lossy();

        // -p1 strips the a/ and b/ prefixes
        let result = run_git(
            &[
                "apply",
                "-p1",
                "--ignore-whitespace",
                "--whitespace=nowarn",
                "--3way",
                &patch_arg,
            ],
            chromium_src,
        );

        match result {
            Ok(_) => report.applied += 1,
            Err(e) => {
                log::error!("Failed to apply {}: {:#}", rel_display.display(), e);
                report.failures.push(ApplyFailure {
                    patch: patch.clone(),
                    error: format!("{:#}", e),
                });
            }
        }
    }

    if report.is_success() {
        log::info!("All patches applied successfully");
    } else {
        log::warn!("Some patches failed: {} of {}", report.failures.len(), patches.len());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_patches_recurses_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("chrome/browser")).unwrap();
        fs::write(root.join("chrome/browser/b.cc.patch"), "").unwrap();
        fs::write(root.join("a.gn.patch"), "").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();

        let patches = collect_patches(root).unwrap();
        assert_eq!(
            patches,
            vec![root.join("a.gn.patch"), root.join("chrome/browser/b.cc.patch")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_patches_skips_symlink_cycles() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.cc.patch"), "").unwrap();
        std::os::unix::fs::symlink(root, root.join("loop")).unwrap();
        std::os::unix::fs::symlink(root.join("a.cc.patch"), root.join("link.patch")).unwrap();

        let patches = collect_patches(root).unwrap();
        assert_eq!(patches, vec![root.join("a.cc.patch"), root.join("link.patch")]);
    }

    #[test]
    fn test_missing_checkout_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = apply_per_file_patches(&dir.path().join("nope"), dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_or_empty_patch_root_applies_nothing() {
        let src = tempfile::tempdir().unwrap();
        let patches = tempfile::tempdir().unwrap();

        let report = apply_per_file_patches(src.path(), &patches.path().join("missing")).unwrap();
        assert_eq!(report.applied, 0);
        assert!(report.is_success());

        let report = apply_per_file_patches(src.path(), patches.path()).unwrap();
        assert_eq!(report.applied, 0);
        assert!(report.is_success());
    }
}
