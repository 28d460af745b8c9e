//! Per-file Chromium patch management
//!
//! Patches live under a root directory that mirrors Chromium paths:
//! `chrome/browser/foo.cc` is stored as `<root>/chrome/browser/foo.cc.patch`.

pub mod apply;
pub mod git;
pub mod import;
pub mod split;

pub use apply::{apply_per_file_patches, ApplyFailure, ApplyReport};
pub use import::import_commit_as_per_file_patches;
pub use split::split_monolithic_patch;

use std::path::{Path, PathBuf};

/// Location of the per-file patch for a chromium-relative path
pub fn patch_file_path(root: &Path, rel_path: &str) -> PathBuf {
    root.join(format!("{}.patch", rel_path))
}
