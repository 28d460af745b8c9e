//! Split a monolithic diff into per-file patches

use super::patch_file_path;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const DIFF_HEADER: &str = "diff --git ";

/// Target path of a `diff --git a/<path> b/<path>` header.
///
/// Prefers the destination path unless it is `/dev/null` (a deletion).
pub fn detect_patch_target_path(header_line: &str) -> Option<String> {
    let mut parts = header_line.split_whitespace();
    if parts.next() != Some("diff") || parts.next() != Some("--git") {
        return None;
    }
    let a_path = parts.next()?;
    let b_path = parts.next()?;

    let strip_prefix = |p: &str| -> String {
        p.strip_prefix("a/")
            .or_else(|| p.strip_prefix("b/"))
            .unwrap_or(p)
            .to_string()
    };

    let a_rel = strip_prefix(a_path);
    let b_rel = strip_prefix(b_path);

    if b_rel == "/dev/null" {
        Some(a_rel)
    } else {
        Some(b_rel)
    }
}

/// Split `text` into (target path, block) pairs, one per `diff --git` header.
///
/// Lines before the first header are dropped. Every block ends with a newline.
pub fn split_blocks(text: &str) -> Vec<(String, String)> {
    let mut blocks = Vec::new();
    let mut current: Option<(String, String)> = None;

    let mut flush = |current: &mut Option<(String, String)>| {
        if let Some((header, mut block)) = current.take() {
            match detect_patch_target_path(&header) {
                Some(path) => {
                    if !block.ends_with('\n') {
                        block.push('\n');
                    }
                    blocks.push((path, block));
                }
                None => log::warn!("Skipping a block with undetectable path header"),
            }
        }
    };

    for line in text.split_inclusive('\n') {
        if line.starts_with(DIFF_HEADER) {
            flush(&mut current);
            current = Some((line.trim_end().to_string(), line.to_string()));
        } else if let Some((_, block)) = current.as_mut() {
            block.push_str(line);
        }
    }
    flush(&mut current);

    blocks
}

/// Split `patch_file` into per-file patches under `into_dir`.
///
/// Returns chromium-relative path -> written patch file. Multiple blocks
/// touching the same path are appended to one patch file.
pub fn split_monolithic_patch(patch_file: &Path, into_dir: &Path) -> Result<BTreeMap<String, PathBuf>> {
    if !patch_file.exists() {
        anyhow::bail!("Patch not found: {}", patch_file.display());
    }

    fs::create_dir_all(into_dir)
        .with_context(|| format!("Failed to create patch directory: {}", into_dir.display()))?;

    log::info!("Splitting patch: {}", patch_file.display());
    let bytes = fs::read(patch_file).with_context(|| format!("Failed to read patch: {}", patch_file.display()))?;
    let text = String::from_utf8_lossy(&bytes);

    let mut mapping = BTreeMap::new();
    for (rel_path, block) in split_blocks(&text) {
        let out_path = patch_file_path(into_dir, &rel_path);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Append when an earlier block in this run, or an earlier run, already wrote the file
        let mut out = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&out_path)
            .with_context(|| format!("Failed to open {}", out_path.display()))?;
        out.write_all(block.as_bytes())
            .with_context(|| format!("Failed to write {}", out_path.display()))?;

        mapping.insert(rel_path, out_path);
    }

    log::info!("Created/updated {} per-file patch(es) in {}", mapping.len(), into_dir.display());
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_target_prefers_destination() {
        assert_eq!(
            detect_patch_target_path("diff --git a/chrome/old.cc b/chrome/new.cc").as_deref(),
            Some("chrome/new.cc")
        );
    }

    #[test]
    fn test_detect_target_deletion_uses_source() {
        assert_eq!(
            detect_patch_target_path("diff --git a/chrome/gone.cc /dev/null").as_deref(),
            Some("chrome/gone.cc")
        );
        assert_eq!(
            detect_patch_target_path("diff --git a/chrome/gone.cc b//dev/null").as_deref(),
            Some("chrome/gone.cc")
        );
    }

    #[test]
    fn test_detect_target_malformed() {
        assert_eq!(detect_patch_target_path("diff --git a/only_one"), None);
        assert_eq!(detect_patch_target_path("index 123..456"), None);
    }

    #[test]
    fn test_split_blocks_ignores_preamble_and_terminates_lines() {
        let text = "From: someone\n\
                    diff --git a/x.cc b/x.cc\n\
                    +one\n\
                    diff --git a/y/z.h b/y/z.h\n\
                    +two";

        let blocks = split_blocks(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], ("x.cc".to_string(), "diff --git a/x.cc b/x.cc\n+one\n".to_string()));
        assert_eq!(blocks[1].0, "y/z.h");
        assert!(blocks[1].1.ends_with("+two\n"));
    }

    #[test]
    fn test_split_blocks_empty_input() {
        assert!(split_blocks("").is_empty());
        assert!(split_blocks("no headers here\n").is_empty());
    }
}
