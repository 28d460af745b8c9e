//! Settings file and preference database locations

use crate::prefs::{self, PrefStore, Revision};
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod db;

const APP_DIR: &str = "browseros-dev";
const SETTINGS_FILE: &str = "settings.toml";
const PREFS_DB_FILE: &str = "prefs.db";
const DEFAULT_PATCH_ROOT: &str = "chromium_src";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Server preference revision to register when `--revision` is not given
    #[serde(default)]
    pub revision: Option<Revision>,

    /// Default Chromium checkout for `patch apply` / `patch import`
    #[serde(default)]
    pub chromium_src: Option<PathBuf>,

    /// Where per-file patches live (defaults to ./chromium_src)
    #[serde(default)]
    pub patch_root: Option<PathBuf>,
}

impl Settings {
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Settings file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {:?}", path))?;

        debug!("Loaded settings from {:?}: {:?}", path, settings);
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize settings to TOML")?;

        fs::write(path, content).with_context(|| format!("Failed to write settings file: {:?}", path))?;

        info!("Settings saved to {:?}", path);
        Ok(())
    }

    /// Resolve the revision: explicit flag first, then the settings file
    pub fn resolve_revision(&self, flag: Option<Revision>) -> Result<Revision> {
        flag.or(self.revision).ok_or_else(|| {
            anyhow::anyhow!(
                "No preference revision selected. Pass --revision a|b or set `revision` in {}",
                SETTINGS_FILE
            )
        })
    }

    /// Resolve the patch root: explicit flag, then settings, then ./chromium_src
    pub fn resolve_patch_root(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.patch_root.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PATCH_ROOT))
    }

    /// Resolve the Chromium checkout: explicit flag, then settings
    pub fn resolve_chromium_src(&self, flag: Option<PathBuf>) -> Result<PathBuf> {
        flag.or_else(|| self.chromium_src.clone()).ok_or_else(|| {
            anyhow::anyhow!(
                "No Chromium checkout given. Pass --chromium-src or set `chromium_src` in {}",
                SETTINGS_FILE
            )
        })
    }
}

/// Loaded settings plus the paths they came from
#[derive(Debug)]
pub struct Config {
    pub settings: Settings,
    config_dir: PathBuf,
}

impl Config {
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join(APP_DIR)
        } else {
            // Use home directory with dot prefix on Windows/Mac
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(format!(".{}", APP_DIR))
        };

        // Ensure the directory exists
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir)
    }

    pub fn load() -> Result<Self> {
        Self::load_from_dir(Self::get_config_dir()?)
    }

    /// Load settings from an explicit directory (used by tests and `--config-dir`)
    pub fn load_from_dir(config_dir: PathBuf) -> Result<Self> {
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
        }
        let settings = Settings::load_from(&config_dir.join(SETTINGS_FILE))?;
        Ok(Self { settings, config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    pub fn db_path(&self) -> PathBuf {
        self.config_dir.join(PREFS_DB_FILE)
    }

    pub fn save(&self) -> Result<()> {
        self.settings.save_to(&self.settings_path())
    }

    /// Register the revision's prefs and open the store backing them
    pub async fn open_prefs(&self, revision: Revision) -> Result<PrefStore> {
        let registry = prefs::build_registry(revision)?;

        let db_path = self.db_path();
        debug!("Opening preference database: {:?}", db_path);
        let pool = db::connect(&db_path).await?;
        db::run_migrations(&pool).await?;

        Ok(PrefStore::new(pool, Arc::new(registry)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_settings_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(config.settings, Settings::default());
    }

    #[test]
    fn test_settings_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::load_from_dir(dir.path().to_path_buf()).unwrap();
        config.settings.revision = Some(Revision::A);
        config.settings.patch_root = Some(PathBuf::from("/tmp/patches"));
        config.save().unwrap();

        let reloaded = Config::load_from_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(reloaded.settings.revision, Some(Revision::A));
        assert_eq!(reloaded.settings.patch_root, Some(PathBuf::from("/tmp/patches")));
        assert_eq!(reloaded.settings.chromium_src, None);
    }

    #[test]
    fn test_parse_settings_toml() {
        let settings: Settings = toml::from_str(
            r#"
revision = "b"
chromium_src = "/src/chromium"
"#,
        )
        .unwrap();

        assert_eq!(settings.revision, Some(Revision::B));
        assert_eq!(settings.chromium_src, Some(PathBuf::from("/src/chromium")));
    }

    #[test]
    fn test_revision_resolution() {
        let empty = Settings::default();
        assert!(empty.resolve_revision(None).is_err());
        assert_eq!(empty.resolve_revision(Some(Revision::B)).unwrap(), Revision::B);

        let configured = Settings {
            revision: Some(Revision::A),
            ..Default::default()
        };
        assert_eq!(configured.resolve_revision(None).unwrap(), Revision::A);
        assert_eq!(configured.resolve_revision(Some(Revision::B)).unwrap(), Revision::B);
    }

    #[test]
    fn test_patch_root_resolution() {
        let empty = Settings::default();
        assert_eq!(empty.resolve_patch_root(None), PathBuf::from("chromium_src"));
        assert_eq!(empty.resolve_patch_root(Some(PathBuf::from("p"))), PathBuf::from("p"));
        assert!(empty.resolve_chromium_src(None).is_err());
    }

    #[tokio::test]
    async fn test_open_prefs_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from_dir(dir.path().to_path_buf()).unwrap();

        let store = config.open_prefs(Revision::B).await.unwrap();
        store.set_integer(prefs::server::MCP_SERVER_PORT, 9300).await.unwrap();
        drop(store);

        let store = config.open_prefs(Revision::B).await.unwrap();
        assert_eq!(store.get_integer(prefs::server::MCP_SERVER_PORT).await.unwrap(), 9300);
        assert_eq!(store.get_integer(prefs::server::CDP_SERVER_PORT).await.unwrap(), 9223);
    }
}
