//! Database-backed current values for registered preferences

use super::registry::PrefRegistrySimple;
use super::server::validate_server_pref;
use super::types::{PrefDefinition, PrefValue};
use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Preference store: registered defaults plus persisted overrides
pub struct PrefStore {
    pool: SqlitePool,
    registry: Arc<PrefRegistrySimple>,
}

impl PrefStore {
    /// Create a new preference store
    pub fn new(pool: SqlitePool, registry: Arc<PrefRegistrySimple>) -> Self {
        Self { pool, registry }
    }

    /// Get a reference to the preference registry
    pub fn registry(&self) -> &PrefRegistrySimple {
        &self.registry
    }

    fn definition(&self, key: &str) -> Result<&PrefDefinition> {
        self.registry
            .get(key)
            .ok_or_else(|| anyhow::anyhow!("Preference '{}' is not registered", key))
    }

    /// Get the current value, falling back to the registered default
    pub async fn get(&self, key: &str) -> Result<PrefValue> {
        let def = self.definition(key)?;

        if let Some(raw_value) = self.get_raw(key).await? {
            PrefValue::parse(&raw_value, def.ty)
                .with_context(|| format!("Stored value for '{}' is corrupt", key))
        } else {
            Ok(def.default)
        }
    }

    /// Set a value after checking its registered type and, for ports, its range
    pub async fn set(&self, key: &str, value: PrefValue) -> Result<()> {
        let def = self.definition(key)?;
        def.validate(&value)?;
        validate_server_pref(key, &value)?;
        self.set_raw(key, &value.to_string()).await
    }

    /// Get integer value
    pub async fn get_integer(&self, key: &str) -> Result<i64> {
        self.get(key).await?.as_integer()
    }

    /// Get boolean value
    pub async fn get_boolean(&self, key: &str) -> Result<bool> {
        self.get(key).await?.as_boolean()
    }

    /// Set integer value
    pub async fn set_integer(&self, key: &str, value: i64) -> Result<()> {
        self.set(key, PrefValue::Integer(value)).await
    }

    /// Set boolean value
    pub async fn set_boolean(&self, key: &str, value: bool) -> Result<()> {
        self.set(key, PrefValue::Boolean(value)).await
    }

    /// Whether the key currently resolves to its default (no override stored)
    pub async fn is_default(&self, key: &str) -> Result<bool> {
        self.definition(key)?;
        Ok(self.get_raw(key).await?.is_none())
    }

    /// Drop the stored override so the default applies again
    pub async fn reset(&self, key: &str) -> Result<()> {
        self.definition(key)?;
        sqlx::query("DELETE FROM prefs WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .context("Failed to delete preference")?;
        log::debug!("Reset preference: {}", key);
        Ok(())
    }

    /// Drop every stored override for registered keys
    ///
    /// Returns the number of overrides removed.
    pub async fn reset_all(&self) -> Result<u64> {
        let mut removed = 0;
        for def in self.registry.list_all() {
            let result = sqlx::query("DELETE FROM prefs WHERE key = ?")
                .bind(&def.key)
                .execute(&self.pool)
                .await
                .context("Failed to delete preference")?;
            removed += result.rows_affected();
        }
        log::info!("Reset {} preference override(s)", removed);
        Ok(removed)
    }

    /// Every registered preference with its current value, sorted by key
    pub async fn entries(&self) -> Result<Vec<(PrefDefinition, PrefValue)>> {
        let mut entries = Vec::with_capacity(self.registry.count());
        for def in self.registry.list_all() {
            let value = self.get(&def.key).await?;
            entries.push((def.clone(), value));
        }
        Ok(entries)
    }

    /// Get raw value from database
    async fn get_raw(&self, key: &str) -> Result<Option<String>> {
        sqlx::query_scalar("SELECT value FROM prefs WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get preference from database")
    }

    /// Set raw value in database
    async fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO prefs (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .context("Failed to set preference in database")?;

        log::debug!("Set preference: {} = {}", key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::db;
    use crate::prefs::registry::PrefRegistry;

    async fn setup_test_store() -> PrefStore {
        let pool = db::connect_memory().await.unwrap();
        db::run_migrations(&pool).await.unwrap();

        let mut registry = PrefRegistrySimple::new();
        registry.register_integer_pref("test.port", 9000).unwrap();
        registry.register_boolean_pref("test.enabled", true).unwrap();

        PrefStore::new(pool, Arc::new(registry))
    }

    #[tokio::test]
    async fn test_default_then_override() {
        let store = setup_test_store().await;

        assert_eq!(store.get_integer("test.port").await.unwrap(), 9000);
        assert!(store.is_default("test.port").await.unwrap());

        store.set_integer("test.port", 9100).await.unwrap();
        assert_eq!(store.get_integer("test.port").await.unwrap(), 9100);
        assert!(!store.is_default("test.port").await.unwrap());

        store.set_integer("test.port", 9200).await.unwrap();
        assert_eq!(store.get_integer("test.port").await.unwrap(), 9200);
    }

    #[tokio::test]
    async fn test_type_checked_set() {
        let store = setup_test_store().await;

        assert!(store.set_boolean("test.port", true).await.is_err());
        assert!(store.set_integer("test.enabled", 1).await.is_err());
        assert!(store.get_boolean("test.enabled").await.unwrap());
    }

    #[tokio::test]
    async fn test_port_range_enforced_on_set() {
        let pool = db::connect_memory().await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        let registry = crate::prefs::build_registry(crate::prefs::Revision::B).unwrap();
        let store = PrefStore::new(pool, Arc::new(registry));
        let mcp_port = crate::prefs::server::MCP_SERVER_PORT;

        assert!(store.set_integer(mcp_port, 65536).await.is_err());
        assert!(store.set_integer(mcp_port, 70000).await.is_err());
        assert!(store.set_integer(mcp_port, -1).await.is_err());
        assert_eq!(store.get_integer(mcp_port).await.unwrap(), 9224);
        assert!(store.is_default(mcp_port).await.unwrap());

        store.set_integer(mcp_port, 0).await.unwrap();
        assert_eq!(store.get_integer(mcp_port).await.unwrap(), 0);
        store.set_integer(mcp_port, 65535).await.unwrap();
        assert_eq!(store.get_integer(mcp_port).await.unwrap(), 65535);
    }

    #[tokio::test]
    async fn test_unregistered_key() {
        let store = setup_test_store().await;

        assert!(store.get("test.missing").await.is_err());
        assert!(store.set_integer("test.missing", 1).await.is_err());
        assert!(store.reset("test.missing").await.is_err());
    }

    #[tokio::test]
    async fn test_reset_and_reset_all() {
        let store = setup_test_store().await;

        store.set_integer("test.port", 1).await.unwrap();
        store.set_boolean("test.enabled", false).await.unwrap();

        store.reset("test.port").await.unwrap();
        assert_eq!(store.get_integer("test.port").await.unwrap(), 9000);
        assert!(!store.get_boolean("test.enabled").await.unwrap());

        assert_eq!(store.reset_all().await.unwrap(), 1);
        assert!(store.get_boolean("test.enabled").await.unwrap());
    }

    #[tokio::test]
    async fn test_entries_sorted_with_current_values() {
        let store = setup_test_store().await;
        store.set_boolean("test.enabled", false).await.unwrap();

        let entries = store.entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0.key, "test.enabled");
        assert_eq!(entries[0].1, PrefValue::Boolean(false));
        assert_eq!(entries[1].0.key, "test.port");
        assert_eq!(entries[1].1, PrefValue::Integer(9000));
    }
}
