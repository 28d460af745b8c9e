//! Registry capability and the in-process registry implementation

use super::builder::PrefDefBuilder;
use super::types::PrefDefinition;
use anyhow::Result;
use std::collections::HashMap;

/// Capability for registering typed preferences with their defaults.
///
/// Registrars write through this trait so they never depend on a concrete
/// (or global) registry.
pub trait PrefRegistry {
    /// Register an integer preference with its default value
    fn register_integer_pref(&mut self, key: &str, default: i64) -> Result<()>;

    /// Register a boolean preference with its default value
    fn register_boolean_pref(&mut self, key: &str, default: bool) -> Result<()>;
}

/// Simple in-memory registry of preference definitions
#[derive(Debug, Default)]
pub struct PrefRegistrySimple {
    definitions: HashMap<String, PrefDefinition>,
}

impl PrefRegistrySimple {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new preference definition
    ///
    /// Returns an error if a preference with the same key is already registered
    pub fn register(&mut self, def: PrefDefinition) -> Result<()> {
        if self.definitions.contains_key(&def.key) {
            anyhow::bail!("Preference '{}' is already registered", def.key);
        }
        log::debug!("Registered preference: {} ({}, default {})", def.key, def.ty, def.default);
        self.definitions.insert(def.key.clone(), def);
        Ok(())
    }

    /// Get preference definition by full key
    pub fn get(&self, key: &str) -> Option<&PrefDefinition> {
        self.definitions.get(key)
    }

    /// Check if a preference is registered
    pub fn contains(&self, key: &str) -> bool {
        self.definitions.contains_key(key)
    }

    /// List all preferences in a namespace
    pub fn list_namespace(&self, namespace: &str) -> Vec<&PrefDefinition> {
        let mut prefs: Vec<_> = self
            .definitions
            .values()
            .filter(|def| def.namespace == namespace)
            .collect();

        prefs.sort_by(|a, b| a.key.cmp(&b.key));
        prefs
    }

    /// Get all unique namespaces
    pub fn namespaces(&self) -> Vec<String> {
        let mut namespaces: Vec<_> = self
            .definitions
            .values()
            .map(|def| def.namespace.clone())
            .collect();

        namespaces.sort();
        namespaces.dedup();
        namespaces
    }

    /// Get total number of registered preferences
    pub fn count(&self) -> usize {
        self.definitions.len()
    }

    /// List all preference definitions, sorted by key
    pub fn list_all(&self) -> Vec<&PrefDefinition> {
        let mut prefs: Vec<_> = self.definitions.values().collect();
        prefs.sort_by(|a, b| a.key.cmp(&b.key));
        prefs
    }
}

impl PrefRegistry for PrefRegistrySimple {
    fn register_integer_pref(&mut self, key: &str, default: i64) -> Result<()> {
        self.register(PrefDefBuilder::new(key).integer_type(default).build()?)
    }

    fn register_boolean_pref(&mut self, key: &str, default: bool) -> Result<()> {
        self.register(PrefDefBuilder::new(key).boolean_type(default).build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::types::{PrefType, PrefValue};

    #[test]
    fn test_register_and_get() {
        let mut registry = PrefRegistrySimple::new();
        registry.register_integer_pref("test.port", 8080).unwrap();

        let def = registry.get("test.port").unwrap();
        assert_eq!(def.ty, PrefType::Integer);
        assert_eq!(def.default, PrefValue::Integer(8080));
        assert!(registry.contains("test.port"));
        assert!(!registry.contains("test.other"));
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = PrefRegistrySimple::new();
        registry.register_boolean_pref("test.enabled", true).unwrap();

        let result = registry.register_boolean_pref("test.enabled", false);
        assert!(result.is_err());
        // First registration wins
        assert_eq!(registry.get("test.enabled").unwrap().default, PrefValue::Boolean(true));
    }

    #[test]
    fn test_list_namespace() {
        let mut registry = PrefRegistrySimple::new();
        registry.register_integer_pref("server.b_port", 2).unwrap();
        registry.register_integer_pref("server.a_port", 1).unwrap();
        registry.register_boolean_pref("ui.dark", false).unwrap();

        let server: Vec<_> = registry
            .list_namespace("server")
            .into_iter()
            .map(|def| def.key.as_str())
            .collect();
        assert_eq!(server, vec!["server.a_port", "server.b_port"]);
        assert_eq!(registry.list_namespace("ui").len(), 1);
        assert!(registry.list_namespace("missing").is_empty());
    }

    #[test]
    fn test_namespaces_and_count() {
        let mut registry = PrefRegistrySimple::new();
        registry.register_integer_pref("server.port", 1).unwrap();
        registry.register_boolean_pref("server.enabled", true).unwrap();
        registry.register_boolean_pref("ui.dark", false).unwrap();

        assert_eq!(registry.namespaces(), vec!["server".to_string(), "ui".to_string()]);
        assert_eq!(registry.count(), 3);
        assert_eq!(registry.list_all()[0].key, "server.enabled");
    }
}
