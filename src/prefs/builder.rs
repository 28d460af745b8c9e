//! Fluent builder API for creating preference definitions

use super::types::{PrefDefinition, PrefType, PrefValue};
use anyhow::Result;

/// Builder for creating preference definitions with a fluent API
pub struct PrefDefBuilder {
    key: String,
    ty: Option<PrefType>,
    default: Option<PrefValue>,
}

impl PrefDefBuilder {
    /// Create a new builder for a fully namespaced key
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ty: None,
            default: None,
        }
    }

    /// Define as an integer preference with default value
    pub fn integer_type(mut self, default: i64) -> Self {
        self.ty = Some(PrefType::Integer);
        self.default = Some(PrefValue::Integer(default));
        self
    }

    /// Define as a boolean preference with default value
    pub fn boolean_type(mut self, default: bool) -> Self {
        self.ty = Some(PrefType::Boolean);
        self.default = Some(PrefValue::Boolean(default));
        self
    }

    /// Build the preference definition
    ///
    /// Returns an error if the key is not namespaced or no type was set
    pub fn build(self) -> Result<PrefDefinition> {
        if self.key.is_empty() {
            anyhow::bail!("Preference key must not be empty");
        }
        if self.key.split('.').any(|segment| segment.is_empty()) {
            anyhow::bail!("Preference key '{}' contains an empty segment", self.key);
        }
        let (namespace, local_key) = self
            .key
            .rsplit_once('.')
            .ok_or_else(|| anyhow::anyhow!("Preference key '{}' has no namespace", self.key))?;

        let ty = self
            .ty
            .ok_or_else(|| anyhow::anyhow!("type is required (use integer_type or boolean_type)"))?;
        let default = self
            .default
            .ok_or_else(|| anyhow::anyhow!("default value is required"))?;

        Ok(PrefDefinition {
            namespace: namespace.to_string(),
            local_key: local_key.to_string(),
            key: self.key,
            ty,
            default,
        })
    }
}
