//! Core types for preference definitions

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;

/// A strongly-typed preference value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PrefValue {
    Integer(i64),
    Boolean(bool),
}

impl PrefValue {
    /// Get as integer, returning error if wrong type
    pub fn as_integer(&self) -> Result<i64> {
        match self {
            PrefValue::Integer(v) => Ok(*v),
            _ => anyhow::bail!("Expected Integer, got {:?}", self),
        }
    }

    /// Get as boolean, returning error if wrong type
    pub fn as_boolean(&self) -> Result<bool> {
        match self {
            PrefValue::Boolean(v) => Ok(*v),
            _ => anyhow::bail!("Expected Boolean, got {:?}", self),
        }
    }

    /// The type this value belongs to
    pub fn ty(&self) -> PrefType {
        match self {
            PrefValue::Integer(_) => PrefType::Integer,
            PrefValue::Boolean(_) => PrefType::Boolean,
        }
    }

    /// Parse a raw string (CLI argument or stored column) as the given type
    pub fn parse(raw: &str, ty: PrefType) -> Result<Self> {
        let raw = raw.trim();
        match ty {
            PrefType::Integer => {
                let value = raw
                    .parse::<i64>()
                    .with_context(|| format!("Failed to parse '{}' as integer", raw))?;
                Ok(PrefValue::Integer(value))
            }
            PrefType::Boolean => {
                let value = raw
                    .parse::<bool>()
                    .with_context(|| format!("Failed to parse '{}' as boolean (expected true/false)", raw))?;
                Ok(PrefValue::Boolean(value))
            }
        }
    }
}

impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefValue::Integer(v) => write!(f, "{}", v),
            PrefValue::Boolean(v) => write!(f, "{}", v),
        }
    }
}

/// Registered type of a preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefType {
    Integer,
    Boolean,
}

impl PrefType {
    /// Check if a value matches this type
    pub fn matches(&self, value: &PrefValue) -> bool {
        value.ty() == *self
    }
}

impl fmt::Display for PrefType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefType::Integer => f.write_str("integer"),
            PrefType::Boolean => f.write_str("boolean"),
        }
    }
}

/// A registered preference: key, type and default
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrefDefinition {
    /// Full key with namespace (e.g., "browseros.server.cdp_port")
    pub key: String,

    /// Everything before the last dot (e.g., "browseros.server")
    pub namespace: String,

    /// Last key segment (e.g., "cdp_port")
    pub local_key: String,

    #[serde(rename = "type")]
    pub ty: PrefType,

    pub default: PrefValue,
}

impl PrefDefinition {
    /// Validate that a value has this preference's type
    pub fn validate(&self, value: &PrefValue) -> Result<()> {
        if !self.ty.matches(value) {
            anyhow::bail!(
                "Type mismatch for '{}': expected {}, got {:?}",
                self.key,
                self.ty,
                value
            );
        }
        Ok(())
    }
}
