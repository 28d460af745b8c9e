//! BrowserOS server local-state preferences
//!
//! Declares the server preference keys and registers them, with their
//! defaults, into whatever registry the host hands us.

use super::registry::PrefRegistry;
use super::types::PrefValue;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// CDP server port (0 = auto-assign random port on startup)
pub const CDP_SERVER_PORT: &str = "browseros.server.cdp_port";

/// MCP server port (HTTP)
pub const MCP_SERVER_PORT: &str = "browseros.server.mcp_port";

/// Agent server port
pub const AGENT_SERVER_PORT: &str = "browseros.server.agent_port";

/// Whether the MCP server is enabled
pub const MCP_SERVER_ENABLED: &str = "browseros.server.mcp_enabled";

/// Which set of server defaults to register.
///
/// The two revisions disagree on the MCP port and on whether an agent
/// port exists. Neither is treated as authoritative; callers pick one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Revision {
    /// MCP on 9233, agent server on 9243
    A,
    /// MCP on 9224, no agent server
    B,
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revision::A => f.write_str("a"),
            Revision::B => f.write_str("b"),
        }
    }
}

/// Literal default values for one revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerPrefDefaults {
    pub cdp_port: i64,
    pub mcp_port: i64,
    pub agent_port: Option<i64>,
    pub mcp_enabled: bool,
}

impl ServerPrefDefaults {
    pub const fn for_revision(revision: Revision) -> Self {
        match revision {
            Revision::A => Self {
                cdp_port: 9223,
                mcp_port: 9233,
                agent_port: Some(9243),
                mcp_enabled: true,
            },
            Revision::B => Self {
                cdp_port: 9223,
                mcp_port: 9224,
                agent_port: None,
                mcp_enabled: true,
            },
        }
    }

    /// (key, default) pairs in registration order
    pub fn entries(&self) -> Vec<(&'static str, PrefValue)> {
        let mut entries = vec![
            (CDP_SERVER_PORT, PrefValue::Integer(self.cdp_port)),
            (MCP_SERVER_PORT, PrefValue::Integer(self.mcp_port)),
        ];
        if let Some(agent_port) = self.agent_port {
            entries.push((AGENT_SERVER_PORT, PrefValue::Integer(agent_port)));
        }
        entries.push((MCP_SERVER_ENABLED, PrefValue::Boolean(self.mcp_enabled)));
        entries
    }
}

/// Register the server's local-state preferences with their defaults.
///
/// Must run once per registry, before anything reads these keys. Errors
/// come only from the registry itself (e.g. a duplicate key).
pub fn register_local_state_prefs<R: PrefRegistry + ?Sized>(
    registry: &mut R,
    defaults: &ServerPrefDefaults,
) -> Result<()> {
    registry.register_integer_pref(CDP_SERVER_PORT, defaults.cdp_port)?;
    registry.register_integer_pref(MCP_SERVER_PORT, defaults.mcp_port)?;

    if let Some(agent_port) = defaults.agent_port {
        registry.register_integer_pref(AGENT_SERVER_PORT, agent_port)?;
    }

    registry.register_boolean_pref(MCP_SERVER_ENABLED, defaults.mcp_enabled)?;

    log::debug!("Registered server local-state prefs: {:?}", defaults);
    Ok(())
}

/// Check a new value for a server preference before it is stored.
///
/// Port preferences must fit in a TCP port; 0 is allowed and means the
/// server picks a random port at startup.
pub fn validate_server_pref(key: &str, value: &PrefValue) -> Result<()> {
    if key.ends_with("_port") {
        let port = value.as_integer()?;
        if !(0..=i64::from(u16::MAX)).contains(&port) {
            anyhow::bail!("Invalid value for {}: {}. Ports must be between 0 and 65535.", key, port);
        }
    }
    Ok(())
}
