//! Typed preference registration and storage
//!
//! The preference system provides:
//! - A registry capability (`PrefRegistry`) that registrars write through
//! - The BrowserOS server registrar and its key constants
//! - An in-memory registry of definitions
//! - Database-backed current values layered over registered defaults

pub mod builder;
pub mod registry;
pub mod server;
pub mod store;
pub mod types;

pub use builder::PrefDefBuilder;
pub use registry::{PrefRegistry, PrefRegistrySimple};
pub use server::{register_local_state_prefs, Revision, ServerPrefDefaults};
pub use store::PrefStore;
pub use types::{PrefDefinition, PrefType, PrefValue};

use anyhow::Result;

/// Build a registry populated with every preference for a revision
pub fn build_registry(revision: Revision) -> Result<PrefRegistrySimple> {
    let mut registry = PrefRegistrySimple::new();
    register_local_state_prefs(&mut registry, &ServerPrefDefaults::for_revision(revision))?;
    log::debug!("Initialized preference registry with {} prefs (revision {})", registry.count(), revision);
    Ok(registry)
}
