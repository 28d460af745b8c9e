pub mod config;
pub mod patches;
pub mod prefs;
