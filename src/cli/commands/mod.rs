pub mod patch;
pub mod prefs;
pub mod settings;

pub use patch::{PatchCommands, handle_patch_command};
pub use prefs::{PrefsCommands, handle_prefs_command};
pub use settings::{SettingsCommands, handle_settings_command};
