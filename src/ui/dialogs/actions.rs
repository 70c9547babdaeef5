//! Dialog action types - dialogs return actions instead of mutating state directly.
//!
//! The app processes these in its update loop and turns them into backend
//! requests or state changes.

use crate::config::Settings;

/// Actions that dialogs can return to the main application.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogAction {
    /// Submit a validated new name for a channel
    RenameChannel { channel_id: String, new_name: String },
    /// The rename dialog closed; `refreshed` is true after a successful rename
    RenameClosed { channel_id: String, refreshed: bool },

    /// Run a file search (already debounced)
    SearchFiles { channel_id: String, query: String },
    /// Open a file URL in the system browser
    OpenUrl(String),

    /// Persist server settings and reconnect
    SaveServer {
        settings: Settings,
        api_secret: Option<String>,
    },
}
