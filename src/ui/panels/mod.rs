//! Side and content panels (sidebar, shared files).

pub mod shared_files;
pub mod sidebar;

pub use shared_files::{render_file_row, FilesView, SharedFilesPanel, EMPTY_FILES_HINT};
pub use sidebar::SidebarList;

use crate::route::Route;

/// What a panel asks the app to do after a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelAction {
    Navigate(Route),
    OpenUrl(String),
    /// Open the file search dialog scoped to a channel
    ShowMoreFiles { channel_id: String },
    /// Fetch the tracked channel's files again after a failure
    RetryFiles,
}
