//! Modal dialogs and windows - self-contained dialog components.
//!
//! Each dialog owns its editing state and returns `DialogAction`s
//! instead of mutating external state directly.
//!
//! Dialogs are stored as `Option<Dialog>` in the `DialogManager`:
//! - `None` = dialog is closed
//! - `Some(dialog)` = dialog is open with its state

mod actions;
mod file_search;
mod rename_channel;
mod server_settings;
mod status_toasts;

pub use actions::DialogAction;
pub use file_search::{FileSearchDialog, SEARCH_DEBOUNCE};
pub use rename_channel::{
    rename_toast, RenameChannelDialog, DUPLICATE_NAME_MESSAGE, RENAME_ERROR_TITLE,
    RENAME_SUCCESS_TITLE,
};
pub use server_settings::{ServerForm, ServerSettingsDialog};
pub use status_toasts::render_status_toasts;
