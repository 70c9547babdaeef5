//! UI rendering modules for the Raven desktop client.
//!
//! - `panels`: sidebar and shared files panel
//! - `dialogs`: rename, file search and server settings windows, plus toasts
//! - `theme`: color schemes and styling utilities

pub mod dialogs;
pub mod panels;
pub mod theme;

pub use dialogs::*;
pub use panels::*;
pub use theme::*;
