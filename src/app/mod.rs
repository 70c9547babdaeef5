//! Application module structure for RavenApp
//!
//! - `core`: RavenApp struct, initialization and navigation
//! - `events`: Event processing from backend
//! - `update`: Main update loop
//! - `dialogs`: Dialog rendering and action handling
//! - `ui::panels`: Top bar, sidebar and central panel rendering

pub mod core;
pub mod dialogs;
pub mod events;
pub mod ui;
pub mod update;

pub use core::RavenApp;
