//! Raven desktop client library.
//!
//! This module re-exports the core components for testing and extension.

pub mod api;
pub mod app;
pub mod backend;
pub mod config;
pub mod dialog_manager;
pub mod error;
pub mod files;
pub mod logging;
pub mod models;
pub mod protocol;
pub mod route;
pub mod state;
pub mod ui;
pub mod validation;
