//! Raven desktop client - a team chat client for Frappe/Raven servers
//!
//! Architecture:
//! - Main thread: runs the egui UI
//! - Backend thread: runs a Tokio runtime for HTTP calls and the realtime socket
//! - Communication via crossbeam channels (lock-free, sync-safe)

use eframe::egui;

use raven_desk::app::RavenApp;
use raven_desk::logging::init_tracing;
use raven_desk::route::Route;

fn main() -> eframe::Result<()> {
    init_tracing();

    // Optional initial path, e.g. `/channel/general`
    let initial_route = std::env::args().nth(1).map(|path| Route::parse(&path));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 680.0])
            .with_min_inner_size([560.0, 380.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Raven",
        options,
        Box::new(move |cc| Ok(Box::new(RavenApp::new(cc, initial_route)))),
    )
}
