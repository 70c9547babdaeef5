//! Main update loop

use eframe::egui;
use std::time::{Duration, Instant};

use super::RavenApp;

impl eframe::App for RavenApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Process backend events
        self.process_events();

        // Request repaint to keep checking for events
        ctx.request_repaint_after(Duration::from_millis(100));
        self.state.purge_expired_toasts(Instant::now());

        self.render_top_bar(ctx);
        self.render_sidebar(ctx);
        self.render_central_panel(ctx);
        self.render_dialogs(ctx);

        for url in self.pending_urls.drain(..) {
            ctx.open_url(egui::OpenUrl::new_tab(url));
        }
    }
}
