//! Toast notifications - floating messages in the top-right corner.

use eframe::egui;

use crate::state::{Toast, ToastLevel};
use crate::ui::theme::RavenTheme;

/// Render active toasts, newest last.
pub fn render_status_toasts(ctx: &egui::Context, toasts: &[Toast]) {
    if toasts.is_empty() {
        return;
    }
    let theme = RavenTheme::for_ctx(ctx);

    egui::Area::new(egui::Id::new("status_toast_area"))
        .anchor(egui::Align2::RIGHT_TOP, [-10.0, 50.0])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            for toast in toasts {
                let accent = match toast.level {
                    ToastLevel::Success => theme.success,
                    ToastLevel::Error => theme.error,
                    ToastLevel::Info => theme.accent,
                };
                egui::Frame::new()
                    .fill(theme.surface[2])
                    .stroke(egui::Stroke::new(1.0, accent))
                    .corner_radius(6.0)
                    .inner_margin(egui::Margin::symmetric(12, 8))
                    .show(ui, |ui| {
                        ui.set_max_width(320.0);
                        ui.label(egui::RichText::new(&toast.title).strong().color(accent));
                        if let Some(description) = &toast.description {
                            ui.label(egui::RichText::new(description).color(theme.text_secondary));
                        }
                    });
                ui.add_space(6.0);
            }
        });
}
