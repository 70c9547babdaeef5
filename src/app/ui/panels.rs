//! Top bar, sidebar and central panel rendering

use eframe::egui;
use std::time::Instant;

use crate::app::RavenApp;
use crate::route::Route;
use crate::ui::panels::PanelAction;

impl RavenApp {
    /// Render the bar at the top of the window
    pub(in crate::app) fn render_top_bar(&mut self, ctx: &egui::Context) {
        let theme = self.get_theme();
        let mut open_settings = false;
        let mut toggle_theme = false;

        egui::TopBottomPanel::top("top_bar")
            .frame(
                egui::Frame::new()
                    .fill(theme.surface[1])
                    .inner_margin(egui::Margin::symmetric(12, 6))
                    .stroke(egui::Stroke::new(1.0, theme.border_medium)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Raven").strong().size(15.0));
                    ui.separator();

                    let (dot, status) = match (&self.state.server, self.state.realtime_connected) {
                        (Some(server), true) => (theme.success, server.as_str()),
                        (Some(server), false) => (theme.warning, server.as_str()),
                        (None, _) => (theme.text_muted, "Not configured"),
                    };
                    ui.colored_label(dot, "●");
                    ui.label(egui::RichText::new(status).size(12.0).color(theme.text_secondary));

                    let unread = self.sidebar.unread().total();
                    if unread > 0 {
                        ui.separator();
                        ui.label(
                            egui::RichText::new(format!("{} unread", unread))
                                .size(12.0)
                                .strong()
                                .color(theme.accent),
                        );
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("⚙ Server").clicked() {
                            open_settings = true;
                        }
                        let theme_icon = if self.settings.theme == "light" { "🌙" } else { "☀" };
                        if ui.small_button(theme_icon).on_hover_text("Toggle theme").clicked() {
                            toggle_theme = true;
                        }
                    });
                });
            });

        if open_settings {
            self.dialogs.open_server_settings(&self.settings);
        }
        if toggle_theme {
            self.settings.theme = if self.settings.theme == "light" {
                "dark".to_string()
            } else {
                "light".to_string()
            };
            crate::ui::theme::apply_app_style(ctx, &self.settings.theme);
        }
    }

    /// Render the left sidebar
    pub(in crate::app) fn render_sidebar(&mut self, ctx: &egui::Context) {
        let channels = self.state.channels.data().cloned().unwrap_or_default();
        if let Some(action) = self.sidebar.render(ctx, &channels, &self.state.route) {
            self.handle_panel_action(action);
        }
    }

    /// Render the central panel: channel header and shared files
    pub(in crate::app) fn render_central_panel(&mut self, ctx: &egui::Context) {
        let theme = self.get_theme();
        let mut action = None;
        let mut rename_requested = false;

        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme.surface[0])
                    .inner_margin(egui::Margin::same(16)),
            )
            .show(ctx, |ui| match &self.state.route {
                Route::Home => {
                    ui.label(
                        egui::RichText::new("Select a channel from the sidebar")
                            .color(theme.text_muted),
                    );
                }
                Route::SavedMessages => {
                    ui.heading("Saved Messages");
                }
                Route::Channel(channel_id) => {
                    match self.state.channel(channel_id) {
                        Some(channel) => {
                            ui.horizontal(|ui| {
                                ui.label(
                                    egui::RichText::new(channel.channel_type.icon())
                                        .color(theme.text_muted),
                                );
                                ui.heading(&channel.channel_name);
                                if !channel.is_direct_message
                                    && ui.small_button("✏ Rename").clicked()
                                {
                                    rename_requested = true;
                                }
                            });
                        }
                        None => {
                            ui.heading(channel_id.as_str());
                        }
                    }
                    ui.separator();
                    ui.add_space(8.0);

                    let members = self.state.members_of(channel_id);
                    action = self.files.render(
                        ui,
                        members,
                        self.state.server.as_deref(),
                        &theme,
                    );
                }
            });

        if rename_requested {
            if let Some(channel) = self.state.current_channel().cloned() {
                self.dialogs.open_rename(&channel, self.rename_rules.clone());
            }
        }
        if let Some(action) = action {
            self.handle_panel_action(action);
        }
    }

    pub fn handle_panel_action(&mut self, action: PanelAction) {
        match action {
            PanelAction::Navigate(route) => self.navigate(route),
            PanelAction::OpenUrl(url) => self.open_url(url),
            PanelAction::ShowMoreFiles { channel_id } => {
                let label = self
                    .state
                    .channel(&channel_id)
                    .map(|c| c.channel_name.clone())
                    .unwrap_or_else(|| channel_id.clone());
                self.dialogs
                    .open_file_search(&channel_id, &label, Instant::now());
            }
            PanelAction::RetryFiles => {
                if let Some(action) = self.files.refresh() {
                    self.send(action);
                }
            }
        }
    }
}
