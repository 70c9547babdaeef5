//! Dialog rendering orchestration

use eframe::egui;

use super::RavenApp;
use crate::config::{save_settings, store_api_secret};
use crate::protocol::BackendAction;
use crate::state::Toast;
use crate::ui;
use crate::ui::dialogs::DialogAction;
use crate::validation::RenameRules;

impl RavenApp {
    /// Render all dialogs and handle their actions
    pub(super) fn render_dialogs(&mut self, ctx: &egui::Context) {
        // Floating toasts (top-right corner)
        ui::dialogs::render_status_toasts(ctx, &self.state.toasts);

        let members = self
            .dialogs
            .search_channel()
            .map(|id| self.state.members_of(id).clone())
            .unwrap_or_default();
        let base_url = self.state.server.clone();
        let actions = self.dialogs.render(ctx, &members, base_url.as_deref());

        for action in actions {
            self.handle_dialog_action(action);
        }
    }

    /// Handle dialog actions by sending appropriate backend commands
    pub fn handle_dialog_action(&mut self, action: DialogAction) {
        match action {
            DialogAction::RenameChannel {
                channel_id,
                new_name,
            } => {
                tracing::info!(%channel_id, %new_name, "Renaming channel");
                self.send(BackendAction::RenameChannel {
                    channel_id,
                    new_name,
                });
            }
            DialogAction::RenameClosed {
                channel_id,
                refreshed,
            } => {
                if refreshed {
                    tracing::debug!(%channel_id, "Refreshing channel list after rename");
                    self.send(BackendAction::FetchChannels);
                }
            }
            DialogAction::SearchFiles { channel_id, query } => {
                self.send(BackendAction::SearchFiles { channel_id, query });
            }
            DialogAction::OpenUrl(url) => self.open_url(url),
            DialogAction::SaveServer {
                settings,
                api_secret,
            } => {
                if let Some(secret) = api_secret {
                    if let Err(e) = store_api_secret(&settings.api_key, &secret) {
                        tracing::warn!(error = %e, "Failed to store API secret");
                        self.state
                            .push_toast(Toast::error("Could not store API secret", e.to_string()));
                    }
                }
                self.rename_rules =
                    RenameRules::with_pattern(settings.channel_name_pattern.as_deref());
                self.settings = settings;
                if self.persist_on_exit {
                    if let Err(e) = save_settings(&self.settings) {
                        tracing::error!(error = %e, "Failed to save settings");
                    }
                }
                self.state.push_toast(
                    Toast::info("Server settings saved")
                        .with_description(self.settings.server_url.clone()),
                );
                self.configure_backend();
                self.send(BackendAction::FetchChannels);
                self.send(BackendAction::FetchUnreadCounts);
                if let Some(action) = self.files.refresh() {
                    self.send(action);
                }
            }
        }
    }
}
