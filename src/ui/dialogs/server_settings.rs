//! Server settings dialog - edit the backend URL and API credentials.

use eframe::egui;

use super::DialogAction;
use crate::config::Settings;
use crate::validation::validate_server_url;

/// Form state for the server settings.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct ServerForm {
    pub server_url: String,
    pub socket_url: String,
    pub site_name: String,
    pub api_key: String,
    /// Left empty to keep the stored secret
    pub api_secret: String,
}

impl ServerForm {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            server_url: settings.server_url.clone(),
            socket_url: settings.socket_url.clone().unwrap_or_default(),
            site_name: settings.site_name.clone().unwrap_or_default(),
            api_key: settings.api_key.clone(),
            api_secret: String::new(),
        }
    }

    /// Merge the form into `base`, keeping fields the form does not edit.
    pub fn to_settings(&self, base: &Settings) -> Settings {
        let optional = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        Settings {
            server_url: self.server_url.trim().to_string(),
            socket_url: optional(&self.socket_url),
            site_name: optional(&self.site_name),
            api_key: self.api_key.trim().to_string(),
            ..base.clone()
        }
    }

    /// Error text for the URL field, if invalid.
    pub fn url_error(&self) -> Option<String> {
        validate_server_url(self.server_url.trim())
            .err()
            .map(|e| e.to_string())
    }
}

pub struct ServerSettingsDialog {
    base: Settings,
    form: ServerForm,
    open: bool,
}

impl ServerSettingsDialog {
    pub fn new(settings: &Settings) -> Self {
        Self {
            base: settings.clone(),
            form: ServerForm::from_settings(settings),
            open: true,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn form_mut(&mut self) -> &mut ServerForm {
        &mut self.form
    }

    /// Validate and produce the save action; closes on success.
    pub fn save(&mut self) -> Option<DialogAction> {
        if self.form.url_error().is_some() {
            return None;
        }
        let secret = self.form.api_secret.trim();
        let action = DialogAction::SaveServer {
            settings: self.form.to_settings(&self.base),
            api_secret: (!secret.is_empty()).then(|| secret.to_string()),
        };
        self.open = false;
        Some(action)
    }

    pub fn render(&mut self, ctx: &egui::Context) -> Option<DialogAction> {
        if !self.open {
            return None;
        }
        let mut action = None;
        let mut window_open = true;
        let mut cancel = false;

        egui::Window::new("Server Settings")
            .open(&mut window_open)
            .collapsible(false)
            .resizable(false)
            .default_width(460.0)
            .show(ctx, |ui| {
                egui::Grid::new("server_form")
                    .num_columns(2)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("Server URL:");
                        ui.text_edit_singleline(&mut self.form.server_url);
                        ui.end_row();

                        ui.label("Realtime URL:");
                        ui.text_edit_singleline(&mut self.form.socket_url);
                        ui.end_row();

                        ui.label("");
                        ui.label(
                            egui::RichText::new("(Optional, defaults to the server URL)")
                                .small()
                                .weak(),
                        );
                        ui.end_row();

                        ui.label("Site name:");
                        ui.text_edit_singleline(&mut self.form.site_name);
                        ui.end_row();

                        ui.label("API key:");
                        ui.text_edit_singleline(&mut self.form.api_key);
                        ui.end_row();

                        ui.label("API secret:");
                        ui.add(egui::TextEdit::singleline(&mut self.form.api_secret).password(true));
                        ui.end_row();

                        ui.label("");
                        ui.label(
                            egui::RichText::new("(Stored in system keyring, blank keeps current)")
                                .small()
                                .weak(),
                        );
                        ui.end_row();
                    });

                let url_error = self.form.url_error();
                if let Some(err) = &url_error {
                    ui.colored_label(egui::Color32::from_rgb(220, 80, 80), err);
                }

                ui.separator();
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(url_error.is_none(), egui::Button::new("Save"))
                        .clicked()
                    {
                        action = self.save();
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if !window_open || cancel {
            self.open = false;
        }
        action
    }
}
