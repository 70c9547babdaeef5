//! Rename channel dialog - edits the display name of the current channel.
//!
//! The dialog owns its editing state. Submitting validates locally and
//! returns a `DialogAction::RenameChannel`; the server's answer comes back
//! through `apply_result`, which decides the toast and whether to close.

use eframe::egui;

use super::DialogAction;
use crate::error::{RenameError, ValidationError};
use crate::models::{Channel, ChannelType};
use crate::state::Toast;
use crate::ui::theme::RavenTheme;
use crate::validation::{
    remaining_chars, sanitize_channel_name_input, validate_channel_name, RenameRules,
};

pub const RENAME_SUCCESS_TITLE: &str = "Channel name updated";
pub const RENAME_ERROR_TITLE: &str = "Error renaming channel";
pub const DUPLICATE_NAME_MESSAGE: &str = "Channel name already exists";

/// Self-contained rename dialog state.
pub struct RenameChannelDialog {
    channel_id: String,
    channel_type: ChannelType,
    /// Name when the dialog opened; restored on cancel
    original_name: String,
    /// Current field value. Edits are whitespace-free and at most
    /// `rules.limit` chars; the initial value is the name as stored.
    pub name_input: String,
    field_error: Option<ValidationError>,
    submit_error: Option<RenameError>,
    updating: bool,
    open: bool,
    focus_requested: bool,
    rules: RenameRules,
}

impl RenameChannelDialog {
    /// Open the dialog for `channel`, starting from its current name.
    pub fn new(channel: &Channel, rules: RenameRules) -> Self {
        Self {
            channel_id: channel.name.clone(),
            channel_type: channel.channel_type,
            original_name: channel.channel_name.clone(),
            name_input: channel.channel_name.clone(),
            field_error: None,
            submit_error: None,
            updating: false,
            open: true,
            focus_requested: false,
            rules,
        }
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// True while the rename request is in flight.
    pub fn is_updating(&self) -> bool {
        self.updating
    }

    pub fn field_error(&self) -> Option<&ValidationError> {
        self.field_error.as_ref()
    }

    pub fn submit_error(&self) -> Option<&RenameError> {
        self.submit_error.as_ref()
    }

    /// Replace the field value with sanitized input.
    pub fn set_input(&mut self, raw: &str) {
        self.name_input = sanitize_channel_name_input(raw, self.rules.limit);
    }

    /// Counter shown beside the field.
    pub fn remaining(&self) -> usize {
        remaining_chars(&self.name_input, self.rules.limit)
    }

    /// Validate and, if valid, mark the request in flight.
    /// Returns `None` when validation fails or a request is already running.
    pub fn submit(&mut self) -> Option<DialogAction> {
        if self.updating {
            return None;
        }

        if let Err(e) = validate_channel_name(&self.name_input, &self.rules) {
            self.field_error = Some(e);
            return None;
        }

        self.field_error = None;
        self.submit_error = None;
        self.updating = true;
        Some(DialogAction::RenameChannel {
            channel_id: self.channel_id.clone(),
            new_name: self.name_input.clone(),
        })
    }

    /// Discard edits and close. Ignored while a request is in flight.
    pub fn cancel(&mut self) -> Option<DialogAction> {
        if self.updating {
            return None;
        }
        self.name_input = self.original_name.clone();
        self.field_error = None;
        self.open = false;
        Some(DialogAction::RenameClosed {
            channel_id: self.channel_id.clone(),
            refreshed: false,
        })
    }

    /// Apply the server's answer. On success the dialog closes with a refresh;
    /// on failure it stays open so the user can retry.
    pub fn apply_result(&mut self, result: Result<(), RenameError>) -> (Toast, Option<DialogAction>) {
        self.updating = false;
        let toast = rename_toast(&result);
        match result {
            Ok(()) => {
                self.open = false;
                (
                    toast,
                    Some(DialogAction::RenameClosed {
                        channel_id: self.channel_id.clone(),
                        refreshed: true,
                    }),
                )
            }
            Err(e) => {
                self.submit_error = Some(e);
                (toast, None)
            }
        }
    }

    /// Render the dialog. Returns an action when the user submits or closes.
    pub fn render(&mut self, ctx: &egui::Context) -> Option<DialogAction> {
        if !self.open {
            return None;
        }

        let theme = RavenTheme::for_ctx(ctx);
        let updating = self.updating;
        let mut window_open = true;
        let mut submit_requested = false;
        let mut cancel_requested = false;

        let mut window = egui::Window::new("Rename this channel")
            .collapsible(false)
            .resizable(false)
            .default_width(440.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0]);
        // No close control while the update runs
        if !updating {
            window = window.open(&mut window_open);
        }

        window.show(ctx, |ui| {
            if let Some(err) = &self.submit_error {
                egui::Frame::new()
                    .fill(theme.error.gamma_multiply(0.15))
                    .corner_radius(6.0)
                    .inner_margin(egui::Margin::symmetric(10, 6))
                    .show(ui, |ui| {
                        ui.colored_label(theme.error, err.to_string());
                    });
                ui.add_space(6.0);
            }

            ui.label(egui::RichText::new("Channel name").strong());
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(self.channel_type.icon()).color(theme.text_muted));

                let mut buffer = self.name_input.clone();
                let response = ui.add(
                    egui::TextEdit::singleline(&mut buffer)
                        .char_limit(self.rules.limit)
                        .desired_width(320.0)
                        .interactive(!updating),
                );
                if !self.focus_requested {
                    response.request_focus();
                    self.focus_requested = true;
                }
                if response.changed() {
                    self.set_input(&buffer);
                }
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit_requested = true;
                }

                ui.label(
                    egui::RichText::new(self.remaining().to_string())
                        .size(12.0)
                        .color(theme.text_muted),
                );
            });

            ui.label(
                egui::RichText::new(format!(
                    "Names cannot be longer than {} characters.",
                    self.rules.limit
                ))
                .small()
                .color(theme.text_muted),
            );
            if let Some(err) = &self.field_error {
                ui.colored_label(theme.error, err.to_string());
            }

            ui.add_space(10.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if updating {
                    ui.add_enabled(false, egui::Button::new("Save Changes"));
                    ui.add(egui::Spinner::new());
                } else if ui
                    .add(egui::Button::new("Save Changes").fill(theme.accent))
                    .clicked()
                {
                    submit_requested = true;
                }

                if ui.add_enabled(!updating, egui::Button::new("Cancel")).clicked() {
                    cancel_requested = true;
                }
            });

            if !updating && ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                cancel_requested = true;
            }
        });

        if !window_open {
            cancel_requested = true;
        }

        if submit_requested {
            self.submit()
        } else if cancel_requested {
            self.cancel()
        } else {
            None
        }
    }
}

/// Toast for a rename outcome.
pub fn rename_toast(result: &Result<(), RenameError>) -> Toast {
    match result {
        Ok(()) => Toast::success(RENAME_SUCCESS_TITLE),
        Err(RenameError::Conflict) => Toast::error(RENAME_ERROR_TITLE, DUPLICATE_NAME_MESSAGE),
        Err(RenameError::Remote { status_text, .. }) => {
            Toast::error(RENAME_ERROR_TITLE, status_text.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ToastLevel;

    fn channel() -> Channel {
        Channel {
            name: "chan-001".into(),
            channel_name: "general".into(),
            channel_type: ChannelType::Public,
            is_direct_message: false,
        }
    }

    fn dialog() -> RenameChannelDialog {
        RenameChannelDialog::new(&channel(), RenameRules::default())
    }

    #[test]
    fn test_opens_with_current_name() {
        let d = dialog();
        assert!(d.is_open());
        assert_eq!(d.name_input, "general");
        assert_eq!(d.remaining(), 50 - "general".len());
        assert!(d.submit_error().is_none());
    }

    #[test]
    fn test_stored_name_with_spaces_is_shown_as_is() {
        let legacy = Channel {
            channel_name: "team chat".into(),
            ..channel()
        };
        let mut d = RenameChannelDialog::new(&legacy, RenameRules::default());
        assert_eq!(d.name_input, "team chat");
        assert_eq!(
            d.submit(),
            Some(DialogAction::RenameChannel {
                channel_id: "chan-001".into(),
                new_name: "team chat".into(),
            })
        );
    }

    #[test]
    fn test_typing_space_never_inserts_space() {
        let mut d = dialog();
        d.set_input("general ");
        assert_eq!(d.name_input, "general");
        d.set_input("dev ops team");
        assert!(!d.name_input.contains(' '));
        assert_eq!(d.remaining(), 50 - "devopsteam".len());
    }

    #[test]
    fn test_input_truncated_at_limit() {
        let mut d = dialog();
        d.set_input(&"a".repeat(70));
        assert_eq!(d.name_input.chars().count(), 50);
        assert_eq!(d.remaining(), 0);
    }

    #[test]
    fn test_empty_submit_is_rejected_without_request() {
        let mut d = dialog();
        d.set_input("");
        assert_eq!(d.submit(), None);
        assert_eq!(d.field_error(), Some(&ValidationError::Required));
        assert!(!d.is_updating());
    }

    #[test]
    fn test_valid_submit_marks_in_flight() {
        let mut d = dialog();
        d.set_input("announcements");
        assert_eq!(
            d.submit(),
            Some(DialogAction::RenameChannel {
                channel_id: "chan-001".into(),
                new_name: "announcements".into(),
            })
        );
        assert!(d.is_updating());
        // Second submit and cancel are blocked while updating
        assert_eq!(d.submit(), None);
        assert_eq!(d.cancel(), None);
        assert!(d.is_open());
    }

    #[test]
    fn test_success_closes_with_refresh() {
        let mut d = dialog();
        d.set_input("announcements");
        d.submit();
        let (toast, action) = d.apply_result(Ok(()));
        assert_eq!(toast.title, RENAME_SUCCESS_TITLE);
        assert_eq!(toast.level, ToastLevel::Success);
        assert_eq!(
            action,
            Some(DialogAction::RenameClosed {
                channel_id: "chan-001".into(),
                refreshed: true,
            })
        );
        assert!(!d.is_open());
    }

    #[test]
    fn test_conflict_shows_duplicate_message_and_stays_open() {
        let mut d = dialog();
        d.set_input("random");
        d.submit();
        let (toast, action) = d.apply_result(Err(RenameError::Conflict));
        assert_eq!(toast.title, RENAME_ERROR_TITLE);
        assert_eq!(toast.description.as_deref(), Some(DUPLICATE_NAME_MESSAGE));
        assert_eq!(action, None);
        assert!(d.is_open());
        assert!(!d.is_updating());
        assert_eq!(d.submit_error(), Some(&RenameError::Conflict));
    }

    #[test]
    fn test_other_failure_shows_status_text() {
        let mut d = dialog();
        d.set_input("random");
        d.submit();
        let (toast, _) = d.apply_result(Err(RenameError::Remote {
            status: Some(403),
            status_text: "Forbidden".into(),
        }));
        assert_eq!(toast.description.as_deref(), Some("Forbidden"));
        assert_eq!(toast.level, ToastLevel::Error);

        // Retry clears the previous error
        assert!(d.submit().is_some());
        assert!(d.submit_error().is_none());
    }

    #[test]
    fn test_cancel_restores_original_name() {
        let mut d = dialog();
        d.set_input("something-else");
        assert_eq!(
            d.cancel(),
            Some(DialogAction::RenameClosed {
                channel_id: "chan-001".into(),
                refreshed: false,
            })
        );
        assert_eq!(d.name_input, "general");
        assert!(!d.is_open());
    }
}
