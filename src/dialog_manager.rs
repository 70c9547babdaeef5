//! Dialog management for centralized dialog state and rendering.
//!
//! Consolidates the rename, file search and server settings dialogs so the
//! app only deals with opening them and handling their actions.

use std::time::Instant;

use eframe::egui::Context;

use crate::config::Settings;
use crate::error::{FetchError, RenameError};
use crate::models::{Channel, ChannelFile, ChannelMembers};
use crate::state::Toast;
use crate::ui::dialogs::{
    rename_toast, DialogAction, FileSearchDialog, RenameChannelDialog, ServerSettingsDialog,
};
use crate::validation::RenameRules;

/// Manages all application dialogs in one place.
///
/// Uses the Option<Dialog> pattern where None = closed, Some = open.
#[derive(Default)]
pub struct DialogManager {
    pub rename_dialog: Option<RenameChannelDialog>,
    pub file_search_dialog: Option<FileSearchDialog>,
    pub server_settings_dialog: Option<ServerSettingsDialog>,
}

impl DialogManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the rename dialog for a channel.
    ///
    /// An open dialog for the same channel keeps its edits, and a dialog with
    /// a request in flight is never replaced.
    pub fn open_rename(&mut self, channel: &Channel, rules: RenameRules) {
        if let Some(dialog) = &self.rename_dialog {
            if dialog.is_updating() || dialog.channel_id() == channel.name {
                return;
            }
        }
        self.rename_dialog = Some(RenameChannelDialog::new(channel, rules));
    }

    /// Open the file search dialog scoped to a channel.
    pub fn open_file_search(&mut self, channel_id: &str, channel_label: &str, now: Instant) {
        self.file_search_dialog = Some(FileSearchDialog::new(channel_id, channel_label, now));
    }

    pub fn open_server_settings(&mut self, settings: &Settings) {
        self.server_settings_dialog = Some(ServerSettingsDialog::new(settings));
    }

    /// Channel the open search dialog is scoped to.
    pub fn search_channel(&self) -> Option<&str> {
        self.file_search_dialog.as_ref().map(|d| d.channel_id())
    }

    /// Route a rename outcome to the dialog that requested it.
    ///
    /// The toast is produced even if the dialog is gone; the follow-up action
    /// (close with refresh) only comes from a matching dialog.
    pub fn rename_result(
        &mut self,
        channel_id: &str,
        result: Result<(), RenameError>,
    ) -> (Toast, Option<DialogAction>) {
        match self.rename_dialog.as_mut() {
            Some(dialog) if dialog.channel_id() == channel_id => {
                let outcome = dialog.apply_result(result);
                if !dialog.is_open() {
                    self.rename_dialog = None;
                }
                outcome
            }
            _ => {
                let refreshed = result.is_ok();
                let toast = rename_toast(&result);
                let action = refreshed.then(|| DialogAction::RenameClosed {
                    channel_id: channel_id.to_string(),
                    refreshed,
                });
                (toast, action)
            }
        }
    }

    /// Hand search results to the open search dialog.
    pub fn apply_search_results(
        &mut self,
        channel_id: &str,
        query: &str,
        result: Result<Vec<ChannelFile>, FetchError>,
    ) {
        if let Some(dialog) = self.file_search_dialog.as_mut() {
            dialog.apply_results(channel_id, query, result);
        }
    }

    /// Render all dialogs and collect their actions.
    ///
    /// `search_members` are the members of the search dialog's channel.
    pub fn render(
        &mut self,
        ctx: &Context,
        search_members: &ChannelMembers,
        base_url: Option<&str>,
    ) -> Vec<DialogAction> {
        let mut actions: Vec<DialogAction> = Vec::new();

        let mut close_rename = false;
        if let Some(ref mut dialog) = self.rename_dialog {
            if let Some(action) = dialog.render(ctx) {
                actions.push(action);
            }
            if !dialog.is_open() {
                close_rename = true;
            }
        }
        if close_rename {
            self.rename_dialog = None;
        }

        let mut close_search = false;
        if let Some(ref mut dialog) = self.file_search_dialog {
            actions.extend(dialog.render(ctx, search_members, base_url));
            if !dialog.is_open() {
                close_search = true;
            }
        }
        if close_search {
            self.file_search_dialog = None;
        }

        let mut close_settings = false;
        if let Some(ref mut dialog) = self.server_settings_dialog {
            if let Some(action) = dialog.render(ctx) {
                actions.push(action);
            }
            if !dialog.is_open() {
                close_settings = true;
            }
        }
        if close_settings {
            self.server_settings_dialog = None;
        }

        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChannelType;
    use crate::ui::dialogs::{DUPLICATE_NAME_MESSAGE, RENAME_SUCCESS_TITLE};

    fn channel() -> Channel {
        Channel {
            name: "chan-001".into(),
            channel_name: "general".into(),
            channel_type: ChannelType::Open,
            is_direct_message: false,
        }
    }

    #[test]
    fn test_dialog_manager_new() {
        let dm = DialogManager::new();
        assert!(dm.rename_dialog.is_none());
        assert!(dm.file_search_dialog.is_none());
        assert!(dm.server_settings_dialog.is_none());
    }

    #[test]
    fn test_open_file_search() {
        let mut dm = DialogManager::new();
        dm.open_file_search("chan-001", "general", Instant::now());
        assert_eq!(dm.search_channel(), Some("chan-001"));
    }

    #[test]
    fn test_rename_success_closes_dialog() {
        let mut dm = DialogManager::new();
        dm.open_rename(&channel(), RenameRules::default());
        if let Some(dialog) = dm.rename_dialog.as_mut() {
            dialog.set_input("announcements");
            assert!(dialog.submit().is_some());
        }

        let (toast, action) = dm.rename_result("chan-001", Ok(()));
        assert_eq!(toast.title, RENAME_SUCCESS_TITLE);
        assert!(matches!(
            action,
            Some(DialogAction::RenameClosed { refreshed: true, .. })
        ));
        assert!(dm.rename_dialog.is_none());
    }

    #[test]
    fn test_rename_conflict_keeps_dialog_open() {
        let mut dm = DialogManager::new();
        dm.open_rename(&channel(), RenameRules::default());
        if let Some(dialog) = dm.rename_dialog.as_mut() {
            dialog.submit();
        }

        let (toast, action) = dm.rename_result("chan-001", Err(RenameError::Conflict));
        assert_eq!(toast.description.as_deref(), Some(DUPLICATE_NAME_MESSAGE));
        assert_eq!(action, None);
        assert!(dm.rename_dialog.is_some());
    }

    #[test]
    fn test_reopening_rename_keeps_in_flight_lock() {
        let mut dm = DialogManager::new();
        dm.open_rename(&channel(), RenameRules::default());
        if let Some(dialog) = dm.rename_dialog.as_mut() {
            dialog.set_input("first");
            assert!(dialog.submit().is_some());
        }

        dm.open_rename(&channel(), RenameRules::default());
        let other = Channel {
            name: "chan-002".into(),
            ..channel()
        };
        dm.open_rename(&other, RenameRules::default());

        let dialog = dm.rename_dialog.as_mut().unwrap();
        assert_eq!(dialog.channel_id(), "chan-001");
        assert!(dialog.is_updating());
        assert_eq!(dialog.name_input, "first");
        assert_eq!(dialog.cancel(), None);
        assert_eq!(dialog.submit(), None);
    }

    #[test]
    fn test_open_rename_switches_idle_dialog_to_new_channel() {
        let mut dm = DialogManager::new();
        dm.open_rename(&channel(), RenameRules::default());
        let other = Channel {
            name: "chan-002".into(),
            channel_name: "random".into(),
            ..channel()
        };
        dm.open_rename(&other, RenameRules::default());
        let dialog = dm.rename_dialog.as_ref().unwrap();
        assert_eq!(dialog.channel_id(), "chan-002");
        assert_eq!(dialog.name_input, "random");
    }

    #[test]
    fn test_rename_result_without_dialog_still_toasts() {
        let mut dm = DialogManager::new();
        let (toast, action) = dm.rename_result("chan-001", Ok(()));
        assert_eq!(toast.title, RENAME_SUCCESS_TITLE);
        assert!(action.is_some());
    }
}
