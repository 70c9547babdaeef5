//! Recently shared files of the current channel.
//!
//! The panel fetches when the tracked channel id changes and only then;
//! re-rendering or regaining focus never triggers a request. Results for a
//! channel that is no longer tracked are dropped.

use eframe::egui;

use super::PanelAction;
use crate::error::FetchError;
use crate::files::{extension_icon, file_name, format_shared_date, resolve_file_url};
use crate::models::{ChannelFile, ChannelMembers, FileKind};
use crate::protocol::BackendAction;
use crate::state::Fetch;
use crate::ui::theme::RavenTheme;

pub const FILES_HEADER: &str = "Recently shared files";
pub const EMPTY_FILES_HINT: &str = "No files have been shared in this channel yet. Drag and drop any file into the message pane to add it to this conversation.";
const LIST_MAX_HEIGHT: f32 = 320.0;

/// Which parts of the panel are visible for the current fetch state.
#[derive(Debug, PartialEq)]
pub struct FilesView<'a> {
    pub show_header: bool,
    pub show_empty_hint: bool,
    pub show_more: bool,
    pub loading: bool,
    pub banner: Option<&'a FetchError>,
    pub files: &'a [ChannelFile],
}

#[derive(Default)]
pub struct SharedFilesPanel {
    channel_id: Option<String>,
    files: Fetch<Vec<ChannelFile>>,
}

impl SharedFilesPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channel_id(&self) -> Option<&str> {
        self.channel_id.as_deref()
    }

    /// Point the panel at `channel_id`. Returns a fetch only when the id changed.
    pub fn track_channel(&mut self, channel_id: &str) -> Option<BackendAction> {
        if self.channel_id.as_deref() == Some(channel_id) {
            return None;
        }
        self.channel_id = Some(channel_id.to_string());
        self.files = Fetch::Loading;
        Some(BackendAction::FetchRecentFiles(channel_id.to_string()))
    }

    /// Stop tracking; cancels the pending request if there is one.
    pub fn unmount(&mut self) -> Option<BackendAction> {
        self.channel_id.take()?;
        let pending = self.files.is_loading();
        self.files = Fetch::Idle;
        pending.then_some(BackendAction::CancelRecentFiles)
    }

    /// Fetch again for the tracked channel.
    pub fn refresh(&mut self) -> Option<BackendAction> {
        let channel_id = self.channel_id.clone()?;
        self.files = Fetch::Loading;
        Some(BackendAction::FetchRecentFiles(channel_id))
    }

    /// Store a response. Returns false when it belongs to another channel.
    pub fn apply(&mut self, channel_id: &str, result: Result<Vec<ChannelFile>, FetchError>) -> bool {
        if self.channel_id.as_deref() != Some(channel_id) {
            tracing::debug!(%channel_id, "Dropping stale recent-files response");
            return false;
        }
        self.files = result.into();
        true
    }

    pub fn view(&self) -> FilesView<'_> {
        let files: &[ChannelFile] = self.files.data().map(Vec::as_slice).unwrap_or(&[]);
        let loaded = self.files.data().is_some();
        FilesView {
            show_header: loaded && !files.is_empty(),
            show_empty_hint: loaded && files.is_empty(),
            show_more: loaded && !files.is_empty(),
            loading: self.files.is_loading(),
            banner: self.files.error(),
            files,
        }
    }

    /// Render into `ui`. `members` resolves owner ids to display names and
    /// `base_url` turns server-relative file paths into links.
    pub fn render(
        &self,
        ui: &mut egui::Ui,
        members: &ChannelMembers,
        base_url: Option<&str>,
        theme: &RavenTheme,
    ) -> Option<PanelAction> {
        let view = self.view();
        let mut action = None;

        if view.show_header {
            ui.label(egui::RichText::new(FILES_HEADER).strong().size(13.0));
        }

        if let Some(err) = view.banner {
            egui::Frame::new()
                .fill(theme.error.gamma_multiply(0.15))
                .corner_radius(6.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            ui.colored_label(
                                theme.error,
                                egui::RichText::new(&err.message).strong(),
                            );
                            ui.label(egui::RichText::new(err.status_line()).small());
                        });
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Retry").clicked() {
                                action = Some(PanelAction::RetryFiles);
                            }
                        });
                    });
                });
        }

        if view.loading {
            ui.horizontal(|ui| {
                ui.add(egui::Spinner::new());
                ui.label(egui::RichText::new("Loading files…").color(theme.text_muted));
            });
        }

        if !view.files.is_empty() {
            egui::ScrollArea::vertical()
                .id_salt("shared_files_list")
                .max_height(LIST_MAX_HEIGHT)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for file in view.files {
                        if let Some(url) = render_file_row(ui, file, members, base_url, theme) {
                            action = Some(PanelAction::OpenUrl(url));
                        }
                        ui.add_space(4.0);
                    }
                });
        }

        if view.show_empty_hint {
            ui.label(
                egui::RichText::new(EMPTY_FILES_HINT)
                    .size(12.0)
                    .color(theme.text_muted),
            );
        }

        if view.show_more {
            let show_more = ui.add(
                egui::Button::new(egui::RichText::new("Show more").color(theme.accent))
                    .frame(false),
            );
            if show_more.clicked() {
                if let Some(channel_id) = &self.channel_id {
                    action = Some(PanelAction::ShowMoreFiles {
                        channel_id: channel_id.clone(),
                    });
                }
            }
        }

        action
    }
}

/// One file entry: preview, linked name, attribution and download button.
/// Returns the URL to open when the name or download button is clicked.
pub fn render_file_row(
    ui: &mut egui::Ui,
    file: &ChannelFile,
    members: &ChannelMembers,
    base_url: Option<&str>,
    theme: &RavenTheme,
) -> Option<String> {
    let mut open = None;
    let url = resolve_file_url(base_url, &file.file);

    egui::Frame::new()
        .stroke(egui::Stroke::new(1.0, theme.border_medium))
        .corner_radius(6.0)
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                match file.message_type {
                    FileKind::File => {
                        ui.label(egui::RichText::new(extension_icon(&file.file)).size(26.0));
                    }
                    FileKind::Image => {
                        let preview = resolve_file_url(base_url, file.preview_url());
                        ui.label(egui::RichText::new("🖼").size(26.0))
                            .on_hover_text(format!("File preview: {}", preview));
                    }
                }

                ui.vertical(|ui| {
                    let name = ui.add(
                        egui::Label::new(
                            egui::RichText::new(file_name(&file.file)).size(13.0).underline(),
                        )
                        .sense(egui::Sense::click()),
                    );
                    if name.clicked() {
                        open = Some(url.clone());
                    }
                    ui.label(
                        egui::RichText::new(attribution(file, members))
                            .size(11.0)
                            .color(theme.text_muted),
                    );
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .small_button("⬇")
                        .on_hover_text("download file")
                        .clicked()
                    {
                        open = Some(url.clone());
                    }
                });
            });
        });

    open
}

/// "Shared by <name> on <date>"; unknown owners fall back to their id.
pub fn attribution(file: &ChannelFile, members: &ChannelMembers) -> String {
    let who = members
        .get(&file.owner)
        .map(|m| m.full_name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(&file.owner);
    format!("Shared by {} on {}", who, format_shared_date(&file.creation))
}
