//! File search dialog, opened from "Show more" in the shared files panel.
//!
//! Typing restarts a debounce timer; the search is issued by `poll` once the
//! query has been stable for `SEARCH_DEBOUNCE`. Only results matching the
//! latest issued query are kept.

use std::time::{Duration, Instant};

use eframe::egui;

use super::DialogAction;
use crate::error::FetchError;
use crate::models::{ChannelFile, ChannelMembers};
use crate::state::Fetch;
use crate::ui::panels::render_file_row;
use crate::ui::theme::RavenTheme;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

pub struct FileSearchDialog {
    channel_id: String,
    channel_label: String,
    query: String,
    /// Query and edit time waiting for the debounce to elapse
    pending: Option<(String, Instant)>,
    /// Last query sent to the backend
    issued: Option<String>,
    results: Fetch<Vec<ChannelFile>>,
    open: bool,
}

impl FileSearchDialog {
    /// Open scoped to a channel. An empty query is searched right away so the
    /// dialog starts with the channel's files.
    pub fn new(channel_id: impl Into<String>, channel_label: impl Into<String>, now: Instant) -> Self {
        Self {
            channel_id: channel_id.into(),
            channel_label: channel_label.into(),
            query: String::new(),
            pending: Some((String::new(), now.checked_sub(SEARCH_DEBOUNCE).unwrap_or(now))),
            issued: None,
            results: Fetch::Idle,
            open: true,
        }
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn results(&self) -> &Fetch<Vec<ChannelFile>> {
        &self.results
    }

    pub fn close(&mut self) {
        self.open = false;
        self.pending = None;
    }

    /// Record an edit of the query box.
    pub fn set_query(&mut self, query: impl Into<String>, now: Instant) {
        let query = query.into();
        if query == self.query && self.pending.is_none() {
            return;
        }
        self.query = query.clone();
        self.pending = Some((query, now));
    }

    /// Issue the pending search once the debounce has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<DialogAction> {
        let (query, edited) = self.pending.as_ref()?;
        if now.duration_since(*edited) < SEARCH_DEBOUNCE {
            return None;
        }
        let query = query.trim().to_string();
        self.pending = None;
        if self.issued.as_deref() == Some(query.as_str()) && !self.results.is_loading() {
            return None;
        }
        self.issued = Some(query.clone());
        self.results = Fetch::Loading;
        Some(DialogAction::SearchFiles {
            channel_id: self.channel_id.clone(),
            query,
        })
    }

    /// Store results. Returns false when they answer a superseded query.
    pub fn apply_results(
        &mut self,
        channel_id: &str,
        query: &str,
        result: Result<Vec<ChannelFile>, FetchError>,
    ) -> bool {
        if channel_id != self.channel_id || self.issued.as_deref() != Some(query) {
            tracing::debug!(%channel_id, %query, "Dropping superseded search results");
            return false;
        }
        self.results = result.into();
        true
    }

    /// Render the dialog. Returns any searches to issue and URLs to open.
    pub fn render(
        &mut self,
        ctx: &egui::Context,
        members: &ChannelMembers,
        base_url: Option<&str>,
    ) -> Vec<DialogAction> {
        let mut actions = Vec::new();
        if !self.open {
            return actions;
        }

        let theme = RavenTheme::for_ctx(ctx);
        let now = Instant::now();
        let mut window_open = true;

        egui::Window::new(format!("Files in {}", self.channel_label))
            .open(&mut window_open)
            .collapsible(false)
            .resizable(true)
            .default_width(520.0)
            .default_height(480.0)
            .show(ctx, |ui| {
                let mut buffer = self.query.clone();
                let response = ui.add(
                    egui::TextEdit::singleline(&mut buffer)
                        .hint_text("🔍 Search files...")
                        .desired_width(f32::INFINITY),
                );
                if response.changed() {
                    self.set_query(buffer, now);
                }
                ui.add_space(8.0);

                match &self.results {
                    Fetch::Idle => {}
                    Fetch::Loading => {
                        ui.horizontal(|ui| {
                            ui.add(egui::Spinner::new());
                            ui.label(egui::RichText::new("Searching…").color(theme.text_muted));
                        });
                    }
                    Fetch::Failed(err) => {
                        ui.colored_label(theme.error, &err.message);
                        ui.label(egui::RichText::new(err.status_line()).small());
                    }
                    Fetch::Ready(files) if files.is_empty() => {
                        ui.label(
                            egui::RichText::new("No files found")
                                .italics()
                                .color(theme.text_muted),
                        );
                    }
                    Fetch::Ready(files) => {
                        egui::ScrollArea::vertical()
                            .id_salt("file_search_results")
                            .auto_shrink([false; 2])
                            .show(ui, |ui| {
                                for file in files {
                                    if let Some(url) =
                                        render_file_row(ui, file, members, base_url, &theme)
                                    {
                                        actions.push(DialogAction::OpenUrl(url));
                                    }
                                    ui.add_space(4.0);
                                }
                            });
                    }
                }
            });

        if !window_open || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.close();
        }

        if let Some(search) = self.poll(now) {
            actions.push(search);
        } else if self.pending.is_some() {
            ctx.request_repaint_after(SEARCH_DEBOUNCE);
        }

        actions
    }
}
