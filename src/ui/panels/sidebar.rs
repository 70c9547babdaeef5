//! Left sidebar: Saved Messages, channels and direct messages with unread badges.

use std::collections::HashSet;

use eframe::egui::{self, Color32, Stroke};

use super::PanelAction;
use crate::api::UNREAD_COUNT_EVENT;
use crate::error::FetchError;
use crate::models::{Channel, UnreadCounts};
use crate::protocol::BackendAction;
use crate::route::Route;
use crate::state::Fetch;
use crate::ui::theme::RavenTheme;

const CHANNELS_SECTION: &str = "channels";
const DMS_SECTION: &str = "dms";

/// Unread-count state plus the sidebar's own UI state.
#[derive(Default)]
pub struct SidebarList {
    unread: Fetch<UnreadCounts>,
    /// Last map received; kept visible while a re-fetch runs
    last_unread: UnreadCounts,
    mounted: bool,
    collapsed: HashSet<String>,
}

impl SidebarList {
    pub fn new() -> Self {
        Self::default()
    }

    /// First mount fetches the unread map; later mounts do nothing.
    pub fn mount(&mut self) -> Option<BackendAction> {
        if self.mounted {
            return None;
        }
        self.mounted = true;
        self.unread = Fetch::Loading;
        Some(BackendAction::FetchUnreadCounts)
    }

    /// A realtime event arrived. Exactly one re-fetch per unread-count signal.
    pub fn on_push_signal(&mut self, event: &str) -> Option<BackendAction> {
        if event != UNREAD_COUNT_EVENT || !self.mounted {
            return None;
        }
        tracing::debug!("Unread counts changed on server, refetching");
        self.unread = Fetch::Loading;
        Some(BackendAction::FetchUnreadCounts)
    }

    pub fn apply(&mut self, result: Result<UnreadCounts, FetchError>) {
        match result {
            Ok(counts) => {
                self.last_unread = counts.clone();
                self.unread = Fetch::Ready(counts);
            }
            Err(e) => {
                tracing::warn!(error = %e.message, "Failed to load unread counts");
                self.unread = Fetch::Failed(e);
            }
        }
    }

    /// Map used for badges: the newest successful response.
    pub fn unread(&self) -> &UnreadCounts {
        &self.last_unread
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.unread.error()
    }

    pub fn is_collapsed(&self, section: &str) -> bool {
        self.collapsed.contains(section)
    }

    pub fn toggle_section(&mut self, section: &str) {
        if !self.collapsed.remove(section) {
            self.collapsed.insert(section.to_string());
        }
    }

    /// Render the left panel. Returns a navigation when an entry is clicked.
    pub fn render(
        &mut self,
        ctx: &egui::Context,
        channels: &[Channel],
        route: &Route,
    ) -> Option<PanelAction> {
        let theme = RavenTheme::for_ctx(ctx);
        let mut action = None;

        egui::SidePanel::left("sidebar_panel")
            .resizable(true)
            .default_width(240.0)
            .min_width(180.0)
            .frame(
                egui::Frame::new()
                    .fill(theme.surface[1])
                    .inner_margin(egui::Margin::same(0))
                    .stroke(Stroke::new(1.0, theme.border_medium)),
            )
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("sidebar_scroll")
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        ui.add_space(12.0);
                        if render_item(
                            ui,
                            "🔖",
                            "Saved Messages",
                            0,
                            *route == Route::SavedMessages,
                            &theme,
                        ) {
                            action = Some(PanelAction::Navigate(Route::SavedMessages));
                        }

                        if let Some(err) = self.unread.error() {
                            ui.horizontal(|ui| {
                                ui.add_space(16.0);
                                ui.label(
                                    egui::RichText::new(format!("Unread counts: {}", err.message))
                                        .size(11.0)
                                        .color(theme.error),
                                );
                            });
                        }

                        let (dms, rooms): (Vec<&Channel>, Vec<&Channel>) =
                            channels.iter().partition(|c| c.is_direct_message);

                        for (section, title, list) in [
                            (CHANNELS_SECTION, "CHANNELS", rooms),
                            (DMS_SECTION, "DIRECT MESSAGES", dms),
                        ] {
                            ui.add_space(12.0);
                            let collapsed = self.is_collapsed(section);
                            if section_header(ui, title, collapsed, &theme) {
                                self.toggle_section(section);
                            }
                            if collapsed {
                                continue;
                            }
                            for channel in list {
                                let icon = if channel.is_direct_message {
                                    "👤"
                                } else {
                                    channel.channel_type.icon()
                                };
                                let selected = route.channel_id() == Some(channel.name.as_str());
                                ui.add_space(2.0);
                                if render_item(
                                    ui,
                                    icon,
                                    &channel.channel_name,
                                    self.last_unread.get(&channel.name),
                                    selected,
                                    &theme,
                                ) {
                                    action =
                                        Some(PanelAction::Navigate(Route::Channel(channel.name.clone())));
                                }
                            }
                        }
                    });
            });

        action
    }
}

/// Collapsible section header. Returns true when clicked.
fn section_header(ui: &mut egui::Ui, title: &str, collapsed: bool, theme: &RavenTheme) -> bool {
    let response = ui
        .horizontal(|ui| {
            ui.add_space(16.0);
            let caret = if collapsed { "▶" } else { "▼" };
            ui.label(egui::RichText::new(caret).size(9.0).color(theme.text_muted));
            ui.add_space(4.0);
            ui.label(
                egui::RichText::new(title)
                    .size(11.0)
                    .strong()
                    .color(theme.text_muted),
            );
        })
        .response
        .interact(egui::Sense::click());

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.add_space(16.0);
        let sep_rect = egui::Rect::from_min_size(
            ui.cursor().min,
            egui::vec2(ui.available_width() - 32.0, 1.0),
        );
        ui.painter().rect_filled(sep_rect, 0.0, theme.surface[3]);
    });
    ui.add_space(6.0);

    response.clicked()
}

/// A single sidebar row. Returns true when clicked.
fn render_item(
    ui: &mut egui::Ui,
    icon: &str,
    label: &str,
    unread: u32,
    selected: bool,
    theme: &RavenTheme,
) -> bool {
    let height = 32.0;
    let (rect, response) =
        ui.allocate_exact_size(egui::vec2(ui.available_width(), height), egui::Sense::click());
    let hovered = response.hovered();

    if selected || hovered {
        let bg = if selected { theme.surface[4] } else { theme.surface[3] };
        ui.painter().rect_filled(rect, 6.0, bg);
    }
    if selected {
        let indicator = egui::Rect::from_min_size(
            egui::pos2(rect.min.x + 8.0, rect.center().y - 10.0),
            egui::vec2(3.0, 20.0),
        );
        ui.painter().rect_filled(indicator, 1.5, theme.accent);
    }

    let emphasized = selected || unread > 0;
    ui.painter().text(
        egui::pos2(rect.min.x + 20.0, rect.center().y),
        egui::Align2::LEFT_CENTER,
        icon,
        egui::FontId::new(14.0, egui::FontFamily::Proportional),
        if emphasized { theme.text_primary } else { theme.text_muted },
    );
    ui.painter().text(
        egui::pos2(rect.min.x + 44.0, rect.center().y),
        egui::Align2::LEFT_CENTER,
        label,
        egui::FontId::new(13.0, egui::FontFamily::Proportional),
        if emphasized { theme.text_primary } else { theme.text_secondary },
    );

    if unread > 0 {
        let badge_font = egui::FontId::new(10.0, egui::FontFamily::Proportional);
        let galley =
            ui.fonts(|f| f.layout_no_wrap(badge_text(unread), badge_font, Color32::WHITE));
        let badge_width = galley.size().x.max(16.0) + 10.0;
        let badge_height = 18.0;
        let badge_rect = egui::Rect::from_min_size(
            egui::pos2(
                rect.max.x - badge_width - 16.0,
                rect.center().y - badge_height / 2.0,
            ),
            egui::vec2(badge_width, badge_height),
        );
        ui.painter()
            .rect_filled(badge_rect, badge_height / 2.0, theme.accent);
        ui.painter().galley(
            badge_rect.center() - galley.size() / 2.0,
            galley,
            Color32::WHITE,
        );
    }

    response.clicked()
}

fn badge_text(unread: u32) -> String {
    if unread > 99 {
        "99+".to_string()
    } else {
        unread.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn counts(pairs: &[(&str, u32)]) -> UnreadCounts {
        UnreadCounts(pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect::<HashMap<_, _>>())
    }

    #[test]
    fn test_mount_fetches_once() {
        let mut sidebar = SidebarList::new();
        assert!(matches!(sidebar.mount(), Some(BackendAction::FetchUnreadCounts)));
        assert!(sidebar.mount().is_none());
    }

    #[test]
    fn test_one_fetch_per_push_signal() {
        let mut sidebar = SidebarList::new();
        sidebar.mount();
        let fetches = (0..3)
            .filter_map(|_| sidebar.on_push_signal(UNREAD_COUNT_EVENT))
            .count();
        assert_eq!(fetches, 3);
        assert!(sidebar.on_push_signal("new_message").is_none());
    }

    #[test]
    fn test_signal_before_mount_is_ignored() {
        let mut sidebar = SidebarList::new();
        assert!(sidebar.on_push_signal(UNREAD_COUNT_EVENT).is_none());
    }

    #[test]
    fn test_previous_counts_visible_during_refetch() {
        let mut sidebar = SidebarList::new();
        sidebar.mount();
        sidebar.apply(Ok(counts(&[("general", 4)])));
        sidebar.on_push_signal(UNREAD_COUNT_EVENT);
        assert_eq!(sidebar.unread().get("general"), 4);

        // Response replaces the map wholesale
        sidebar.apply(Ok(counts(&[("dev", 1)])));
        assert_eq!(sidebar.unread().get("general"), 0);
        assert_eq!(sidebar.unread().get("dev"), 1);
    }

    #[test]
    fn test_failed_refetch_keeps_last_counts() {
        let mut sidebar = SidebarList::new();
        sidebar.mount();
        sidebar.apply(Ok(counts(&[("general", 2)])));
        sidebar.apply(Err(FetchError {
            message: "Server error".into(),
            http_status: Some(500),
            http_status_text: "Internal Server Error".into(),
        }));
        assert!(sidebar.error().is_some());
        assert_eq!(sidebar.unread().get("general"), 2);
    }

    #[test]
    fn test_toggle_section() {
        let mut sidebar = SidebarList::new();
        assert!(!sidebar.is_collapsed(DMS_SECTION));
        sidebar.toggle_section(DMS_SECTION);
        assert!(sidebar.is_collapsed(DMS_SECTION));
        sidebar.toggle_section(DMS_SECTION);
        assert!(!sidebar.is_collapsed(DMS_SECTION));
    }

    #[test]
    fn test_badge_text_caps_at_99() {
        assert_eq!(badge_text(7), "7");
        assert_eq!(badge_text(120), "99+");
    }
}
