//! Event processing from backend

use super::RavenApp;
use crate::protocol::GuiEvent;
use crate::state::Toast;

impl RavenApp {
    /// Drain all pending backend events.
    pub fn process_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.process_single_event(event);
        }
    }

    pub fn process_single_event(&mut self, event: GuiEvent) {
        match event {
            GuiEvent::Configured { server } => {
                tracing::info!(%server, "Backend configured");
                self.state.server = Some(server);
            }
            GuiEvent::Error(msg) => {
                tracing::error!(error = %msg, "Backend error");
                self.state.push_toast(Toast::error("Something went wrong", msg));
            }
            GuiEvent::ChannelsLoaded(result) => {
                if let Err(e) = &result {
                    self.state
                        .push_toast(Toast::error("Could not load channels", e.status_line()));
                }
                self.state.channels = result.into();
            }
            GuiEvent::MembersLoaded { channel_id, result } => match result {
                Ok(members) => {
                    self.state.members.insert(channel_id, members);
                }
                Err(e) => {
                    tracing::warn!(%channel_id, error = %e.message, "Failed to load members");
                }
            },
            GuiEvent::RecentFilesLoaded { channel_id, result } => {
                self.files.apply(&channel_id, result);
            }
            GuiEvent::FileSearchResults {
                channel_id,
                query,
                result,
            } => {
                self.dialogs.apply_search_results(&channel_id, &query, result);
            }
            GuiEvent::UnreadCountsLoaded(result) => {
                self.sidebar.apply(result);
            }
            GuiEvent::ChannelRenamed { channel_id, result } => {
                let (toast, follow_up) = self.dialogs.rename_result(&channel_id, result);
                self.state.push_toast(toast);
                if let Some(action) = follow_up {
                    self.handle_dialog_action(action);
                }
            }
            GuiEvent::Realtime { event } => {
                if let Some(action) = self.sidebar.on_push_signal(&event) {
                    self.send(action);
                }
            }
            GuiEvent::RealtimeStatus { connected, detail } => {
                if connected != self.state.realtime_connected {
                    tracing::info!(connected, %detail, "Realtime status changed");
                }
                self.state.realtime_connected = connected;
            }
        }
    }
}
