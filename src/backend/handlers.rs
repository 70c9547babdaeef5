//! Action dispatch: every `BackendAction` becomes a Tokio task whose result
//! is reported back as a `GuiEvent`.

use async_trait::async_trait;
use crossbeam_channel::Sender;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::api::realtime::{run_realtime, RealtimeConfig};
use crate::api::{FrappeClient, RemoteApi};
use crate::config::ServerSettings;
use crate::error::{ApiError, FetchError, RenameError};
use crate::models::{Channel, ChannelFile, ChannelMembers, UnreadCounts, CHANNEL_DOCTYPE};
use crate::protocol::{BackendAction, GuiEvent};

/// Owns the remote API handle and the in-flight tasks that can be superseded.
pub struct Backend {
    api: Arc<dyn RemoteApi>,
    event_tx: Sender<GuiEvent>,
    files_task: Option<JoinHandle<()>>,
    search_task: Option<JoinHandle<()>>,
    unread_task: Option<JoinHandle<()>>,
    realtime_task: Option<JoinHandle<()>>,
}

impl Backend {
    /// Backend with no server yet; every call fails with `NotConfigured`.
    pub fn new(event_tx: Sender<GuiEvent>) -> Self {
        Self::with_api(Arc::new(Unconfigured), event_tx)
    }

    pub fn with_api(api: Arc<dyn RemoteApi>, event_tx: Sender<GuiEvent>) -> Self {
        Self {
            api,
            event_tx,
            files_task: None,
            search_task: None,
            unread_task: None,
            realtime_task: None,
        }
    }

    /// Handle one action. Must run inside a Tokio runtime.
    pub fn handle_action(&mut self, action: BackendAction) {
        match action {
            BackendAction::Configure(settings) => self.configure(settings),

            BackendAction::FetchChannels => {
                let api = self.api.clone();
                let tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let result = api.fetch_channels().await.map_err(FetchError::from);
                    if let Err(e) = &result {
                        tracing::warn!(error = %e, "Channel list fetch failed");
                    }
                    let _ = tx.send(GuiEvent::ChannelsLoaded(result));
                });
            }

            BackendAction::FetchMembers(channel_id) => {
                let api = self.api.clone();
                let tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let result = api
                        .fetch_channel_members(&channel_id)
                        .await
                        .map_err(FetchError::from);
                    let _ = tx.send(GuiEvent::MembersLoaded { channel_id, result });
                });
            }

            BackendAction::FetchRecentFiles(channel_id) => {
                self.cancel_recent_files();
                let api = self.api.clone();
                let tx = self.event_tx.clone();
                self.files_task = Some(tokio::spawn(async move {
                    tracing::debug!(%channel_id, "Fetching recent files");
                    let result = api
                        .fetch_recent_files(&channel_id)
                        .await
                        .map_err(FetchError::from);
                    if let Err(e) = &result {
                        tracing::warn!(%channel_id, error = %e, "Recent files fetch failed");
                    }
                    let _ = tx.send(GuiEvent::RecentFilesLoaded { channel_id, result });
                }));
            }

            BackendAction::CancelRecentFiles => self.cancel_recent_files(),

            BackendAction::SearchFiles { channel_id, query } => {
                if let Some(previous) = self.search_task.take() {
                    previous.abort();
                }
                let api = self.api.clone();
                let tx = self.event_tx.clone();
                self.search_task = Some(tokio::spawn(async move {
                    let result = api
                        .search_files(&channel_id, &query)
                        .await
                        .map_err(FetchError::from);
                    let _ = tx.send(GuiEvent::FileSearchResults {
                        channel_id,
                        query,
                        result,
                    });
                }));
            }

            BackendAction::FetchUnreadCounts => {
                // Only the newest fetch may report; an older map never lands last
                if let Some(previous) = self.unread_task.take() {
                    previous.abort();
                }
                let api = self.api.clone();
                let tx = self.event_tx.clone();
                self.unread_task = Some(tokio::spawn(async move {
                    let result = api.fetch_unread_counts().await.map_err(FetchError::from);
                    if let Err(e) = &result {
                        tracing::warn!(error = %e, "Unread count fetch failed");
                    }
                    let _ = tx.send(GuiEvent::UnreadCountsLoaded(result));
                }));
            }

            BackendAction::RenameChannel {
                channel_id,
                new_name,
            } => {
                let api = self.api.clone();
                let tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let result = api
                        .update_doc(
                            CHANNEL_DOCTYPE,
                            &channel_id,
                            json!({ "channel_name": new_name }),
                        )
                        .await
                        .map_err(RenameError::from);
                    match &result {
                        Ok(()) => tracing::info!(%channel_id, %new_name, "Channel renamed"),
                        Err(e) => tracing::warn!(%channel_id, error = %e, "Channel rename failed"),
                    }
                    let _ = tx.send(GuiEvent::ChannelRenamed { channel_id, result });
                });
            }
        }
    }

    fn configure(&mut self, settings: ServerSettings) {
        match FrappeClient::new(&settings) {
            Ok(client) => self.api = Arc::new(client),
            Err(e) => {
                tracing::error!(server = %settings.server_url, error = %e, "Cannot build HTTP client");
                let _ = self.event_tx.send(GuiEvent::Error(e.to_string()));
                return;
            }
        }

        if let Some(previous) = self.realtime_task.take() {
            previous.abort();
        }
        match RealtimeConfig::from_settings(&settings) {
            Ok(config) => {
                let tx = self.event_tx.clone();
                self.realtime_task = Some(tokio::spawn(run_realtime(config, tx)));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Realtime disabled");
            }
        }

        tracing::info!(server = %settings.server_url, "Backend configured");
        let _ = self.event_tx.send(GuiEvent::Configured {
            server: settings.server_url,
        });
    }

    fn cancel_recent_files(&mut self) {
        if let Some(previous) = self.files_task.take() {
            previous.abort();
        }
    }
}

impl Drop for Backend {
    fn drop(&mut self) {
        for task in [
            self.files_task.take(),
            self.search_task.take(),
            self.unread_task.take(),
            self.realtime_task.take(),
        ]
        .into_iter()
        .flatten()
        {
            task.abort();
        }
    }
}

/// Stand-in until a server is configured.
struct Unconfigured;

#[async_trait]
impl RemoteApi for Unconfigured {
    async fn update_doc(&self, _: &str, _: &str, _: Value) -> Result<(), ApiError> {
        Err(ApiError::NotConfigured)
    }

    async fn fetch_recent_files(&self, _: &str) -> Result<Vec<ChannelFile>, ApiError> {
        Err(ApiError::NotConfigured)
    }

    async fn fetch_unread_counts(&self) -> Result<UnreadCounts, ApiError> {
        Err(ApiError::NotConfigured)
    }

    async fn fetch_channels(&self) -> Result<Vec<Channel>, ApiError> {
        Err(ApiError::NotConfigured)
    }

    async fn fetch_channel_members(&self, _: &str) -> Result<ChannelMembers, ApiError> {
        Err(ApiError::NotConfigured)
    }

    async fn search_files(&self, _: &str, _: &str) -> Result<Vec<ChannelFile>, ApiError> {
        Err(ApiError::NotConfigured)
    }
}
