//! Remote data access against the Frappe server.
//!
//! - `client`: REST client (`/api/resource`, `/api/method`)
//! - `realtime`: Socket.IO push channel

mod client;
pub mod realtime;

pub use client::{parse_error_body, FrappeClient};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ApiError;
use crate::models::{Channel, ChannelFile, ChannelMembers, UnreadCounts};

pub const RECENT_FILES_METHOD: &str =
    "raven.raven_messaging.doctype.raven_message.raven_message.fetch_recent_files";
pub const UNREAD_COUNT_METHOD: &str =
    "raven.raven_messaging.doctype.raven_message.raven_message.get_unread_count_for_channels";
pub const CHANNEL_MEMBERS_METHOD: &str = "raven.api.chat.get_channel_members";
pub const SEARCH_METHOD: &str = "raven.api.search.get_search_result";

/// Push event that invalidates the unread-count map.
pub const UNREAD_COUNT_EVENT: &str = "unread_channel_count_updated";

/// The operations the client needs from the server.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Update fields of a single document.
    async fn update_doc(&self, doctype: &str, name: &str, fields: Value) -> Result<(), ApiError>;

    async fn fetch_recent_files(&self, channel_id: &str) -> Result<Vec<ChannelFile>, ApiError>;

    async fn fetch_unread_counts(&self) -> Result<UnreadCounts, ApiError>;

    async fn fetch_channels(&self) -> Result<Vec<Channel>, ApiError>;

    async fn fetch_channel_members(&self, channel_id: &str) -> Result<ChannelMembers, ApiError>;

    async fn search_files(&self, channel_id: &str, query: &str)
        -> Result<Vec<ChannelFile>, ApiError>;
}
