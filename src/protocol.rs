use crate::config::ServerSettings;
use crate::error::{FetchError, RenameError};
use crate::models::{Channel, ChannelFile, ChannelMembers, UnreadCounts};

/// Actions sent from the UI to the Backend
#[derive(Debug, Clone)]
pub enum BackendAction {
    /// (Re)build the HTTP client and realtime socket
    Configure(ServerSettings),
    /// Load the channel list
    FetchChannels,
    /// Load the member profiles of a channel
    FetchMembers(String),
    /// Load recent files of a channel; supersedes any pending request
    FetchRecentFiles(String),
    /// Abort the pending recent-files request
    CancelRecentFiles,
    /// Search files in a channel; supersedes any pending search
    SearchFiles { channel_id: String, query: String },
    /// Load the unread-count map
    FetchUnreadCounts,
    /// Update a channel's display name
    RenameChannel { channel_id: String, new_name: String },
}

/// Events sent from the Backend to the UI
#[derive(Debug, Clone)]
pub enum GuiEvent {
    /// A server was configured
    Configured { server: String },
    /// Backend-level error for the status toasts
    Error(String),
    ChannelsLoaded(Result<Vec<Channel>, FetchError>),
    MembersLoaded {
        channel_id: String,
        result: Result<ChannelMembers, FetchError>,
    },
    RecentFilesLoaded {
        channel_id: String,
        result: Result<Vec<ChannelFile>, FetchError>,
    },
    FileSearchResults {
        channel_id: String,
        query: String,
        result: Result<Vec<ChannelFile>, FetchError>,
    },
    UnreadCountsLoaded(Result<UnreadCounts, FetchError>),
    ChannelRenamed {
        channel_id: String,
        result: Result<(), RenameError>,
    },
    /// Push event received on the realtime socket
    Realtime { event: String },
    /// Realtime socket connected or dropped
    RealtimeStatus { connected: bool, detail: String },
}
