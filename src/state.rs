//! Core application state, separated from UI logic.
//!
//! `ClientState` holds the session data shared read-only with the panels:
//! the channel list, member profiles, the current route and the toast queue.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::error::FetchError;
use crate::models::{Channel, ChannelMembers};
use crate::route::Route;

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(2);

/// State of an asynchronous read.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(FetchError),
}

impl<T> Default for Fetch<T> {
    fn default() -> Self {
        Fetch::Idle
    }
}

impl<T> Fetch<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            Fetch::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Fetch::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Fetch::Loading)
    }
}

impl<T> From<Result<T, FetchError>> for Fetch<T> {
    fn from(result: Result<T, FetchError>) -> Self {
        match result {
            Ok(data) => Fetch::Ready(data),
            Err(e) => Fetch::Failed(e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Info,
}

/// Transient notification shown in the corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub title: String,
    pub description: Option<String>,
    pub level: ToastLevel,
    pub created: Instant,
    pub duration: Duration,
}

impl Toast {
    pub fn new(level: ToastLevel, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            level,
            created: Instant::now(),
            duration: TOAST_DURATION,
        }
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(ToastLevel::Success, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(ToastLevel::Info, title)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ToastLevel::Error, title).with_description(description)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created) >= self.duration
    }
}

/// Core application state for the chat client.
#[derive(Default)]
pub struct ClientState {
    /// Server the backend is configured for, if any.
    pub server: Option<String>,

    /// Whether the realtime socket is joined.
    pub realtime_connected: bool,

    /// All channels visible to the user.
    pub channels: Fetch<Vec<Channel>>,

    /// Member profiles keyed by channel id.
    pub members: HashMap<String, ChannelMembers>,

    /// Current navigation target.
    pub route: Route,

    /// Toasts with creation time (auto-expire).
    pub toasts: Vec<Toast>,
}

impl ClientState {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            ..Self::default()
        }
    }

    /// Snapshot of a channel by id.
    pub fn channel(&self, channel_id: &str) -> Option<&Channel> {
        self.channels
            .data()
            .and_then(|channels| channels.iter().find(|c| c.name == channel_id))
    }

    /// The channel the route points at.
    pub fn current_channel(&self) -> Option<&Channel> {
        self.route.channel_id().and_then(|id| self.channel(id))
    }

    /// Members of a channel; empty until loaded.
    pub fn members_of(&self, channel_id: &str) -> &ChannelMembers {
        static EMPTY: once_cell::sync::Lazy<ChannelMembers> =
            once_cell::sync::Lazy::new(ChannelMembers::new);
        self.members.get(channel_id).unwrap_or(&EMPTY)
    }

    pub fn push_toast(&mut self, toast: Toast) {
        self.toasts.push(toast);
    }

    /// Drop toasts whose display time has passed.
    pub fn purge_expired_toasts(&mut self, now: Instant) {
        self.toasts.retain(|toast| !toast.is_expired(now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChannelType;

    fn channel(id: &str) -> Channel {
        Channel {
            name: id.into(),
            channel_name: id.into(),
            channel_type: ChannelType::Public,
            is_direct_message: false,
        }
    }

    #[test]
    fn test_current_channel_follows_route() {
        let mut state = ClientState::new(Route::Channel("dev".into()));
        assert!(state.current_channel().is_none());

        state.channels = Fetch::Ready(vec![channel("general"), channel("dev")]);
        assert_eq!(state.current_channel().map(|c| c.name.as_str()), Some("dev"));

        state.route = Route::SavedMessages;
        assert!(state.current_channel().is_none());
    }

    #[test]
    fn test_toasts_expire() {
        let mut state = ClientState::default();
        state.push_toast(Toast::success("Saved"));
        let created = state.toasts[0].created;

        state.purge_expired_toasts(created + Duration::from_millis(500));
        assert_eq!(state.toasts.len(), 1);

        state.purge_expired_toasts(created + TOAST_DURATION);
        assert!(state.toasts.is_empty());
    }

    #[test]
    fn test_members_of_unknown_channel_is_empty() {
        let state = ClientState::default();
        assert!(state.members_of("nope").is_empty());
    }

    #[test]
    fn test_fetch_from_result() {
        let ok: Fetch<u32> = Ok(3).into();
        assert_eq!(ok.data(), Some(&3));
        let failed: Fetch<u32> = Err(FetchError {
            message: "boom".into(),
            http_status: Some(500),
            http_status_text: "Internal Server Error".into(),
        })
        .into();
        assert!(failed.error().is_some());
        assert!(!failed.is_loading());
    }
}
