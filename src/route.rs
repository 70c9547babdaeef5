//! Navigation target, in the same path form the web client uses.

/// Where the main area points.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    SavedMessages,
    Channel(String),
}

impl Route {
    /// Parse `/channel/<id>` and `/channel/saved-messages`. Anything else is `Home`.
    pub fn parse(path: &str) -> Self {
        let mut segments = path.trim().trim_matches('/').split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some("channel"), Some("saved-messages"), None) => Route::SavedMessages,
            (Some("channel"), Some(id), None) if !id.is_empty() => Route::Channel(id.to_string()),
            _ => Route::Home,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::SavedMessages => "/channel/saved-messages".to_string(),
            Route::Channel(id) => format!("/channel/{}", id),
        }
    }

    /// Channel id when the route points at a channel.
    pub fn channel_id(&self) -> Option<&str> {
        match self {
            Route::Channel(id) => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("/channel/general"), Route::Channel("general".into()));
        assert_eq!(Route::parse("channel/general/"), Route::Channel("general".into()));
        assert_eq!(Route::parse("/channel/saved-messages"), Route::SavedMessages);
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/channel"), Route::Home);
        assert_eq!(Route::parse("/channel/a/b"), Route::Home);
        assert_eq!(Route::parse("/settings"), Route::Home);
    }

    #[test]
    fn test_path_round_trips() {
        for route in [
            Route::Home,
            Route::SavedMessages,
            Route::Channel("dev".into()),
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn test_channel_id() {
        assert_eq!(Route::Channel("dev".into()).channel_id(), Some("dev"));
        assert_eq!(Route::SavedMessages.channel_id(), None);
    }
}
