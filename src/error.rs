//! Error types for the client.
//!
//! Every remote failure is recovered locally by showing feedback, so these
//! types carry exactly what the UI needs to render a toast or a banner.

use thiserror::Error;

/// Client-side validation failure for the channel name field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please add channel name")]
    Required,
    #[error("Names cannot be longer than {limit} characters")]
    TooLong { limit: usize },
    #[error("Channel name can only contain letters and numbers")]
    Pattern,
}

/// Failure talking to the Frappe server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{status} - {status_text}")]
    Http {
        status: u16,
        status_text: String,
        /// Human readable message extracted from the error body, if any.
        message: Option<String>,
    },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("no server configured")]
    NotConfigured,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

/// Outcome of a failed rename.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenameError {
    /// HTTP 409: another channel already uses the name.
    #[error("Channel name already exists")]
    Conflict,
    #[error("{status_text}")]
    Remote {
        status: Option<u16>,
        status_text: String,
    },
}

impl From<ApiError> for RenameError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Http { status: 409, .. } => RenameError::Conflict,
            ApiError::Http {
                status,
                status_text,
                message,
            } => RenameError::Remote {
                status: Some(status),
                status_text: describe_status(status, status_text, message.as_deref()),
            },
            other => RenameError::Remote {
                status: None,
                status_text: other.to_string(),
            },
        }
    }
}

/// Reason phrase for a failed response. Non-standard codes have none, so fall
/// back to the server's message and then to the bare code.
fn describe_status(status: u16, status_text: String, message: Option<&str>) -> String {
    if !status_text.is_empty() {
        return status_text;
    }
    match message {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => format!("HTTP {}", status),
    }
}

/// A read failure, rendered as an inline banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    pub message: String,
    pub http_status: Option<u16>,
    pub http_status_text: String,
}

impl FetchError {
    /// Banner body line: `404 - Not Found`.
    pub fn status_line(&self) -> String {
        match self.http_status {
            Some(code) if self.http_status_text.is_empty() => code.to_string(),
            Some(code) => format!("{} - {}", code, self.http_status_text),
            None => self.http_status_text.clone(),
        }
    }
}

impl From<ApiError> for FetchError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Http {
                status,
                status_text,
                message,
            } => FetchError {
                message: message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| describe_status(status, status_text.clone(), None)),
                http_status: Some(status),
                http_status_text: status_text,
            },
            other => FetchError {
                message: other.to_string(),
                http_status: None,
                http_status_text: String::new(),
            },
        }
    }
}

/// Settings persistence and secret storage failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("settings I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings format: {0}")]
    Format(#[from] serde_json::Error),
    #[error("keyring: {0}")]
    Keyring(#[from] keyring::Error),
    #[error("invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16, text: &str) -> ApiError {
        ApiError::Http {
            status,
            status_text: text.to_string(),
            message: None,
        }
    }

    #[test]
    fn test_conflict_maps_to_rename_conflict() {
        assert_eq!(RenameError::from(http(409, "Conflict")), RenameError::Conflict);
    }

    #[test]
    fn test_other_status_keeps_status_text() {
        let err = RenameError::from(http(417, "Expectation Failed"));
        assert_eq!(
            err,
            RenameError::Remote {
                status: Some(417),
                status_text: "Expectation Failed".into()
            }
        );
        assert_eq!(err.to_string(), "Expectation Failed");
    }

    #[test]
    fn test_unknown_status_never_leaves_blank_text() {
        let with_message = ApiError::Http {
            status: 599,
            status_text: String::new(),
            message: Some("Upstream timed out".into()),
        };
        assert_eq!(
            RenameError::from(with_message),
            RenameError::Remote {
                status: Some(599),
                status_text: "Upstream timed out".into()
            }
        );
        assert_eq!(
            RenameError::from(http(599, "")).to_string(),
            "HTTP 599"
        );

        let fetch = FetchError::from(http(599, ""));
        assert_eq!(fetch.message, "HTTP 599");
        assert_eq!(fetch.status_line(), "599");
    }

    #[test]
    fn test_fetch_error_prefers_server_message() {
        let err = FetchError::from(ApiError::Http {
            status: 403,
            status_text: "Forbidden".into(),
            message: Some("Not permitted".into()),
        });
        assert_eq!(err.message, "Not permitted");
        assert_eq!(err.status_line(), "403 - Forbidden");
    }

    #[test]
    fn test_fetch_error_from_transport() {
        let err = FetchError::from(ApiError::Transport("connection refused".into()));
        assert_eq!(err.http_status, None);
        assert!(err.message.contains("connection refused"));
    }
}
