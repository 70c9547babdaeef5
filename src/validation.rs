//! Input validation for channel names and server settings

use regex::Regex;
use url::Url;

use crate::error::{ConfigError, ValidationError};

/// Maximum channel name length, in characters
pub const CHANNEL_NAME_LIMIT: usize = 50;

/// Rules applied to a channel name before it is sent to the server.
#[derive(Debug, Clone)]
pub struct RenameRules {
    pub limit: usize,
    /// Optional character rule. Unset means any non-whitespace text is accepted.
    pub pattern: Option<Regex>,
}

impl Default for RenameRules {
    fn default() -> Self {
        Self {
            limit: CHANNEL_NAME_LIMIT,
            pattern: None,
        }
    }
}

impl RenameRules {
    /// Build rules from a configured pattern. An invalid pattern is logged and ignored.
    pub fn with_pattern(pattern: Option<&str>) -> Self {
        let pattern = pattern.filter(|p| !p.is_empty()).and_then(|p| match Regex::new(p) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!(pattern = %p, error = %e, "Ignoring invalid channel name pattern");
                None
            }
        });
        Self {
            limit: CHANNEL_NAME_LIMIT,
            pattern,
        }
    }
}

/// Normalize raw text from the name field: whitespace is dropped and the
/// result is truncated to `limit` characters.
pub fn sanitize_channel_name_input(raw: &str, limit: usize) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .take(limit)
        .collect()
}

/// Characters left before the name hits `limit`.
pub fn remaining_chars(name: &str, limit: usize) -> usize {
    limit.saturating_sub(name.chars().count())
}

/// Validate a channel name against the rename rules
pub fn validate_channel_name(name: &str, rules: &RenameRules) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required);
    }

    if name.chars().count() > rules.limit {
        return Err(ValidationError::TooLong { limit: rules.limit });
    }

    if let Some(pattern) = &rules.pattern {
        if !pattern.is_match(name) {
            return Err(ValidationError::Pattern);
        }
    }

    Ok(())
}

/// Validates a server base URL (http or https with a host)
pub fn validate_server_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid("server URL cannot be empty"));
    }

    let url = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid("scheme must be http or https"));
    }

    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_tracks_length() {
        for len in 0..=CHANNEL_NAME_LIMIT {
            let name = "a".repeat(len);
            assert_eq!(remaining_chars(&name, CHANNEL_NAME_LIMIT), CHANNEL_NAME_LIMIT - len);
        }
        assert_eq!(remaining_chars("ünïcödé", CHANNEL_NAME_LIMIT), CHANNEL_NAME_LIMIT - 7);
    }

    #[test]
    fn test_sanitize_strips_whitespace() {
        assert_eq!(sanitize_channel_name_input("dev ops", 50), "devops");
        assert_eq!(sanitize_channel_name_input(" a b  c ", 50), "abc");
        assert_eq!(sanitize_channel_name_input("tab\there", 50), "tabhere");
        assert!(!sanitize_channel_name_input("x ".repeat(40).as_str(), 50).contains(' '));
    }

    #[test]
    fn test_sanitize_truncates_to_limit() {
        assert_eq!(sanitize_channel_name_input(&"x".repeat(80), 50), "x".repeat(50));
        assert_eq!(sanitize_channel_name_input(&"é".repeat(60), 50).chars().count(), 50);
    }

    #[test]
    fn test_validate_channel_name() {
        let rules = RenameRules::default();
        assert!(validate_channel_name("general", &rules).is_ok());
        assert!(validate_channel_name("release-2024", &rules).is_ok());

        assert_eq!(validate_channel_name("", &rules), Err(ValidationError::Required));
        assert_eq!(
            validate_channel_name(&"x".repeat(51), &rules),
            Err(ValidationError::TooLong { limit: 50 })
        );
    }

    #[test]
    fn test_configured_pattern_is_enforced() {
        let rules = RenameRules::with_pattern(Some("^[a-zA-Z0-9-]+$"));
        assert!(validate_channel_name("dev-ops", &rules).is_ok());
        assert_eq!(validate_channel_name("dev_ops!", &rules), Err(ValidationError::Pattern));
    }

    #[test]
    fn test_invalid_pattern_is_ignored() {
        let rules = RenameRules::with_pattern(Some("(["));
        assert!(rules.pattern.is_none());
        assert!(validate_channel_name("anything_goes", &rules).is_ok());
    }

    #[test]
    fn test_validate_server_url() {
        assert_eq!(
            validate_server_url("https://chat.example.com").unwrap().host_str(),
            Some("chat.example.com")
        );
        assert!(validate_server_url("http://localhost:8000").is_ok());

        assert!(validate_server_url("").is_err());
        assert!(validate_server_url("chat.example.com").is_err());
        assert!(validate_server_url("ftp://chat.example.com").is_err());
    }
}
