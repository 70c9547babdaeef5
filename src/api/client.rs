//! REST client for the Frappe server.
//!
//! Uses token auth (`Authorization: token key:secret`) when credentials are
//! configured. Every response body is parsed here so callers only see typed
//! values or an `ApiError`.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

use super::{
    RemoteApi, CHANNEL_MEMBERS_METHOD, RECENT_FILES_METHOD, SEARCH_METHOD, UNREAD_COUNT_METHOD,
};
use crate::config::ServerSettings;
use crate::error::ApiError;
use crate::models::{Channel, ChannelFile, ChannelMembers, UnreadCounts, CHANNEL_DOCTYPE};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CHANNEL_LIST_FIELDS: &str = r#"["name","channel_name","type","is_direct_message"]"#;

pub struct FrappeClient {
    http: Client,
    base: Url,
    auth: Option<String>,
}

impl FrappeClient {
    pub fn new(settings: &ServerSettings) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.server_url)
            .map_err(|e| ApiError::Transport(format!("invalid server URL: {}", e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Transport(format!(
                "server URL cannot be used as a base: {}",
                settings.server_url
            )));
        }

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("raven-desk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base,
            auth: settings.auth_header(),
        })
    }

    /// Server base URL plus the given path segments (each percent-encoded).
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn method_url(&self, method: &str) -> Url {
        self.endpoint(&["api", "method", method])
    }

    pub fn resource_url(&self, doctype: &str, name: Option<&str>) -> Url {
        match name {
            Some(name) => self.endpoint(&["api", "resource", doctype, name]),
            None => self.endpoint(&["api", "resource", doctype]),
        }
    }

    /// `GET /api/method/<method>` and return the `message` field.
    async fn get_call<T>(&self, method: &str, params: &[(&str, &str)]) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
    {
        tracing::debug!(method, "GET call");
        let request = self.http.get(self.method_url(method)).query(params);
        let body = self.send(request).await?;
        take_field(body, "message")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let request = match &self.auth {
            Some(auth) => request.header(AUTHORIZATION, auth),
            None => request,
        };

        let response = request.header(ACCEPT, "application/json").send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = parse_error_body(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
                &body,
            );
            tracing::warn!(status = status.as_u16(), error = %err, "Request failed");
            return Err(err);
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RemoteApi for FrappeClient {
    async fn update_doc(&self, doctype: &str, name: &str, fields: Value) -> Result<(), ApiError> {
        tracing::debug!(doctype, name, "PUT resource");
        let request = self.http.put(self.resource_url(doctype, Some(name))).json(&fields);
        self.send(request).await.map(|_| ())
    }

    async fn fetch_recent_files(&self, channel_id: &str) -> Result<Vec<ChannelFile>, ApiError> {
        self.get_call(RECENT_FILES_METHOD, &[("channel_id", channel_id)])
            .await
    }

    async fn fetch_unread_counts(&self) -> Result<UnreadCounts, ApiError> {
        self.get_call(UNREAD_COUNT_METHOD, &[]).await
    }

    async fn fetch_channels(&self) -> Result<Vec<Channel>, ApiError> {
        let request = self.http.get(self.resource_url(CHANNEL_DOCTYPE, None)).query(&[
            ("fields", CHANNEL_LIST_FIELDS),
            ("limit_page_length", "0"),
            ("order_by", "channel_name asc"),
        ]);
        let body = self.send(request).await?;
        take_field(body, "data")
    }

    async fn fetch_channel_members(&self, channel_id: &str) -> Result<ChannelMembers, ApiError> {
        self.get_call(CHANNEL_MEMBERS_METHOD, &[("channel_id", channel_id)])
            .await
    }

    async fn search_files(
        &self,
        channel_id: &str,
        query: &str,
    ) -> Result<Vec<ChannelFile>, ApiError> {
        self.get_call(
            SEARCH_METHOD,
            &[
                ("filter_type", "File"),
                ("doctype", "Raven Message"),
                ("search_text", query),
                ("in_channel", channel_id),
            ],
        )
        .await
    }
}

/// Pull `field` out of a response object. A missing or null field decodes as the default.
fn take_field<T>(body: Value, field: &str) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    let value = match body {
        Value::Object(mut map) => map.remove(field).unwrap_or(Value::Null),
        _ => Value::Null,
    };
    serde_json::from_value::<Option<T>>(value)
        .map(Option::unwrap_or_default)
        .map_err(|e| ApiError::Decode(format!("{}: {}", field, e)))
}

/// Build an `ApiError::Http` from a failed response.
///
/// Frappe puts user-facing text in `_server_messages` (a JSON string holding
/// a list of JSON strings), falling back to `message` or `exception`.
pub fn parse_error_body(status: u16, status_text: &str, body: &str) -> ApiError {
    let parsed: Value = serde_json::from_str(body).unwrap_or_else(|_| json!({}));

    let server_message = parsed
        .get("_server_messages")
        .and_then(Value::as_str)
        .and_then(|raw| serde_json::from_str::<Vec<String>>(raw).ok())
        .and_then(|messages| messages.into_iter().next())
        .map(|first| {
            serde_json::from_str::<Value>(&first)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(first)
        });

    let message = server_message
        .or_else(|| {
            parsed
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .or_else(|| {
            parsed
                .get("exception")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .filter(|m| !m.is_empty());

    ApiError::Http {
        status,
        status_text: status_text.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> FrappeClient {
        FrappeClient::new(&ServerSettings {
            server_url: "https://chat.example.com".into(),
            socket_url: None,
            site_name: None,
            api_key: "key".into(),
            api_secret: Some("secret".into()),
        })
        .unwrap()
    }

    #[test]
    fn test_resource_url_encodes_doctype() {
        let url = client().resource_url(CHANNEL_DOCTYPE, Some("general"));
        assert_eq!(
            url.as_str(),
            "https://chat.example.com/api/resource/Raven%20Channel/general"
        );
    }

    #[test]
    fn test_method_url() {
        let url = client().method_url(UNREAD_COUNT_METHOD);
        assert_eq!(
            url.path(),
            "/api/method/raven.raven_messaging.doctype.raven_message.raven_message.get_unread_count_for_channels"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = FrappeClient::new(&ServerSettings {
            server_url: "https://example.com/chat/".into(),
            socket_url: None,
            site_name: None,
            api_key: String::new(),
            api_secret: None,
        })
        .unwrap();
        assert_eq!(client.method_url("ping").path(), "/chat/api/method/ping");
        assert!(client.auth.is_none());
    }

    #[test]
    fn test_parse_error_server_messages() {
        let body = r#"{"exc_type":"DuplicateEntryError","_server_messages":"[\"{\\\"message\\\": \\\"Channel dev already exists\\\"}\"]"}"#;
        let err = parse_error_body(409, "Conflict", body);
        assert_eq!(
            err,
            ApiError::Http {
                status: 409,
                status_text: "Conflict".into(),
                message: Some("Channel dev already exists".into()),
            }
        );
        assert!(err.is_conflict());
    }

    #[test]
    fn test_parse_error_plain_message_and_garbage() {
        let err = parse_error_body(403, "Forbidden", r#"{"message":"Not permitted"}"#);
        assert_eq!(err.status(), Some(403));
        assert!(matches!(err, ApiError::Http { message: Some(ref m), .. } if m == "Not permitted"));

        let err = parse_error_body(502, "Bad Gateway", "<html>oops</html>");
        assert!(matches!(err, ApiError::Http { message: None, .. }));
    }

    #[test]
    fn test_take_field_defaults_missing() {
        let files: Vec<ChannelFile> = take_field(json!({}), "message").unwrap();
        assert!(files.is_empty());
        let counts: UnreadCounts = take_field(json!({"message": {"dev": 4}}), "message").unwrap();
        assert_eq!(counts.get("dev"), 4);
        assert!(take_field::<Vec<ChannelFile>>(json!({"message": 5}), "message").is_err());
    }
}
