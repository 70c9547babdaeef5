//! Realtime push channel.
//!
//! The server publishes events over Socket.IO (Engine.IO v4) on a WebSocket.
//! Only event names are forwarded to the UI; payloads are not needed.

use crossbeam_channel::Sender;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::{AUTHORIZATION, ORIGIN};
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use crate::config::ServerSettings;
use crate::protocol::GuiEvent;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);
/// Read deadline until the handshake says otherwise (Engine.IO defaults).
const DEFAULT_HEARTBEAT: Duration = Duration::from_millis(25_000 + 20_000);

#[derive(Debug, Error)]
pub enum RealtimeError {
    #[error("websocket: {0}")]
    Ws(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("malformed packet: {0}")]
    Malformed(String),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("server rejected connection: {0}")]
    Rejected(String),
    #[error("invalid socket URL: {0}")]
    InvalidUrl(String),
    #[error("no packet from server within {0:?}")]
    HeartbeatTimeout(Duration),
    #[error("UI receiver dropped")]
    ReceiverGone,
}

/// Engine.IO handshake data sent with the open packet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Handshake {
    pub sid: String,
    #[serde(rename = "pingInterval", default)]
    pub ping_interval: u64,
    #[serde(rename = "pingTimeout", default)]
    pub ping_timeout: u64,
}

impl Handshake {
    /// How long the server may stay silent before the connection counts as dead.
    pub fn heartbeat_deadline(&self) -> Duration {
        match self.ping_interval + self.ping_timeout {
            0 => DEFAULT_HEARTBEAT,
            ms => Duration::from_millis(ms),
        }
    }
}

/// Transport-level packet.
#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(Handshake),
    Close,
    Ping(String),
    Pong(String),
    Message(String),
    Upgrade,
    Noop,
}

/// Socket.IO packet carried inside an Engine.IO message.
#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect { namespace: String },
    Disconnect { namespace: String },
    Event {
        namespace: String,
        ack_id: Option<u64>,
        name: String,
        args: Vec<Value>,
    },
    Ack { namespace: String },
    ConnectError { namespace: String, message: String },
    /// Binary packets; never used for the events we follow.
    Binary,
}

pub fn parse_engine_packet(raw: &str) -> Result<EnginePacket, RealtimeError> {
    let mut chars = raw.chars();
    let kind = chars
        .next()
        .ok_or_else(|| RealtimeError::Malformed("empty engine packet".into()))?;
    let body = chars.as_str();

    Ok(match kind {
        '0' => EnginePacket::Open(serde_json::from_str(body)?),
        '1' => EnginePacket::Close,
        '2' => EnginePacket::Ping(body.to_string()),
        '3' => EnginePacket::Pong(body.to_string()),
        '4' => EnginePacket::Message(body.to_string()),
        '5' => EnginePacket::Upgrade,
        '6' => EnginePacket::Noop,
        other => {
            return Err(RealtimeError::Malformed(format!(
                "unknown engine packet type '{}'",
                other
            )))
        }
    })
}

/// Parse `<type>[/<namespace>,][<ack id>][<json>]`.
pub fn parse_socket_packet(raw: &str) -> Result<SocketPacket, RealtimeError> {
    let mut chars = raw.chars();
    let kind = chars
        .next()
        .ok_or_else(|| RealtimeError::Malformed("empty socket packet".into()))?;
    let mut rest = chars.as_str();

    if matches!(kind, '5' | '6') {
        return Ok(SocketPacket::Binary);
    }

    let namespace = if rest.starts_with('/') {
        match rest.find(',') {
            Some(idx) => {
                let ns = rest[..idx].to_string();
                rest = &rest[idx + 1..];
                ns
            }
            None => {
                let ns = rest.to_string();
                rest = "";
                ns
            }
        }
    } else {
        "/".to_string()
    };

    let digits = rest.chars().take_while(char::is_ascii_digit).count();
    let ack_id = if digits > 0 {
        rest[..digits].parse().ok()
    } else {
        None
    };
    rest = &rest[digits..];

    match kind {
        '0' => Ok(SocketPacket::Connect { namespace }),
        '1' => Ok(SocketPacket::Disconnect { namespace }),
        '2' => {
            let mut args: Vec<Value> = serde_json::from_str(rest)?;
            if args.is_empty() {
                return Err(RealtimeError::Malformed("event without name".into()));
            }
            let name = match args.remove(0) {
                Value::String(name) => name,
                other => {
                    return Err(RealtimeError::Malformed(format!(
                        "event name is not a string: {}",
                        other
                    )))
                }
            };
            Ok(SocketPacket::Event {
                namespace,
                ack_id,
                name,
                args,
            })
        }
        '3' => Ok(SocketPacket::Ack { namespace }),
        '4' => {
            let message = serde_json::from_str::<Value>(rest)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| rest.to_string());
            Ok(SocketPacket::ConnectError { namespace, message })
        }
        other => Err(RealtimeError::Malformed(format!(
            "unknown socket packet type '{}'",
            other
        ))),
    }
}

/// Engine.IO message carrying a Socket.IO connect for `namespace`.
pub fn connect_packet(namespace: Option<&str>) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() && ns != "/" => {
            format!("40/{},", ns.trim_start_matches('/'))
        }
        _ => "40".to_string(),
    }
}

/// WebSocket endpoint for a server or socket base URL.
pub fn socket_endpoint(base: &str) -> Result<Url, RealtimeError> {
    let mut url = Url::parse(base).map_err(|e| RealtimeError::InvalidUrl(e.to_string()))?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(RealtimeError::InvalidUrl(format!("unsupported scheme {}", other))),
    };
    url.set_scheme(scheme)
        .map_err(|_| RealtimeError::InvalidUrl(base.to_string()))?;
    url.set_path("/socket.io/");
    url.set_query(Some("EIO=4&transport=websocket"));
    Ok(url)
}

/// Everything the listener needs to (re)connect.
#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    pub endpoint: Url,
    pub namespace: Option<String>,
    pub origin: String,
    pub auth: Option<String>,
}

impl RealtimeConfig {
    pub fn from_settings(settings: &ServerSettings) -> Result<Self, RealtimeError> {
        let base = settings.socket_url.as_deref().unwrap_or(&settings.server_url);
        Ok(Self {
            endpoint: socket_endpoint(base)?,
            namespace: settings.namespace(),
            origin: settings.server_url.clone(),
            auth: settings.auth_header(),
        })
    }
}

/// Keep a realtime connection open, reconnecting with capped backoff.
/// Returns once the UI side of `event_tx` is gone.
pub async fn run_realtime(config: RealtimeConfig, event_tx: Sender<GuiEvent>) {
    let mut backoff = INITIAL_BACKOFF;

    loop {
        let detail = match listen(&config, &event_tx, &mut backoff).await {
            Ok(()) => "connection closed".to_string(),
            Err(RealtimeError::ReceiverGone) => return,
            Err(e) => {
                tracing::warn!(endpoint = %config.endpoint, error = %e, "Realtime connection failed");
                e.to_string()
            }
        };

        if event_tx
            .send(GuiEvent::RealtimeStatus {
                connected: false,
                detail,
            })
            .is_err()
        {
            return;
        }

        tokio::time::sleep(backoff).await;
        backoff = (backoff * 2).min(MAX_BACKOFF);
    }
}

async fn listen(
    config: &RealtimeConfig,
    event_tx: &Sender<GuiEvent>,
    backoff: &mut Duration,
) -> Result<(), RealtimeError> {
    let mut request = config.endpoint.as_str().into_client_request()?;
    let headers = request.headers_mut();
    headers.insert(
        ORIGIN,
        HeaderValue::from_str(&config.origin).map_err(|e| RealtimeError::InvalidUrl(e.to_string()))?,
    );
    if let Some(auth) = &config.auth {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(auth).map_err(|e| RealtimeError::InvalidUrl(e.to_string()))?,
        );
    }

    tracing::info!(endpoint = %config.endpoint, "Connecting realtime socket");
    let (ws, _) = tokio_tungstenite::connect_async(request).await?;
    let (mut sink, mut stream) = ws.split();

    let mut deadline = DEFAULT_HEARTBEAT;
    loop {
        let frame = match tokio::time::timeout(deadline, stream.next()).await {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(_) => {
                tracing::warn!(endpoint = %config.endpoint, ?deadline, "Realtime heartbeat missed");
                return Err(RealtimeError::HeartbeatTimeout(deadline));
            }
        };
        let text = match frame? {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        match parse_engine_packet(&text)? {
            EnginePacket::Open(handshake) => {
                tracing::debug!(sid = %handshake.sid, "Engine.IO open");
                deadline = handshake.heartbeat_deadline();
                sink.send(Message::Text(connect_packet(config.namespace.as_deref())))
                    .await?;
            }
            EnginePacket::Ping(payload) => {
                sink.send(Message::Text(format!("3{}", payload))).await?;
            }
            EnginePacket::Message(body) => match parse_socket_packet(&body)? {
                SocketPacket::Connect { namespace } => {
                    tracing::info!(%namespace, "Realtime socket joined");
                    *backoff = INITIAL_BACKOFF;
                    event_tx
                        .send(GuiEvent::RealtimeStatus {
                            connected: true,
                            detail: namespace,
                        })
                        .map_err(|_| RealtimeError::ReceiverGone)?;
                }
                SocketPacket::Event { name, .. } => {
                    tracing::debug!(event = %name, "Realtime event");
                    event_tx
                        .send(GuiEvent::Realtime { event: name })
                        .map_err(|_| RealtimeError::ReceiverGone)?;
                }
                SocketPacket::ConnectError { message, .. } => {
                    return Err(RealtimeError::Rejected(message));
                }
                SocketPacket::Disconnect { .. } => break,
                SocketPacket::Ack { .. } | SocketPacket::Binary => {}
            },
            EnginePacket::Close => break,
            EnginePacket::Pong(_) | EnginePacket::Upgrade | EnginePacket::Noop => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_open_packet() {
        let packet = parse_engine_packet(
            r#"0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":20000}"#,
        )
        .unwrap();
        assert_eq!(
            packet,
            EnginePacket::Open(Handshake {
                sid: "abc".into(),
                ping_interval: 25000,
                ping_timeout: 20000,
            })
        );
    }

    #[test]
    fn test_parse_ping_and_message() {
        assert_eq!(parse_engine_packet("2").unwrap(), EnginePacket::Ping(String::new()));
        assert_eq!(
            parse_engine_packet("42[\"x\"]").unwrap(),
            EnginePacket::Message("2[\"x\"]".into())
        );
        assert!(parse_engine_packet("").is_err());
        assert!(parse_engine_packet("9").is_err());
    }

    #[test]
    fn test_parse_event_with_namespace() {
        let packet =
            parse_socket_packet(r#"2/chat.example.com,["unread_channel_count_updated"]"#).unwrap();
        assert_eq!(
            packet,
            SocketPacket::Event {
                namespace: "/chat.example.com".into(),
                ack_id: None,
                name: "unread_channel_count_updated".into(),
                args: vec![],
            }
        );
    }

    #[test]
    fn test_parse_event_with_ack_and_payload() {
        match parse_socket_packet(r#"212["message_updated",{"channel_id":"dev"}]"#).unwrap() {
            SocketPacket::Event {
                namespace,
                ack_id,
                name,
                args,
            } => {
                assert_eq!(namespace, "/");
                assert_eq!(ack_id, Some(12));
                assert_eq!(name, "message_updated");
                assert_eq!(args.len(), 1);
            }
            other => panic!("unexpected packet {:?}", other),
        }
    }

    #[test]
    fn test_parse_connect_and_error() {
        assert_eq!(
            parse_socket_packet("0/site,{\"sid\":\"x\"}").unwrap(),
            SocketPacket::Connect {
                namespace: "/site".into()
            }
        );
        assert_eq!(
            parse_socket_packet(r#"4{"message":"Invalid origin"}"#).unwrap(),
            SocketPacket::ConnectError {
                namespace: "/".into(),
                message: "Invalid origin".into()
            }
        );
        assert!(parse_socket_packet("2[]").is_err());
        assert!(parse_socket_packet("2[5]").is_err());
    }

    #[test]
    fn test_connect_packet() {
        assert_eq!(connect_packet(None), "40");
        assert_eq!(connect_packet(Some("/")), "40");
        assert_eq!(connect_packet(Some("chat.example.com")), "40/chat.example.com,");
        assert_eq!(connect_packet(Some("/site")), "40/site,");
    }

    #[test]
    fn test_heartbeat_deadline() {
        let handshake = Handshake {
            sid: "s".into(),
            ping_interval: 25000,
            ping_timeout: 20000,
        };
        assert_eq!(handshake.heartbeat_deadline(), Duration::from_secs(45));
        let bare: Handshake = serde_json::from_str(r#"{"sid":"s"}"#).unwrap();
        assert_eq!(bare.heartbeat_deadline(), DEFAULT_HEARTBEAT);
    }

    #[tokio::test]
    async fn test_silent_server_ends_listen() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
            ws.send(Message::Text(
                r#"0{"sid":"s","pingInterval":100,"pingTimeout":100}"#.into(),
            ))
            .await
            .unwrap();
            let join = ws.next().await.unwrap().unwrap();
            assert_eq!(join, Message::Text("40/site,".into()));
            ws.send(Message::Text(r#"40/site,{"sid":"x"}"#.into()))
                .await
                .unwrap();
            // Hold the socket open without sending anything else
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(ws);
        });

        let config = RealtimeConfig {
            endpoint: Url::parse(&format!("ws://{}/socket.io/?EIO=4&transport=websocket", addr))
                .unwrap(),
            namespace: Some("site".into()),
            origin: "http://localhost".into(),
            auth: None,
        };
        let (event_tx, event_rx) = crossbeam_channel::unbounded();
        let mut backoff = MAX_BACKOFF;

        let result = tokio::time::timeout(
            Duration::from_secs(2),
            listen(&config, &event_tx, &mut backoff),
        )
        .await
        .expect("listen should give up on a silent server");

        assert!(matches!(result, Err(RealtimeError::HeartbeatTimeout(d)) if d == Duration::from_millis(200)));
        assert_eq!(backoff, INITIAL_BACKOFF);
        let events: Vec<GuiEvent> = event_rx.try_iter().collect();
        assert!(matches!(
            events.as_slice(),
            [GuiEvent::RealtimeStatus { connected: true, .. }]
        ));
        server.abort();
    }

    #[test]
    fn test_socket_endpoint() {
        assert_eq!(
            socket_endpoint("https://chat.example.com").unwrap().as_str(),
            "wss://chat.example.com/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(
            socket_endpoint("http://localhost:9000").unwrap().as_str(),
            "ws://localhost:9000/socket.io/?EIO=4&transport=websocket"
        );
        assert!(socket_endpoint("ftp://x").is_err());
    }
}
