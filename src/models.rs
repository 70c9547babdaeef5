//! Server-owned records as the client sees them.
//!
//! Field names follow the Frappe doctypes so responses decode directly.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Doctype holding channels on the server.
pub const CHANNEL_DOCTYPE: &str = "Raven Channel";

/// Visibility kind of a channel. Immutable from the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ChannelType {
    Private,
    #[default]
    Public,
    Open,
}

impl ChannelType {
    /// Glyph shown next to the channel name.
    pub fn icon(self) -> &'static str {
        match self {
            ChannelType::Private => "🔒",
            ChannelType::Public => "#",
            ChannelType::Open => "🌐",
        }
    }
}

/// Read-only snapshot of a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Stable identifier (document name).
    pub name: String,
    pub channel_name: String,
    #[serde(rename = "type", default)]
    pub channel_type: ChannelType,
    #[serde(default, deserialize_with = "int_bool")]
    pub is_direct_message: bool,
}

/// Kind of a shared attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    File,
    Image,
}

/// A file shared in a channel. Fetched, never written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelFile {
    pub name: String,
    pub file: String,
    #[serde(default)]
    pub file_thumbnail: Option<String>,
    pub owner: String,
    #[serde(default)]
    pub creation: String,
    pub message_type: FileKind,
}

impl ChannelFile {
    /// URL to show as preview for images: the thumbnail when present, else the file.
    pub fn preview_url(&self) -> &str {
        match self.file_thumbnail.as_deref() {
            Some(thumb) if !thumb.is_empty() => thumb,
            _ => &self.file,
        }
    }
}

/// Profile of a channel member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMember {
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub user_image: Option<String>,
}

/// Member profiles keyed by user id.
pub type ChannelMembers = HashMap<String, ChannelMember>;

/// Unread message count per channel id.
///
/// Replaced wholesale on every refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnreadCounts(pub HashMap<String, u32>);

impl UnreadCounts {
    pub fn get(&self, channel_id: &str) -> u32 {
        self.0.get(channel_id).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UnreadCountsWire {
    Map(HashMap<String, u32>),
    List(Vec<UnreadEntry>),
}

#[derive(Deserialize)]
struct UnreadEntry {
    name: String,
    #[serde(default)]
    unread_count: u32,
}

impl<'de> Deserialize<'de> for UnreadCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match UnreadCountsWire::deserialize(deserializer)? {
            UnreadCountsWire::Map(map) => UnreadCounts(map),
            UnreadCountsWire::List(list) => UnreadCounts(
                list.into_iter()
                    .map(|entry| (entry.name, entry.unread_count))
                    .collect(),
            ),
        })
    }
}

/// Frappe check fields arrive as 0/1; accept booleans too.
fn int_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }
    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_decodes_frappe_fields() {
        let channel: Channel = serde_json::from_str(
            r#"{"name":"general","channel_name":"general","type":"Open","is_direct_message":0}"#,
        )
        .unwrap();
        assert_eq!(channel.channel_type, ChannelType::Open);
        assert!(!channel.is_direct_message);

        let dm: Channel = serde_json::from_str(
            r#"{"name":"a _ b","channel_name":"a _ b","type":"Private","is_direct_message":1}"#,
        )
        .unwrap();
        assert!(dm.is_direct_message);
    }

    #[test]
    fn test_unread_counts_map_form() {
        let counts: UnreadCounts = serde_json::from_str(r#"{"general":3,"random":0}"#).unwrap();
        assert_eq!(counts.get("general"), 3);
        assert_eq!(counts.get("missing"), 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_unread_counts_list_form() {
        let counts: UnreadCounts = serde_json::from_str(
            r#"[{"name":"general","unread_count":2},{"name":"dev","unread_count":5}]"#,
        )
        .unwrap();
        assert_eq!(counts.get("dev"), 5);
        assert_eq!(counts.total(), 7);
    }

    #[test]
    fn test_preview_falls_back_to_file() {
        let mut file = ChannelFile {
            name: "m1".into(),
            file: "/files/cat.png".into(),
            file_thumbnail: None,
            owner: "alice@example.com".into(),
            creation: "2024-01-01 10:00:00".into(),
            message_type: FileKind::Image,
        };
        assert_eq!(file.preview_url(), "/files/cat.png");
        file.file_thumbnail = Some("/files/cat_small.png".into());
        assert_eq!(file.preview_url(), "/files/cat_small.png");
    }
}
