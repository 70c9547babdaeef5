//! Display helpers for shared files: names, extensions, icons and dates.

use chrono::{Datelike, NaiveDateTime};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use url::Url;

/// Icon per lowercase file extension.
static EXTENSION_ICONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut icons = HashMap::new();
    icons.insert("pdf", "📕");
    for ext in ["doc", "docx", "odt", "rtf", "txt", "md"] {
        icons.insert(ext, "📝");
    }
    for ext in ["xls", "xlsx", "ods", "csv"] {
        icons.insert(ext, "📊");
    }
    for ext in ["ppt", "pptx", "odp", "key"] {
        icons.insert(ext, "📽");
    }
    for ext in ["zip", "rar", "7z", "tar", "gz", "tgz"] {
        icons.insert(ext, "🗜");
    }
    for ext in ["mp3", "wav", "ogg", "flac", "m4a"] {
        icons.insert(ext, "🎵");
    }
    for ext in ["mp4", "mov", "avi", "mkv", "webm"] {
        icons.insert(ext, "🎬");
    }
    for ext in ["png", "jpg", "jpeg", "gif", "webp", "svg", "bmp"] {
        icons.insert(ext, "🖼");
    }
    for ext in ["rs", "js", "ts", "py", "json", "html", "css", "sh", "toml", "yaml", "yml"] {
        icons.insert(ext, "🧾");
    }
    icons
});

const GENERIC_FILE_ICON: &str = "📄";

/// Last path segment of a file URL, without query or fragment.
pub fn file_name(url: &str) -> &str {
    let path = url.split(&['?', '#'][..]).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

/// Lowercased extension of a file URL, if it has one.
pub fn file_extension(url: &str) -> Option<String> {
    let name = file_name(url);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext.to_lowercase()),
        _ => None,
    }
}

/// Icon for a generic file, picked by extension.
pub fn extension_icon(url: &str) -> &'static str {
    file_extension(url)
        .and_then(|ext| EXTENSION_ICONS.get(ext.as_str()).copied())
        .unwrap_or(GENERIC_FILE_ICON)
}

/// Absolute URL for a file path; server-relative paths (`/files/x.pdf`) are joined to `base`.
pub fn resolve_file_url(base: Option<&str>, file: &str) -> String {
    if Url::parse(file).is_ok() {
        return file.to_string();
    }
    base.and_then(|b| Url::parse(b).ok())
        .and_then(|b| b.join(file).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| file.to_string())
}

/// Parse a Frappe timestamp (`2024-03-05 14:02:11.123456`).
pub fn parse_server_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

/// `5th March 2024`. Unparsable input is shown as-is.
pub fn format_shared_date(raw: &str) -> String {
    match parse_server_timestamp(raw) {
        Some(dt) => format!(
            "{}{} {}",
            dt.day(),
            ordinal_suffix(dt.day()),
            dt.format("%B %Y")
        ),
        None => raw.to_string(),
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("/files/report.pdf"), "report.pdf");
        assert_eq!(
            file_name("https://chat.example.com/private/files/a%20b.png?fid=1"),
            "a%20b.png"
        );
        assert_eq!(file_name("plain"), "plain");
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("/files/Report.PDF").as_deref(), Some("pdf"));
        assert_eq!(file_extension("/files/archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(file_extension("/files/.hidden"), None);
        assert_eq!(file_extension("/files/README"), None);
    }

    #[test]
    fn test_extension_icon() {
        assert_eq!(extension_icon("/files/a.pdf"), "📕");
        assert_eq!(extension_icon("/files/a.xlsx"), "📊");
        assert_eq!(extension_icon("/files/a.unknown"), GENERIC_FILE_ICON);
        assert_eq!(extension_icon("/files/noext"), GENERIC_FILE_ICON);
    }

    #[test]
    fn test_resolve_file_url() {
        assert_eq!(
            resolve_file_url(Some("https://chat.example.com"), "/files/a.pdf"),
            "https://chat.example.com/files/a.pdf"
        );
        assert_eq!(
            resolve_file_url(Some("https://chat.example.com"), "https://cdn.example.com/b.png"),
            "https://cdn.example.com/b.png"
        );
        assert_eq!(resolve_file_url(None, "/files/a.pdf"), "/files/a.pdf");
    }

    #[test]
    fn test_format_shared_date() {
        assert_eq!(format_shared_date("2024-03-05 14:02:11.123456"), "5th March 2024");
        assert_eq!(format_shared_date("2024-01-01 00:00:00"), "1st January 2024");
        assert_eq!(format_shared_date("2023-12-22 09:00:00"), "22nd December 2023");
        assert_eq!(format_shared_date("2023-12-13 09:00:00"), "13th December 2023");
        assert_eq!(format_shared_date("garbage"), "garbage");
    }
}
