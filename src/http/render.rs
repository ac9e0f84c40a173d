//! HTML rendering for directory listings and search results

use std::fmt;

use chrono::DateTime;

use crate::types::{FileRecord, DIRECTORY_MIME};

use super::virtual_path;

const ICON_PREFIX: &str = "/static/icons/";

/// Icon URL for a MIME type
pub fn icon_for_mime(mime: &str) -> String {
    let icon = match mime {
        "application/gzip"
        | "application/vnd.debian.binary-package"
        | "application/vnd.rar"
        | "application/x-7z-compressed"
        | "application/x-bzip2"
        | "application/x-rpm"
        | "application/x-tar"
        | "application/x-unix-archive"
        | "application/x-xz"
        | "application/zip"
        | "application/zstd" => "archive",
        DIRECTORY_MIME => "directory",
        "application/msword"
        | "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        | "application/vnd.oasis.opendocument.text"
        | "application/rtf" => "document",
        "application/x-executable"
        | "application/x-mach-binary"
        | "application/vnd.microsoft.portable-executable" => "executable",
        "application/pdf" => "pdf",
        "application/vnd.ms-powerpoint"
        | "application/vnd.openxmlformats-officedocument.presentationml.presentation"
        | "application/vnd.oasis.opendocument.presentation" => "presentation",
        "application/vnd.ms-excel"
        | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        | "application/vnd.oasis.opendocument.spreadsheet" => "spreadsheet",
        other => match other.split('/').next() {
            Some("image") => "image",
            Some("audio") => "audio",
            Some("video") => "video",
            _ => "text",
        },
    };
    format!("{}{}.svg", ICON_PREFIX, icon)
}

/// Escape text for HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Human-readable byte count
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// Modification time as `YYYY-MM-DD HH:MM` (UTC)
pub fn format_mtime(seconds: i64) -> String {
    DateTime::from_timestamp(seconds, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Where the back link of a page points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackLink {
    None,
    /// A parent directory listing
    Parent(String),
    /// The previous page in the browser history
    History,
}

/// One row of a listing
#[derive(Debug, Clone)]
pub struct ListingEntry {
    pub name: String,
    pub icon: String,
    pub href: String,
    /// Empty for directories
    pub size: String,
    pub modified: String,
}

impl ListingEntry {
    /// Row for `record`, located at `virtual_path`
    pub fn new(record: &FileRecord, virtual_path: &str) -> Self {
        let (prefix, size) = if record.is_directory() {
            ("/browse", String::new())
        } else {
            ("/download", format_size(record.size))
        };
        Self {
            name: record.display_name(),
            icon: icon_for_mime(&record.mime_type),
            href: virtual_path::href(prefix, virtual_path),
            size,
            modified: format_mtime(record.modified_time),
        }
    }
}

/// A rendered page: directory listing or search results
#[derive(Debug, Clone)]
pub struct Listing {
    pub title: String,
    pub back: BackLink,
    pub search_value: String,
    pub entries: Vec<ListingEntry>,
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = escape_html(&self.title);
        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, "<html lang=\"en\">")?;
        writeln!(f, "<head>")?;
        writeln!(f, "<meta charset=\"utf-8\">")?;
        writeln!(f, "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">")?;
        writeln!(f, "<title>{} - filetundra</title>", title)?;
        writeln!(f, "<link rel=\"stylesheet\" href=\"/static/css/tundra.css\">")?;
        writeln!(f, "</head>")?;
        writeln!(f, "<body>")?;
        writeln!(f, "<header>")?;
        writeln!(f, "<form class=\"search\" method=\"post\" action=\"/search\">")?;
        writeln!(f, "<img src=\"{}find.svg\" alt=\"\">", ICON_PREFIX)?;
        writeln!(
            f,
            "<input type=\"search\" name=\"search\" placeholder=\"Search\" value=\"{}\">",
            escape_html(&self.search_value)
        )?;
        writeln!(f, "</form>")?;
        writeln!(f, "<h1>{}</h1>", title)?;
        writeln!(f, "</header>")?;
        writeln!(f, "<table class=\"listing\">")?;

        let back = match &self.back {
            BackLink::None => None,
            BackLink::Parent(href) => Some(escape_html(href)),
            BackLink::History => Some("javascript:history.back()".to_string()),
        };
        if let Some(href) = back {
            writeln!(
                f,
                "<tr class=\"back\"><td class=\"icon\"><img src=\"{}back.svg\" alt=\"\"></td>\
                 <td class=\"name\"><a href=\"{}\">..</a></td><td></td><td></td></tr>",
                ICON_PREFIX, href
            )?;
        }

        for entry in &self.entries {
            writeln!(
                f,
                "<tr><td class=\"icon\"><img src=\"{}\" alt=\"\"></td>\
                 <td class=\"name\"><a href=\"{}\">{}</a></td>\
                 <td class=\"size\">{}</td><td class=\"modified\">{}</td></tr>",
                escape_html(&entry.icon),
                escape_html(&entry.href),
                escape_html(&entry.name),
                entry.size,
                entry.modified
            )?;
        }

        writeln!(f, "</table>")?;
        writeln!(f, "</body>")?;
        write!(f, "</html>")
    }
}
