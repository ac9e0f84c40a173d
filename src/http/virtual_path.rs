//! Mapping between request paths and paths below the indexed root
//!
//! Virtual paths always start with `/` and never contain `.` or `..`
//! segments; `..` at the top is dropped rather than escaping the root.

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a request path
pub fn normalize(raw: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

fn segments(virtual_path: &str) -> impl Iterator<Item = &str> {
    virtual_path.split('/').filter(|s| !s.is_empty())
}

/// Absolute path on disk for a normalized virtual path
pub fn to_absolute(root: &Path, virtual_path: &str) -> PathBuf {
    segments(virtual_path).fold(root.to_path_buf(), |path, segment| path.join(segment))
}

/// Virtual path of an absolute path, or `None` when it lies outside `root`
pub fn from_absolute(root: &Path, absolute: &Path) -> Option<String> {
    let relative = absolute.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Some(format!("/{}", parts.join("/")))
}

/// Parent of a virtual path; `None` at the root
pub fn parent(virtual_path: &str) -> Option<String> {
    if virtual_path == "/" {
        return None;
    }
    match virtual_path.rsplit_once('/') {
        Some(("", _)) | None => Some("/".to_string()),
        Some((head, _)) => Some(head.to_string()),
    }
}

/// Child `name` of a virtual directory
pub fn join(virtual_path: &str, name: &str) -> String {
    if virtual_path == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", virtual_path, name)
    }
}

/// URL for a virtual path under a route prefix, each segment percent-encoded
pub fn href(prefix: &str, virtual_path: &str) -> String {
    let mut url = prefix.to_string();
    for segment in segments(virtual_path) {
        url.push('/');
        url.push_str(&urlencoding::encode(segment));
    }
    if url == prefix {
        url.push('/');
    }
    url
}
