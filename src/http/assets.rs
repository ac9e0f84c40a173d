//! Stylesheet and icons compiled into the binary

/// One bundled file
#[derive(Debug)]
pub struct Asset {
    /// Path below `/static/`
    pub path: &'static str,
    pub content_type: &'static str,
    pub bytes: &'static [u8],
}

const SVG: &str = "image/svg+xml";

macro_rules! icon {
    ($name:literal) => {
        Asset {
            path: concat!("icons/", $name, ".svg"),
            content_type: SVG,
            bytes: include_bytes!(concat!("../../assets/static/icons/", $name, ".svg")),
        }
    };
}

static ASSETS: &[Asset] = &[
    Asset {
        path: "css/tundra.css",
        content_type: "text/css; charset=utf-8",
        bytes: include_bytes!("../../assets/static/css/tundra.css"),
    },
    icon!("archive"),
    icon!("audio"),
    icon!("back"),
    icon!("directory"),
    icon!("document"),
    icon!("executable"),
    icon!("find"),
    icon!("image"),
    icon!("pdf"),
    icon!("presentation"),
    icon!("spreadsheet"),
    icon!("text"),
    icon!("video"),
];

/// Bundled asset at `path` (relative to `/static/`)
pub fn lookup(path: &str) -> Option<&'static Asset> {
    let path = path.trim_start_matches('/');
    ASSETS.iter().find(|asset| asset.path == path)
}

/// Every bundled asset
pub fn all() -> &'static [Asset] {
    ASSETS
}
