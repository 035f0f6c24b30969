//! Frontend files compiled into the binary.

use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub body: Cow<'static, [u8]>,
    pub content_type: &'static str,
}

/// Lookup of static files by name relative to the frontend root.
pub trait AssetSource: Send + Sync {
    fn get(&self, path: &str) -> Option<Asset>;
}

const INDEX_HTML: &[u8] = include_bytes!("../../frontend/index.html");
const STYLE_CSS: &[u8] = include_bytes!("../../frontend/style.css");
const APP_JS: &[u8] = include_bytes!("../../frontend/app.js");

#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedAssets;

impl AssetSource for EmbeddedAssets {
    fn get(&self, path: &str) -> Option<Asset> {
        let (body, content_type) = match path.trim_start_matches('/') {
            "index.html" => (INDEX_HTML, "text/html; charset=utf-8"),
            "style.css" => (STYLE_CSS, "text/css; charset=utf-8"),
            "app.js" => (APP_JS, "application/javascript; charset=utf-8"),
            _ => return None,
        };

        Some(Asset {
            body: Cow::Borrowed(body),
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_files_resolve() {
        let assets = EmbeddedAssets;
        let index = assets.get("index.html").unwrap();
        assert!(index.content_type.starts_with("text/html"));
        assert!(!index.body.is_empty());
        assert!(assets.get("/style.css").is_some());
        assert_eq!(
            assets.get("app.js").unwrap().content_type,
            "application/javascript; charset=utf-8"
        );
    }

    #[test]
    fn unknown_paths_are_missing() {
        let assets = EmbeddedAssets;
        assert!(assets.get("").is_none());
        assert!(assets.get("../Cargo.toml").is_none());
        assert!(assets.get("secret.txt").is_none());
    }
}
