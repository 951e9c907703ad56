//! Locates the post data a board page embeds as a JSON `<script>` blob.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ThreadError;

static POST_DATA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<script\b[^>]*\bid\s*=\s*["']post-data["'][^>]*>(.*?)</script\s*>"#)
        .unwrap()
});

pub fn extract_post_data(html: &str) -> Option<&str> {
    POST_DATA_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

pub fn parse_post_data(html: &str) -> Result<serde_json::Value, ThreadError> {
    let blob = extract_post_data(html).ok_or(ThreadError::MissingPostData)?;
    Ok(serde_json::from_str(blob)?)
}

/// Whether the input looks like an HTML page rather than a JSON document.
pub fn looks_like_html(input: &str) -> bool {
    input.trim_start().starts_with('<')
}

/// Catalog pages are recognized by name, the same way board URLs are.
pub fn is_catalog_source(name: &str) -> bool {
    name.contains("catalog")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_script_content() {
        let html = r#"<html><head>
<script src="/app.js"></script>
<script type="application/json" id="post-data">
  {"id": 1, "body": "op"}
</script>
</head></html>"#;
        assert_eq!(extract_post_data(html), Some(r#"{"id": 1, "body": "op"}"#));
        let value = parse_post_data(html).unwrap();
        assert_eq!(value["id"], 1);
    }

    #[test]
    fn accepts_single_quotes_and_attribute_order() {
        let html = "<SCRIPT id='post-data' type='application/json'>[]</SCRIPT>";
        assert_eq!(extract_post_data(html), Some("[]"));
    }

    #[test]
    fn missing_script_is_an_error() {
        let html = "<html><script id=\"other\">{}</script></html>";
        assert!(extract_post_data(html).is_none());
        assert!(matches!(
            parse_post_data(html),
            Err(ThreadError::MissingPostData)
        ));
    }

    #[test]
    fn malformed_blob_is_a_json_error() {
        let html = "<script id=\"post-data\">{not json</script>";
        assert!(matches!(parse_post_data(html), Err(ThreadError::Json(_))));
    }

    #[test]
    fn detects_inputs() {
        assert!(looks_like_html("  \n<!doctype html>"));
        assert!(!looks_like_html("{\"id\": 1}"));
        assert!(is_catalog_source("https://boards.example/b/catalog"));
        assert!(!is_catalog_source("thread-1234.json"));
    }
}
