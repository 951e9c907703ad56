//! Normalizes the upstream board JSON into [`Post`], [`Media`] and [`Thread`].
//!
//! The raw schema is entirely optional-field: the data comes from an
//! uncontrolled service, so missing or badly typed fields fall back to
//! defaults instead of failing. Only a genuinely absent record (`null`)
//! yields `None`.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::config::MediaConfig;
use crate::ir::{Media, Post, Thread};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(u64),
    Text(String),
}

impl RawId {
    pub fn as_string(&self) -> String {
        match self {
            RawId::Number(val) => val.to_string(),
            RawId::Text(val) => val.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawThread {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<RawId>,
    #[serde(default, deserialize_with = "lenient")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<RawImage>,
    pub posts: Option<Vec<Option<RawPost>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPost {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<RawId>,
    #[serde(default, deserialize_with = "lenient")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<RawImage>,
    #[serde(default, deserialize_with = "lenient")]
    pub links: Option<Vec<RawLink>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLink {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<RawId>,
}

/// Image descriptor. `file_type` and `dims` stay untyped so that a stray
/// string or float degrades to `unknown` / 0 instead of failing the thread.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawImage {
    pub file_type: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub sha1: Option<String>,
    pub dims: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub video: Option<bool>,
}

impl RawImage {
    /// An empty descriptor (`"image": {}`) carries nothing to show.
    pub fn is_present(&self) -> bool {
        self.sha1.is_some() || self.dims.is_some()
    }

    pub fn format_code(&self) -> Option<i64> {
        self.file_type.as_ref().and_then(integral)
    }

    pub fn dimension(&self, idx: usize) -> u32 {
        self.dims
            .as_ref()
            .and_then(Value::as_array)
            .and_then(|dims| dims.get(idx))
            .and_then(integral)
            .and_then(|val| u32::try_from(val).ok())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCatalog {
    pub threads: Option<Vec<Option<RawThread>>>,
}

/// Keeps a field's value when it has the expected shape, `None` otherwise.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}

fn integral(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|val| val.fract() == 0.0 && val.abs() <= i64::MAX as f64)
            .map(|val| val as i64)
    })
}

/// File extension for an upstream format code.
pub fn file_extension(file_type: Option<i64>) -> &'static str {
    match file_type {
        Some(0) => "jpg",
        Some(1) => "png",
        Some(3) => "webm",
        other => {
            debug!(file_type:? = other; "Unknown media format, using fallback extension");
            "unknown"
        }
    }
}

pub fn simplify_media(image: &RawImage, config: &MediaConfig) -> Media {
    let sha1 = image.sha1.as_deref().unwrap_or_default();
    let extension = file_extension(image.format_code());
    let base = config.asset_base.trim_end_matches('/');
    Media {
        source_url: format!("{base}/src/{sha1}.{extension}"),
        thumbnail_url: format!("{base}/thumb/{sha1}.webp"),
        width: image.dimension(0),
        height: image.dimension(1),
        thumb_width: image.dimension(2),
        thumb_height: image.dimension(3),
        is_video: image.video.unwrap_or(false),
    }
}

fn post_media(image: Option<&RawImage>, config: &MediaConfig) -> Option<Media> {
    image
        .filter(|image| image.is_present())
        .map(|image| simplify_media(image, config))
}

pub fn simplify_post(raw: Option<&RawPost>, config: &MediaConfig) -> Option<Post> {
    let raw = raw?;
    let parent_refs = raw
        .links
        .iter()
        .flatten()
        .filter_map(|link| link.id.as_ref().map(RawId::as_string))
        .collect();
    Some(Post {
        id: id_string(raw.id.as_ref()),
        text: raw.body.clone().unwrap_or_default(),
        media: post_media(raw.image.as_ref(), config),
        parent_refs,
    })
}

pub fn simplify_thread(raw: Option<&RawThread>, config: &MediaConfig) -> Option<Thread> {
    let raw = raw?;
    let op = Post {
        id: id_string(raw.id.as_ref()),
        text: raw.body.clone().unwrap_or_default(),
        media: post_media(raw.image.as_ref(), config),
        parent_refs: Vec::new(),
    };
    let replies = raw
        .posts
        .iter()
        .flatten()
        .filter_map(|post| simplify_post(post.as_ref(), config))
        .collect();
    Some(Thread {
        op,
        subject: raw.subject.clone(),
        replies,
    })
}

pub fn simplify_catalog(raw: &RawCatalog, config: &MediaConfig) -> Vec<Thread> {
    let Some(threads) = raw.threads.as_ref() else {
        warn!("'threads' key not found in catalog data");
        return Vec::new();
    };
    threads
        .iter()
        .filter_map(|thread| simplify_thread(thread.as_ref(), config))
        .collect()
}

fn id_string(id: Option<&RawId>) -> String {
    id.map(RawId::as_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media_config() -> MediaConfig {
        MediaConfig {
            asset_base: "https://img.test/assets".to_string(),
        }
    }

    #[test]
    fn maps_known_and_unknown_formats() {
        assert_eq!(file_extension(Some(0)), "jpg");
        assert_eq!(file_extension(Some(1)), "png");
        assert_eq!(file_extension(Some(3)), "webm");
        assert_eq!(file_extension(Some(2)), "unknown");
        assert_eq!(file_extension(None), "unknown");
    }

    #[test]
    fn badly_typed_format_and_dims_degrade() {
        let image: RawImage = serde_json::from_str(
            r#"{"file_type": "3", "sha1": "abc", "dims": [800.0, 600, 200.5, "150"], "video": "yes"}"#,
        )
        .unwrap();
        assert_eq!(image.format_code(), None);
        let media = simplify_media(&image, &media_config());
        assert_eq!(media.source_url, "https://img.test/assets/src/abc.unknown");
        assert_eq!((media.width, media.height), (800, 600));
        assert_eq!((media.thumb_width, media.thumb_height), (0, 0));
        assert!(!media.is_video);

        let integral: RawImage = serde_json::from_str(r#"{"file_type": 1.0, "dims": -4}"#).unwrap();
        assert_eq!(integral.format_code(), Some(1));
        assert_eq!(integral.dimension(0), 0);
    }

    #[test]
    fn malformed_fields_do_not_fail_the_thread() {
        let raw: RawThread = serde_json::from_value(serde_json::json!({
            "id": 1,
            "body": 42,
            "posts": [
                {"id": 2, "image": {"file_type": "3", "sha1": "x", "dims": [800.0, 600, 200, 150]}},
                {"id": 3, "links": "not a list"},
                {"id": 4, "links": [{"id": 2.5}, {"id": 2}]}
            ]
        }))
        .unwrap();
        let thread = simplify_thread(Some(&raw), &media_config()).unwrap();
        assert_eq!(thread.op.text, "");
        assert_eq!(thread.replies.len(), 3);
        let media = thread.replies[0].media.as_ref().unwrap();
        assert!(media.source_url.ends_with("/src/x.unknown"));
        assert_eq!(media.width, 800);
        assert!(thread.replies[1].parent_refs.is_empty());
        assert_eq!(thread.replies[2].parent_refs, vec!["2".to_string()]);
    }

    #[test]
    fn builds_media_urls_and_dimensions() {
        let image: RawImage = serde_json::from_str(
            r#"{"file_type": 1, "sha1": "abc", "dims": [800, 600, 200, 150], "video": false}"#,
        )
        .unwrap();
        let media = simplify_media(&image, &media_config());
        assert_eq!(media.source_url, "https://img.test/assets/src/abc.png");
        assert_eq!(media.thumbnail_url, "https://img.test/assets/thumb/abc.webp");
        assert_eq!((media.width, media.height), (800, 600));
        assert_eq!((media.thumb_width, media.thumb_height), (200, 150));
        assert!(!media.is_video);
    }

    #[test]
    fn missing_dimensions_default_to_zero() {
        let image: RawImage = serde_json::from_str(r#"{"file_type": 3, "video": true}"#).unwrap();
        let media = simplify_media(&image, &media_config());
        assert_eq!(media.width, 0);
        assert_eq!(media.thumb_height, 0);
        assert!(media.is_video);
        assert!(media.source_url.ends_with(".webm"));

        let short: RawImage = serde_json::from_str(r#"{"dims": [10, 20]}"#).unwrap();
        let media = simplify_media(&short, &media_config());
        assert_eq!((media.width, media.height), (10, 20));
        assert_eq!((media.thumb_width, media.thumb_height), (0, 0));
    }

    #[test]
    fn absent_post_is_none() {
        assert!(simplify_post(None, &media_config()).is_none());
        assert!(simplify_thread(None, &media_config()).is_none());
    }

    #[test]
    fn post_collects_link_ids_in_order() {
        let raw: RawPost = serde_json::from_str(
            r#"{"id": 12, "body": "hi", "links": [{"id": 10}, {"id": "11"}, {}]}"#,
        )
        .unwrap();
        let post = simplify_post(Some(&raw), &media_config()).unwrap();
        assert_eq!(post.id, "12");
        assert_eq!(post.text, "hi");
        assert_eq!(post.parent_refs, vec!["10".to_string(), "11".to_string()]);
        assert!(post.media.is_none());
    }

    #[test]
    fn post_tolerates_missing_fields() {
        let raw: RawPost = serde_json::from_str(r#"{"id": 5, "links": null}"#).unwrap();
        let post = simplify_post(Some(&raw), &media_config()).unwrap();
        assert_eq!(post.text, "");
        assert!(post.parent_refs.is_empty());

        let raw: RawPost = serde_json::from_str(r#"{"id": 6, "image": {}}"#).unwrap();
        let post = simplify_post(Some(&raw), &media_config()).unwrap();
        assert!(post.media.is_none());

        let raw: RawThread = serde_json::from_str(r#"{"id": 1, "body": "op", "image": {}}"#).unwrap();
        let thread = simplify_thread(Some(&raw), &media_config()).unwrap();
        assert!(thread.op.media.is_none());
    }

    #[test]
    fn thread_skips_null_posts() {
        let raw: RawThread = serde_json::from_str(
            r#"{"id": 1, "subject": "topic", "body": "op", "posts": [null, {"id": 2, "body": "a"}]}"#,
        )
        .unwrap();
        let thread = simplify_thread(Some(&raw), &media_config()).unwrap();
        assert_eq!(thread.op.id, "1");
        assert_eq!(thread.subject.as_deref(), Some("topic"));
        assert_eq!(thread.replies.len(), 1);
        assert_eq!(thread.replies[0].id, "2");
    }

    #[test]
    fn catalog_without_threads_is_empty() {
        let raw: RawCatalog = serde_json::from_str(r#"{"board": "b"}"#).unwrap();
        assert!(simplify_catalog(&raw, &media_config()).is_empty());

        let raw: RawCatalog =
            serde_json::from_str(r#"{"threads": [{"id": 1}, null, {"id": 2}]}"#).unwrap();
        let threads = simplify_catalog(&raw, &media_config());
        assert_eq!(threads.len(), 2);
        assert_eq!(threads[1].op.id, "2");
    }
}
