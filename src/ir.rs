use serde::{Deserialize, Serialize};

/// A single post after simplification. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub text: String,
    pub media: Option<Media>,
    #[serde(default)]
    pub parent_refs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub source_url: String,
    pub thumbnail_url: String,
    pub width: u32,
    pub height: u32,
    pub thumb_width: u32,
    pub thumb_height: u32,
    pub is_video: bool,
}

/// An opening post and its replies in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub op: Post,
    pub subject: Option<String>,
    pub replies: Vec<Post>,
}

impl Post {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            media: None,
            parent_refs: Vec::new(),
        }
    }

    pub fn with_media(mut self, media: Media) -> Self {
        self.media = Some(media);
        self
    }

    pub fn replying_to(mut self, parent: impl Into<String>) -> Self {
        self.parent_refs.push(parent.into());
        self
    }
}

impl Thread {
    pub fn new(op: Post) -> Self {
        Self {
            op,
            subject: None,
            replies: Vec::new(),
        }
    }

    pub fn post_count(&self) -> usize {
        1 + self.replies.len()
    }
}
