use crate::config::SizingConfig;
use crate::ir::{Media, Post};

use super::text::measure_post_text;
use super::{GroupParts, MediaStyle, NodeKind, NodeLayout, PostBoxes};

pub(super) fn text_node(id: String, text: &str, config: &SizingConfig) -> NodeLayout {
    let block = measure_post_text(text, config);
    NodeLayout {
        id,
        x: 0.0,
        y: 0.0,
        width: block.width,
        height: block.height,
        kind: NodeKind::Text {
            text: text.to_string(),
        },
    }
}

pub(super) fn media_node(id: String, media: &Media) -> NodeLayout {
    let style = if media.is_video {
        MediaStyle::Link
    } else {
        MediaStyle::Embed
    };
    NodeLayout {
        id,
        x: 0.0,
        y: 0.0,
        width: media.thumb_width as f32,
        height: media.thumb_height as f32,
        kind: NodeKind::Media {
            url: media.source_url.clone(),
            style,
        },
    }
}

/// Sized but unpositioned boxes for one post.
pub(super) fn size_post(post: &Post, config: &SizingConfig) -> PostBoxes {
    let Some(media) = post.media.as_ref() else {
        return PostBoxes {
            main: text_node(post.id.clone(), &post.text, config),
            parts: None,
        };
    };

    let text = text_node(format!("{}-text", post.id), &post.text, config);
    let media = media_node(format!("{}-img", post.id), media);
    let group = NodeLayout {
        id: post.id.clone(),
        x: 0.0,
        y: 0.0,
        width: text.width + media.width + config.group_padding,
        height: text.height.max(media.height) + config.group_padding,
        kind: NodeKind::Group {
            label: format!("Post {}", post.id),
        },
    };
    PostBoxes {
        main: group,
        parts: Some(GroupParts { text, media }),
    }
}
