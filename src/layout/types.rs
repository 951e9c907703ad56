use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub width: f32,
    pub height: f32,
}

/// How a media box is presented: videos become links, images are embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaStyle {
    Link,
    Embed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Text { text: String },
    Media { url: String, style: MediaStyle },
    Group { label: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: NodeKind,
}

impl NodeLayout {
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Text and media boxes nested inside a group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupParts {
    pub text: NodeLayout,
    pub media: NodeLayout,
}

/// Every visual node produced for one post.
///
/// `main` carries the post id and is the node edges attach to. For posts
/// with both text and media it is the group box, and `parts` holds the two
/// boxes inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct PostBoxes {
    pub main: NodeLayout,
    pub parts: Option<GroupParts>,
}

impl PostBoxes {
    pub fn nodes(&self) -> impl Iterator<Item = &NodeLayout> {
        std::iter::once(&self.main).chain(
            self.parts
                .iter()
                .flat_map(|parts| [&parts.text, &parts.media]),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLayout {
    pub from: String,
    pub to: String,
    pub from_side: Side,
    pub to_side: Side,
}

impl EdgeLayout {
    pub fn downward(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            from_side: Side::Bottom,
            to_side: Side::Top,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Layout {
    /// Post ids in arrival order, root first.
    pub order: Vec<String>,
    pub posts: HashMap<String, PostBoxes>,
    pub edges: Vec<EdgeLayout>,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn post(&self, id: &str) -> Option<&PostBoxes> {
        self.posts.get(id)
    }

    /// All visual nodes, post by post in arrival order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeLayout> {
        self.order
            .iter()
            .filter_map(|id| self.posts.get(id))
            .flat_map(PostBoxes::nodes)
    }
}
