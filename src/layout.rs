mod sizing;
mod text;
mod types;

pub use types::*;

use std::collections::HashMap;

use crate::config::{LayoutConfig, SiblingFanOut, SpacingPolicy};
use crate::tree::ReplyTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Children stacked under their parent at a fixed indent.
    #[default]
    Compact,
    /// Children spread over columns with generous gaps.
    Spaced,
}

impl LayoutMode {
    pub fn from_spaced(spaced: bool) -> Self {
        if spaced { Self::Spaced } else { Self::Compact }
    }

    pub fn policy(self, config: &LayoutConfig) -> &SpacingPolicy {
        match self {
            LayoutMode::Compact => &config.compact,
            LayoutMode::Spaced => &config.spaced,
        }
    }
}

pub fn compute_layout(tree: &ReplyTree, config: &LayoutConfig, mode: LayoutMode) -> Layout {
    let mut posts: HashMap<String, PostBoxes> = tree
        .iter()
        .map(|node| {
            (
                node.post.id.clone(),
                sizing::size_post(&node.post, &config.sizing),
            )
        })
        .collect();
    let mut edges = Vec::with_capacity(tree.len().saturating_sub(1));
    let policy = mode.policy(config);

    place_subtree(
        tree,
        &mut posts,
        &mut edges,
        policy,
        tree.root_id(),
        0.0,
        0.0,
    );

    let order: Vec<String> = tree.iter().map(|node| node.post.id.clone()).collect();
    let (width, height) = bounds(posts.values());
    Layout {
        order,
        posts,
        edges,
        width,
        height,
    }
}

/// Positions `id` at (x, y) and its subtree below it, pre-order.
///
/// Returns the first free y below everything placed, so the caller can
/// stack the next sibling without vertical overlap.
fn place_subtree(
    tree: &ReplyTree,
    posts: &mut HashMap<String, PostBoxes>,
    edges: &mut Vec<EdgeLayout>,
    policy: &SpacingPolicy,
    id: &str,
    x: f32,
    y: f32,
) -> f32 {
    let Some(boxes) = posts.get_mut(id) else {
        return y;
    };
    boxes.main.x = x;
    boxes.main.y = y;
    if let Some(parts) = boxes.parts.as_mut() {
        parts.text.x = x;
        parts.text.y = y;
        parts.media.x = x + parts.text.width + policy.group_gap;
        parts.media.y = y;
    }
    let mut current_y = y + boxes.main.height + policy.vertical_spacing;

    for (idx, child) in tree.children(id).iter().enumerate() {
        let child_x = child_x(policy, x, idx);
        let below = place_subtree(tree, posts, edges, policy, child, child_x, current_y);
        edges.push(EdgeLayout::downward(id, child));
        current_y = below + policy.sibling_gap;
    }

    current_y
}

fn child_x(policy: &SpacingPolicy, parent_x: f32, idx: usize) -> f32 {
    match policy.fan_out {
        SiblingFanOut::Indent => parent_x + policy.child_indent,
        SiblingFanOut::Columns(columns) => {
            let column = idx % columns.max(1);
            let spacing = policy.horizontal_spacing.unwrap_or(0.0);
            parent_x + column as f32 * spacing
        }
    }
}

fn bounds<'a>(posts: impl Iterator<Item = &'a PostBoxes>) -> (f32, f32) {
    posts
        .flat_map(PostBoxes::nodes)
        .fold((0.0f32, 0.0f32), |(w, h), node| {
            (w.max(node.right()), h.max(node.bottom()))
        })
}
