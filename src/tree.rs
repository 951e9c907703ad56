use std::collections::HashMap;

use log::{debug, warn};
use serde::Serialize;

use crate::ir::{Media, Post};

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub post: Post,
    pub parent_id: Option<String>,
    pub children: Vec<String>,
}

/// Reply tree rooted at the opening post.
///
/// Nodes live in a single id-keyed arena. A reply's parent is always chosen
/// among posts inserted before it, so the tree is acyclic and every post is
/// reachable from the root.
#[derive(Debug, Clone)]
pub struct ReplyTree {
    root_id: String,
    nodes: HashMap<String, TreeNode>,
    order: Vec<String>,
}

impl ReplyTree {
    pub fn build(op: Post, replies: impl IntoIterator<Item = Post>) -> Self {
        let root_id = op.id.clone();
        let mut nodes = HashMap::new();
        nodes.insert(
            root_id.clone(),
            TreeNode {
                post: op,
                parent_id: None,
                children: Vec::new(),
            },
        );
        let mut order = vec![root_id.clone()];

        for reply in replies {
            if nodes.contains_key(&reply.id) {
                warn!(post_id = reply.id.as_str(); "Skipping reply with duplicate id");
                continue;
            }
            let parent_id = match reply.parent_refs.first() {
                Some(candidate) if nodes.contains_key(candidate) => candidate.clone(),
                Some(candidate) => {
                    debug!(
                        post_id = reply.id.as_str(),
                        parent_ref = candidate.as_str();
                        "Unresolved parent reference, attaching to root"
                    );
                    root_id.clone()
                }
                None => root_id.clone(),
            };
            let id = reply.id.clone();
            if let Some(parent) = nodes.get_mut(&parent_id) {
                parent.children.push(id.clone());
            }
            nodes.insert(
                id.clone(),
                TreeNode {
                    post: reply,
                    parent_id: Some(parent_id),
                    children: Vec::new(),
                },
            );
            order.push(id);
        }

        Self {
            root_id,
            nodes,
            order,
        }
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[&self.root_id]
    }

    pub fn get(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn children(&self, id: &str) -> &[String] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Nodes in arrival order, root first.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn depth_of(&self, id: &str) -> Option<usize> {
        let mut node = self.nodes.get(id)?;
        let mut depth = 0;
        while let Some(parent) = node.parent_id.as_deref() {
            node = self.nodes.get(parent)?;
            depth += 1;
        }
        Some(depth)
    }

    pub fn max_depth(&self) -> usize {
        self.order
            .iter()
            .filter_map(|id| self.depth_of(id))
            .max()
            .unwrap_or(0)
    }

    pub fn to_nested(&self) -> NestedPost<'_> {
        self.nest(&self.root_id)
    }

    fn nest(&self, id: &str) -> NestedPost<'_> {
        let node = &self.nodes[id];
        NestedPost {
            id: &node.post.id,
            text: &node.post.text,
            media: node.post.media.as_ref(),
            replies: node.children.iter().map(|child| self.nest(child)).collect(),
        }
    }
}

/// Borrowed nested view of the tree for plain JSON export.
#[derive(Debug, Serialize)]
pub struct NestedPost<'a> {
    pub id: &'a str,
    pub text: &'a str,
    pub media: Option<&'a Media>,
    pub replies: Vec<NestedPost<'a>>,
}
