//! JSON Canvas export of a laid out thread.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ThreadError;
use crate::layout::{EdgeLayout, Layout, MediaStyle, NodeKind, NodeLayout, Side};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Canvas {
    pub nodes: Vec<CanvasNode>,
    pub edges: Vec<CanvasEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasNode {
    pub id: String,
    #[serde(flatten)]
    pub content: NodeContent,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeContent {
    Text { text: String },
    File { file: String },
    Link { url: String },
    Group { label: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasEdge {
    pub id: String,
    pub from_node: String,
    pub from_side: Side,
    pub to_node: String,
    pub to_side: Side,
}

impl From<&NodeLayout> for CanvasNode {
    fn from(node: &NodeLayout) -> Self {
        let content = match &node.kind {
            NodeKind::Text { text } => NodeContent::Text { text: text.clone() },
            NodeKind::Media {
                url,
                style: MediaStyle::Embed,
            } => NodeContent::File { file: url.clone() },
            NodeKind::Media {
                url,
                style: MediaStyle::Link,
            } => NodeContent::Link { url: url.clone() },
            NodeKind::Group { label } => NodeContent::Group {
                label: label.clone(),
            },
        };
        CanvasNode {
            id: node.id.clone(),
            content,
            x: node.x,
            y: node.y,
            width: node.width,
            height: node.height,
        }
    }
}

impl CanvasEdge {
    /// Edge ids come from the emission index: post ids are free-form text,
    /// so joining the endpoints cannot keep ids unique.
    pub fn from_layout(index: usize, edge: &EdgeLayout) -> Self {
        CanvasEdge {
            id: format!("edge-{index}"),
            from_node: edge.from.clone(),
            from_side: edge.from_side,
            to_node: edge.to.clone(),
            to_side: edge.to_side,
        }
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: CanvasNode) {
        self.nodes.push(node);
    }

    pub fn add_edge(&mut self, edge: CanvasEdge) {
        self.edges.push(edge);
    }

    /// Collects every node, post by post with group parts after their group,
    /// followed by every edge in emission order.
    pub fn from_layout(layout: &Layout) -> Self {
        let mut canvas = Canvas::new();
        for node in layout.nodes() {
            canvas.add_node(CanvasNode::from(node));
        }
        for (index, edge) in layout.edges.iter().enumerate() {
            canvas.add_edge(CanvasEdge::from_layout(index, edge));
        }
        canvas
    }

    pub fn node(&self, id: &str) -> Option<&CanvasNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn to_json(&self) -> Result<String, ThreadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(input: &str) -> Result<Self, ThreadError> {
        Ok(serde_json::from_str(input)?)
    }
}

pub fn write_canvas(path: &Path, canvas: &Canvas) -> Result<(), ThreadError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, canvas)?;
    Ok(())
}
