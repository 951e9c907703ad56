pub mod canvas;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod observe;
pub mod page;
pub mod pipeline;
pub mod simplify;
pub mod tree;

pub use canvas::{Canvas, CanvasEdge, CanvasNode, NodeContent, write_canvas};
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, MediaConfig, SizingConfig, SpacingPolicy, load_config};
pub use error::ThreadError;
pub use ir::{Media, Post, Thread};
pub use layout::{Layout, LayoutMode, compute_layout};
pub use observe::{LogObserver, NoopObserver, PipelineObserver};
pub use pipeline::{Document, build_graph, build_graph_with, simplify_document, thread_to_canvas};
pub use tree::{ReplyTree, TreeNode};
