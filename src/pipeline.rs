//! End-to-end entry points: raw board JSON in, simplified threads or canvas
//! documents out.

use log::info;

use crate::canvas::Canvas;
use crate::config::{LayoutConfig, MediaConfig};
use crate::error::ThreadError;
use crate::ir::{Post, Thread};
use crate::layout::{LayoutMode, compute_layout};
use crate::observe::{LogObserver, PipelineObserver};
use crate::simplify::{RawCatalog, RawThread, simplify_catalog, simplify_thread};
use crate::tree::ReplyTree;

/// A simplified board document: one thread or a whole catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Thread(Thread),
    Catalog(Vec<Thread>),
}

impl Document {
    pub fn threads(&self) -> &[Thread] {
        match self {
            Document::Thread(thread) => std::slice::from_ref(thread),
            Document::Catalog(threads) => threads,
        }
    }

    pub fn into_threads(self) -> Vec<Thread> {
        match self {
            Document::Thread(thread) => vec![thread],
            Document::Catalog(threads) => threads,
        }
    }
}

pub fn simplify_document(
    value: serde_json::Value,
    is_catalog: bool,
    config: &MediaConfig,
    observer: &mut dyn PipelineObserver,
) -> Result<Document, ThreadError> {
    if is_catalog {
        let raw: Option<RawCatalog> = serde_json::from_value(value)?;
        let raw = raw.ok_or(ThreadError::NoData)?;
        let threads = simplify_catalog(&raw, config);
        for thread in &threads {
            observer.simplified(thread);
        }
        info!(threads = threads.len(); "Simplified catalog");
        return Ok(Document::Catalog(threads));
    }

    let raw: Option<RawThread> = serde_json::from_value(value)?;
    let thread = simplify_thread(raw.as_ref(), config).ok_or(ThreadError::NoData)?;
    observer.simplified(&thread);
    Ok(Document::Thread(thread))
}

/// Builds the canvas for one thread with the default configuration.
pub fn build_graph(root: Post, replies: Vec<Post>, mode: LayoutMode) -> Canvas {
    build_graph_with(
        root,
        replies,
        mode,
        &LayoutConfig::default(),
        &mut LogObserver,
    )
}

pub fn build_graph_with(
    root: Post,
    replies: Vec<Post>,
    mode: LayoutMode,
    config: &LayoutConfig,
    observer: &mut dyn PipelineObserver,
) -> Canvas {
    let tree = ReplyTree::build(root, replies);
    observer.tree_built(&tree);

    let layout = compute_layout(&tree, config, mode);
    observer.laid_out(&layout);

    Canvas::from_layout(&layout)
}

pub fn thread_to_canvas(
    thread: Thread,
    mode: LayoutMode,
    config: &LayoutConfig,
    observer: &mut dyn PipelineObserver,
) -> Canvas {
    build_graph_with(thread.op, thread.replies, mode, config, observer)
}
