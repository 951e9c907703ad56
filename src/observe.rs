//! Checkpoint hooks called while a thread moves through the pipeline.

use log::{Level, debug, log_enabled, trace};

use crate::ir::Thread;
use crate::layout::Layout;
use crate::tree::ReplyTree;

/// Receives intermediate results. Every method defaults to doing nothing.
pub trait PipelineObserver {
    fn simplified(&mut self, _thread: &Thread) {}

    fn tree_built(&mut self, _tree: &ReplyTree) {}

    fn laid_out(&mut self, _layout: &Layout) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Writes structured `log` records, and the intermediate JSON at trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn simplified(&mut self, thread: &Thread) {
        debug!(
            thread_id = thread.op.id.as_str(),
            posts = thread.post_count();
            "Simplified thread"
        );
        if log_enabled!(Level::Trace) {
            match serde_json::to_string_pretty(thread) {
                Ok(json) => trace!("{json}"),
                Err(err) => trace!(err:%; "Could not serialize simplified thread"),
            }
        }
    }

    fn tree_built(&mut self, tree: &ReplyTree) {
        debug!(
            root = tree.root_id(),
            posts = tree.len(),
            depth = tree.max_depth(),
            top_level = tree.children(tree.root_id()).len();
            "Built reply tree"
        );
        if log_enabled!(Level::Trace) {
            match serde_json::to_string_pretty(&tree.to_nested()) {
                Ok(json) => trace!("{json}"),
                Err(err) => trace!(err:%; "Could not serialize reply tree"),
            }
        }
    }

    fn laid_out(&mut self, layout: &Layout) {
        debug!(
            nodes = layout.nodes().count(),
            edges = layout.edges.len(),
            width = layout.width,
            height = layout.height;
            "Computed layout"
        );
    }
}
