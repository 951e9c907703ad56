use crate::canvas::Canvas;
use crate::config::{Config, load_config};
use crate::ir::Thread;
use crate::layout::LayoutMode;
use crate::observe::LogObserver;
use crate::page::{is_catalog_source, looks_like_html, parse_post_data};
use crate::pipeline::{Document, simplify_document, thread_to_canvas};
use crate::tree::ReplyTree;
use anyhow::Result;
use clap::Parser;
use log::info;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "threadcanvas",
    version,
    about = "Turn a saved board thread or catalog into a reply tree or JSON Canvas"
)]
pub struct Args {
    /// Input file (thread/catalog JSON or saved HTML page) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file, or a directory for catalog canvases. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output in JSON Canvas format
    #[arg(short = 'c', long = "canvas")]
    pub canvas: bool,

    /// Use spaced layout for better readability
    #[arg(short = 's', long = "spaced")]
    pub spaced: bool,

    /// Print the nested reply tree instead of the flat simplified thread
    #[arg(long = "tree", conflicts_with = "canvas")]
    pub tree: bool,

    /// Treat the input as a catalog (also inferred from an input name containing "catalog")
    #[arg(long = "catalog")]
    pub catalog: bool,

    /// Config JSON file (asset base, sizing and spacing overrides)
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,
}

pub fn run(args: &Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let (input, source_name) = read_input(args.input.as_deref())?;
    let is_catalog = args.catalog || is_catalog_source(&source_name);

    let value = if looks_like_html(&input) {
        parse_post_data(&input)?
    } else {
        serde_json::from_str(&input)?
    };

    let mut observer = LogObserver;
    let document = simplify_document(value, is_catalog, &config.media, &mut observer)?;
    info!(
        source = source_name.as_str(),
        catalog = is_catalog,
        threads = document.threads().len();
        "Loaded document"
    );

    if !args.canvas {
        let json = if args.tree {
            nested_json(&document)?
        } else {
            document_json(&document)?
        };
        return write_output(&json, args.output.as_deref());
    }

    let mode = LayoutMode::from_spaced(args.spaced);
    let canvases = build_canvases(document, mode, &config);

    if !is_catalog {
        let json = canvases
            .first()
            .map(|(_, canvas)| canvas.to_json())
            .transpose()?
            .unwrap_or_default();
        return write_output(&json, args.output.as_deref());
    }

    match args.output.as_deref() {
        None => {
            for (_, canvas) in &canvases {
                println!("{}", canvas.to_json()?);
            }
        }
        Some(base) => {
            let ids: Vec<&str> = canvases.iter().map(|(id, _)| id.as_str()).collect();
            let outputs = resolve_multi_outputs(base, &ids);
            for ((_, canvas), path) in canvases.iter().zip(outputs) {
                write_output(&canvas.to_json()?, Some(&path))?;
            }
        }
    }
    Ok(())
}

fn build_canvases(document: Document, mode: LayoutMode, config: &Config) -> Vec<(String, Canvas)> {
    let mut observer = LogObserver;
    document
        .into_threads()
        .into_iter()
        .map(|thread| {
            let id = thread.op.id.clone();
            let canvas = thread_to_canvas(thread, mode, &config.layout, &mut observer);
            (id, canvas)
        })
        .collect()
}

fn document_json(document: &Document) -> Result<String> {
    let json = match document {
        Document::Thread(thread) => serde_json::to_string_pretty(thread)?,
        Document::Catalog(threads) => serde_json::to_string_pretty(threads)?,
    };
    Ok(json)
}

fn nested_json(document: &Document) -> Result<String> {
    let trees: Vec<ReplyTree> = document.threads().iter().map(reply_tree).collect();
    let json = match document {
        Document::Thread(_) => serde_json::to_string_pretty(&trees[0].to_nested())?,
        Document::Catalog(_) => {
            let nested: Vec<_> = trees.iter().map(ReplyTree::to_nested).collect();
            serde_json::to_string_pretty(&nested)?
        }
    };
    Ok(json)
}

fn reply_tree(thread: &Thread) -> ReplyTree {
    ReplyTree::build(thread.op.clone(), thread.replies.iter().cloned())
}

fn read_input(path: Option<&Path>) -> Result<(String, String)> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok((buf, "-".to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        return Ok((content, path.display().to_string()));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok((buf, "-".to_string()))
}

fn write_output(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)?;
        }
        None => {
            println!("{}", text);
        }
    }
    Ok(())
}

fn resolve_multi_outputs(base: &Path, thread_ids: &[&str]) -> Vec<PathBuf> {
    if base.is_dir() {
        return thread_ids
            .iter()
            .map(|id| base.join(format!("thread-{}.canvas", id)))
            .collect();
    }
    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("thread");
    let ext = base
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("canvas");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    (0..thread_ids.len())
        .map(|idx| parent.join(format!("{}-{}.{}", stem, idx + 1, ext)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Post;

    #[test]
    fn parses_canvas_and_spaced_flags() {
        let args = Args::parse_from(["threadcanvas", "-i", "thread.json", "-c", "-s"]);
        assert!(args.canvas);
        assert!(args.spaced);
        assert!(!args.catalog);
        assert_eq!(args.log_level, "warn");
        assert_eq!(args.input.as_deref(), Some(Path::new("thread.json")));
    }

    #[test]
    fn tree_conflicts_with_canvas() {
        let result = Args::try_parse_from(["threadcanvas", "--tree", "--canvas"]);
        assert!(result.is_err());
    }

    #[test]
    fn multi_outputs_number_files_next_to_base() {
        let outputs = resolve_multi_outputs(Path::new("out/board.canvas"), &["10", "20"]);
        assert_eq!(
            outputs,
            vec![
                PathBuf::from("out/board-1.canvas"),
                PathBuf::from("out/board-2.canvas")
            ]
        );
    }

    #[test]
    fn multi_outputs_use_thread_ids_in_directory() {
        let dir = std::env::temp_dir();
        let outputs = resolve_multi_outputs(&dir, &["10"]);
        assert_eq!(outputs, vec![dir.join("thread-10.canvas")]);
    }

    #[test]
    fn nested_json_for_single_thread() {
        let mut thread = Thread::new(Post::new("1", "op"));
        thread.replies.push(Post::new("2", "re").replying_to("1"));
        let json = nested_json(&Document::Thread(thread)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["replies"][0]["id"], "2");
    }

    #[test]
    fn flat_json_uses_camel_case() {
        let thread = Thread::new(Post::new("1", "op"));
        let json = document_json(&Document::Thread(thread)).unwrap();
        assert!(json.contains("\"parentRefs\""));
        assert!(json.contains("\"replies\""));
    }
}
