use serde::Deserialize;
use thread_canvas::{
    Canvas, LayoutConfig, LayoutMode, MediaConfig, NoopObserver, ThreadError, simplify_document,
    thread_to_canvas,
};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CanvasRenderOptions {
    spaced: Option<bool>,
    catalog: Option<bool>,
    asset_base: Option<String>,
}

fn render_canvas(raw_json: &str, options: CanvasRenderOptions) -> Result<Canvas, ThreadError> {
    let mut media = MediaConfig::default();
    if let Some(asset_base) = options.asset_base {
        media.asset_base = asset_base;
    }
    let value = serde_json::from_str(raw_json)?;
    let mut observer = NoopObserver;
    let document = simplify_document(
        value,
        options.catalog.unwrap_or(false),
        &media,
        &mut observer,
    )?;
    let thread = document
        .into_threads()
        .into_iter()
        .next()
        .ok_or(ThreadError::NoData)?;
    let mode = LayoutMode::from_spaced(options.spaced.unwrap_or(false));
    Ok(thread_to_canvas(
        thread,
        mode,
        &LayoutConfig::default(),
        &mut observer,
    ))
}

#[wasm_bindgen]
pub fn render_thread_canvas(raw_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<CanvasRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        CanvasRenderOptions::default()
    };

    render_canvas(raw_json, options)
        .and_then(|canvas| canvas.to_json())
        .map_err(|error| JsValue::from_str(&error.to_string()))
}
