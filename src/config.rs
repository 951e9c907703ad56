use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ThreadError;

pub const DEFAULT_ASSET_BASE: &str = "https://boards.miladychan.org/assets/images";

/// How siblings are spread horizontally under their parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SiblingFanOut {
    /// Every child sits at the same indent below the parent.
    Indent,
    /// Children cycle through this many columns, `horizontal_spacing` apart.
    Columns(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingPolicy {
    pub vertical_spacing: f32,
    pub horizontal_spacing: Option<f32>,
    pub fan_out: SiblingFanOut,
    pub child_indent: f32,
    /// Gap between the text and media parts of a compound post.
    pub group_gap: f32,
    /// Extra gap added after each child subtree.
    pub sibling_gap: f32,
}

impl SpacingPolicy {
    pub fn compact() -> Self {
        Self {
            vertical_spacing: 20.0,
            horizontal_spacing: None,
            fan_out: SiblingFanOut::Indent,
            child_indent: 50.0,
            group_gap: 10.0,
            sibling_gap: 0.0,
        }
    }

    pub fn spaced() -> Self {
        Self {
            vertical_spacing: 100.0,
            horizontal_spacing: Some(300.0),
            fan_out: SiblingFanOut::Columns(3),
            child_indent: 0.0,
            group_gap: 5.0,
            sibling_gap: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizingConfig {
    pub char_width: f32,
    pub line_height: f32,
    pub min_text_width: f32,
    pub max_text_width: f32,
    pub min_text_height: f32,
    pub max_text_height: f32,
    pub group_padding: f32,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            char_width: 7.0,
            line_height: 20.0,
            min_text_width: 250.0,
            max_text_width: 500.0,
            min_text_height: 100.0,
            max_text_height: 300.0,
            group_padding: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    pub compact: SpacingPolicy,
    pub spaced: SpacingPolicy,
    pub sizing: SizingConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            compact: SpacingPolicy::compact(),
            spaced: SpacingPolicy::spaced(),
            sizing: SizingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaConfig {
    pub asset_base: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            asset_base: DEFAULT_ASSET_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub media: MediaConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    asset_base: Option<String>,
    sizing: Option<SizingConfigFile>,
    compact: Option<SpacingConfigFile>,
    spaced: Option<SpacingConfigFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SizingConfigFile {
    char_width: Option<f32>,
    line_height: Option<f32>,
    min_text_width: Option<f32>,
    max_text_width: Option<f32>,
    min_text_height: Option<f32>,
    max_text_height: Option<f32>,
    group_padding: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpacingConfigFile {
    vertical_spacing: Option<f32>,
    horizontal_spacing: Option<f32>,
    columns: Option<usize>,
    child_indent: Option<f32>,
    group_gap: Option<f32>,
    sibling_gap: Option<f32>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed = parse_config_file(&contents)?;
    apply_config_file(&mut config, parsed);
    Ok(config)
}

fn parse_config_file(contents: &str) -> Result<ConfigFile, ThreadError> {
    match serde_json::from_str::<ConfigFile>(contents) {
        Ok(parsed) => Ok(parsed),
        Err(strict_err) => json5::from_str::<ConfigFile>(contents)
            .map_err(|_| ThreadError::Config(strict_err.to_string())),
    }
}

fn apply_config_file(config: &mut Config, parsed: ConfigFile) {
    if let Some(base) = parsed.asset_base {
        config.media.asset_base = base.trim_end_matches('/').to_string();
    }

    if let Some(sizing) = parsed.sizing {
        let target = &mut config.layout.sizing;
        if let Some(v) = sizing.char_width {
            target.char_width = v;
        }
        if let Some(v) = sizing.line_height {
            target.line_height = v;
        }
        if let Some(v) = sizing.min_text_width {
            target.min_text_width = v;
        }
        if let Some(v) = sizing.max_text_width {
            target.max_text_width = v;
        }
        if let Some(v) = sizing.min_text_height {
            target.min_text_height = v;
        }
        if let Some(v) = sizing.max_text_height {
            target.max_text_height = v;
        }
        if let Some(v) = sizing.group_padding {
            target.group_padding = v;
        }
        if target.max_text_width < target.min_text_width {
            target.max_text_width = target.min_text_width;
        }
        if target.max_text_height < target.min_text_height {
            target.max_text_height = target.min_text_height;
        }
    }

    if let Some(spacing) = parsed.compact {
        apply_spacing(&mut config.layout.compact, spacing);
    }
    if let Some(spacing) = parsed.spaced {
        apply_spacing(&mut config.layout.spaced, spacing);
    }
}

fn apply_spacing(policy: &mut SpacingPolicy, file: SpacingConfigFile) {
    if let Some(v) = file.vertical_spacing {
        policy.vertical_spacing = v;
    }
    if let Some(v) = file.horizontal_spacing {
        policy.horizontal_spacing = Some(v);
    }
    if let Some(columns) = file.columns {
        policy.fan_out = if columns == 0 {
            SiblingFanOut::Indent
        } else {
            SiblingFanOut::Columns(columns)
        };
    }
    if let Some(v) = file.child_indent {
        policy.child_indent = v;
    }
    if let Some(v) = file.group_gap {
        policy.group_gap = v;
    }
    if let Some(v) = file.sibling_gap {
        policy.sibling_gap = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_both_policies() {
        let config = LayoutConfig::default();
        assert_eq!(config.compact.vertical_spacing, 20.0);
        assert_eq!(config.compact.group_gap, 10.0);
        assert_eq!(config.compact.horizontal_spacing, None);
        assert_eq!(config.spaced.vertical_spacing, 100.0);
        assert_eq!(config.spaced.horizontal_spacing, Some(300.0));
        assert_eq!(config.spaced.fan_out, SiblingFanOut::Columns(3));
        assert_eq!(config.spaced.group_gap, 5.0);
    }

    #[test]
    fn applies_only_present_overrides() {
        let parsed = parse_config_file(
            r#"{"assetBase": "https://example.test/img/", "spaced": {"columns": 4}, "sizing": {"charWidth": 8}}"#,
        )
        .unwrap();
        let mut config = Config::default();
        apply_config_file(&mut config, parsed);
        assert_eq!(config.media.asset_base, "https://example.test/img");
        assert_eq!(config.layout.spaced.fan_out, SiblingFanOut::Columns(4));
        assert_eq!(config.layout.spaced.vertical_spacing, 100.0);
        assert_eq!(config.layout.sizing.char_width, 8.0);
        assert_eq!(config.layout.sizing.line_height, 20.0);
        assert_eq!(config.layout.compact, SpacingPolicy::compact());
    }

    #[test]
    fn accepts_json5_config() {
        let parsed = parse_config_file("{ compact: { childIndent: 80, }, // trailing\n }").unwrap();
        let mut config = Config::default();
        apply_config_file(&mut config, parsed);
        assert_eq!(config.layout.compact.child_indent, 80.0);
    }

    #[test]
    fn rejects_unparseable_config() {
        let err = parse_config_file(r#"{"compact": {"childIndent": "wide"}}"#).unwrap_err();
        assert!(matches!(err, ThreadError::Config(_)));
        assert!(err.to_string().starts_with("configuration error:"));
        assert!(parse_config_file("not a config").is_err());
    }

    #[test]
    fn zero_columns_means_indent() {
        let parsed = parse_config_file(r#"{"spaced": {"columns": 0}}"#).unwrap();
        let mut config = Config::default();
        apply_config_file(&mut config, parsed);
        assert_eq!(config.layout.spaced.fan_out, SiblingFanOut::Indent);
    }
}
