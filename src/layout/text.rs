use crate::config::SizingConfig;

use super::TextBlock;

/// Character-count estimate of rendered post text.
///
/// Width is the longest line times a fixed glyph width, height is one line
/// height per line; both are clamped to the configured box limits.
pub(super) fn measure_post_text(text: &str, config: &SizingConfig) -> TextBlock {
    let (line_count, max_len) = split_lines(text)
        .fold((0usize, 0usize), |(count, longest), line| {
            (count + 1, longest.max(line.chars().count()))
        });
    let raw_width = max_len as f32 * config.char_width;
    let raw_height = line_count as f32 * config.line_height;

    TextBlock {
        width: raw_width.min(config.max_text_width).max(config.min_text_width),
        height: raw_height
            .min(config.max_text_height)
            .max(config.min_text_height),
    }
}

// `str::lines` drops a trailing empty line; a post ending in a newline still
// renders that line.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}
