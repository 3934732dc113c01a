//! Greedy word wrap against a millimetre width.
//!
//! Explicit newlines start a new paragraph. A word wider than the line is split
//! at character boundaries so no line ever exceeds the width (except a single
//! character wider than the whole line, which gets a line of its own).

use crate::layout::font_metrics::{FontMetricTable, PT_TO_MM};

/// Wraps `text` into lines no wider than `max_width_mm` at `font_size_pt`.
///
/// Always returns at least one line; empty input yields a single empty line.
pub fn wrap_text(
    text: &str,
    metrics: &FontMetricTable,
    font_size_pt: f32,
    max_width_mm: f32,
) -> Vec<String> {
    let max_width = max_width_mm / (font_size_pt * PT_TO_MM);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        wrap_paragraph(paragraph, metrics, max_width, &mut lines);
    }
    lines
}

/// Appends the wrapped lines of one paragraph. Widths are in em.
fn wrap_paragraph(paragraph: &str, metrics: &FontMetricTable, max_width: f32, out: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in paragraph.split_whitespace() {
        let word_w = metrics.measure_str(word);

        if word_w > max_width {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            let (rest, rest_w) = split_long_word(word, metrics, max_width, out);
            current = rest;
            current_width = rest_w;
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
            current_width = word_w;
        } else if current_width + metrics.space_width + word_w <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += metrics.space_width + word_w;
        } else {
            out.push(std::mem::replace(&mut current, word.to_string()));
            current_width = word_w;
        }
    }

    // Push the final (possibly empty) line.
    out.push(current);
}

/// Emits full-width chunks of `word` and returns the trailing partial chunk.
fn split_long_word(
    word: &str,
    metrics: &FontMetricTable,
    max_width: f32,
    out: &mut Vec<String>,
) -> (String, f32) {
    let mut chunk = String::new();
    let mut chunk_w = 0.0_f32;

    for c in word.chars() {
        let w = metrics.char_width(c);
        if !chunk.is_empty() && chunk_w + w > max_width {
            out.push(std::mem::take(&mut chunk));
            chunk_w = 0.0;
        }
        chunk.push(c);
        chunk_w += w;
    }
    (chunk, chunk_w)
}
