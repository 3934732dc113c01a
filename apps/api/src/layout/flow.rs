//! Deterministic flow layout: places wrapped text blocks top-to-bottom across pages.
//!
//! # Invariants
//! - The page-break check precedes every placement.
//! - A wrapped block is never split: it lands entirely on the page where it starts.
//! - A block taller than a whole page is placed at the top of a fresh page and
//!   allowed to overflow the bottom margin.
//! - Same input, same output: no clock or randomness.

use thiserror::Error;

use crate::layout::font_metrics::{get_metrics, FontStyle, PageConfig};
use crate::layout::wrap::wrap_text;
use crate::script::labels::BULLET;

/// Vertical gap after each list item.
pub const LIST_ITEM_GAP_MM: f32 = 2.0;
pub const LIST_FONT_SIZE_PT: f32 = 11.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("invalid page geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid font size: {0}pt")]
    InvalidFontSize(f32),
}

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// One wrapped block at its final position. `y_mm` is measured from the page top.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBlock {
    pub x_mm: f32,
    pub y_mm: f32,
    pub font_size_pt: f32,
    pub style: FontStyle,
    pub lines: Vec<String>,
    pub line_height_mm: f32,
    pub height_mm: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub blocks: Vec<PlacedBlock>,
}

/// A laid-out document: fixed-size pages holding placed blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub config: PageConfig,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Flow layout
// ────────────────────────────────────────────────────────────────────────────

pub struct FlowLayout {
    config: PageConfig,
    pages: Vec<Page>,
    /// Cursor: vertical write position on the current page.
    y: f32,
}

impl FlowLayout {
    pub fn new(config: PageConfig) -> Result<Self, LayoutError> {
        validate_config(&config)?;
        let y = config.margin_mm;
        Ok(Self {
            config,
            pages: vec![Page::default()],
            y,
        })
    }

    /// Current cursor position (mm from the top of the current page).
    #[cfg(test)]
    pub fn cursor(&self) -> f32 {
        self.y
    }

    /// Wraps, measures and places one block, then advances by its height plus `spacing_after`.
    pub fn emit_text(
        &mut self,
        text: &str,
        font_size_pt: f32,
        style: FontStyle,
        spacing_after: f32,
    ) -> Result<(), LayoutError> {
        let height = self.place(text, font_size_pt, style)?;
        self.y += height + spacing_after;
        Ok(())
    }

    /// Places each item as a bulleted block with a fixed gap between items.
    ///
    /// The gap after the last item is folded into `spacing_after`.
    pub fn emit_list(&mut self, items: &[String], spacing_after: f32) -> Result<(), LayoutError> {
        for item in items {
            let text = format!("{BULLET} {item}");
            let height = self.place(&text, LIST_FONT_SIZE_PT, FontStyle::Normal)?;
            self.y += height + LIST_ITEM_GAP_MM;
        }
        self.y += spacing_after - LIST_ITEM_GAP_MM;
        Ok(())
    }

    pub fn finish(self) -> Document {
        Document {
            config: self.config,
            pages: self.pages,
        }
    }

    /// Places a block at the cursor, breaking the page first if it would not fit.
    /// Returns the block height; the cursor is left at the block's top.
    fn place(&mut self, text: &str, font_size_pt: f32, style: FontStyle) -> Result<f32, LayoutError> {
        if !font_size_pt.is_finite() || font_size_pt <= 0.0 {
            return Err(LayoutError::InvalidFontSize(font_size_pt));
        }

        let lines = wrap_text(
            text,
            get_metrics(style),
            font_size_pt,
            self.config.content_width_mm(),
        );
        let line_height_mm = self.config.line_height_mm(font_size_pt);
        let height_mm = lines.len() as f32 * line_height_mm;

        if self.y + height_mm > self.config.bottom_limit_mm() && !self.current_page().blocks.is_empty() {
            self.new_page();
        }

        let block = PlacedBlock {
            x_mm: self.config.margin_mm,
            y_mm: self.y,
            font_size_pt,
            style,
            lines,
            line_height_mm,
            height_mm,
        };
        self.current_page_mut().blocks.push(block);
        Ok(height_mm)
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = self.config.margin_mm;
    }

    fn current_page(&self) -> &Page {
        // `pages` starts with one page and only grows.
        &self.pages[self.pages.len() - 1]
    }

    fn current_page_mut(&mut self) -> &mut Page {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}

fn validate_config(config: &PageConfig) -> Result<(), LayoutError> {
    let values = [
        config.page_width_mm,
        config.page_height_mm,
        config.margin_mm,
        config.line_height_factor,
    ];
    if values.iter().any(|v| !v.is_finite()) {
        return Err(LayoutError::InvalidGeometry(
            "dimensions must be finite".to_string(),
        ));
    }
    if config.margin_mm < 0.0 || config.line_height_factor <= 0.0 {
        return Err(LayoutError::InvalidGeometry(
            "margin must be non-negative and line height positive".to_string(),
        ));
    }
    if config.content_width_mm() <= 0.0 || config.bottom_limit_mm() <= config.margin_mm {
        return Err(LayoutError::InvalidGeometry(format!(
            "no printable area on a {}x{}mm page with {}mm margins",
            config.page_width_mm, config.page_height_mm, config.margin_mm
        )));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::default_page_config;

    fn layout() -> FlowLayout {
        FlowLayout::new(default_page_config()).unwrap()
    }

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-3, "{a} != {b}");
    }

    #[test]
    fn test_cursor_starts_at_margin_and_advances() {
        let mut flow = layout();
        assert_close(flow.cursor(), 15.0);

        flow.emit_text("Título", 24.0, FontStyle::Bold, 5.0).unwrap();
        let line = default_page_config().line_height_mm(24.0);
        assert_close(flow.cursor(), 15.0 + line + 5.0);

        let doc = flow.finish();
        let block = &doc.pages[0].blocks[0];
        assert_close(block.x_mm, 15.0);
        assert_close(block.y_mm, 15.0);
        assert_eq!(block.lines, vec!["Título"]);
    }

    #[test]
    fn test_block_that_does_not_fit_moves_to_next_page() {
        let mut flow = layout();
        let config = default_page_config();
        let line = config.line_height_mm(11.0);

        // Fill until one more line would cross the bottom limit.
        while flow.cursor() + line <= config.bottom_limit_mm() {
            flow.emit_text("relleno", 11.0, FontStyle::Normal, 0.0).unwrap();
        }
        let first_page_blocks = flow.pages[0].blocks.len();

        flow.emit_text("siguiente", 11.0, FontStyle::Normal, 0.0).unwrap();
        let doc = flow.finish();

        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages[0].blocks.len(), first_page_blocks);
        assert_close(doc.pages[1].blocks[0].y_mm, 15.0);
    }

    #[test]
    fn test_blocks_are_never_split_across_pages() {
        let mut flow = layout();
        let paragraph = "palabra ".repeat(120);
        for _ in 0..12 {
            flow.emit_text(&paragraph, 11.0, FontStyle::Normal, 4.0).unwrap();
        }
        let doc = flow.finish();
        let limit = doc.config.bottom_limit_mm();

        assert!(doc.page_count() > 1);
        for page in &doc.pages {
            for block in &page.blocks {
                assert!(block.y_mm + block.height_mm <= limit + 1e-3);
            }
        }
    }

    #[test]
    fn test_oversized_block_goes_to_fresh_page_without_blank_pages() {
        let mut flow = layout();
        flow.emit_text("intro", 11.0, FontStyle::Normal, 0.0).unwrap();
        let huge = "texto ".repeat(5000);
        flow.emit_text(&huge, 11.0, FontStyle::Normal, 0.0).unwrap();
        flow.emit_text("después", 11.0, FontStyle::Normal, 0.0).unwrap();
        let doc = flow.finish();

        assert_eq!(doc.page_count(), 3);
        let big = &doc.pages[1].blocks[0];
        assert_close(big.y_mm, 15.0);
        assert!(big.height_mm > doc.config.page_height_mm);
        assert!(doc.pages.iter().all(|p| !p.blocks.is_empty()));
    }

    #[test]
    fn test_list_applies_gap_between_items_and_adjusted_trailing_space() {
        let mut flow = layout();
        let items = vec!["Primero".to_string(), "Segundo".to_string()];
        flow.emit_list(&items, 4.0).unwrap();

        let line = default_page_config().line_height_mm(LIST_FONT_SIZE_PT);
        // item, gap, item, gap, then spacing_after - gap
        assert_close(flow.cursor(), 15.0 + line + 2.0 + line + 2.0 + 4.0 - 2.0);

        let doc = flow.finish();
        let blocks = &doc.pages[0].blocks;
        assert_eq!(blocks[0].lines, vec!["• Primero"]);
        assert_eq!(blocks[1].lines, vec!["• Segundo"]);
        assert_close(blocks[1].y_mm, 15.0 + line + 2.0);
    }

    #[test]
    fn test_invalid_font_size_is_layout_error() {
        let mut flow = layout();
        assert_eq!(
            flow.emit_text("x", 0.0, FontStyle::Normal, 0.0),
            Err(LayoutError::InvalidFontSize(0.0))
        );
        assert!(flow.emit_text("x", f32::NAN, FontStyle::Normal, 0.0).is_err());
    }

    #[test]
    fn test_page_without_printable_area_is_rejected() {
        let mut config = default_page_config();
        config.margin_mm = 120.0;
        assert!(matches!(
            FlowLayout::new(config),
            Err(LayoutError::InvalidGeometry(_))
        ));
    }
}
