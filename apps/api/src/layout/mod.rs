// Layout: deterministic pagination of a generated script.
// Implements: font metrics, greedy word wrap, block flow with page breaks,
// and the fixed export sequence.
// Pure and CPU-bound; callers on the async runtime go through spawn_blocking.

pub mod document;
pub mod flow;
pub mod font_metrics;
pub mod wrap;

// Re-export the public API consumed by the renderer and the form session.
pub use document::{export_filename, render_document};
pub use flow::{Document, LayoutError, PlacedBlock};
pub use font_metrics::{default_page_config, FontStyle, PageConfig, PT_TO_MM};
