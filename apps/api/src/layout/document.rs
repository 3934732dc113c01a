//! Script → paginated document, in the fixed export order.

use crate::layout::flow::{Document, FlowLayout, LayoutError};
use crate::layout::font_metrics::{FontStyle, PageConfig};
use crate::script::labels;
use crate::script::models::GeneratedScript;

const TITLE_PT: f32 = 24.0;
const PART_HEADING_PT: f32 = 18.0;
const SUBSECTION_PT: f32 = 14.0;
const BODY_PT: f32 = 11.0;
const META_PT: f32 = 10.0;

/// Gap between recommended videos (none after the last).
const VIDEO_GAP_MM: f32 = 8.0;

/// Lays out a script on fixed-size pages.
pub fn render_document(script: &GeneratedScript, config: &PageConfig) -> Result<Document, LayoutError> {
    let mut flow = FlowLayout::new(config.clone())?;

    // Header
    flow.emit_text(&script.title, TITLE_PT, FontStyle::Bold, 5.0)?;
    flow.emit_text(
        &format!("{}: {}", labels::ESTIMATED_DURATION, script.estimated_duration),
        META_PT,
        FontStyle::Italic,
        2.0,
    )?;
    flow.emit_text(
        &format!("{}: {}", labels::OBJECTIVE, script.objective),
        META_PT,
        FontStyle::Italic,
        10.0,
    )?;

    // Part 1
    let research = &script.research;
    part_heading(&mut flow, 1, &research.part_title)?;

    subsection(&mut flow, labels::HOOK, &research.hook.duration)?;
    field(&mut flow, labels::HOOK_VOICE_OVER, &research.hook.text, 4.0)?;
    field(&mut flow, labels::VISUAL_IDEAS, &research.hook.visual, 4.0)?;
    field(&mut flow, labels::AUDIO_SUGGESTIONS, &research.hook.audio, 8.0)?;

    let context = &research.problem_context;
    subsection(&mut flow, labels::PROBLEM_CONTEXT, &context.duration)?;
    field(&mut flow, labels::VOICE_OVER, &context.voice_over, 4.0)?;
    field(&mut flow, labels::VISUAL_IDEAS, &context.visual_ideas, 10.0)?;

    // Part 2
    let project = &script.project;
    part_heading(&mut flow, 2, &project.part_title)?;

    let solution = &project.solution;
    subsection(&mut flow, labels::SOLUTION, &solution.section.duration)?;
    field(&mut flow, labels::VOICE_OVER, &solution.section.voice_over, 4.0)?;
    label(&mut flow, labels::KEY_ARGUMENTS)?;
    flow.emit_list(&solution.arguments, 4.0)?;
    field(&mut flow, labels::VISUAL_IDEAS, &solution.section.visual_ideas, 8.0)?;

    let closing = &project.closing;
    subsection(&mut flow, labels::CLOSING, &closing.duration)?;
    field(&mut flow, labels::VOICE_OVER, &closing.voice_over, 4.0)?;
    field(&mut flow, labels::ON_SCREEN_TEXT, &closing.on_screen_text, 10.0)?;

    // Recommended videos
    flow.emit_text(labels::NEXT_VIDEO_IDEAS, PART_HEADING_PT, FontStyle::Bold, 8.0)?;
    let last = script.recommended_videos.len() - 1;
    for (index, video) in script.recommended_videos.iter().enumerate() {
        flow.emit_text(&video.title, SUBSECTION_PT, FontStyle::BoldItalic, 3.0)?;
        flow.emit_text(&video.description, BODY_PT, FontStyle::Normal, 4.0)?;
        let trailing = if index == last { 0.0 } else { VIDEO_GAP_MM };
        flow.emit_text(
            &format!("{}: {}", labels::VISUAL_SUGGESTION, video.visual_suggestion),
            META_PT,
            FontStyle::Italic,
            trailing,
        )?;
    }

    Ok(flow.finish())
}

fn part_heading(flow: &mut FlowLayout, number: u8, title: &str) -> Result<(), LayoutError> {
    flow.emit_text(
        &format!("{} {number}: {title}", labels::PART),
        PART_HEADING_PT,
        FontStyle::Bold,
        8.0,
    )
}

fn subsection(flow: &mut FlowLayout, title: &str, duration: &str) -> Result<(), LayoutError> {
    flow.emit_text(title, SUBSECTION_PT, FontStyle::BoldItalic, 3.0)?;
    flow.emit_text(
        &format!("{}: ~{duration}", labels::DURATION),
        META_PT,
        FontStyle::Italic,
        4.0,
    )
}

fn label(flow: &mut FlowLayout, text: &str) -> Result<(), LayoutError> {
    flow.emit_text(&format!("{text}:"), BODY_PT, FontStyle::Bold, 2.0)
}

fn field(flow: &mut FlowLayout, name: &str, value: &str, spacing_after: f32) -> Result<(), LayoutError> {
    label(flow, name)?;
    flow.emit_text(value, BODY_PT, FontStyle::Normal, spacing_after)
}

// ────────────────────────────────────────────────────────────────────────────
// Export filename
// ────────────────────────────────────────────────────────────────────────────

/// Every character outside `[A-Za-z0-9]` becomes `_`; the rest is lowercased.
pub fn slugify(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// `guion_{slug}.pdf`
pub fn export_filename(title: &str) -> String {
    format!("guion_{}.pdf", slugify(title))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
