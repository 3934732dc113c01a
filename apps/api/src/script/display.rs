//! Read-only plain-text rendering of a script, in display order.

use std::fmt::Write;

use crate::script::labels;
use crate::script::models::{GeneratedScript, ScriptSection};

/// Renders the script as indented plain text.
pub fn render_text(script: &GeneratedScript) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_script(&mut out, script);
    out
}

fn write_script(out: &mut String, script: &GeneratedScript) -> std::fmt::Result {
    writeln!(out, "{}", script.title)?;
    writeln!(out, "{}: {}", labels::ESTIMATED_DURATION, script.estimated_duration)?;
    writeln!(out, "{}: {}", labels::OBJECTIVE, script.objective)?;

    let research = &script.research;
    write_part_header(out, 1, &research.part_title)?;
    write_beat_header(out, labels::HOOK, &research.hook.duration)?;
    write_detail(out, labels::HOOK_VOICE_OVER, &research.hook.text)?;
    write_detail(out, labels::VISUAL_IDEAS, &research.hook.visual)?;
    write_detail(out, labels::AUDIO_SUGGESTIONS, &research.hook.audio)?;
    write_section(out, labels::PROBLEM_CONTEXT, &research.problem_context)?;

    let project = &script.project;
    write_part_header(out, 2, &project.part_title)?;
    let solution = &project.solution.section;
    write_beat_header(out, labels::SOLUTION, &solution.duration)?;
    write_detail(out, labels::VOICE_OVER, &solution.voice_over)?;
    writeln!(out, "  {}:", labels::KEY_ARGUMENTS)?;
    for argument in &project.solution.arguments {
        writeln!(out, "    {} {}", labels::BULLET, argument)?;
    }
    write_detail(out, labels::VISUAL_IDEAS, &solution.visual_ideas)?;
    write_beat_header(out, labels::CLOSING, &project.closing.duration)?;
    write_detail(out, labels::VOICE_OVER, &project.closing.voice_over)?;
    write_detail(out, labels::ON_SCREEN_TEXT, &project.closing.on_screen_text)?;

    writeln!(out)?;
    writeln!(out, "{}", labels::NEXT_VIDEO_IDEAS)?;
    for video in &script.recommended_videos {
        writeln!(out)?;
        writeln!(out, "  {}", video.title)?;
        writeln!(out, "  {}", video.description)?;
        writeln!(out, "  {}: {}", labels::VISUAL_SUGGESTION, video.visual_suggestion)?;
    }
    Ok(())
}

fn write_part_header(out: &mut String, number: u8, title: &str) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "{} {number}: {title}", labels::PART)
}

fn write_beat_header(out: &mut String, title: &str, duration: &str) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "{title}  ({}: ~{duration})", labels::DURATION)
}

fn write_detail(out: &mut String, label: &str, content: &str) -> std::fmt::Result {
    writeln!(out, "  {label}:")?;
    writeln!(out, "    {content}")
}

fn write_section(out: &mut String, title: &str, section: &ScriptSection) -> std::fmt::Result {
    write_beat_header(out, title, &section.duration)?;
    write_detail(out, labels::VOICE_OVER, &section.voice_over)?;
    write_detail(out, labels::VISUAL_IDEAS, &section.visual_ideas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::models::tests::sample_script;

    #[test]
    fn test_display_follows_script_order() {
        let text = render_text(&sample_script());
        let positions: Vec<usize> = [
            "El Ruido Urbano",
            "PARTE 1: Explorando el Problema",
            "Apertura / Hook",
            "Contexto del Problema",
            "PARTE 2: Una Solución Creativa",
            "Presentación de la Solución",
            "Argumentos Clave",
            "Cierre / Llamado a la Acción",
            "Próximas Ideas de Video",
            "La ventana inteligente",
        ]
        .iter()
        .map(|needle| text.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_display_lists_both_arguments_as_bullets() {
        let text = render_text(&sample_script());
        assert!(text.contains("• Reduce el ruido percibido sin obras."));
        assert!(text.contains("• Se instala y retira en minutos."));
        assert!(text.contains("Duración: ~15 seg."));
    }
}
