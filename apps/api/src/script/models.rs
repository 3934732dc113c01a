//! The generated video script and its validating parse.
//!
//! Wire field names are the Spanish identifiers declared in the response schema.
//! Cardinality is carried by the types: exactly two arguments, exactly three
//! recommended videos. The only way to obtain a `GeneratedScript` from model
//! output is `GeneratedScript::from_json`, which rejects anything partial.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ARGUMENT_COUNT: usize = 2;
pub const RECOMMENDED_VIDEO_COUNT: usize = 3;

#[derive(Debug, Error)]
pub enum ScriptValidationError {
    #[error("response is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    #[error("response does not match the script shape: {0}")]
    Shape(#[source] serde_json::Error),

    #[error("required field `{0}` is empty")]
    EmptyField(&'static str),

    #[error("`{field}` must contain exactly {expected} items, got {actual}")]
    Cardinality {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Record types
// ────────────────────────────────────────────────────────────────────────────

/// The common three-field narrative beat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptSection {
    #[serde(rename = "duracion")]
    pub duration: String,
    #[serde(rename = "voz_en_off")]
    pub voice_over: String,
    #[serde(rename = "ideas_visuales")]
    pub visual_ideas: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningHook {
    #[serde(rename = "duracion")]
    pub duration: String,
    #[serde(rename = "hook_texto")]
    pub text: String,
    #[serde(rename = "hook_visual")]
    pub visual: String,
    #[serde(rename = "hook_audio")]
    pub audio: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchPart {
    #[serde(rename = "titulo_parte")]
    pub part_title: String,
    #[serde(rename = "apertura_hook")]
    pub hook: OpeningHook,
    #[serde(rename = "contexto_problema")]
    pub problem_context: ScriptSection,
}

/// A `ScriptSection` extended with the solution's key arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolutionPresentation {
    #[serde(flatten)]
    pub section: ScriptSection,
    #[serde(rename = "argumentos")]
    pub arguments: [String; ARGUMENT_COUNT],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosingCta {
    #[serde(rename = "duracion")]
    pub duration: String,
    #[serde(rename = "voz_en_off")]
    pub voice_over: String,
    #[serde(rename = "texto_en_pantalla")]
    pub on_screen_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectPart {
    #[serde(rename = "titulo_parte")]
    pub part_title: String,
    #[serde(rename = "presentacion_solucion")]
    pub solution: SolutionPresentation,
    #[serde(rename = "cierre_cta")]
    pub closing: ClosingCta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedVideo {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "sugerencia_visual")]
    pub visual_suggestion: String,
}

/// A complete, schema-valid script. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedScript {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "duracion_estimada")]
    pub estimated_duration: String,
    #[serde(rename = "objetivo")]
    pub objective: String,
    #[serde(rename = "parte_1_investigacion")]
    pub research: ResearchPart,
    #[serde(rename = "parte_2_proyecto")]
    pub project: ProjectPart,
    #[serde(rename = "videos_recomendados")]
    pub recommended_videos: [RecommendedVideo; RECOMMENDED_VIDEO_COUNT],
}

// ────────────────────────────────────────────────────────────────────────────
// Unchecked wire shape
// ────────────────────────────────────────────────────────────────────────────

// Presence and string-typing are enforced by serde; lengths and emptiness are
// checked in `GeneratedScript::validate`. Unknown fields are ignored.

#[derive(Debug, Deserialize)]
struct RawSolutionPresentation {
    #[serde(flatten)]
    section: ScriptSection,
    argumentos: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawProjectPart {
    titulo_parte: String,
    presentacion_solucion: RawSolutionPresentation,
    cierre_cta: ClosingCta,
}

#[derive(Debug, Deserialize)]
struct RawScript {
    titulo: String,
    duracion_estimada: String,
    objetivo: String,
    parte_1_investigacion: ResearchPart,
    parte_2_proyecto: RawProjectPart,
    videos_recomendados: Vec<RecommendedVideo>,
}

impl GeneratedScript {
    /// Parses and validates raw model output. Never returns a partial script.
    pub fn from_json(text: &str) -> Result<Self, ScriptValidationError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(ScriptValidationError::Syntax)?;
        let raw: RawScript =
            serde_json::from_value(value).map_err(ScriptValidationError::Shape)?;
        Self::validate(raw)
    }

    fn validate(raw: RawScript) -> Result<Self, ScriptValidationError> {
        require_non_empty("titulo", &raw.titulo)?;
        require_non_empty("duracion_estimada", &raw.duracion_estimada)?;
        require_non_empty("objetivo", &raw.objetivo)?;

        let arguments = exact_len("argumentos", raw.parte_2_proyecto.presentacion_solucion.argumentos)?;
        let recommended_videos = exact_len("videos_recomendados", raw.videos_recomendados)?;

        Ok(Self {
            title: raw.titulo,
            estimated_duration: raw.duracion_estimada,
            objective: raw.objetivo,
            research: raw.parte_1_investigacion,
            project: ProjectPart {
                part_title: raw.parte_2_proyecto.titulo_parte,
                solution: SolutionPresentation {
                    section: raw.parte_2_proyecto.presentacion_solucion.section,
                    arguments,
                },
                closing: raw.parte_2_proyecto.cierre_cta,
            },
            recommended_videos,
        })
    }
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), ScriptValidationError> {
    if value.trim().is_empty() {
        Err(ScriptValidationError::EmptyField(field))
    } else {
        Ok(())
    }
}

fn exact_len<T, const N: usize>(
    field: &'static str,
    items: Vec<T>,
) -> Result<[T; N], ScriptValidationError> {
    let actual = items.len();
    items
        .try_into()
        .map_err(|_| ScriptValidationError::Cardinality {
            field,
            expected: N,
            actual,
        })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
