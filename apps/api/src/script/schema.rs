//! Response schema declared to the generative service.
//!
//! The service enforces structure but not array lengths, so the exact counts
//! live in description metadata and are re-checked in `models::GeneratedScript::from_json`.

use serde_json::{json, Map, Value};

fn string_field(description: &str) -> Value {
    json!({ "type": "STRING", "description": description })
}

fn object(properties: Map<String, Value>, required: &[&str]) -> Value {
    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
    })
}

const SCRIPT_SECTION_REQUIRED: [&str; 3] = ["duracion", "voz_en_off", "ideas_visuales"];

fn script_section_properties() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "duracion".into(),
        string_field("Duración de esta sección (ej: '1 min.')."),
    );
    properties.insert(
        "voz_en_off".into(),
        string_field("Texto de la voz en off para esta sección."),
    );
    properties.insert(
        "ideas_visuales".into(),
        string_field("Sugerencias visuales para acompañar esta sección."),
    );
    properties
}

/// The base `{duracion, voz_en_off, ideas_visuales}` section.
pub fn script_section_schema() -> Value {
    object(script_section_properties(), &SCRIPT_SECTION_REQUIRED)
}

/// The base section plus the two-item `argumentos` list.
pub fn solution_presentation_schema() -> Value {
    let mut properties = script_section_properties();
    properties.insert(
        "argumentos".into(),
        json!({
            "type": "ARRAY",
            "items": { "type": "STRING" },
            "description": "Una lista de exactamente dos argumentos claros y concisos que presentan la solución.",
        }),
    );

    let mut required = SCRIPT_SECTION_REQUIRED.to_vec();
    required.push("argumentos");
    object(properties, &required)
}

fn opening_hook_schema() -> Value {
    let mut properties = Map::new();
    properties.insert("duracion".into(), string_field("Duración del hook (ej: '15 seg.')."));
    properties.insert(
        "hook_texto".into(),
        string_field("El texto exacto de la voz en off para el hook inicial."),
    );
    properties.insert(
        "hook_visual".into(),
        string_field("Sugerencias de imágenes o escenas para el hook visual."),
    );
    properties.insert(
        "hook_audio".into(),
        string_field("Sugerencias de música o efectos de sonido para el hook de audio."),
    );
    object(properties, &["duracion", "hook_texto", "hook_visual", "hook_audio"])
}

fn closing_cta_schema() -> Value {
    let mut properties = Map::new();
    properties.insert("duracion".into(), string_field("Duración del cierre (ej: '15 seg.')."));
    properties.insert(
        "voz_en_off".into(),
        string_field("Texto de la voz en off para el llamado a la acción (CTA)."),
    );
    properties.insert(
        "texto_en_pantalla".into(),
        string_field("El texto final que aparecerá en pantalla (ej: '@usuario | Comenta tu idea')."),
    );
    object(properties, &["duracion", "voz_en_off", "texto_en_pantalla"])
}

fn recommended_video_schema() -> Value {
    let mut properties = Map::new();
    properties.insert(
        "titulo".into(),
        string_field("Un título atractivo para el video recomendado."),
    );
    properties.insert(
        "descripcion".into(),
        string_field("Una breve descripción del contenido del video recomendado."),
    );
    properties.insert(
        "sugerencia_visual".into(),
        string_field("Una idea visual clave para el video recomendado."),
    );
    object(properties, &["titulo", "descripcion", "sugerencia_visual"])
}

/// The full schema for a `GeneratedScript`.
pub fn response_schema() -> Value {
    let mut research = Map::new();
    research.insert(
        "titulo_parte".into(),
        string_field("Título para la Parte 1, ej: 'Explorando el Problema'."),
    );
    research.insert("apertura_hook".into(), opening_hook_schema());
    research.insert("contexto_problema".into(), script_section_schema());

    let mut project = Map::new();
    project.insert(
        "titulo_parte".into(),
        string_field("Título para la Parte 2, ej: 'Una Solución Creativa'."),
    );
    project.insert("presentacion_solucion".into(), solution_presentation_schema());
    project.insert("cierre_cta".into(), closing_cta_schema());

    let mut root = Map::new();
    root.insert(
        "titulo".into(),
        string_field("Un título creativo y atractivo para el videoblog de Instagram."),
    );
    root.insert(
        "duracion_estimada".into(),
        string_field("La duración total estimada del video (ej: '90 segundos')."),
    );
    root.insert(
        "objetivo".into(),
        string_field("El objetivo principal del videoblog en una oración concisa."),
    );
    root.insert(
        "parte_1_investigacion".into(),
        object(research, &["titulo_parte", "apertura_hook", "contexto_problema"]),
    );
    root.insert(
        "parte_2_proyecto".into(),
        object(project, &["titulo_parte", "presentacion_solucion", "cierre_cta"]),
    );
    root.insert(
        "videos_recomendados".into(),
        json!({
            "type": "ARRAY",
            "description": "Una lista de exactamente 3 ideas para futuros videos de Instagram, relacionados con el tema principal.",
            "items": recommended_video_schema(),
        }),
    );

    object(
        root,
        &[
            "titulo",
            "duracion_estimada",
            "objetivo",
            "parte_1_investigacion",
            "parte_2_proyecto",
            "videos_recomendados",
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::models::tests::sample_script_json;

    fn required_of(schema: &Value) -> Vec<&str> {
        schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect()
    }

    #[test]
    fn test_solution_schema_extends_base_section() {
        let base = script_section_schema();
        let solution = solution_presentation_schema();

        for key in base["properties"].as_object().unwrap().keys() {
            assert_eq!(
                base["properties"][key], solution["properties"][key],
                "solution schema must reuse base field `{key}`"
            );
        }
        assert_eq!(
            required_of(&solution),
            vec!["duracion", "voz_en_off", "ideas_visuales", "argumentos"]
        );
        assert_eq!(solution["properties"]["argumentos"]["type"], "ARRAY");
    }

    #[test]
    fn test_cardinality_is_stated_in_descriptions() {
        let schema = response_schema();
        let videos = schema["properties"]["videos_recomendados"]["description"]
            .as_str()
            .unwrap();
        assert!(videos.contains("exactamente 3"));

        let arguments = schema["properties"]["parte_2_proyecto"]["properties"]
            ["presentacion_solucion"]["properties"]["argumentos"]["description"]
            .as_str()
            .unwrap();
        assert!(arguments.contains("exactamente dos"));
    }

    /// Every required key in the schema exists in a valid response, recursively.
    fn assert_covers(schema: &Value, instance: &Value, path: &str) {
        match schema["type"].as_str().unwrap() {
            "OBJECT" => {
                for key in required_of(schema) {
                    let child = instance
                        .get(key)
                        .unwrap_or_else(|| panic!("{path}.{key} missing from sample"));
                    assert_covers(&schema["properties"][key], child, &format!("{path}.{key}"));
                }
            }
            "ARRAY" => {
                for (i, item) in instance.as_array().unwrap().iter().enumerate() {
                    assert_covers(&schema["items"], item, &format!("{path}[{i}]"));
                }
            }
            "STRING" => assert!(instance.is_string(), "{path} must be a string"),
            other => panic!("unexpected schema type {other} at {path}"),
        }
    }

    #[test]
    fn test_schema_matches_data_model() {
        assert_covers(&response_schema(), &sample_script_json(), "$");
    }
}
