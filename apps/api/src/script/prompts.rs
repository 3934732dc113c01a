// All model prompt constants for the script module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Persona and style directive that opens every instruction.
pub const PERSONA_DIRECTIVE: &str = "Actúa como un guionista experto en contenido educativo y dinámico para videos de Instagram.
Tu tarea es generar un guión completo para un solo video que tiene dos partes claras y conectadas.
El tono debe ser educativo, conversacional y en español.";

/// Used instead of the topic line when reference files are attached.
pub const ATTACHMENTS_INSTRUCTION: &str = "Usa los archivos (imágenes, documentos) proporcionados como la principal fuente de inspiración y referencia para el contenido del guión. Basa las sugerencias visuales y el contexto en estos archivos.";

/// Replace `{topic}` before sending.
pub const TOPIC_INSTRUCTION_TEMPLATE: &str = "El tema principal del guión es: \"{topic}\"";

/// Restatement of the required two-part structure plus follow-up ideas.
pub const STRUCTURE_INSTRUCTION: &str = "Estructura del video único:
1.  **Parte 1: Investigación:** Comienza con un hook potente. Luego, investiga y presenta un problema o fenómeno cotidiano, revelando tensiones o sensibilidades (inspirado en el estilo 'Hipersensibles').
2.  **Parte 2: Proyecto/Solución:** Transiciona suavemente a la presentación de una solución o proyecto de diseño creativo que responde al problema de la Parte 1. Debe ser una intervención sutil que transforma una experiencia (inspirado en el estilo 'Objeto Parásito'). Termina con un llamado a la acción claro.
3.  **Videos Recomendados:** Al final, incluye una lista de exactamente 3 ideas para futuros videos de Instagram que se relacionen con el tema principal.";

/// Full instruction template. Replace `{persona}`, `{source_instruction}`,
/// `{json_only}` and `{structure}` before sending.
pub const SCRIPT_PROMPT_TEMPLATE: &str = "{persona}
{source_instruction}
{json_only}

{structure}
";
