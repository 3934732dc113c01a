//! Section labels shared by the text display and the PDF export.

pub const ESTIMATED_DURATION: &str = "Duración Estimada";
pub const OBJECTIVE: &str = "Objetivo";
pub const PART: &str = "PARTE";
pub const HOOK: &str = "Apertura / Hook";
pub const PROBLEM_CONTEXT: &str = "Contexto del Problema";
pub const SOLUTION: &str = "Presentación de la Solución";
pub const CLOSING: &str = "Cierre / Llamado a la Acción";
pub const DURATION: &str = "Duración";
pub const HOOK_VOICE_OVER: &str = "Voz en Off (Hook)";
pub const VOICE_OVER: &str = "Voz en Off";
pub const VISUAL_IDEAS: &str = "Ideas Visuales";
pub const AUDIO_SUGGESTIONS: &str = "Sugerencias de Audio";
pub const KEY_ARGUMENTS: &str = "Argumentos Clave";
pub const ON_SCREEN_TEXT: &str = "Texto en Pantalla";
pub const NEXT_VIDEO_IDEAS: &str = "Próximas Ideas de Video";
pub const VISUAL_SUGGESTION: &str = "Sugerencia Visual";
pub const BULLET: &str = "•";
