// Shared prompt fragments.
// Each service that needs model calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Instruction that enforces JSON-only output against the declared response schema.
pub const JSON_ONLY_INSTRUCTION: &str = "La respuesta DEBE ser un objeto JSON válido que se ajuste al esquema proporcionado. No incluyas texto antes o después del objeto JSON.";
