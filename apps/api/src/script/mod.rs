// Script: the generated-record model, its response schema and prompt,
// the one-shot generator, and the read-only display.

pub mod display;
pub mod generator;
pub mod handlers;
pub mod labels;
pub mod models;
pub mod prompts;
pub mod schema;
