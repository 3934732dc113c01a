use std::sync::Arc;

use crate::config::Config;
use crate::form::FormSession;
use crate::layout::PageConfig;
use crate::llm_client::GenerativeModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup; immutable afterwards.
    pub llm: Arc<dyn GenerativeModel>,
    pub config: Config,
    /// Page geometry for PDF export (A4, 15mm margins).
    pub page_config: PageConfig,
    pub form: Arc<FormSession>,
}
