// Render: script → layout → PDF bytes.
// CPU-bound work runs inside tokio::task::spawn_blocking.

pub mod pdf;

use bytes::Bytes;
use tracing::info;

use crate::layout::{export_filename, render_document, PageConfig};
use crate::script::models::GeneratedScript;

pub use pdf::{render_pdf, RenderError};

/// A finished export: the download filename and the complete file.
#[derive(Debug, Clone)]
pub struct ExportedPdf {
    pub filename: String,
    pub bytes: Bytes,
}

/// Synchronous export. Either returns a whole document or an error; never a partial file.
pub fn export_pdf_sync(script: &GeneratedScript, config: &PageConfig) -> Result<ExportedPdf, RenderError> {
    let document = render_document(script, config)?;
    let bytes = render_pdf(&document)?;

    info!(
        pages = document.page_count(),
        size_bytes = bytes.len(),
        "Rendered PDF for {:?}",
        script.title
    );

    Ok(ExportedPdf {
        filename: export_filename(&script.title),
        bytes: Bytes::from(bytes),
    })
}

/// Runs `export_pdf_sync` on the blocking pool. Takes owned data for the `'static` closure.
pub async fn export_pdf(script: GeneratedScript, config: PageConfig) -> Result<ExportedPdf, RenderError> {
    tokio::task::spawn_blocking(move || export_pdf_sync(&script, &config)).await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::default_page_config;
    use crate::script::models::tests::sample_script;

    #[tokio::test]
    async fn test_export_names_file_from_title() {
        let exported = export_pdf(sample_script(), default_page_config()).await.unwrap();
        assert_eq!(exported.filename, "guion_el_ruido_urbano__c_mo_nos_afecta.pdf");
        assert!(exported.bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_invalid_geometry_fails_without_output() {
        let mut config = default_page_config();
        config.margin_mm = 200.0;
        let result = export_pdf(sample_script(), config).await;
        assert!(matches!(result, Err(RenderError::Layout(_))));
    }
}
