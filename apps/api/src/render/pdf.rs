//! PDF writer: encodes a laid-out `Document` with the four standard Helvetica faces.
//!
//! One content stream per page, one text object per wrapped line. Nothing is
//! measured here; positions come from the layout verbatim.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Object, Stream, StringFormat};
use thiserror::Error;

use crate::layout::{Document, FontStyle, LayoutError, PlacedBlock, PT_TO_MM};

const PDF_VERSION: &str = "1.5";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("PDF encoding failed: {0}")]
    Encode(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

fn mm_to_pt(mm: f32) -> f32 {
    mm / PT_TO_MM
}

/// Encodes every page of `document` into a complete PDF file.
pub fn render_pdf(document: &Document) -> Result<Vec<u8>, RenderError> {
    let config = &document.config;
    let page_width_pt = mm_to_pt(config.page_width_mm);
    let page_height_pt = mm_to_pt(config.page_height_mm);

    let mut pdf = lopdf::Document::with_version(PDF_VERSION);
    let pages_id = pdf.new_object_id();

    let mut fonts = Dictionary::new();
    for style in FontStyle::ALL {
        let font_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => style.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(style.resource_name(), font_id);
    }
    let resources_id = pdf.add_object(dictionary! { "Font" => fonts });

    let mut kids: Vec<Object> = Vec::with_capacity(document.pages.len());
    for page in &document.pages {
        let mut operations = Vec::new();
        for block in &page.blocks {
            push_block(&mut operations, block, page_height_pt);
        }

        let encoded = Content { operations }.encode()?;
        let content_id = pdf.add_object(Stream::new(Dictionary::new(), encoded));
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.0.into(), 0.0.into(), page_width_pt.into(), page_height_pt.into()],
    };
    pdf.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    pdf.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    pdf.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Line `i` of a block has its baseline at `y + i * line_height` from the page top.
fn push_block(operations: &mut Vec<Operation>, block: &PlacedBlock, page_height_pt: f32) {
    let x = mm_to_pt(block.x_mm);
    for (i, line) in block.lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let baseline_mm = block.y_mm + i as f32 * block.line_height_mm;
        let y = page_height_pt - mm_to_pt(baseline_mm);

        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![block.style.resource_name().into(), block.font_size_pt.into()],
        ));
        operations.push(Operation::new("Td", vec![x.into(), y.into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(line), StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
}

/// Encodes text for the standard fonts' WinAnsi code page.
/// Latin-1 maps to itself; characters with no WinAnsi code become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{default_page_config, render_document};
    use crate::script::models::tests::sample_script;

    fn sample_pdf() -> (Document, Vec<u8>) {
        let document = render_document(&sample_script(), &default_page_config()).unwrap();
        let bytes = render_pdf(&document).unwrap();
        (document, bytes)
    }

    #[test]
    fn test_output_is_loadable_pdf_with_matching_page_count() {
        let (document, bytes) = sample_pdf();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let loaded = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), document.page_count());
    }

    #[test]
    fn test_first_line_is_title_at_top_margin() {
        let (_, bytes) = sample_pdf();
        let loaded = lopdf::Document::load_mem(&bytes).unwrap();
        let first_page = *loaded.get_pages().get(&1).unwrap();
        let content = Content::decode(&loaded.get_page_content(first_page).unwrap()).unwrap();

        let tf = content.operations.iter().find(|op| op.operator == "Tf").unwrap();
        assert_eq!(tf.operands[0].as_name().unwrap(), b"F2");
        assert_eq!(tf.operands[1].as_float().unwrap(), 24.0);

        let td = content.operations.iter().find(|op| op.operator == "Td").unwrap();
        let x = td.operands[0].as_float().unwrap();
        let y = td.operands[1].as_float().unwrap();
        assert!((x - 15.0 / PT_TO_MM).abs() < 0.01, "x = {x}");
        assert!((y - (297.0 - 15.0) / PT_TO_MM).abs() < 0.01, "y = {y}");

        let tj = content.operations.iter().find(|op| op.operator == "Tj").unwrap();
        assert_eq!(
            tj.operands[0].as_str().unwrap(),
            encode_win_ansi("El Ruido Urbano: Cómo Nos Afecta").as_slice()
        );
    }

    #[test]
    fn test_all_four_faces_are_declared() {
        let (_, bytes) = sample_pdf();
        let loaded = lopdf::Document::load_mem(&bytes).unwrap();
        let mut faces: Vec<String> = loaded
            .objects
            .values()
            .filter_map(|object| object.as_dict().ok())
            .filter_map(|dict| dict.get(b"BaseFont").ok())
            .filter_map(|name| name.as_name().ok())
            .map(|name| String::from_utf8_lossy(name).into_owned())
            .collect();
        faces.sort();

        assert_eq!(
            faces,
            vec![
                "Helvetica",
                "Helvetica-Bold",
                "Helvetica-BoldOblique",
                "Helvetica-Oblique",
            ]
        );
    }

    #[test]
    fn test_win_ansi_maps_spanish_text_and_bullet() {
        assert_eq!(encode_win_ansi("Guión"), b"Gui\xf3n".to_vec());
        assert_eq!(encode_win_ansi("¿Qué?"), b"\xbfQu\xe9?".to_vec());
        assert_eq!(encode_win_ansi("• ñ"), b"\x95 \xf1".to_vec());
        assert_eq!(encode_win_ansi("中"), b"?".to_vec());
    }

    #[test]
    fn test_same_document_renders_identical_bytes() {
        let (document, bytes) = sample_pdf();
        assert_eq!(render_pdf(&document).unwrap(), bytes);
    }

    #[test]
    fn test_written_file_reloads_from_disk() {
        let (document, bytes) = sample_pdf();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, &bytes).unwrap();

        let loaded = lopdf::Document::load(file.path()).unwrap();
        assert_eq!(loaded.get_pages().len(), document.page_count());
    }
}
