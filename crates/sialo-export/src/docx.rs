use std::io::Cursor;

use docx_rs::{AlignmentType, BreakType, Docx, Paragraph, Run, RunFonts, Style, StyleType};

use crate::error::ExportError;
use crate::styles::DocumentStyles;

/// Build a DOCX document from plain report text.
///
/// Each entry of `documents` starts on a new page. Within a document:
/// - the first line equal to an entry of `headings` → Heading 1, any other → Heading 2
/// - `- item` → bullet paragraph
/// - blank line → empty paragraph
/// - everything else → body paragraph
pub fn generate_docx(
    documents: &[&str],
    headings: &[&str],
    styles: &DocumentStyles,
) -> Result<Vec<u8>, ExportError> {
    let mut docx = Docx::new()
        .add_style(heading_style("Heading1", "heading 1", styles.title_size))
        .add_style(heading_style("Heading2", "heading 2", styles.section_size));

    for (i, text) in documents.iter().enumerate() {
        if i > 0 {
            docx = docx.add_paragraph(
                Paragraph::new().add_run(Run::new().add_break(BreakType::Page)),
            );
        }

        let mut title_seen = false;
        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                docx = docx.add_paragraph(Paragraph::new());
            } else if headings.contains(&trimmed) {
                let style_id = if title_seen { "Heading2" } else { "Heading1" };
                title_seen = true;
                docx = docx.add_paragraph(heading_paragraph(trimmed, style_id, styles));
            } else if let Some(item) = trimmed.strip_prefix("- ") {
                docx = docx.add_paragraph(bullet_paragraph(item, styles));
            } else {
                docx = docx.add_paragraph(body_paragraph(trimmed, styles));
            }
        }
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| ExportError::Docx(e.to_string()))?;

    tracing::debug!(bytes = buf.get_ref().len(), "docx generated");
    Ok(buf.into_inner())
}

fn heading_style(style_id: &str, name: &str, size_pt: usize) -> Style {
    Style::new(style_id, StyleType::Paragraph)
        .name(name)
        .size(size_pt * 2) // OOXML uses half-points
        .bold()
}

fn heading_paragraph(text: &str, style_id: &str, styles: &DocumentStyles) -> Paragraph {
    Paragraph::new()
        .style(style_id)
        .add_run(Run::new().add_text(text).fonts(RunFonts::new().ascii(&styles.heading_font)))
}

fn body_run(text: &str, styles: &DocumentStyles) -> Run {
    Run::new()
        .add_text(text)
        .size(styles.body_size * 2)
        .fonts(RunFonts::new().ascii(&styles.body_font))
}

fn bullet_paragraph(text: &str, styles: &DocumentStyles) -> Paragraph {
    Paragraph::new()
        .align(AlignmentType::Left)
        .add_run(body_run("\u{2022} ", styles))
        .add_run(body_run(text, styles))
}

fn body_paragraph(text: &str, styles: &DocumentStyles) -> Paragraph {
    Paragraph::new()
        .align(AlignmentType::Left)
        .add_run(body_run(text, styles))
}
