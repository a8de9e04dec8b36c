use docx_rs::{DocumentChild, ParagraphChild, RunChild};

use super::{DocumentFormat, ExtractionError};

/// Extracts the text of every top-level paragraph, in document order.
///
/// Paragraphs nested in tables are skipped. Empty paragraphs are kept so that
/// blank lines in the source survive as blank lines in the output.
pub(super) fn extract_paragraphs(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractionError::Decode {
        format: DocumentFormat::Docx,
        message: format!("{e:?}"),
    })?;

    Ok(docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(&para.children)),
            _ => None,
        })
        .collect())
}

/// Paragraph → Run → Text. Runs are concatenated with no separator;
/// hyperlinks are walked for their runs.
fn paragraph_text(children: &[ParagraphChild]) -> String {
    let mut text = String::new();
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => text.push_str(&paragraph_text(&link.children)),
            _ => {}
        }
    }
    text
}
