//! Document Extractor: plain text out of PDF and DOCX CVs.
//!
//! `extract_text` is the strict API. `extract_or_inline_error` keeps the
//! ingestion behaviour where a failed extraction becomes the document's
//! content ("Error reading PDF file: ...") instead of failing the run.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Classifies by extension; anything other than `.pdf`/`.docx` is unsupported.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        if file_name.ends_with(".pdf") {
            Some(DocumentKind::Pdf)
        } else if file_name.ends_with(".docx") {
            Some(DocumentKind::Docx)
        } else {
            None
        }
    }

    /// Content type used when the original file is handed back for download.
    pub fn download_content_type(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/octet-stream",
            DocumentKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Error reading PDF file: {0}")]
    Pdf(String),

    #[error("Error reading Word file: {0}")]
    Docx(String),
}

impl ExtractError {
    fn for_kind(kind: DocumentKind, message: String) -> Self {
        match kind {
            DocumentKind::Pdf => ExtractError::Pdf(message),
            DocumentKind::Docx => ExtractError::Docx(message),
        }
    }
}

/// Extracts text on the blocking pool. Parser panics are reported as errors.
pub async fn extract_text(kind: DocumentKind, bytes: Vec<u8>) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || match kind {
        DocumentKind::Pdf => extract_pdf(&bytes),
        DocumentKind::Docx => extract_docx(&bytes),
    })
    .await
    .unwrap_or_else(|join_err| Err(ExtractError::for_kind(kind, join_err.to_string())))
}

/// Extracts text, turning any failure into the error text itself.
pub async fn extract_or_inline_error(kind: DocumentKind, bytes: Vec<u8>) -> String {
    extract_text(kind, bytes).await.unwrap_or_else(|e| {
        warn!("{e}");
        e.to_string()
    })
}

pub fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}

/// Joins every body-level paragraph of `word/document.xml` with newlines.
pub fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(docx_err)?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(docx_err)?
        .read_to_string(&mut xml)
        .map_err(docx_err)?;

    document_paragraphs(&xml)
        .map(|paragraphs| paragraphs.join("\n"))
        .map_err(docx_err)
}

fn docx_err(e: impl std::fmt::Display) -> ExtractError {
    ExtractError::Docx(e.to_string())
}

/// Paragraph texts in document order. Paragraphs inside tables are skipped,
/// `w:tab` becomes a tab and `w:br`/`w:cr` a newline. Text boxes anchored in
/// a body paragraph contribute nothing to it, and their own paragraphs are
/// not body paragraphs.
fn document_paragraphs(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut table_depth = 0usize;
    let mut paragraph_depth = 0usize;
    let mut text_box_depth = 0usize;
    let mut run_depth = 0usize;
    let mut in_text = false;

    loop {
        let in_body_paragraph = paragraph_depth == 1 && text_box_depth == 0;
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:txbxContent" => text_box_depth += 1,
                b"w:p" if table_depth == 0 => {
                    paragraph_depth += 1;
                    if paragraph_depth == 1 {
                        current = Some(String::new());
                    }
                }
                b"w:r" => run_depth += 1,
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" if table_depth == 0 && paragraph_depth == 0 => {
                    paragraphs.push(String::new())
                }
                b"w:tab" if run_depth > 0 && in_body_paragraph => push_to(&mut current, "\t"),
                b"w:br" | b"w:cr" if run_depth > 0 && in_body_paragraph => {
                    push_to(&mut current, "\n")
                }
                _ => {}
            },
            Event::Text(t) if in_text && in_body_paragraph => {
                let text = t.unescape()?;
                push_to(&mut current, &text);
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:txbxContent" => text_box_depth = text_box_depth.saturating_sub(1),
                b"w:p" if table_depth == 0 => {
                    if paragraph_depth == 1 {
                        if let Some(paragraph) = current.take() {
                            paragraphs.push(paragraph);
                        }
                    }
                    paragraph_depth = paragraph_depth.saturating_sub(1);
                }
                b"w:r" => run_depth = run_depth.saturating_sub(1),
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push_to(current: &mut Option<String>, text: &str) {
    if let Some(paragraph) = current.as_mut() {
        paragraph.push_str(text);
    }
}
