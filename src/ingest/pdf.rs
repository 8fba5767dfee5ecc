use std::panic;
use std::path::Path;

use super::{text, Extract};
use crate::error::ExtractionError;

pub struct PdfExtractor;

impl Extract for PdfExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = text::read(path)?;
        let corrupt = |reason: String| ExtractionError::Corrupt {
            path: path.to_path_buf(),
            format: "PDF",
            reason,
        };

        // pdf_extract can panic on complex PDFs, so contain it and fall back to lopdf
        let extract_result = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&bytes));

        let text = match extract_result {
            Ok(Ok(text)) if !text.trim().is_empty() => text,
            Ok(Ok(_)) => {
                tracing::debug!("pdf_extract found no text, trying lopdf");
                extract_with_lopdf(&bytes).map_err(corrupt)?
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "pdf_extract failed, trying fallback");
                extract_with_lopdf(&bytes).map_err(corrupt)?
            }
            Err(_) => {
                tracing::warn!("pdf_extract crashed, trying fallback extraction");
                extract_with_lopdf(&bytes).map_err(corrupt)?
            }
        };

        // Clean up the extracted text
        let cleaned = text
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(cleaned)
    }
}

/// Fallback PDF text extraction using lopdf
fn extract_with_lopdf(bytes: &[u8]) -> Result<String, String> {
    use lopdf::Document;

    let doc = Document::load_mem(bytes).map_err(|e| format!("failed to load PDF: {e}"))?;

    let mut text = String::new();

    for (page_num, _) in doc.get_pages() {
        match doc.extract_text(&[page_num]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                text.push('\n');
            }
            Err(e) => tracing::debug!(page = page_num, error = %e, "skipping unreadable page"),
        }
    }

    if text.trim().is_empty() {
        return Err("no text layer found (the PDF may be scanned or image-based)".to_string());
    }

    Ok(text)
}
