pub mod chunker;
pub mod docx;
pub mod html;
pub mod pdf;
pub mod text;

pub use chunker::split_into_chunks;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::ExtractionError;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Document formats docsum knows how to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Format {
    Pdf,
    Docx,
    Html,
    Text,
    Unsupported(String),
}

impl Format {
    /// Detect the format from the file extension, sniffing the content when
    /// the extension is missing or unknown.
    pub fn detect(path: &Path) -> Result<Self, ExtractionError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase());

        let format = match extension.as_deref() {
            Some("pdf") => Format::Pdf,
            Some("docx") => Format::Docx,
            Some("html" | "htm" | "xhtml") => Format::Html,
            Some("txt" | "text" | "md" | "markdown" | "rst" | "csv" | "tsv" | "log" | "json"
            | "xml" | "yaml" | "yml" | "toml") => Format::Text,
            Some("png" | "jpg" | "jpeg" | "gif" | "bmp" | "tiff" | "tif" | "webp") => {
                Format::Unsupported("image".to_string())
            }
            Some("mp3" | "wav" | "m4a" | "ogg" | "flac") => Format::Unsupported("audio".to_string()),
            Some("mp4" | "mkv" | "avi" | "mov" | "webm" | "flv") => {
                Format::Unsupported("video".to_string())
            }
            Some("doc" | "xls" | "ppt") => {
                Format::Unsupported("legacy binary office document".to_string())
            }
            Some("zip" | "gz" | "tar" | "7z" | "rar") => Format::Unsupported("archive".to_string()),
            _ => Self::sniff(path)?,
        };

        Ok(format)
    }

    /// Guess the format from the first bytes of the file
    fn sniff(path: &Path) -> Result<Self, ExtractionError> {
        let mut head = Vec::with_capacity(512);
        File::open(path)
            .and_then(|f| f.take(512).read_to_end(&mut head))
            .map_err(|source| ExtractionError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let format = Self::from_magic(&head);
        if head.starts_with(ZIP_MAGIC) && docx::is_word_document(path) {
            return Ok(Format::Docx);
        }
        Ok(format)
    }

    fn from_magic(head: &[u8]) -> Self {
        if head.starts_with(b"%PDF-") {
            Format::Pdf
        } else if head.starts_with(ZIP_MAGIC) {
            Format::Unsupported("zip archive".to_string())
        } else if text::looks_binary(head) {
            Format::Unsupported("binary data".to_string())
        } else if looks_like_html(head) {
            Format::Html
        } else {
            Format::Text
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Format::Pdf => "PDF",
            Format::Docx => "DOCX",
            Format::Html => "HTML",
            Format::Text => "text",
            Format::Unsupported(kind) => kind,
        }
    }
}

fn looks_like_html(head: &[u8]) -> bool {
    let start = String::from_utf8_lossy(head).trim_start().to_lowercase();
    start.starts_with("<!doctype html") || start.starts_with("<html")
}

/// Something that can turn a file into plain text
pub trait Extract {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError>;
}

/// Pick the extractor for a detected format
pub fn extractor_for(format: &Format) -> Option<&'static dyn Extract> {
    match format {
        Format::Pdf => Some(&pdf::PdfExtractor),
        Format::Docx => Some(&docx::DocxExtractor),
        Format::Html => Some(&html::HtmlExtractor),
        Format::Text => Some(&text::TextExtractor),
        Format::Unsupported(_) => None,
    }
}

/// Extracted content from a file
#[derive(Debug, Clone)]
pub struct ExtractedContent {
    pub source: String,
    pub format: Format,
    pub text: String,
}

/// Extract text content from a file based on its type
pub fn extract_from_file(path: &Path) -> Result<ExtractedContent, ExtractionError> {
    if !path.is_file() {
        let source = if path.exists() {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file")
        } else {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file")
        };
        return Err(ExtractionError::Read {
            path: path.to_path_buf(),
            source,
        });
    }

    let format = Format::detect(path)?;
    tracing::debug!(path = %path.display(), format = format.name(), "detected format");

    let extractor = extractor_for(&format).ok_or_else(|| ExtractionError::Unsupported {
        path: path.to_path_buf(),
        kind: format.name().to_string(),
    })?;

    let text = clean_text(&extractor.extract(path)?);
    if text.is_empty() {
        return Err(ExtractionError::Empty {
            path: path.to_path_buf(),
        });
    }

    tracing::info!(chars = text.chars().count(), format = format.name(), "extracted text");

    Ok(ExtractedContent {
        source: path.display().to_string(),
        format,
        text,
    })
}

/// Trim trailing whitespace and collapse runs of blank lines to one
fn clean_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut blank_run = false;

    for line in text.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            blank_run = !result.is_empty();
            continue;
        }
        if !result.is_empty() {
            result.push('\n');
            if blank_run {
                result.push('\n');
            }
        }
        result.push_str(line);
        blank_run = false;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_detect_by_extension() {
        let cases = [
            ("report.PDF", Format::Pdf),
            ("letter.docx", Format::Docx),
            ("page.htm", Format::Html),
            ("notes.md", Format::Text),
        ];
        for (name, expected) in cases {
            assert_eq!(Format::detect(Path::new(name)).unwrap(), expected, "{name}");
        }
        assert!(matches!(
            Format::detect(Path::new("photo.jpg")).unwrap(),
            Format::Unsupported(_)
        ));
    }

    #[test]
    fn test_detect_by_magic_bytes() {
        assert_eq!(Format::from_magic(b"%PDF-1.7\n"), Format::Pdf);
        assert!(matches!(
            Format::from_magic(b"PK\x03\x04...."),
            Format::Unsupported(_)
        ));
        assert_eq!(
            Format::from_magic(b"<!DOCTYPE html><html></html>"),
            Format::Html
        );
        assert_eq!(Format::from_magic(b"plain words"), Format::Text);
        assert!(matches!(
            Format::from_magic(b"\x7fELF\x02\x01\x01\x00\x00"),
            Format::Unsupported(_)
        ));
    }

    #[test]
    fn test_extract_plain_text_without_extension() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "We hold these truths to be self-evident.\n\n\n\nThat all men are created equal.  \n"
        )
        .unwrap();

        let content = extract_from_file(file.path()).unwrap();
        assert_eq!(content.format, Format::Text);
        assert_eq!(
            content.text,
            "We hold these truths to be self-evident.\n\nThat all men are created equal."
        );
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = extract_from_file(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, ExtractionError::Read { .. }));
    }

    #[test]
    fn test_directory_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = extract_from_file(dir.path()).unwrap_err();
        assert!(matches!(err, ExtractionError::Read { .. }));
    }

    #[test]
    fn test_whitespace_only_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blank.txt");
        std::fs::write(&path, "   \n\n\t\n").unwrap();

        let err = extract_from_file(&path).unwrap_err();
        assert!(matches!(err, ExtractionError::Empty { .. }));
    }

    #[test]
    fn test_image_is_unsupported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.png");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\n").unwrap();

        let err = extract_from_file(&path).unwrap_err();
        assert!(matches!(err, ExtractionError::Unsupported { .. }));
    }
}
