use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{text, Extract};
use crate::error::ExtractionError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Office Open XML word-processing documents
pub struct DocxExtractor;

impl Extract for DocxExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = text::read(path)?;
        let xml = document_xml(&bytes).map_err(|reason| ExtractionError::Corrupt {
            path: path.to_path_buf(),
            format: "DOCX",
            reason,
        })?;

        paragraphs_from_xml(&xml).map_err(|reason| ExtractionError::Corrupt {
            path: path.to_path_buf(),
            format: "DOCX",
            reason,
        })
    }
}

/// Whether a zip container holds a word-processing document part
pub fn is_word_document(path: &Path) -> bool {
    std::fs::File::open(path)
        .ok()
        .and_then(|file| zip::ZipArchive::new(file).ok())
        .is_some_and(|mut archive| archive.by_name(DOCUMENT_PART).is_ok())
}

fn document_xml(bytes: &[u8]) -> Result<String, String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| format!("not a zip container: {e}"))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|_| format!("missing {DOCUMENT_PART}"))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| format!("failed to read {DOCUMENT_PART}: {e}"))?;
    Ok(xml)
}

/// Collect `w:t` runs, one line per `w:p` paragraph
///
/// Tabs and breaks count only inside a `w:r` run; `w:tab` also appears as a
/// tab-stop definition under `w:pPr/w:tabs`.
fn paragraphs_from_xml(xml: &str) -> Result<String, String> {
    let mut reader = Reader::from_str(xml);

    let mut out = String::new();
    let mut paragraph = String::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:r" => in_run = true,
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:r" => in_run = false,
                b"w:t" => in_text = false,
                b"w:p" => {
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    out.push_str(paragraph.trim_end());
                    paragraph.clear();
                }
                _ => {}
            },
            Ok(Event::Empty(e)) if in_run => match e.name().as_ref() {
                b"w:tab" => paragraph.push('\t'),
                b"w:br" | b"w:cr" => paragraph.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let text = e.unescape().map_err(|e| format!("bad text run: {e}"))?;
                paragraph.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "malformed XML at position {}: {e}",
                    reader.buffer_position()
                ));
            }
            _ => {}
        }
    }

    if !paragraph.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&paragraph);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>When in the Course</w:t></w:r><w:r><w:t xml:space="preserve"> of human events</w:t></w:r></w:p>
    <w:p><w:r><w:t>Life, Liberty &amp; the pursuit of Happiness</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    fn write_docx(path: &Path, document: &str) {
        let file = std::fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("[Content_Types].xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"<Types/>").unwrap();
        zip.start_file(DOCUMENT_PART, SimpleFileOptions::default())
            .unwrap();
        zip.write_all(document.as_bytes()).unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn test_paragraphs_from_xml() {
        let text = paragraphs_from_xml(BODY).unwrap();
        assert_eq!(
            text,
            "When in the Course of human events\nLife, Liberty & the pursuit of Happiness"
        );
    }

    #[test]
    fn test_tab_stop_definitions_are_not_text() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
    <w:p>
      <w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/><w:tab w:val="right" w:pos="9360"/></w:tabs></w:pPr>
      <w:r><w:t>Name</w:t></w:r><w:r><w:tab/><w:t>Signature</w:t></w:r>
    </w:p>
</w:body></w:document>"#;
        assert_eq!(paragraphs_from_xml(xml).unwrap(), "Name\tSignature");
    }

    #[test]
    fn test_extract_docx_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("declaration.docx");
        write_docx(&path, BODY);

        let text = DocxExtractor.extract(&path).unwrap();
        assert!(text.starts_with("When in the Course of human events"));
    }

    #[test]
    fn test_detects_docx_without_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("declaration");
        write_docx(&path, BODY);

        assert!(is_word_document(&path));
        assert_eq!(
            crate::ingest::Format::detect(&path).unwrap(),
            crate::ingest::Format::Docx
        );
    }

    #[test]
    fn test_zip_without_document_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.docx");
        let file = std::fs::File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("other.txt", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"hi").unwrap();
        zip.finish().unwrap();

        let err = DocxExtractor.extract(&path).unwrap_err();
        assert!(matches!(err, ExtractionError::Corrupt { format: "DOCX", .. }));
    }
}
