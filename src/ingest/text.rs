use std::borrow::Cow;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

use super::Extract;
use crate::error::ExtractionError;

/// Plain text in any common encoding
pub struct TextExtractor;

impl Extract for TextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = read(path)?;
        if looks_binary(&bytes) {
            return Err(ExtractionError::Unsupported {
                path: path.to_path_buf(),
                kind: "binary data".to_string(),
            });
        }
        Ok(decode(&bytes).into_owned())
    }
}

pub(crate) fn read(path: &Path) -> Result<Vec<u8>, ExtractionError> {
    std::fs::read(path).map_err(|source| ExtractionError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode bytes as text: BOM first, then UTF-8, then a detected legacy encoding
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text;
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(text);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    tracing::debug!(encoding = encoding.name(), "detected text encoding");

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!(
            encoding = encoding.name(),
            "some bytes could not be decoded and were replaced"
        );
    }
    text
}

/// NUL bytes outside a UTF-16 BOM'd file mean this isn't text
pub fn looks_binary(bytes: &[u8]) -> bool {
    if Encoding::for_bom(bytes).is_some() {
        return false;
    }
    bytes.iter().take(8192).any(|&b| b == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode("naïve café".as_bytes()), "naïve café");
    }

    #[test]
    fn test_decode_utf8_bom_is_stripped() {
        assert_eq!(decode(b"\xEF\xBB\xBFhello"), "hello");
    }

    #[test]
    fn test_decode_utf16_le() {
        let bytes = b"\xFF\xFEh\0i\0";
        assert_eq!(decode(bytes), "hi");
        assert!(!looks_binary(bytes));
    }

    #[test]
    fn test_decode_latin1() {
        // "Les élèves sont très contents de l'été" in windows-1252
        let bytes = b"Les \xe9l\xe8ves sont tr\xe8s contents de l'\xe9t\xe9";
        assert_eq!(decode(bytes), "Les élèves sont très contents de l'été");
    }

    #[test]
    fn test_looks_binary() {
        assert!(looks_binary(b"abc\0def"));
        assert!(!looks_binary(b"just text"));
    }
}
