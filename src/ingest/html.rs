use std::path::Path;

use super::{text, Extract};
use crate::error::ExtractionError;

/// Wide enough that html2text never wraps a normal paragraph
const RENDER_WIDTH: usize = 10_000;

/// HTML pages rendered down to their visible text
pub struct HtmlExtractor;

impl Extract for HtmlExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = text::read(path)?;
        let html = text::decode(&bytes);
        render(&html).map_err(|reason| ExtractionError::Corrupt {
            path: path.to_path_buf(),
            format: "HTML",
            reason,
        })
    }
}

fn render(html: &str) -> Result<String, String> {
    html2text::from_read(html.as_bytes(), RENDER_WIDTH).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_strips_markup() {
        let text = render("<html><body><p>This is an HTML file.</p></body></html>").unwrap();
        assert_eq!(text.trim(), "This is an HTML file.");
    }

    #[test]
    fn test_render_skips_scripts() {
        let text = render(
            "<html><head><script>var x = 1;</script></head><body><h1>Title</h1><p>Body text.</p></body></html>",
        )
        .unwrap();
        assert!(text.contains("Title"));
        assert!(text.contains("Body text."));
        assert!(!text.contains("var x"));
        assert!(!text.contains('<'));
    }
}
