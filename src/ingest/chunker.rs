//! Paragraph-packing splitter for documents too long for one request

/// Split `text` into chunks of at most `max_chars` bytes.
///
/// Paragraphs (separated by blank lines) are packed greedily and joined with
/// `"\n\n"`. A paragraph that cannot fit on its own is broken at word
/// boundaries, or at any character boundary if it has no spaces.
pub fn split_into_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();

    for para in paragraphs(text) {
        if para.len() > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            chunks.extend(split_long_paragraph(para, max_chars));
            continue;
        }

        // +2 for the paragraph separator
        if !current.is_empty() && current.len() + para.len() + 2 > max_chars {
            chunks.push(std::mem::take(&mut current));
        }

        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(para);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Split on runs of two or more newlines, dropping empty paragraphs
fn paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.split("\n\n")
        .map(|para| para.trim())
        .filter(|para| !para.is_empty())
}

fn split_long_paragraph(para: &str, max_chars: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut rest = para;

    while rest.len() > max_chars {
        let limit = find_char_boundary(rest, max_chars);
        let end = match rest[..limit].rfind(char::is_whitespace) {
            Some(pos) if pos > 0 => pos,
            _ if limit > 0 => limit,
            // A single character wider than the limit still has to go somewhere
            _ => rest.chars().next().map_or(rest.len(), char::len_utf8),
        };

        let piece = rest[..end].trim_end();
        if !piece.is_empty() {
            pieces.push(piece.to_string());
        }
        rest = rest[end..].trim_start();
    }

    if !rest.is_empty() {
        pieces.push(rest.to_string());
    }

    pieces
}

/// Find the nearest valid UTF-8 character boundary at or before the given position
fn find_char_boundary(text: &str, pos: usize) -> usize {
    if pos >= text.len() {
        return text.len();
    }
    let mut p = pos;
    while p > 0 && !text.is_char_boundary(p) {
        p -= 1;
    }
    p
}
