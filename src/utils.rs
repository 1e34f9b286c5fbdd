/// Returns the first `max_chars` characters of `text` without splitting a
/// UTF-8 sequence.
pub fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Short preview used in summary tables: the first `max_chars` characters
/// followed by an ellipsis.
pub fn preview(text: &str, max_chars: usize) -> String {
    format!("{}...", char_prefix(text, max_chars))
}

/// Byte offset of every char boundary in `text`, including `text.len()`.
pub(crate) fn char_boundaries(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(idx, _)| idx)
        .chain(std::iter::once(text.len()))
        .collect()
}
