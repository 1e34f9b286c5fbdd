use log::debug;
use serde::{Deserialize, Serialize};

use crate::utils::char_boundaries;

/// A bounded slice of a larger text.
///
/// `start` and `end` are character offsets into the trimmed source text and
/// describe the raw window the chunk was cut from; `text` is that window
/// with surrounding whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub index: usize,
    pub start: usize,
    pub end: usize,
}

/// Lazy iterator over the windows of a text, created by [`chunk_iter`].
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    text: &'a str,
    bounds: Vec<usize>,
    total: usize,
    max_chars: usize,
    overlap: usize,
    start: usize,
    emitted: usize,
    done: bool,
}

impl Iterator for Chunks<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        while !self.done && self.start < self.total {
            let start = self.start;
            let end = (start + self.max_chars).min(self.total);
            if end == self.total {
                self.done = true;
            } else {
                // Always advance at least one character.
                self.start = end.saturating_sub(self.overlap).max(start + 1);
            }

            let piece = self.text[self.bounds[start]..self.bounds[end]].trim();
            if piece.is_empty() {
                continue;
            }
            let chunk = Chunk {
                text: piece.to_string(),
                index: self.emitted,
                start,
                end,
            };
            self.emitted += 1;
            return Some(chunk);
        }
        None
    }
}

/// Yields overlapping windows of at most `max_chars` characters, one at a
/// time.
///
/// The text is trimmed first; blank input yields no chunks. Each window
/// starts `overlap` characters before the previous window ended, and the
/// cursor always moves forward by at least one character so that any
/// `overlap` (including `overlap >= max_chars`) terminates.
pub fn chunk_iter(text: &str, max_chars: usize, overlap: usize) -> Chunks<'_> {
    let text = text.trim();
    let max_chars = max_chars.max(1);
    if overlap >= max_chars {
        debug!(
            "Chunk overlap {} >= max size {}; advancing one character per step",
            overlap, max_chars
        );
    }

    let bounds = char_boundaries(text);
    let total = bounds.len().saturating_sub(1);
    Chunks {
        text,
        bounds,
        total,
        max_chars,
        overlap,
        start: 0,
        emitted: 0,
        done: false,
    }
}

/// Splits `text` into all of its windows. See [`chunk_iter`].
pub fn chunk_text(text: &str, max_chars: usize, overlap: usize) -> Vec<Chunk> {
    let chunks: Vec<Chunk> = chunk_iter(text, max_chars, overlap).collect();
    debug!(
        "Chunked {} chars into {} chunks (max {} / overlap {})",
        text.trim().chars().count(),
        chunks.len(),
        max_chars,
        overlap
    );
    chunks
}
