use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::chunker::chunk_iter;
use crate::sections::{get_section_or_fallback, SectionExtraction, SectionKey};
use crate::utils::char_prefix;

pub const DEFAULT_CONTEXT_MAX_CHARS: usize = 2000;
pub const DEFAULT_CONTEXT_OVERLAP: usize = 200;
pub const DEFAULT_LEADING_CHUNKS: usize = 1;
pub const DEFAULT_FALLBACK_CHARS: usize = 2000;

/// How to turn one filing section into a prompt-sized context string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSpec {
    pub section: SectionKey,
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    #[serde(default = "default_overlap")]
    pub overlap: usize,
    #[serde(default = "default_leading_chunks")]
    pub leading_chunks: usize,
    #[serde(default = "default_fallback_chars")]
    pub fallback_chars: usize,
}

fn default_max_chars() -> usize {
    DEFAULT_CONTEXT_MAX_CHARS
}

fn default_overlap() -> usize {
    DEFAULT_CONTEXT_OVERLAP
}

fn default_leading_chunks() -> usize {
    DEFAULT_LEADING_CHUNKS
}

fn default_fallback_chars() -> usize {
    DEFAULT_FALLBACK_CHARS
}

impl ContextSpec {
    pub fn for_section(section: SectionKey) -> Self {
        Self {
            section,
            max_chars: DEFAULT_CONTEXT_MAX_CHARS,
            overlap: DEFAULT_CONTEXT_OVERLAP,
            leading_chunks: DEFAULT_LEADING_CHUNKS,
            fallback_chars: DEFAULT_FALLBACK_CHARS,
        }
    }

    pub fn business() -> Self {
        Self::for_section(SectionKey::Business)
    }

    pub fn risks() -> Self {
        Self::for_section(SectionKey::RiskFactors)
    }

    pub fn management_discussion() -> Self {
        Self::for_section(SectionKey::ManagementDiscussion)
    }

    pub fn with_chunking(mut self, max_chars: usize, overlap: usize) -> Self {
        self.max_chars = max_chars;
        self.overlap = overlap;
        self
    }

    pub fn with_leading_chunks(mut self, leading_chunks: usize) -> Self {
        self.leading_chunks = leading_chunks;
        self
    }

    pub fn with_fallback_chars(mut self, fallback_chars: usize) -> Self {
        self.fallback_chars = fallback_chars;
        self
    }

    /// Builds the context for the configured section.
    pub fn build(&self, extraction: &SectionExtraction, full_text: &str) -> String {
        let section_text = get_section_or_fallback(extraction, full_text, self.section);
        let chunks: Vec<String> = chunk_iter(section_text, self.max_chars, self.overlap)
            .take(self.leading_chunks)
            .map(|c| c.text)
            .collect();

        let context = combine_first_n_chunks(&chunks, self.leading_chunks);
        if !context.is_empty() {
            debug!(
                "Context for {}: {} leading chunks, {} chars",
                self.section,
                chunks.len(),
                context.chars().count()
            );
            return context;
        }

        warn!(
            "Context for {} is empty; using the first {} chars of the document",
            self.section, self.fallback_chars
        );
        char_prefix(full_text, self.fallback_chars).to_string()
    }
}

/// Joins the first `n` chunks with a blank line and trims the result.
pub fn combine_first_n_chunks(chunks: &[String], n: usize) -> String {
    let take = n.min(chunks.len());
    chunks[..take].join("\n\n").trim().to_string()
}
