use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{FilingInsightsError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub path: PathBuf,
    pub text: String,
}

struct CleanupPatterns {
    horizontal_ws: Regex,
    extra_newlines: Regex,
    page_number: Regex,
    page_label: Regex,
}

impl CleanupPatterns {
    fn compile() -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            horizontal_ws: Regex::new(r"[ \t]+")?,
            extra_newlines: Regex::new(r"\n{3,}")?,
            page_number: Regex::new(r"^\d{1,4}$")?,
            page_label: Regex::new(r"(?i)^page\s+\d{1,4}$")?,
        })
    }
}

fn cleanup_patterns() -> Result<&'static CleanupPatterns> {
    static PATTERNS: OnceLock<std::result::Result<CleanupPatterns, regex::Error>> =
        OnceLock::new();
    PATTERNS
        .get_or_init(CleanupPatterns::compile)
        .as_ref()
        .map_err(|e| FilingInsightsError::CleanupPattern(e.clone()))
}

/// Normalizes text extracted from a PDF: non-breaking spaces, form feeds,
/// runs of blanks, repeated empty lines and bare page-number lines.
pub fn clean_text(raw: &str) -> Result<String> {
    let patterns = cleanup_patterns()?;

    let text = raw.replace('\u{00a0}', " ").replace('\u{000c}', "\n\n");
    let text = patterns.horizontal_ws.replace_all(&text, " ");
    let text = patterns.extra_newlines.replace_all(&text, "\n\n");

    let lines: Vec<&str> = text
        .lines()
        .filter_map(|line| {
            let stripped = line.trim();
            if stripped.is_empty() {
                return Some("");
            }
            if patterns.page_number.is_match(stripped) || patterns.page_label.is_match(stripped) {
                return None;
            }
            Some(line)
        })
        .collect();

    let joined = lines.join("\n");
    Ok(patterns
        .extra_newlines
        .replace_all(&joined, "\n\n")
        .trim()
        .to_string())
}

/// Joins page texts in order, skipping empty pages, and cleans the result.
pub fn assemble_pages<'a, I>(pages: I) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let raw = pages
        .into_iter()
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    clean_text(&raw)
}

/// Extracts and cleans the text of a PDF filing.
#[cfg(feature = "pdf")]
pub fn parse_pdf(path: impl AsRef<Path>) -> Result<ParsedDocument> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FilingInsightsError::DocumentNotFound(path.to_path_buf()));
    }

    let raw = pdf_extract::extract_text(path)
        .map_err(|e| FilingInsightsError::PdfExtraction(format!("{}: {}", path.display(), e)))?;

    let text = clean_text(&raw)?;
    log::debug!("Extracted {} chars from {}", text.len(), path.display());

    Ok(ParsedDocument {
        path: path.to_path_buf(),
        text,
    })
}

impl ParsedDocument {
    pub fn from_text(path: impl AsRef<Path>, raw: &str) -> Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            text: clean_text(raw)?,
        })
    }
}
