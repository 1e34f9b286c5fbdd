use std::collections::BTreeMap;
use std::fmt;

use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{FilingInsightsError, Result};

/// Named 10-K sections the locator knows how to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SectionKey {
    #[serde(rename = "item_1_business")]
    Business,
    #[serde(rename = "item_1a_risks")]
    RiskFactors,
    #[serde(rename = "item_7_mdna")]
    ManagementDiscussion,
}

impl SectionKey {
    pub const ALL: [SectionKey; 3] = [
        SectionKey::Business,
        SectionKey::RiskFactors,
        SectionKey::ManagementDiscussion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::Business => "item_1_business",
            SectionKey::RiskFactors => "item_1a_risks",
            SectionKey::ManagementDiscussion => "item_7_mdna",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built-in heading patterns, matched case-insensitively.
pub const DEFAULT_SECTION_PATTERNS: &[(SectionKey, &str)] = &[
    (SectionKey::Business, r"\bitem\s+1[.:\s]+(business)\b"),
    (SectionKey::RiskFactors, r"\bitem\s+1a[.:\s]+(risk\s+factors)\b"),
    (
        SectionKey::ManagementDiscussion,
        r"\bitem\s+7[.:\s]+(management['’]s\s+discussion|md&a|discussion\s+and\s+analysis)\b",
    ),
];

/// A heading pattern as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionPattern {
    pub key: SectionKey,
    pub pattern: String,
}

impl SectionPattern {
    pub fn new(key: SectionKey, pattern: impl Into<String>) -> Self {
        Self {
            key,
            pattern: pattern.into(),
        }
    }

    pub fn defaults() -> Vec<SectionPattern> {
        DEFAULT_SECTION_PATTERNS
            .iter()
            .map(|(key, pattern)| SectionPattern::new(*key, *pattern))
            .collect()
    }
}

/// One located section. `start`/`end` are byte offsets into the source text
/// of the raw span; `text` is the span trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SectionExtraction {
    pub sections: BTreeMap<SectionKey, Section>,
    pub found: bool,
}

impl SectionExtraction {
    pub fn not_found() -> Self {
        Self::default()
    }

    pub fn get(&self, key: SectionKey) -> Option<&str> {
        self.sections.get(&key).map(|s| s.text.as_str())
    }

    /// Located keys in document order.
    pub fn ordered_keys(&self) -> Vec<SectionKey> {
        let mut keys: Vec<(usize, SectionKey)> =
            self.sections.iter().map(|(k, s)| (s.start, *k)).collect();
        keys.sort();
        keys.into_iter().map(|(_, k)| k).collect()
    }
}

/// Registry of compiled heading patterns.
#[derive(Debug, Clone)]
pub struct SectionLocator {
    patterns: Vec<(SectionKey, Regex)>,
}

impl SectionLocator {
    pub fn from_patterns(patterns: &[SectionPattern]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(&p.pattern)
                    .case_insensitive(true)
                    .build()
                    .map(|re| (p.key, re))
                    .map_err(|source| FilingInsightsError::InvalidSectionPattern {
                        key: p.key,
                        source,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// First match position of every key that has one.
    pub fn heading_positions(&self, text: &str) -> BTreeMap<SectionKey, usize> {
        let mut positions = BTreeMap::new();
        for (key, re) in &self.patterns {
            if positions.contains_key(key) {
                continue;
            }
            if let Some(m) = re.find(text) {
                positions.insert(*key, m.start());
            }
        }
        positions
    }

    /// Slices `text` into sections bounded by the sorted heading positions.
    pub fn locate(&self, text: &str) -> SectionExtraction {
        let positions = self.heading_positions(text);
        if positions.is_empty() {
            debug!("No known section headings found");
            return SectionExtraction::not_found();
        }

        let mut ordered: Vec<(SectionKey, usize)> = positions.into_iter().collect();
        ordered.sort_by_key(|(key, start)| (*start, *key));

        let mut sections = BTreeMap::new();
        for (i, (key, start)) in ordered.iter().enumerate() {
            let end = ordered
                .get(i + 1)
                .map(|(_, next)| *next)
                .unwrap_or(text.len());
            let body = text[*start..end].trim();
            // Two headings at the same offset leave the first one empty.
            if body.is_empty() {
                continue;
            }
            sections.insert(
                *key,
                Section {
                    start: *start,
                    end,
                    text: body.to_string(),
                },
            );
        }

        debug!(
            "Located sections: {:?}",
            ordered.iter().map(|(k, s)| (k.as_str(), *s)).collect::<Vec<_>>()
        );

        SectionExtraction {
            found: !sections.is_empty(),
            sections,
        }
    }
}

impl Default for SectionLocator {
    fn default() -> Self {
        let patterns = DEFAULT_SECTION_PATTERNS
            .iter()
            .filter_map(|(key, pattern)| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .ok()
                    .map(|re| (*key, re))
            })
            .collect();
        Self { patterns }
    }
}

/// Locates sections using the built-in heading table.
pub fn extract_core_sections(text: &str) -> SectionExtraction {
    SectionLocator::default().locate(text)
}

/// Returns the section text, or the whole document when the section was not
/// located.
pub fn get_section_or_fallback<'a>(
    extraction: &'a SectionExtraction,
    full_text: &'a str,
    key: SectionKey,
) -> &'a str {
    if extraction.found {
        if let Some(section) = extraction.get(key) {
            return section;
        }
    }
    warn!(
        "Section {} not located; falling back to the full document ({} bytes)",
        key,
        full_text.len()
    );
    full_text
}
