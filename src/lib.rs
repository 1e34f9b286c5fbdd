//! # Filing Insights
//!
//! Turns the extracted text of a 10-K filing into bounded, section-scoped
//! contexts for a language model, builds the analysis prompts, and recovers
//! structured JSON from model replies that may not be well-formed.
//!
//! ## Core Concepts
//!
//! - **Sections**: "Item 1. Business", "Item 1A. Risk Factors" and "Item 7. MD&A"
//!   are located by heading pattern; section boundaries follow heading order
//! - **Chunks**: overlapping, size-bounded windows of a section
//! - **Contexts**: the leading chunks of a task's section, with whole-document
//!   fallbacks so a model call always receives text
//! - **Normalized responses**: parsed JSON, or a `_parse_error` sentinel holding
//!   the raw reply
//!
//! ## Example
//!
//! ```rust
//! use filing_insights::*;
//!
//! let text = "Item 1. Business We design phones. Item 1A. Risk Factors Supply is concentrated.";
//! let extraction = extract_core_sections(text);
//! let context = ContextSpec::risks().build(&extraction, text);
//! assert_eq!(context, "Item 1A. Risk Factors Supply is concentrated.");
//!
//! let prompt = prompt_risks("Apple", &context).unwrap();
//! assert!(prompt.contains("SCHEMA:"));
//!
//! let reply = normalize("Sure: {\"company\": \"Apple\", \"key_risks\": []}");
//! assert!(!reply.is_parse_error());
//! ```

pub mod chunker;
pub mod comparison;
pub mod config;
pub mod context;
pub mod error;
pub mod ingestion;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod schema;
pub mod sections;
pub mod utils;

#[cfg(feature = "ollama")]
pub mod llm;

pub use chunker::{chunk_iter, chunk_text, Chunk, Chunks};
pub use comparison::{build_comparison_table, ComparisonRow};
pub use config::AnalysisConfig;
pub use context::{combine_first_n_chunks, ContextSpec};
pub use error::{FilingInsightsError, Result};
pub use ingestion::*;
pub use normalize::{normalize, NormalizedResponse, ParseFailure};
pub use output::{write_company_result, write_comparison_table};
pub use pipeline::{CompanyResult, FilingAnalyzer, TaskContexts, TextGenerator};
pub use prompts::*;
pub use schema::*;
pub use sections::{
    extract_core_sections, get_section_or_fallback, Section, SectionExtraction, SectionKey,
    SectionLocator, SectionPattern,
};
pub use utils::{char_prefix, preview};
