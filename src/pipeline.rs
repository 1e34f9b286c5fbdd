use std::future::Future;

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::normalize::{normalize, NormalizedResponse};
use crate::prompts::{prompt_company_snapshot, prompt_qa, prompt_risks, prompt_tone_outlook};
use crate::sections::{SectionExtraction, SectionLocator};

/// A language model that turns a prompt into raw text.
///
/// Connection handling, retries and timeouts belong to the implementor.
pub trait TextGenerator: Send + Sync {
    fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
        temperature: f32,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Generates and recovers a JSON value from the reply. Unparseable
    /// replies come back as a parse-failure sentinel, not an error.
    fn generate_json(
        &self,
        prompt: &str,
        system: Option<&str>,
        temperature: f32,
    ) -> impl Future<Output = Result<NormalizedResponse>> + Send {
        async move {
            let text = self.generate(prompt, system, temperature).await?;
            Ok(normalize(&text))
        }
    }
}

/// Everything produced for one company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyResult {
    pub company: String,
    pub snapshot_text: String,
    pub risks_structured: NormalizedResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone_outlook: Option<String>,
    pub generated_at: DateTime<Utc>,
}

/// The bounded contexts built for each task from one filing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskContexts {
    pub extraction: SectionExtraction,
    pub snapshot: String,
    pub risks: String,
    pub tone: String,
}

pub struct FilingAnalyzer<G> {
    generator: G,
    config: AnalysisConfig,
    locator: SectionLocator,
}

impl<G: TextGenerator> FilingAnalyzer<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            config: AnalysisConfig::default(),
            locator: SectionLocator::default(),
        }
    }

    pub fn with_config(generator: G, config: AnalysisConfig) -> Result<Self> {
        let locator = config.section_locator()?;
        Ok(Self {
            generator,
            config,
            locator,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn build_contexts(&self, full_text: &str) -> TaskContexts {
        let extraction = self.locator.locate(full_text);
        let snapshot = self.config.snapshot.build(&extraction, full_text);
        let risks = self.config.risks.build(&extraction, full_text);
        let tone = self.config.tone.build(&extraction, full_text);
        TaskContexts {
            extraction,
            snapshot,
            risks,
            tone,
        }
    }

    /// Runs the snapshot and risk tasks (and tone/outlook when enabled) for
    /// one filing.
    pub async fn analyze(&self, company: &str, full_text: &str) -> Result<CompanyResult> {
        info!("Processing {}", company);
        let contexts = self.build_contexts(full_text);
        debug!(
            "{}: sections {:?}, snapshot {} chars, risks {} chars",
            company,
            contexts.extraction.ordered_keys(),
            contexts.snapshot.len(),
            contexts.risks.len()
        );

        let snapshot_prompt = prompt_company_snapshot(company, &contexts.snapshot);
        let risks_prompt = prompt_risks(company, &contexts.risks)?;

        let (snapshot_text, risks_structured) = futures::try_join!(
            self.generator
                .generate(&snapshot_prompt, None, self.config.snapshot_temperature),
            self.generator
                .generate_json(&risks_prompt, None, self.config.json_temperature),
        )?;

        if risks_structured.is_parse_error() {
            info!("{}: risk output was not valid JSON", company);
        }

        let tone_outlook = if self.config.include_tone_outlook {
            let prompt = prompt_tone_outlook(company, &contexts.tone);
            Some(
                self.generator
                    .generate(&prompt, None, self.config.snapshot_temperature)
                    .await?,
            )
        } else {
            None
        };

        Ok(CompanyResult {
            company: company.to_string(),
            snapshot_text,
            risks_structured,
            tone_outlook,
            generated_at: Utc::now(),
        })
    }

    /// Answers a free-form question from the configured Q&A section.
    pub async fn ask(&self, company: &str, full_text: &str, question: &str) -> Result<String> {
        let extraction = self.locator.locate(full_text);
        let context = self.config.qa.build(&extraction, full_text);
        let prompt = prompt_qa(company, question, &context);
        self.generator
            .generate(&prompt, None, self.config.snapshot_temperature)
            .await
    }
}
