use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::context::ContextSpec;
use crate::error::Result;
use crate::sections::{SectionLocator, SectionPattern};

pub const DEFAULT_SNAPSHOT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_JSON_TEMPERATURE: f32 = 0.0;

/// Settings for one analysis run.
///
/// Every field has a default, so a config file only needs the values it
/// changes:
///
/// ```json
/// { "risks": { "section": "item_1a_risks", "leading_chunks": 2 }, "include_tone_outlook": true }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub snapshot: ContextSpec,
    pub risks: ContextSpec,
    pub tone: ContextSpec,
    pub qa: ContextSpec,
    pub snapshot_temperature: f32,
    pub json_temperature: f32,
    pub include_tone_outlook: bool,
    pub section_patterns: Vec<SectionPattern>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            snapshot: ContextSpec::business(),
            risks: ContextSpec::risks(),
            tone: ContextSpec::management_discussion(),
            qa: ContextSpec::management_discussion(),
            snapshot_temperature: DEFAULT_SNAPSHOT_TEMPERATURE,
            json_temperature: DEFAULT_JSON_TEMPERATURE,
            include_tone_outlook: false,
            section_patterns: SectionPattern::defaults(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn section_locator(&self) -> Result<SectionLocator> {
        SectionLocator::from_patterns(&self.section_patterns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilingInsightsError;
    use crate::sections::SectionKey;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AnalysisConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.snapshot.max_chars, 2000);
        assert_eq!(config.risks.overlap, 200);
        assert_eq!(config.section_patterns.len(), 3);
    }

    #[test]
    fn test_partial_override() {
        let config = AnalysisConfig::from_json_str(
            r#"{
                "risks": { "section": "item_1a_risks", "leading_chunks": 2 },
                "include_tone_outlook": true,
                "snapshot_temperature": 0.5
            }"#,
        )
        .unwrap();
        assert_eq!(config.risks.leading_chunks, 2);
        assert_eq!(config.risks.max_chars, 2000);
        assert!(config.include_tone_outlook);
        assert_eq!(config.snapshot_temperature, 0.5);
        assert_eq!(config.json_temperature, 0.0);
    }

    #[test]
    fn test_custom_patterns_build_locator() {
        let config = AnalysisConfig::from_json_str(
            r#"{ "section_patterns": [ { "key": "item_1_business", "pattern": "\\bour\\s+company\\b" } ] }"#,
        )
        .unwrap();
        let locator = config.section_locator().unwrap();
        let extraction = locator.locate("Intro. Our Company builds batteries.");
        assert_eq!(
            extraction.get(SectionKey::Business),
            Some("Our Company builds batteries.")
        );
    }

    #[test]
    fn test_bad_pattern_in_config() {
        let config = AnalysisConfig::from_json_str(
            r#"{ "section_patterns": [ { "key": "item_7_mdna", "pattern": "[unclosed" } ] }"#,
        )
        .unwrap();
        assert!(matches!(
            config.section_locator(),
            Err(FilingInsightsError::InvalidSectionPattern { .. })
        ));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "qa": {{ "section": "item_1_business" }} }}"#).unwrap();
        let config = AnalysisConfig::from_path(file.path()).unwrap();
        assert_eq!(config.qa.section, SectionKey::Business);
    }

    #[test]
    fn test_unknown_section_key_is_rejected() {
        let err = AnalysisConfig::from_json_str(r#"{ "qa": { "section": "item_9" } }"#).unwrap_err();
        assert!(matches!(err, FilingInsightsError::Serialization(_)));
    }
}
