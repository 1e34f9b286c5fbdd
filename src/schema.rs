use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Category labels offered to the model for each risk. Model output is not
/// checked against this list.
pub const RISK_CATEGORIES: &[&str] = &[
    "Market",
    "Regulatory",
    "Operational",
    "Financial",
    "Competitive",
    "Legal",
    "Other",
];

pub const MANAGEMENT_TONES: &[&str] = &["Positive", "Neutral", "Cautious"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RiskItem {
    #[schemars(
        description = "One of: Market, Regulatory, Operational, Financial, Competitive, Legal, Other"
    )]
    pub category: String,

    #[schemars(description = "Concise risk statement")]
    pub risk: String,

    #[schemars(description = "Short supporting phrase from context (<= 20 words)")]
    pub evidence_quote: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompanyRiskOutput {
    #[schemars(description = "Company name as given in the request")]
    pub company: String,

    #[schemars(description = "Top investment risks found in the context, most material first")]
    pub key_risks: Vec<RiskItem>,
}

/// Full investor view of one company, assembled from several model calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompanyInsights {
    pub company: String,

    #[schemars(description = "Business model summary (~120 words)")]
    pub business_model: String,

    pub revenue_drivers: Vec<String>,

    #[schemars(description = "Positive / Neutral / Cautious")]
    pub management_tone: String,

    pub outlook: String,

    pub key_risks: Vec<RiskItem>,
}

impl CompanyRiskOutput {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(CompanyRiskOutput)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

impl CompanyInsights {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(CompanyInsights)
    }
}

impl RiskItem {
    /// Whether `category` is one of the offered labels (case-insensitive).
    pub fn has_known_category(&self) -> bool {
        RISK_CATEGORIES
            .iter()
            .any(|c| c.eq_ignore_ascii_case(self.category.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_schema_generation() {
        let schema_json = CompanyRiskOutput::schema_as_json().unwrap();
        assert!(schema_json.contains("key_risks"));
        assert!(schema_json.contains("evidence_quote"));
        assert!(schema_json.contains("Competitive"));
    }

    #[test]
    fn test_insights_schema_generation() {
        let schema = serde_json::to_string(&CompanyInsights::generate_json_schema()).unwrap();
        assert!(schema.contains("management_tone"));
        assert!(schema.contains("revenue_drivers"));
    }

    #[test]
    fn test_risk_output_deserializes_model_json() {
        let json = r#"{
            "company": "Tesla",
            "key_risks": [
                {"category": "Operational", "risk": "Battery cell supply", "evidence_quote": "we depend on suppliers of lithium-ion cells"},
                {"category": "Geopolitical", "risk": "China exposure", "evidence_quote": "a significant portion of our sales"}
            ]
        }"#;
        let output: CompanyRiskOutput = serde_json::from_str(json).unwrap();
        assert_eq!(output.key_risks.len(), 2);
        assert!(output.key_risks[0].has_known_category());
        assert!(!output.key_risks[1].has_known_category());
    }
}
