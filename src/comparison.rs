use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pipeline::CompanyResult;
use crate::utils::preview;

pub const SNAPSHOT_PREVIEW_CHARS: usize = 180;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub company: String,
    /// `None` when the model returned `key_risks` in a non-list shape.
    pub num_risks_identified: Option<usize>,
    pub risk_categories: Vec<String>,
    pub snapshot_preview: String,
}

impl ComparisonRow {
    pub fn from_result(result: &CompanyResult) -> Self {
        let key_risks = result
            .risks_structured
            .value()
            .and_then(|v| v.get("key_risks"));

        let (num_risks_identified, risk_categories) = match key_risks {
            None => (Some(0), Vec::new()),
            Some(Value::Array(items)) => (Some(items.len()), risk_categories(items)),
            Some(_) => (None, Vec::new()),
        };

        Self {
            company: result.company.clone(),
            num_risks_identified,
            risk_categories,
            snapshot_preview: preview(&result.snapshot_text, SNAPSHOT_PREVIEW_CHARS),
        }
    }
}

fn risk_categories(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .map(|item| match item.get("category") {
            Some(Value::String(category)) => category.clone(),
            Some(other) => other.to_string(),
            None => "Unknown".to_string(),
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// One summary row per company, in input order.
pub fn build_comparison_table(results: &[CompanyResult]) -> Vec<ComparisonRow> {
    results.iter().map(ComparisonRow::from_result).collect()
}
