use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use crate::comparison::ComparisonRow;
use crate::error::Result;
use crate::pipeline::CompanyResult;

pub const COMPARISON_TABLE_FILE: &str = "comparison_table.json";

pub fn company_output_file_name(company: &str) -> String {
    format!("{}_insights.json", company.to_lowercase())
}

fn write_pretty_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn write_company_result(out_dir: impl AsRef<Path>, result: &CompanyResult) -> Result<PathBuf> {
    let path = out_dir
        .as_ref()
        .join(company_output_file_name(&result.company));
    write_pretty_json(&path, result)?;
    info!("Saved {}", path.display());
    Ok(path)
}

pub fn write_comparison_table(out_dir: impl AsRef<Path>, rows: &[ComparisonRow]) -> Result<PathBuf> {
    let path = out_dir.as_ref().join(COMPARISON_TABLE_FILE);
    write_pretty_json(&path, rows)?;
    info!("Saved {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::build_comparison_table;
    use crate::normalize::normalize;
    use chrono::Utc;

    #[test]
    fn test_file_names() {
        assert_eq!(company_output_file_name("Apple"), "apple_insights.json");
        assert_eq!(company_output_file_name("Microsoft"), "microsoft_insights.json");
    }

    #[test]
    fn test_writes_result_and_table() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("outputs");

        let result = CompanyResult {
            company: "Tesla".to_string(),
            snapshot_text: "Électrique vehicles".to_string(),
            risks_structured: normalize(r#"{"key_risks": [{"category": "Market"}]}"#),
            tone_outlook: Some("Cautious".to_string()),
            generated_at: Utc::now(),
        };

        let path = write_company_result(&out_dir, &result).unwrap();
        assert_eq!(path, out_dir.join("tesla_insights.json"));
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["snapshot_text"], "Électrique vehicles");
        assert_eq!(written["risks_structured"]["key_risks"][0]["category"], "Market");
        assert_eq!(written["tone_outlook"], "Cautious");

        let rows = build_comparison_table(std::slice::from_ref(&result));
        let path = write_comparison_table(&out_dir, &rows).unwrap();
        let written: Vec<ComparisonRow> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, rows);
    }
}
