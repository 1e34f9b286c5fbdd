use anyhow::{Context, Result};
use dotenv::dotenv;
use filing_insights::llm::{OllamaClient, OllamaConfig};
use filing_insights::{
    build_comparison_table, parse_pdf, write_company_result, write_comparison_table,
    AnalysisConfig, FilingAnalyzer,
};
use std::path::PathBuf;

struct CompanyDoc {
    name: String,
    pdf_path: PathBuf,
}

/// `FILINGS=Apple=data/apple.pdf,Tesla=data/tesla.pdf`, or the three default
/// filings under `data/10k_reports`.
fn load_companies() -> Vec<CompanyDoc> {
    if let Ok(list) = std::env::var("FILINGS") {
        return list
            .split(',')
            .filter_map(|entry| entry.split_once('='))
            .map(|(name, path)| CompanyDoc {
                name: name.trim().to_string(),
                pdf_path: PathBuf::from(path.trim()),
            })
            .collect();
    }

    let data_dir = PathBuf::from("data").join("10k_reports");
    ["Apple", "Microsoft", "Tesla"]
        .into_iter()
        .map(|name| CompanyDoc {
            name: name.to_string(),
            pdf_path: data_dir.join(format!("{}_10k.pdf", name.to_lowercase())),
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = match std::env::var("ANALYSIS_CONFIG") {
        Ok(path) => AnalysisConfig::from_path(path)?,
        Err(_) => AnalysisConfig::default(),
    };
    let out_dir = PathBuf::from(std::env::var("OUTPUT_DIR").unwrap_or_else(|_| "outputs".into()));

    let ollama = OllamaConfig::from_env();
    println!("🤖 Using {} at {}", ollama.model, ollama.host);
    let analyzer = FilingAnalyzer::with_config(OllamaClient::new(ollama)?, config)?;

    let companies = load_companies();
    let mut results = Vec::new();

    for (i, company) in companies.iter().enumerate() {
        println!(
            "\n--- Processing {} ({}/{}) ---",
            company.name,
            i + 1,
            companies.len()
        );

        let parsed = parse_pdf(&company.pdf_path)
            .with_context(|| format!("reading filing for {}", company.name))?;
        let result = analyzer
            .analyze(&company.name, &parsed.text)
            .await
            .with_context(|| format!("analyzing {}", company.name))?;

        if result.risks_structured.is_parse_error() {
            println!("⚠️  Risk output for {} was not valid JSON; raw text saved", company.name);
        }

        let path = write_company_result(&out_dir, &result)?;
        println!("✅ Saved → {}", path.display());
        results.push(result);
    }

    let comparison = build_comparison_table(&results);
    let comparison_path = write_comparison_table(&out_dir, &comparison)?;

    println!("\n=== DONE ===");
    println!("Company outputs:");
    for r in &results {
        println!(" - {}_insights.json", r.company.to_lowercase());
    }
    println!("Comparison table:");
    println!(" - {}", comparison_path.display());

    Ok(())
}
