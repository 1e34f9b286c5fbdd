// Prompt templates for the 10-K analysis tasks. Every template starts with the
// shared research policy so the result can be sent as a single prompt.

use crate::error::Result;
use crate::schema::{CompanyRiskOutput, MANAGEMENT_TONES, RISK_CATEGORIES};

pub const NOT_ENOUGH_INFORMATION: &str = "Not enough information in provided text.";

pub const SYSTEM_FINANCE: &str = r#"
You are an investment research assistant.
Rules:
- Use ONLY the provided context. Do not invent facts.
- If the context is insufficient, say: "Not enough information in provided text."
- Be concise and analyst-style.
- Prefer bullet points where helpful.
"#;

fn with_policy(body: String) -> String {
    format!("{}\n\n{}", SYSTEM_FINANCE.trim(), body.trim())
}

pub fn prompt_company_snapshot(company_name: &str, context: &str) -> String {
    with_policy(format!(
        r#"
Company: {company_name}

TASK:
1) Summarize the business model in ~120 words (investor style).
2) List 3-6 revenue drivers as bullet points.

CONTEXT (10-K excerpt):
{context}
"#
    ))
}

pub fn prompt_risks(company_name: &str, context: &str) -> Result<String> {
    let schema = CompanyRiskOutput::schema_as_json()?;
    let categories = RISK_CATEGORIES.join(", ");
    Ok(with_policy(format!(
        r#"
Company: {company_name}

TASK:
Extract the top 5 investment risks from the context.
- Categorize each risk ({categories}).
- Provide ONE short evidence quote (<= 20 words) from the context for each risk.
Return VALID JSON ONLY matching the schema below. No markdown, no commentary.

SCHEMA:
{schema}

CONTEXT (10-K excerpt):
{context}
"#
    )))
}

pub fn prompt_tone_outlook(company_name: &str, context: &str) -> String {
    let tones = MANAGEMENT_TONES.join(", ");
    with_policy(format!(
        r#"
Company: {company_name}

TASK:
1) Classify management tone as one of: {tones}.
2) Justify tone with 3 bullet points using phrases from the context.
3) Write a 2-3 sentence investor outlook summary based ONLY on the context.

CONTEXT (10-K excerpt):
{context}
"#
    ))
}

pub fn prompt_qa(company_name: &str, question: &str, context: &str) -> String {
    with_policy(format!(
        r#"
Company: {company_name}

QUESTION:
{question}

INSTRUCTIONS:
Answer using ONLY the context. If missing, respond exactly:
"{NOT_ENOUGH_INFORMATION}"

CONTEXT (10-K excerpt):
{context}
"#
    ))
}
