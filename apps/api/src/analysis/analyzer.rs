//! AI Analysis Client — scores a résumé against a job description.
//!
//! Callers guarantee both texts are non-empty; length checks live in the
//! HTTP layer. A reply is accepted as long as it is a JSON object; missing
//! keys are defaulted by `AnalysisResult`.

use crate::analysis::prompts::build_analysis_prompt;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::analysis::AnalysisResult;

pub async fn analyze_resume(
    llm: &LlmClient,
    resume_text: &str,
    job_description: &str,
) -> Result<AnalysisResult, LlmError> {
    let prompt = build_analysis_prompt(resume_text, job_description);
    let reply = llm.generate_json(&prompt).await?;

    AnalysisResult::from_value(reply)
        .ok_or_else(|| LlmError::InvalidAiJson("expected a JSON object".to_string()))
}
