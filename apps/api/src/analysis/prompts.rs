// Prompt construction for résumé-vs-job-description scoring.

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// Character budget for the résumé inside the prompt.
pub const RESUME_PROMPT_CHARS: usize = 3000;
/// Character budget for the job description inside the prompt.
pub const JOB_DESCRIPTION_PROMPT_CHARS: usize = 2000;

const ANALYSIS_INTRO: &str =
    "You are an ATS and career coach AI. Analyze the resume against the job description.";

/// Shape the model is asked to reproduce. The values are illustrative only.
pub const ANALYSIS_EXAMPLE_JSON: &str = r#"{
  "overall_score": 72.5,
  "skills_score": 68.0,
  "experience_score": 75.0,
  "education_score": 80.0,
  "job_title": "Software Engineer",
  "company_name": "Google",
  "matched_skills": ["Python", "SQL", "REST APIs", "Git", "Agile"],
  "missing_skills": ["Kubernetes", "Terraform", "Go", "Kafka", "AWS"],
  "suggestions": [
    "Add metrics to your project descriptions (e.g. improved performance by 40%).",
    "Include a dedicated Skills section with exact keywords from the JD.",
    "Quantify team size and scope of projects you led.",
    "Add open source contributions or GitHub links.",
    "Tailor your summary to match the specific role."
  ],
  "ats_tips": [
    "Use the exact job title from the JD in your resume header.",
    "Avoid tables and columns - ATS cannot parse them reliably.",
    "Include keywords: Kubernetes, Terraform, AWS exactly as written in the JD.",
    "Save as a plain .docx or PDF without graphics."
  ],
  "summary": "The candidate has solid Python and backend experience but lacks cloud infrastructure skills (Kubernetes, Terraform) required for this role. With targeted upskilling and resume keyword optimization, this is a strong application."
}"#;

const ANALYSIS_CLOSING: &str =
    "Analyze this resume vs JD and return a JSON in that exact structure with realistic scores.";

/// First `max_chars` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Full scoring prompt with both inputs bounded and appended verbatim.
pub fn build_analysis_prompt(resume_text: &str, job_description: &str) -> String {
    let resume = truncate_chars(resume_text, RESUME_PROMPT_CHARS);
    let job_description = truncate_chars(job_description, JOB_DESCRIPTION_PROMPT_CHARS);

    format!(
        "{ANALYSIS_INTRO}\n\n{JSON_ONLY_INSTRUCTION}\n{ANALYSIS_EXAMPLE_JSON}\n\n{ANALYSIS_CLOSING}\n\n\
         RESUME:\n{resume}\n\nJOB DESCRIPTION:\n{job_description}"
    )
}
