use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One stored analysis. The input texts are kept in the table but left out of
/// API responses.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    #[allow(dead_code)]
    #[serde(skip_serializing)]
    pub resume_text: String,
    #[allow(dead_code)]
    #[serde(skip_serializing)]
    pub job_description: String,
    pub overall_score: f64,
    pub skills_score: f64,
    pub experience_score: f64,
    pub education_score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub suggestions: Vec<String>,
    pub ats_tips: Vec<String>,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}
