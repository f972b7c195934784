//! Row store for analyses. Newest first, ids are generated here.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::analysis::prompts::truncate_chars;
use crate::history::pagination::PageRequest;
use crate::models::analysis::AnalysisResult;
use crate::models::history::AnalysisRecord;

/// Stored copies of the input texts are capped at this many characters.
pub const STORED_TEXT_CHARS: usize = 5000;

/// A finished analysis together with the inputs that produced it.
pub struct NewAnalysis<'a> {
    pub resume_text: &'a str,
    pub job_description: &'a str,
    pub result: &'a AnalysisResult,
}

pub async fn insert_analysis(
    pool: &PgPool,
    analysis: NewAnalysis<'_>,
) -> Result<AnalysisRecord, sqlx::Error> {
    let NewAnalysis {
        resume_text,
        job_description,
        result,
    } = analysis;
    let id = Uuid::new_v4();
    let resume_text = without_nul(resume_text);
    let job_description = without_nul(job_description);

    let record = sqlx::query_as::<_, AnalysisRecord>(
        r#"
        INSERT INTO analysis_history
            (id, job_title, company_name, resume_text, job_description,
             overall_score, skills_score, experience_score, education_score,
             matched_skills, missing_skills, suggestions, ats_tips, summary)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(result.job_title.as_deref().map(without_nul))
    .bind(result.company_name.as_deref().map(without_nul))
    .bind(truncate_chars(&resume_text, STORED_TEXT_CHARS))
    .bind(truncate_chars(&job_description, STORED_TEXT_CHARS))
    .bind(result.overall_score)
    .bind(result.skills_score)
    .bind(result.experience_score)
    .bind(result.education_score)
    .bind(list_without_nul(&result.matched_skills))
    .bind(list_without_nul(&result.missing_skills))
    .bind(list_without_nul(&result.suggestions))
    .bind(list_without_nul(&result.ats_tips))
    .bind(without_nul(&result.summary))
    .fetch_one(pool)
    .await?;

    info!("Stored analysis {id}");
    Ok(record)
}

/// Postgres text columns reject U+0000, which UTF-16 uploads and model
/// output can both contain.
fn without_nul(text: &str) -> String {
    text.replace('\0', "")
}

fn list_without_nul(items: &[String]) -> Vec<String> {
    items.iter().map(|item| without_nul(item)).collect()
}

pub async fn get_analysis(pool: &PgPool, id: Uuid) -> Result<Option<AnalysisRecord>, sqlx::Error> {
    sqlx::query_as::<_, AnalysisRecord>("SELECT * FROM analysis_history WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Returns `false` when no row had that id.
pub async fn delete_analysis(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM analysis_history WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list_analyses(
    pool: &PgPool,
    page: PageRequest,
) -> Result<Vec<AnalysisRecord>, sqlx::Error> {
    sqlx::query_as::<_, AnalysisRecord>(
        "SELECT * FROM analysis_history ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
    )
    .bind(page.per_page)
    .bind(page.offset())
    .fetch_all(pool)
    .await
}

pub async fn count_analyses(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM analysis_history")
        .fetch_one(pool)
        .await
}
