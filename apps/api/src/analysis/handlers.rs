//! Axum route handler for the analysis endpoint.

use anyhow::anyhow;
use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::analysis::analyzer::analyze_resume;
use crate::errors::AppError;
use crate::extraction::extract_text;
use crate::history::store::{insert_analysis, NewAnalysis};
use crate::models::history::AnalysisRecord;
use crate::state::AppState;

/// Shorter résumés are rejected before any model call.
pub const MIN_RESUME_CHARS: usize = 100;

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis_id: Uuid,
    pub result: AnalysisRecord,
}

/// Where the résumé text comes from.
#[derive(Debug)]
enum ResumeSource {
    File { filename: String, bytes: Bytes },
    Text(String),
}

/// Raw multipart fields of an analyze request.
#[derive(Debug, Default)]
struct AnalyzeForm {
    job_description: Option<String>,
    resume_text: Option<String>,
    resume_file: Option<(String, Bytes)>,
}

impl AnalyzeForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = AnalyzeForm::default();
        while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "job_description" => {
                    form.job_description = Some(field.text().await.map_err(invalid_form)?);
                }
                "resume_text" => {
                    form.resume_text = Some(field.text().await.map_err(invalid_form)?);
                }
                "resume" => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await.map_err(invalid_form)?;
                    form.resume_file = Some((filename, bytes));
                }
                _ => {}
            }
        }
        Ok(form)
    }

    /// Validates the form and returns the trimmed job description plus the résumé source.
    /// A file part with an empty filename counts as no file.
    fn into_inputs(self) -> Result<(String, ResumeSource), AppError> {
        let job_description = self.job_description.unwrap_or_default().trim().to_string();
        if job_description.is_empty() {
            return Err(AppError::Validation(
                "job_description is required".to_string(),
            ));
        }

        let source = match (self.resume_file, self.resume_text) {
            (Some((filename, bytes)), _) if !filename.is_empty() => {
                ResumeSource::File { filename, bytes }
            }
            (_, Some(text)) if !text.trim().is_empty() => ResumeSource::Text(text.trim().to_string()),
            _ => {
                return Err(AppError::Validation(
                    "Please upload a resume file or paste resume text".to_string(),
                ))
            }
        };

        Ok((job_description, source))
    }
}

fn invalid_form(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Invalid form data: {e}"))
}

fn ensure_complete_resume(resume_text: &str) -> Result<(), AppError> {
    if resume_text.chars().count() < MIN_RESUME_CHARS {
        return Err(AppError::Validation(
            "Resume text is too short. Please provide a complete resume.".to_string(),
        ));
    }
    Ok(())
}

/// Document parsing is CPU-bound, so it runs off the async workers.
async fn resolve_resume_text(source: ResumeSource) -> Result<String, AppError> {
    match source {
        ResumeSource::Text(text) => Ok(text),
        ResumeSource::File { filename, bytes } => {
            let text = tokio::task::spawn_blocking(move || extract_text(&bytes, &filename))
                .await
                .map_err(|e| AppError::Internal(anyhow!("Extraction task failed: {e}")))??;
            Ok(text)
        }
    }
}

/// POST /api/analyze
///
/// Multipart form: `resume` (file) or `resume_text`, plus `job_description`.
/// Scores the résumé, stores the result and returns the stored record.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let (job_description, source) = AnalyzeForm::read(multipart).await?.into_inputs()?;

    let resume_text = resolve_resume_text(source).await?;
    ensure_complete_resume(&resume_text)?;

    let result = analyze_resume(&state.llm, &resume_text, &job_description).await?;

    let record = insert_analysis(
        &state.db,
        NewAnalysis {
            resume_text: &resume_text,
            job_description: &job_description,
            result: &result,
        },
    )
    .await?;

    info!(
        "Analysis {} complete: overall_score={}",
        record.id, record.overall_score
    );

    Ok(Json(AnalyzeResponse {
        success: true,
        analysis_id: record.id,
        result: record,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(jd: Option<&str>, text: Option<&str>, file: Option<(&str, &[u8])>) -> AnalyzeForm {
        AnalyzeForm {
            job_description: jd.map(String::from),
            resume_text: text.map(String::from),
            resume_file: file.map(|(name, bytes)| (name.to_string(), Bytes::copy_from_slice(bytes))),
        }
    }

    fn validation_message(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_job_description_is_required() {
        let err = form(Some("   "), Some("resume"), None).into_inputs().unwrap_err();
        assert_eq!(validation_message(err), "job_description is required");

        let err = form(None, Some("resume"), None).into_inputs().unwrap_err();
        assert_eq!(validation_message(err), "job_description is required");
    }

    #[test]
    fn test_some_resume_is_required() {
        let err = form(Some("Engineer"), Some("  "), None).into_inputs().unwrap_err();
        assert_eq!(
            validation_message(err),
            "Please upload a resume file or paste resume text"
        );
    }

    #[test]
    fn test_file_takes_precedence_over_text() {
        let (jd, source) = form(Some(" Engineer "), Some("pasted"), Some(("cv.txt", &b"uploaded"[..])))
            .into_inputs()
            .unwrap();
        assert_eq!(jd, "Engineer");
        assert!(matches!(source, ResumeSource::File { ref filename, .. } if filename == "cv.txt"));
    }

    #[test]
    fn test_file_without_name_falls_back_to_text() {
        let (_, source) = form(Some("Engineer"), Some("  pasted  "), Some(("", &b""[..])))
            .into_inputs()
            .unwrap();
        assert!(matches!(source, ResumeSource::Text(ref t) if t == "pasted"));
    }

    #[test]
    fn test_resume_length_boundary() {
        assert!(ensure_complete_resume(&"x".repeat(99)).is_err());
        assert!(ensure_complete_resume(&"x".repeat(100)).is_ok());
        // Characters, not bytes.
        assert!(ensure_complete_resume(&"é".repeat(99)).is_err());
    }

    #[tokio::test]
    async fn test_uploaded_text_file_is_extracted() {
        let source = ResumeSource::File {
            filename: "CV.TXT".to_string(),
            bytes: Bytes::from_static(b"\n  Jane Doe, Rust engineer  \n"),
        };
        assert_eq!(
            resolve_resume_text(source).await.unwrap(),
            "Jane Doe, Rust engineer"
        );
    }

    #[tokio::test]
    async fn test_unsupported_upload_is_extraction_error() {
        let source = ResumeSource::File {
            filename: "cv.rtf".to_string(),
            bytes: Bytes::from_static(b"{\\rtf1}"),
        };
        let err = resolve_resume_text(source).await.unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }
}
