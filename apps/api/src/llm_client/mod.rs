//! LLM Client — the single point of entry for all Gemini API calls.
//!
//! One prompt in, one JSON value out. The call is made once: there is no
//! retry, no caching and no streaming. Every failure leaves through `LlmError`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GeminiConfig;

pub mod prompts;
pub mod transport;

use transport::{ModelTransport, ReqwestTransport};

const TEMPERATURE: f64 = 0.2;
const MAX_OUTPUT_TOKENS: u32 = 8192;
const RESPONSE_MIME_TYPE: &str = "application/json";
const UNKNOWN_FINISH_REASON: &str = "UNKNOWN";

/// Failure exits of a model call, checked in this order.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("GEMINI_API_KEY not configured. Please set it in the .env file.")]
    Configuration,

    #[error("Gemini API error: {status} - {body}")]
    UpstreamHttp { status: u16, body: String },

    #[error("Gemini returned no candidates. The content may have been blocked.")]
    UpstreamEmptyResponse,

    #[error("Gemini returned empty text. Finish reason: {finish_reason}")]
    UpstreamEmptyText { finish_reason: String },

    #[error("AI returned invalid JSON. Please try again. Details: {0}")]
    InvalidAiJson(String),

    #[error("AI analysis failed: {0}")]
    AnalysisFailed(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
    response_mime_type: &'static str,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
                response_mime_type: RESPONSE_MIME_TYPE,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl Candidate {
    /// Trimmed text of the first part; empty when the part or its text is absent.
    fn first_text(&self) -> &str {
        self.content
            .as_ref()
            .and_then(|c| c.parts.as_ref())
            .and_then(|parts| parts.first())
            .and_then(|p| p.text.as_deref())
            .unwrap_or_default()
            .trim()
    }
}

/// Shared across handlers; cloning is cheap and the transport is pooled.
#[derive(Clone)]
pub struct LlmClient {
    transport: Arc<dyn ModelTransport>,
    config: GeminiConfig,
}

impl LlmClient {
    pub fn new(config: GeminiConfig) -> anyhow::Result<Self> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: GeminiConfig, transport: Arc<dyn ModelTransport>) -> Self {
        Self { transport, config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Sends `prompt` and returns the model's reply parsed as JSON.
    pub async fn generate_json(&self, prompt: &str) -> Result<serde_json::Value, LlmError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(LlmError::Configuration)?;

        let url = self.config.endpoint(api_key);
        let request = GenerateContentRequest::new(prompt);

        let raw = self
            .transport
            .post_json(&url, &request)
            .await
            .map_err(|e| LlmError::AnalysisFailed(format!("{e:#}")))?;

        if !raw.is_success() {
            return Err(LlmError::UpstreamHttp {
                status: raw.status,
                body: raw.body,
            });
        }

        let response: GenerateContentResponse = serde_json::from_str(&raw.body)
            .map_err(|e| LlmError::AnalysisFailed(format!("unreadable Gemini response: {e}")))?;

        let candidate = response
            .candidates
            .as_deref()
            .and_then(|c| c.first())
            .ok_or(LlmError::UpstreamEmptyResponse)?;

        let text = candidate.first_text();
        if text.is_empty() {
            return Err(LlmError::UpstreamEmptyText {
                finish_reason: candidate
                    .finish_reason
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_FINISH_REASON.to_string()),
            });
        }

        serde_json::from_str(strip_json_fences(text))
            .map_err(|e| LlmError::InvalidAiJson(e.to_string()))
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output: one
/// opening fence line first, then one closing fence. Backticks anywhere else
/// are left alone.
fn strip_json_fences(text: &str) -> &str {
    let Some(after_open) = text.strip_prefix("```") else {
        return text;
    };
    let after_tag = after_open.strip_prefix("json").unwrap_or(after_open);
    let body = after_tag.strip_prefix('\n').unwrap_or(after_tag);

    match body.strip_suffix("```") {
        Some(rest) => rest.strip_suffix('\n').unwrap_or(rest),
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use transport::stub::StubTransport;

    fn client_with(stub: Arc<StubTransport>) -> LlmClient {
        let config = GeminiConfig {
            api_key: Some("test-key".to_string()),
            ..GeminiConfig::default()
        };
        LlmClient::with_transport(config, stub)
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_keeps_inner_backticks() {
        let input = "```json\n{\"tip\": \"wrap code in ``` blocks\"}\n```";
        assert_eq!(
            strip_json_fences(input),
            "{\"tip\": \"wrap code in ``` blocks\"}"
        );
        let unfenced = "{\"tip\": \"ends with ```\"}";
        assert_eq!(strip_json_fences(unfenced), unfenced);
    }

    #[test]
    fn test_strip_json_fences_missing_closing_fence() {
        assert_eq!(strip_json_fences("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_request_body_matches_wire_format() {
        let body = serde_json::to_value(GenerateContentRequest::new("hello")).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{ "parts": [{ "text": "hello" }] }],
                "generationConfig": {
                    "temperature": 0.2,
                    "maxOutputTokens": 8192,
                    "responseMimeType": "application/json"
                }
            })
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_any_network_call() {
        let stub = Arc::new(StubTransport::with_candidate_text("{}"));
        let client = LlmClient::with_transport(GeminiConfig::default(), stub.clone());

        let err = client.generate_json("prompt").await.unwrap_err();

        assert!(matches!(err, LlmError::Configuration));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_posts_once_to_configured_endpoint() {
        let stub = Arc::new(StubTransport::with_candidate_text("{\"ok\": true}"));
        let client = client_with(stub.clone());

        let value = client.generate_json("score this").await.unwrap();

        assert_eq!(value, json!({ "ok": true }));
        assert_eq!(stub.calls(), 1);
        assert_eq!(
            stub.last_url().unwrap(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent?key=test-key"
        );
        assert_eq!(stub.last_prompt().unwrap(), "score this");
    }

    #[tokio::test]
    async fn test_non_2xx_carries_status_and_body() {
        let stub = Arc::new(StubTransport::replying(429, "quota exceeded"));
        let err = client_with(stub.clone()).generate_json("p").await.unwrap_err();

        match err {
            LlmError::UpstreamHttp { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "quota exceeded");
            }
            other => panic!("expected UpstreamHttp, got {other:?}"),
        }
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_candidate_list() {
        for body in [r#"{"candidates": []}"#, r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#] {
            let stub = Arc::new(StubTransport::replying(200, body));
            let err = client_with(stub).generate_json("p").await.unwrap_err();
            assert!(matches!(err, LlmError::UpstreamEmptyResponse), "{body}");
        }
    }

    #[tokio::test]
    async fn test_empty_text_reports_finish_reason() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "  "}]}, "finishReason": "SAFETY"}]}"#;
        let stub = Arc::new(StubTransport::replying(200, body));
        let err = client_with(stub).generate_json("p").await.unwrap_err();

        match err {
            LlmError::UpstreamEmptyText { finish_reason } => assert_eq!(finish_reason, "SAFETY"),
            other => panic!("expected UpstreamEmptyText, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_text_without_finish_reason_is_unknown() {
        let body = r#"{"candidates": [{"content": {}}]}"#;
        let stub = Arc::new(StubTransport::replying(200, body));
        let err = client_with(stub).generate_json("p").await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Gemini returned empty text. Finish reason: UNKNOWN"
        );
    }

    #[tokio::test]
    async fn test_fenced_reply_parses_like_bare_reply() {
        let payload = r#"{"overall_score": 72.5, "missing_skills": ["Go"]}"#;
        let fenced = format!("```json\n{payload}\n```");

        let bare = client_with(Arc::new(StubTransport::with_candidate_text(payload)))
            .generate_json("p")
            .await
            .unwrap();
        let unwrapped = client_with(Arc::new(StubTransport::with_candidate_text(&fenced)))
            .generate_json("p")
            .await
            .unwrap();

        assert_eq!(bare, unwrapped);
    }

    #[tokio::test]
    async fn test_invalid_json_reply() {
        let stub = Arc::new(StubTransport::with_candidate_text("Sure! Here is your analysis:"));
        let err = client_with(stub).generate_json("p").await.unwrap_err();

        assert!(matches!(err, LlmError::InvalidAiJson(_)));
        assert!(err.to_string().starts_with("AI returned invalid JSON"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_analysis_failed() {
        let stub = Arc::new(StubTransport::failing("operation timed out"));
        let err = client_with(stub).generate_json("p").await.unwrap_err();

        assert_eq!(err.to_string(), "AI analysis failed: operation timed out");
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_underlying_cause() {
        let stub = Arc::new(StubTransport::failing_with_cause(
            "error sending request",
            "operation timed out",
        ));
        let err = client_with(stub).generate_json("p").await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "AI analysis failed: error sending request: operation timed out"
        );
    }

    #[tokio::test]
    async fn test_unreadable_envelope_is_analysis_failed() {
        let stub = Arc::new(StubTransport::replying(200, "<html>gateway</html>"));
        let err = client_with(stub).generate_json("p").await.unwrap_err();

        assert!(matches!(err, LlmError::AnalysisFailed(_)));
    }
}
