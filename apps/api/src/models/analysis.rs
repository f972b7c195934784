//! Scoring record produced by the model.
//!
//! Deserialization is deliberately forgiving: absent keys default, `null`
//! behaves like absent, and scores may arrive as numbers or numeric strings.
//! Scores are not range-checked.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    #[serde(deserialize_with = "lenient_score")]
    pub overall_score: f64,
    #[serde(deserialize_with = "lenient_score")]
    pub skills_score: f64,
    #[serde(deserialize_with = "lenient_score")]
    pub experience_score: f64,
    #[serde(deserialize_with = "lenient_score")]
    pub education_score: f64,
    #[serde(deserialize_with = "lenient_optional_text")]
    pub job_title: Option<String>,
    #[serde(deserialize_with = "lenient_optional_text")]
    pub company_name: Option<String>,
    #[serde(deserialize_with = "lenient_string_list")]
    pub matched_skills: Vec<String>,
    #[serde(deserialize_with = "lenient_string_list")]
    pub missing_skills: Vec<String>,
    #[serde(deserialize_with = "lenient_string_list")]
    pub suggestions: Vec<String>,
    #[serde(deserialize_with = "lenient_string_list")]
    pub ats_tips: Vec<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub summary: String,
}

impl AnalysisResult {
    /// Normalizes a parsed model reply. `None` when the reply is not a JSON object.
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        // Every field deserializer accepts any JSON value, so an object always converts.
        serde_json::from_value(value).ok()
    }
}

fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0.0,
    })
}

fn lenient_optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient_optional_text(deserializer)?.unwrap_or_default())
}

fn lenient_string_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        Value::String(s) => vec![s],
        _ => Vec::new(),
    })
}
