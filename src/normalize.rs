//! Turns the free-form text reply from Gemini into a typed result.
//!
//! The model is asked for JSON but nothing enforces it. Replies arrive wrapped
//! in prose or code fences, with fields missing, renamed or of the wrong type.
//! Extraction takes the substring between the first `{` and the last `}`.
//! That tolerates code fences but is fooled by stray braces in the
//! surrounding prose, a known limitation pinned by tests.

use serde_json::Value;
use thiserror::Error;

use crate::models::{DiagnosisResult, DiseaseLocation, Mode, PredictResult, RecognitionResult};

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("no JSON object found in model reply")]
    NoJsonFound,
    #[error("malformed JSON in model reply: {0}")]
    MalformedJson(#[source] serde_json::Error),
    #[error("invalid value for field: {0}")]
    InvalidField(String),
}

/// Extract and decode the JSON object embedded in `raw`.
fn extract_json(raw: &str) -> Result<Value, NormalizeError> {
    let start = raw.find('{').ok_or(NormalizeError::NoJsonFound)?;
    let end = raw.rfind('}').ok_or(NormalizeError::NoJsonFound)?;
    if end < start {
        return Err(NormalizeError::NoJsonFound);
    }
    serde_json::from_str(&raw[start..=end]).map_err(NormalizeError::MalformedJson)
}

/// Map the raw model reply onto the output shape for `mode`.
pub fn normalize(mode: Mode, raw: &str) -> Result<PredictResult, NormalizeError> {
    let value = extract_json(raw)?;
    match mode {
        Mode::Recognition => normalize_recognition(value).map(PredictResult::Recognition),
        Mode::Diagnosis => normalize_diagnosis(value).map(PredictResult::Diagnosis),
    }
}

/// Recognition fields pass through verbatim; the three identity fields are
/// required, everything else defaults via serde.
fn normalize_recognition(value: Value) -> Result<RecognitionResult, NormalizeError> {
    serde_json::from_value(value).map_err(|e| NormalizeError::InvalidField(e.to_string()))
}

fn normalize_diagnosis(value: Value) -> Result<DiagnosisResult, NormalizeError> {
    let confidence = match value.get("confidence") {
        None | Some(Value::Null) => 0.0,
        Some(v) => parse_confidence(v)?.clamp(0.0, 1.0),
    };

    // A bare string is a one-element list; anything else non-string fails.
    let suggestions = match value.get("recommendations") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| NormalizeError::InvalidField("recommendations".to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(NormalizeError::InvalidField("recommendations".to_string())),
    };
    // Legacy flattened view of the suggestion list.
    let treatment = suggestions.join(". ");

    let affected_parts = match value.get("affected_parts") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| NormalizeError::InvalidField("affected_parts".to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(NormalizeError::InvalidField("affected_parts".to_string())),
    };

    // All-or-nothing: a partial or malformed box is dropped, never a failure.
    let disease_location = value
        .get("disease_location")
        .and_then(|v| serde_json::from_value::<DiseaseLocation>(v.clone()).ok());

    Ok(DiagnosisResult {
        disease: str_field(&value, "disease_name", "Unknown"),
        confidence,
        description: str_field(&value, "analysis", ""),
        treatment,
        suggestions,
        severity: str_field(&value, "severity", "Unknown"),
        plant_type: str_field(&value, "plant_type", "Unknown"),
        affected_parts,
        causative_agent: str_field(&value, "causative_agent", "Unknown"),
        treatment_urgency: str_field(&value, "treatment_urgency", "monitoring"),
        disease_location,
    })
}

/// Coerce a confidence value to float. Numbers pass through; numeric strings
/// such as `"0.85"` are parsed. Anything else is a hard field failure.
fn parse_confidence(v: &Value) -> Result<f64, NormalizeError> {
    match v {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| NormalizeError::InvalidField("confidence".to_string())),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| NormalizeError::InvalidField("confidence".to_string())),
        _ => Err(NormalizeError::InvalidField("confidence".to_string())),
    }
}

fn str_field(value: &Value, key: &str, default: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}
