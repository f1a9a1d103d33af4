//! `/predict` orchestration: validate the upload, resolve a credential,
//! call Gemini, normalize the reply, degrade to the heuristic where allowed.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::error::ApiError;
use crate::heuristic::heuristic_diagnosis;
use crate::models::{Mode, PredictResponse, PredictResult};
use crate::normalize::normalize;
use crate::prompt::build_prompt;
use crate::server::AppState;

/// Caller-supplied credential; takes precedence over the configured default.
pub const API_KEY_HEADER: &str = "x-gemini-api-key";

const ALLOWED_IMAGE_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

pub async fn predict(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<PredictResponse>, ApiError> {
    let mut image: Option<(Vec<u8>, String)> = None;
    let mut mode = Mode::Diagnosis;
    let mut language = "en".to_string();

    let max_image_mb = state.config.max_image_mb;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e, "Malformed multipart body", max_image_mb))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "image" => {
                let content_type = field.content_type().unwrap_or("").to_string();
                let data = field.bytes().await.map_err(|e| {
                    multipart_error(&e, "Failed to read image field", max_image_mb)
                })?;
                image = Some((data.to_vec(), content_type));
            }
            "mode" => {
                if let Ok(text) = field.text().await {
                    mode = Mode::from_string(&text).unwrap_or(Mode::Diagnosis);
                }
            }
            "language" => {
                if let Ok(text) = field.text().await {
                    language = text;
                }
            }
            _ => {}
        }
    }

    let (content, content_type) =
        image.ok_or_else(|| ApiError::bad_request("Image file is required."))?;

    if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
        return Err(ApiError::bad_request(
            "Unsupported image type. Use JPEG or PNG.",
        ));
    }

    if content.len() as f64 / (1024.0 * 1024.0) > state.config.max_image_mb {
        return Err(ApiError::payload_too_large(format!(
            "Image too large. Max {} MB",
            state.config.max_image_mb
        )));
    }

    // Confirm the payload actually decodes as an image before spending a
    // remote call on it.
    image::load_from_memory(&content).map_err(|_| ApiError::bad_request("Invalid image file"))?;

    let t0 = Instant::now();

    let api_key = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .or_else(|| state.config.gemini_api_key.clone());

    let Some(api_key) = api_key else {
        return match mode {
            Mode::Recognition => Err(ApiError::bad_request(
                "API key is required for plant recognition.",
            )),
            Mode::Diagnosis => {
                log::info!("ℹ️ No API key available, using heuristic diagnosis");
                Ok(Json(fallback_response(t0)))
            }
        };
    };

    log::info!("📸 Predict request: mode={}, language={}", mode, language);

    let prompt = build_prompt(mode, &language);
    match state
        .gemini
        .generate(&api_key, &prompt, &content_type, &content)
        .await
    {
        Ok(text) => match normalize(mode, &text) {
            Ok(result) => {
                return Ok(Json(response(result, t0)));
            }
            Err(e) => {
                log::warn!("⚠️ Could not normalize Gemini reply: {}", e);
                if mode == Mode::Recognition {
                    return Err(ApiError::internal("Could not parse recognition data."));
                }
            }
        },
        Err(e) => {
            log::error!("❌ Gemini call failed: {}", e);
            if mode == Mode::Recognition {
                return Err(ApiError::bad_gateway("Recognition service failed."));
            }
        }
    }

    // Diagnosis mode degrades to the fixed heuristic on any upstream or
    // normalization failure.
    log::warn!("⚠️ Falling back to heuristic diagnosis");
    Ok(Json(fallback_response(t0)))
}

fn response(result: PredictResult, t0: Instant) -> PredictResponse {
    PredictResponse {
        id: request_id(),
        inference_ms: t0.elapsed().as_millis() as i64,
        result,
    }
}

fn fallback_response(t0: Instant) -> PredictResponse {
    response(PredictResult::Diagnosis(heuristic_diagnosis()), t0)
}

fn request_id() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

/// A body hitting the outer length limit is still a size rejection, not a
/// malformed upload.
fn multipart_error(e: &MultipartError, detail: &str, max_image_mb: f64) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large(format!("Image too large. Max {} MB", max_image_mb))
    } else {
        ApiError::bad_request(detail)
    }
}
