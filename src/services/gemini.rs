//! Typed client for the Gemini `generateContent` endpoint.

use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("request to Gemini failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Gemini returned HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("could not decode Gemini response: {0}")]
    Decode(#[source] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "topK")]
    top_k: u32,
    #[serde(rename = "topP")]
    top_p: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

pub struct GeminiClient {
    model: String,
    url_template: String,
    client: reqwest::Client,
}

impl GeminiClient {
    /// `url_template` carries a `{model}` placeholder, substituted per call.
    pub fn new(model: String, url_template: String) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            model,
            url_template,
            client,
        })
    }

    /// Send the prompt plus inline image and return the concatenated text of
    /// the first candidate. An empty candidate list yields an empty string;
    /// the caller decides what an empty reply means.
    pub async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        mime_type: &str,
        image_bytes: &[u8],
    ) -> Result<String, GeminiError> {
        let b64 = general_purpose::STANDARD.encode(image_bytes);
        let url = self.url_template.replace("{model}", &self.model);

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: prompt.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: b64,
                        },
                    },
                ],
            }],
            // deterministic-leaning sampling
            generation_config: GenerationConfig {
                temperature: 0.1,
                top_k: 1,
                top_p: 0.8,
                max_output_tokens: 8192,
            },
        };

        log::info!(
            "🤖 Calling Gemini model {} ({} image bytes)",
            self.model,
            image_bytes.len()
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        log::debug!("📥 Gemini response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("❌ Gemini API error ({}): {}", status, body);
            return Err(GeminiError::Status { status, body });
        }

        let response_text = response.text().await?;
        let parsed: GenerateResponse =
            serde_json::from_str(&response_text).map_err(GeminiError::Decode)?;

        let text = collect_text(&parsed);
        log::debug!("📄 Gemini reply text: {} chars", text.len());
        Ok(text)
    }
}

fn collect_text(response: &GenerateResponse) -> String {
    let mut text = String::new();
    if let Some(candidate) = response.candidates.first() {
        for part in &candidate.content.parts {
            if let Some(t) = &part.text {
                text.push_str(t);
            }
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_text_concatenates_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{
                "candidates": [
                    {"content": {"parts": [{"text": "{\"disease_name\":"}, {"text": " \"Rust\"}"}]}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(collect_text(&response), "{\"disease_name\": \"Rust\"}");
    }

    #[test]
    fn test_collect_text_empty_candidates() {
        let response: GenerateResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert_eq!(collect_text(&response), "");

        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(collect_text(&response), "");
    }

    #[test]
    fn test_collect_text_skips_non_text_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"inlineData": {}}, {"text": "hello"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(collect_text(&response), "hello");
    }

    #[test]
    fn test_request_payload_shape() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: "prompt".to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/png".to_string(),
                            data: "QUJD".to_string(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: 0.1,
                top_k: 1,
                top_p: 0.8,
                max_output_tokens: 8192,
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "prompt");
        assert_eq!(
            json["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "image/png"
        );
        assert_eq!(json["generationConfig"]["topK"], 1);
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 8192);
    }
}
