//! Process-wide configuration, read once at startup.

use std::env;

pub const DEFAULT_GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Gemini model identifier, substituted into the URL template.
    pub gemini_model: String,
    /// URL template containing a `{model}` placeholder.
    pub gemini_api_url: String,
    /// Process-wide default API key. A caller-supplied header takes precedence.
    pub gemini_api_key: Option<String>,
    /// Maximum accepted image payload in megabytes.
    pub max_image_mb: f64,
    /// CORS allow-list; a single `*` entry means any origin.
    pub allowed_origins: Vec<String>,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-pro-vision".to_string());
        let gemini_api_url =
            env::var("GEMINI_API_URL").unwrap_or_else(|_| DEFAULT_GEMINI_API_URL.to_string());
        let gemini_api_key = env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
        let max_image_mb = env::var("MAX_IMAGE_MB")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(8.0);
        let allowed_origins =
            parse_origins(&env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()));
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        Self {
            gemini_model,
            gemini_api_url,
            gemini_api_key,
            max_image_mb,
            allowed_origins,
            bind_addr,
        }
    }
}

/// Split a comma-separated origin list, trimming whitespace around entries.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_splits_and_trims() {
        let origins = parse_origins("https://a.example , https://b.example,");
        assert_eq!(origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_parse_origins_wildcard() {
        assert_eq!(parse_origins("*"), vec!["*"]);
    }
}
