//! Offline stand-in for diagnosis mode.
//!
//! Returned whenever the remote service is unavailable, no credential exists
//! or the reply cannot be normalized. The values are fixed and do not depend
//! on the image, so the response signals degraded service rather than a real
//! analysis. Recognition mode has no offline substitute.

use crate::models::DiagnosisResult;

pub fn heuristic_diagnosis() -> DiagnosisResult {
    DiagnosisResult {
        disease: "Fungal Leaf Spot".to_string(),
        confidence: 0.75,
        description: "Heuristic analysis. Provide API key for full analysis.".to_string(),
        treatment: "Consult a specialist.".to_string(),
        suggestions: vec![
            "Remove affected leaves".to_string(),
            "Improve air circulation".to_string(),
        ],
        severity: "Moderate".to_string(),
        plant_type: "Unknown".to_string(),
        affected_parts: vec!["leaves".to_string()],
        causative_agent: "Unknown".to_string(),
        treatment_urgency: "monitoring".to_string(),
        disease_location: None,
    }
}
