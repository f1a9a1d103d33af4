use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Request mode: species identification or disease diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Recognition,
    Diagnosis,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Mode::Recognition => "recognition",
            Mode::Diagnosis => "diagnosis",
        };
        write!(f, "{}", s)
    }
}

impl Mode {
    pub fn from_string(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "recognition" => Some(Mode::Recognition),
            "diagnosis" => Some(Mode::Diagnosis),
            _ => None,
        }
    }
}

/// Bounding box in image pixel coordinates, origin at the top-left corner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseLocation {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Soil {
    #[serde(rename = "type")]
    pub soil_type: String,
    pub drainage: String,
    pub ph: String,
}

/// Identified plant species with care information.
///
/// `plant_name`, `genus` and `scientific_name` are required in the model reply;
/// everything else defaults when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub plant_name: String,
    pub genus: String,
    pub scientific_name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub common_names: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub watering: String,
    #[serde(default)]
    pub temperature: String,
    #[serde(default)]
    pub sunlight: String,
    pub soil: Option<Soil>,
    #[serde(default)]
    pub pests_and_diseases: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub humidity: String,
    #[serde(default)]
    pub fertilizing: String,
    #[serde(default)]
    pub repotting: String,
}

/// Detected disease/condition, its location and treatment guidance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub disease: String,
    pub confidence: f64,
    pub description: String,
    pub treatment: String,
    pub suggestions: Vec<String>,
    pub severity: String,
    pub plant_type: String,
    pub affected_parts: Vec<String>,
    pub causative_agent: String,
    pub treatment_urgency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disease_location: Option<DiseaseLocation>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PredictResult {
    Recognition(RecognitionResult),
    Diagnosis(DiagnosisResult),
}

/// Response envelope for `/predict`.
///
/// `id` is a millisecond timestamp token (uniqueness not guaranteed beyond
/// millisecond resolution); `inference_ms` is the wall-clock duration of the
/// remote call as measured by the handler.
#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub id: String,
    pub inference_ms: i64,
    #[serde(flatten)]
    pub result: PredictResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_string() {
        assert_eq!(Mode::from_string("recognition"), Some(Mode::Recognition));
        assert_eq!(Mode::from_string("Diagnosis"), Some(Mode::Diagnosis));
        assert_eq!(Mode::from_string(" diagnosis "), Some(Mode::Diagnosis));
        assert_eq!(Mode::from_string("segmentation"), None);
    }

    #[test]
    fn test_predict_response_flattens_diagnosis_fields() {
        let response = PredictResponse {
            id: "1700000000000".to_string(),
            inference_ms: 42,
            result: PredictResult::Diagnosis(DiagnosisResult {
                disease: "Powdery Mildew".to_string(),
                confidence: 0.9,
                description: "White coating on leaves".to_string(),
                treatment: "Apply fungicide".to_string(),
                suggestions: vec!["Apply fungicide".to_string()],
                severity: "Moderate".to_string(),
                plant_type: "Rose".to_string(),
                affected_parts: vec!["leaves".to_string()],
                causative_agent: "fungal".to_string(),
                treatment_urgency: "within_week".to_string(),
                disease_location: None,
            }),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["id"], "1700000000000");
        assert_eq!(json["inference_ms"], 42);
        assert_eq!(json["disease"], "Powdery Mildew");
        // An absent box is omitted entirely, not serialized as null
        assert!(json.get("disease_location").is_none());
    }

    #[test]
    fn test_predict_response_flattens_recognition_fields() {
        let response = PredictResponse {
            id: "1".to_string(),
            inference_ms: 5,
            result: PredictResult::Recognition(RecognitionResult {
                plant_name: "Snake plant".to_string(),
                genus: "Dracaena".to_string(),
                scientific_name: "Dracaena trifasciata".to_string(),
                tags: vec![],
                common_names: vec![],
                description: String::new(),
                watering: String::new(),
                temperature: String::new(),
                sunlight: String::new(),
                soil: None,
                pests_and_diseases: HashMap::new(),
                humidity: String::new(),
                fertilizing: String::new(),
                repotting: String::new(),
            }),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["plant_name"], "Snake plant");
        assert_eq!(json["scientific_name"], "Dracaena trifasciata");
        assert!(json.get("disease").is_none());
    }

    #[test]
    fn test_soil_type_field_renamed() {
        let soil: Soil = serde_json::from_str(
            r#"{"type": "Sand", "drainage": "Well-drained", "ph": "7.5 pH - 8.5 pH"}"#,
        )
        .unwrap();
        assert_eq!(soil.soil_type, "Sand");
        let back = serde_json::to_value(&soil).unwrap();
        assert_eq!(back["type"], "Sand");
    }
}
