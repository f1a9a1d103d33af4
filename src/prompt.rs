//! Prompt construction for the Gemini call.
//!
//! Pure functions of (mode, language). The model is asked to reply with the
//! example JSON shape but nothing guarantees it will, so the normalizer
//! treats every field as optional.

use serde_json::json;

use crate::models::Mode;

/// Localized "respond in X" phrase for the closed set of supported codes.
/// Unrecognized codes fall back to English.
pub fn language_instruction(code: &str) -> &'static str {
    match code {
        "en" => "Respond in English",
        "ru" => "Отвечай на русском",
        "hi" => "हिंदी में उत्तर दें",
        "ta" => "தமிழில் பதிலளிக்கவும்",
        "ml" => "മലയാളത്തിൽ മറുപടി നൽകുക",
        _ => "Respond in English",
    }
}

/// The emphasized language token: last word of the instruction phrase, uppercased.
fn language_token(instruction: &str) -> String {
    instruction
        .split_whitespace()
        .last()
        .unwrap_or("English")
        .to_uppercase()
}

/// Example reply shape for recognition mode, embedded verbatim in the prompt.
pub fn recognition_example() -> serde_json::Value {
    json!({
        "plant_name": "Snake plant",
        "tags": ["Air-purifying", "Trendy", "Easy", "Medium", "Pet-toxic"],
        "genus": "Dracaena",
        "scientific_name": "Dracaena trifasciata",
        "common_names": ["Saint George's sword", "mother-in-law's tongue", "viper's bowstring hemp"],
        "description": "Dracaena trifasciata (Sansevieria trifasciata), also known as the snake plant or mother-in-law's tongue, is the sturdiest plant. It can tolerate anything from harsh weather to caring mistakes.",
        "watering": "Once in 2 weeks",
        "temperature": "21°C-32°C",
        "sunlight": "Part shade",
        "soil": {
            "type": "Sand",
            "drainage": "Well-drained",
            "ph": "7.5 pH - 8.5 pH"
        },
        "pests_and_diseases": {
            "pests": ["Mealybugs", "spider mites"],
            "disease": ["Race rot"]
        },
        "humidity": "40-60%\nAvoid decreasing humidity",
        "fertilizing": "Feed with a cactus fertilizer diluted to half its strength\nDon't fertilize during winter",
        "repotting": "Once a year"
    })
}

/// Example reply shape for diagnosis mode, embedded verbatim in the prompt.
pub fn diagnosis_example() -> serde_json::Value {
    json!({
        "disease_name": "specific disease name with scientific classification or 'Healthy Plant' in the target language",
        "confidence": 0.85,
        "analysis": "comprehensive explanation including symptoms observed, affected plant parts, disease progression stage, and reasoning for diagnosis in the target language",
        "recommendations": [
            "immediate treatment steps in target language",
            "preventive measures in target language",
            "monitoring guidelines in target language",
            "environmental modifications in target language",
            "follow-up actions in target language"
        ],
        "severity": "Low/Moderate/High/Critical in target language",
        "plant_type": "identified plant species or family if determinable in target language",
        "affected_parts": ["leaves", "stems", "roots", "flowers", "fruits"],
        "causative_agent": "fungal/bacterial/viral/nutritional/environmental/pest in target language",
        "treatment_urgency": "immediate/within_week/routine_care/monitoring in target language",
        "disease_location": { "x": 120, "y": 250, "width": 80, "height": 100 }
    })
}

/// Build the instruction text sent alongside the image.
pub fn build_prompt(mode: Mode, language: &str) -> String {
    let instruction = language_instruction(language);
    let token = language_token(instruction);

    match mode {
        Mode::Recognition => {
            let example = serde_json::to_string_pretty(&recognition_example())
                .unwrap_or_default();
            format!(
                "As an expert botanist, your task is to identify the plant in the image and provide a detailed description.\n\
                 \n\
                 Follow this structure for your response, providing all information in the specified language: {instruction}.\n\
                 \n\
                 Respond in this exact JSON format:\n\
                 {example}\n\
                 \n\
                 Ensure all text, including tags and descriptions, is in {token}."
            )
        }
        Mode::Diagnosis => {
            let example = serde_json::to_string_pretty(&diagnosis_example())
                .unwrap_or_default();
            format!(
                "You are an expert plant pathologist with advanced knowledge in agricultural sciences, botany, and plant disease diagnosis. Analyze this plant image with the precision of a professional laboratory assessment.\n\
                 \n\
                 ANALYSIS FRAMEWORK:\n\
                 1. VISUAL EXAMINATION: Examine leaf morphology, coloration patterns, lesion characteristics, growth abnormalities, and environmental stress indicators\n\
                 2. SYMPTOM IDENTIFICATION: Identify primary and secondary symptoms including chlorosis, necrosis, wilting, stunting, distortion, and pathogen signs\n\
                 3. DIFFERENTIAL DIAGNOSIS: Consider multiple potential causes including fungal, bacterial, viral, nutritional, environmental, and pest-related factors\n\
                 4. CONFIDENCE ASSESSMENT: Base confidence on symptom clarity, image quality, diagnostic specificity, and elimination of alternative causes\n\
                 \n\
                 DIAGNOSTIC CRITERIA:\n\
                 - Fungal diseases: Look for spores, mycelium, fruiting bodies, characteristic lesion patterns\n\
                 - Bacterial diseases: Check for water-soaked lesions, bacterial ooze, systemic symptoms\n\
                 - Viral diseases: Examine for mosaic patterns, ring spots, yellowing, stunting\n\
                 - Nutritional deficiencies: Assess chlorosis patterns, leaf positioning, uniform vs. localized symptoms\n\
                 - Environmental stress: Consider light conditions, water stress, temperature damage\n\
                 - Pest damage: Look for feeding patterns, egg masses, insect presence\n\
                 \n\
                 CRITICAL: {instruction}.\n\
                 \n\
                 ALL FIELDS INCLUDING DISEASE NAMES, DESCRIPTIONS, RECOMMENDATIONS, AND TECHNICAL TERMS MUST BE IN THE SPECIFIED LANGUAGE.\n\
                 \n\
                 IMAGE COORDINATE SYSTEM: The top-left corner is (0, 0). The bottom-right corner is (width, height). Provide coordinates for a single bounding box that encloses the most representative symptom.\n\
                 \n\
                 Respond in this exact JSON format with all content in the specified language:\n\
                 {example}\n\
                 \n\
                 CONFIDENCE SCORING:\n\
                 - 0.9-1.0: Clear, unambiguous symptoms with high diagnostic certainty\n\
                 - 0.7-0.89: Strong evidence with minor uncertainty or image limitations\n\
                 - 0.5-0.69: Moderate confidence with some differential diagnosis needed\n\
                 - 0.3-0.49: Low confidence due to early symptoms or image quality issues\n\
                 - 0.1-0.29: Very uncertain, requires additional examination\n\
                 \n\
                 Be scientifically accurate and provide actionable, safe recommendations. If multiple conditions are possible, mention the most likely primary diagnosis. Remember: ALL TEXT MUST BE IN {token}."
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_instruction_fallback() {
        assert_eq!(language_instruction("en"), "Respond in English");
        assert_eq!(language_instruction("ru"), "Отвечай на русском");
        assert_eq!(language_instruction("xx"), "Respond in English");
        assert_eq!(language_instruction(""), "Respond in English");
    }

    #[test]
    fn test_language_token_uppercases_last_word() {
        assert_eq!(language_token("Respond in English"), "ENGLISH");
        assert_eq!(language_token("Отвечай на русском"), "РУССКОМ");
    }

    #[test]
    fn test_recognition_prompt_content() {
        let prompt = build_prompt(Mode::Recognition, "en");
        assert!(prompt.contains("expert botanist"));
        assert!(prompt.contains("\"plant_name\""));
        assert!(prompt.contains("\"scientific_name\""));
        assert!(prompt.contains("Respond in English"));
        assert!(prompt.contains("ENGLISH"));
    }

    #[test]
    fn test_diagnosis_prompt_content() {
        let prompt = build_prompt(Mode::Diagnosis, "ru");
        assert!(prompt.contains("plant pathologist"));
        assert!(prompt.contains("\"disease_name\""));
        assert!(prompt.contains("\"disease_location\""));
        // bounding box convention must be spelled out
        assert!(prompt.contains("top-left corner is (0, 0)"));
        assert!(prompt.contains("Отвечай на русском"));
        assert!(prompt.contains("РУССКОМ"));
    }

    #[test]
    fn test_unknown_language_uses_english_prompt() {
        let prompt = build_prompt(Mode::Diagnosis, "tlh");
        assert!(prompt.contains("Respond in English"));
        assert!(prompt.contains("ENGLISH"));
    }

    #[test]
    fn test_examples_are_valid_json_shapes() {
        let rec = recognition_example();
        assert!(rec.get("plant_name").is_some());
        assert!(rec["soil"].get("type").is_some());

        let diag = diagnosis_example();
        assert!(diag.get("disease_name").is_some());
        assert_eq!(diag["disease_location"]["x"], 120);
    }
}
