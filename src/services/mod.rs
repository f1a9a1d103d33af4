pub mod gemini; // Gemini generateContent client

pub use gemini::{GeminiClient, GeminiError};
