//! PlantAI backend
//!
//! Thin HTTP relay. Accepts an uploaded plant image, forwards it with a
//! mode-specific prompt to Gemini, normalizes the free-form JSON-in-text
//! reply into a typed result and returns it. Diagnosis mode degrades to a
//! fixed heuristic result when no credential is available or the remote call
//! fails. Recognition mode has no offline substitute.

pub mod config;
pub mod error;
pub mod handlers;
pub mod heuristic;
pub mod models;
pub mod normalize;
pub mod prompt;
pub mod server;
pub mod services;
