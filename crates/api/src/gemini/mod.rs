//! Gemini API client for produce analysis and chat.
//!
//! Thin typed wrapper over the `generateContent` endpoint; the analysis and
//! assistant services build the actual prompts.

mod client;
mod error;
mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
pub use types::{Content, Part};
