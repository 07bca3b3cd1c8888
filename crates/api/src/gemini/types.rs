//! Types for the Gemini `generateContent` API.

use serde::{Deserialize, Serialize};

/// A role-tagged piece of conversation content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// "user", "model", or "system" (system instructions only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// The content parts (text and/or inline image data).
    pub parts: Vec<Part>,
}

impl Content {
    /// A user turn with a single text part.
    #[must_use]
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_owned()),
            parts: vec![Part::text(text)],
        }
    }

    /// A model turn with a single text part.
    #[must_use]
    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: Some("model".to_owned()),
            parts: vec![Part::text(text)],
        }
    }

    /// A system instruction (sent in the request's dedicated field).
    #[must_use]
    pub fn system_text(text: impl Into<String>) -> Self {
        Self {
            role: Some("system".to_owned()),
            parts: vec![Part::text(text)],
        }
    }
}

/// One part of a content block - plain text or inline media.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// Plain text.
    Text {
        text: String,
    },
    /// Base64-encoded inline media.
    InlineData {
        inline_data: InlineData,
    },
}

impl Part {
    /// Construct a text part.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Construct an inline-data part from already base64-encoded bytes.
    #[must_use]
    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }
}

/// Base64 media payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// Request body for `generateContent`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
}

/// Response from `generateContent`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Candidate {
    pub content: Content,
}

impl GenerateResponse {
    /// The first candidate's first text part, which is all this backend
    /// ever asks the model for.
    pub(crate) fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content
            .parts
            .into_iter()
            .find_map(|part| match part {
                Part::Text { text } => Some(text),
                Part::InlineData { .. } => None,
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_part_serializes_like_the_wire_format() {
        let part = Part::text("hello");
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json, serde_json::json!({"text": "hello"}));

        let part = Part::inline_data("image/jpeg", "QUJD");
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"inline_data": {"mime_type": "image/jpeg", "data": "QUJD"}})
        );
    }

    #[test]
    fn test_first_text_skips_non_text_parts() {
        let response = GenerateResponse {
            candidates: vec![Candidate {
                content: Content {
                    role: Some("model".to_owned()),
                    parts: vec![
                        Part::inline_data("image/png", "xyz"),
                        Part::text("the reply"),
                    ],
                },
            }],
        };
        assert_eq!(response.first_text().unwrap(), "the reply");
    }

    #[test]
    fn test_first_text_empty_response() {
        let response = GenerateResponse { candidates: vec![] };
        assert!(response.first_text().is_none());
    }

    #[test]
    fn test_response_parses_real_shape() {
        let raw = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "namaste"}]},
                "finishReason": "STOP"
            }]
        }"#;
        let response: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.first_text().unwrap(), "namaste");
    }
}
