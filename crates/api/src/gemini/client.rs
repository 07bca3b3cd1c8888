//! Gemini API client for content generation.
//!
//! Wraps the `generateContent` endpoint of the Google Generative Language API.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::config::GeminiConfig;

use super::error::{ApiErrorResponse, GeminiError};
use super::types::{Content, GenerateRequest, GenerateResponse};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini API client.
///
/// Cheap to clone; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be constructed.
    #[must_use]
    pub fn new(config: &GeminiConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(GeminiClientInner {
                client,
                api_key: config.api_key.clone(),
                model: config.model.clone(),
            }),
        }
    }

    /// Send a generation request and return the first candidate's text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API rejects it, or the
    /// response carries no text.
    #[instrument(skip(self, contents, system_instruction), fields(model = %self.inner.model))]
    pub async fn generate(
        &self,
        contents: Vec<Content>,
        system_instruction: Option<Content>,
    ) -> Result<String, GeminiError> {
        let request = GenerateRequest {
            contents,
            system_instruction,
        };

        let url = format!(
            "{GEMINI_API_BASE}/{}:generateContent?key={}",
            self.inner.model,
            self.inner.api_key.expose_secret()
        );

        let response = self.inner.client.post(url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(handle_error_status(status, response).await);
        }

        let body = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| GeminiError::Parse(format!("Failed to parse response: {e}")))?;

        parsed.first_text().ok_or(GeminiError::EmptyResponse)
    }
}

/// Turn a non-success response into a `GeminiError`.
async fn handle_error_status(
    status: reqwest::StatusCode,
    response: reqwest::Response,
) -> GeminiError {
    match response.text().await {
        Ok(body) => {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map_or(body, |api_error| api_error.error.message);
            GeminiError::Api {
                status: status.as_u16(),
                message,
            }
        }
        Err(e) => GeminiError::Http(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_client_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<GeminiClient>();
    }

    #[test]
    fn test_gemini_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GeminiClient>();
    }
}
