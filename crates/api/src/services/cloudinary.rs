//! Cloudinary image upload client.
//!
//! Performs signed uploads to the Cloudinary upload API and returns the
//! durable `secure_url` of the stored asset. Signatures are SHA-256 over the
//! sorted upload parameters plus the API secret.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::instrument;

use crate::config::CloudinaryConfig;

/// Folder all marketplace images land in.
const UPLOAD_FOLDER: &str = "mandi";

/// Errors that can occur when uploading to Cloudinary.
#[derive(Debug, Error)]
pub enum CloudinaryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code from the API.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Successful upload response, reduced to the field we keep.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Error response envelope.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Cloudinary upload client.
///
/// Cheap to clone; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct CloudinaryClient {
    inner: Arc<CloudinaryClientInner>,
}

struct CloudinaryClientInner {
    client: reqwest::Client,
    upload_url: String,
    api_key: String,
    api_secret: SecretString,
}

impl CloudinaryClient {
    /// Create a new Cloudinary client.
    #[must_use]
    pub fn new(config: &CloudinaryConfig) -> Self {
        Self {
            inner: Arc::new(CloudinaryClientInner {
                client: reqwest::Client::new(),
                upload_url: format!(
                    "https://api.cloudinary.com/v1_1/{}/image/upload",
                    config.cloud_name
                ),
                api_key: config.api_key.clone(),
                api_secret: config.api_secret.clone(),
            }),
        }
    }

    /// Upload image bytes and return the durable public URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API rejects the upload, or
    /// the response cannot be parsed.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_image(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, CloudinaryError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_upload(
            &[("folder", UPLOAD_FOLDER), ("timestamp", &timestamp)],
            self.inner.api_secret.expose_secret(),
        );

        let file = reqwest::multipart::Part::bytes(bytes)
            .file_name("upload")
            .mime_str(content_type)
            .map_err(|e| CloudinaryError::Parse(format!("invalid content type: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .text("api_key", self.inner.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", UPLOAD_FOLDER)
            .text("signature_algorithm", "sha256")
            .text("signature", signature)
            .part("file", file);

        let response = self
            .inner
            .client
            .post(&self.inner.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map_or(body, |e| e.error.message);
            return Err(CloudinaryError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| CloudinaryError::Parse(format!("Failed to parse response: {e}")))?;

        Ok(parsed.secure_url)
    }
}

/// Compute the upload signature: SHA-256 over the sorted `key=value` pairs
/// joined with `&`, with the API secret appended.
///
/// `file`, `api_key`, and `signature` itself are never part of the signed
/// string.
fn sign_upload(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.to_vec();
    sorted.sort_unstable();

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_upload_sorts_parameters() {
        let a = sign_upload(&[("timestamp", "1700000000"), ("folder", "mandi")], "s3cret");
        let b = sign_upload(&[("folder", "mandi"), ("timestamp", "1700000000")], "s3cret");
        assert_eq!(a, b);
    }

    #[test]
    fn test_sign_upload_known_value() {
        // sha256("folder=mandi&timestamp=1700000000" + "s3cret")
        let mut hasher = Sha256::new();
        hasher.update(b"folder=mandi&timestamp=1700000000s3cret");
        let expected = hex::encode(hasher.finalize());

        let got = sign_upload(&[("folder", "mandi"), ("timestamp", "1700000000")], "s3cret");
        assert_eq!(got, expected);
    }

    #[test]
    fn test_sign_upload_depends_on_secret() {
        let params = [("folder", "mandi"), ("timestamp", "1700000000")];
        assert_ne!(sign_upload(&params, "one"), sign_upload(&params, "two"));
    }

    #[test]
    fn test_error_response_parsing() {
        let json = r#"{"error": {"message": "Invalid Signature"}}"#;
        let parsed: ErrorResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(parsed.error.message, "Invalid Signature");
    }

    #[test]
    fn test_cloudinary_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CloudinaryClient>();
    }
}
