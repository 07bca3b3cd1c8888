//! Razorpay orders client and payment-signature verification.
//!
//! Order creation talks to the Razorpay orders API with basic auth. Callback
//! verification is pure: an HMAC-SHA256 over `order_id|payment_id` keyed with
//! the gateway secret, hex-compared against the signature the frontend
//! received.

use std::sync::Arc;

use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use tracing::instrument;

use crate::config::RazorpayConfig;

/// Razorpay orders endpoint.
const ORDERS_URL: &str = "https://api.razorpay.com/v1/orders";

type HmacSha256 = Hmac<Sha256>;

/// Errors that can occur when talking to the payment gateway.
#[derive(Debug, Error)]
pub enum RazorpayError {
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

    /// Amount does not convert to a whole number of paise.
    #[error("amount {0} is not representable in paise")]
    InvalidAmount(Decimal),

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// An order as created at the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrder {
    /// Gateway order id, e.g. `order_EKwxwAgItmmXdp`.
    pub id: String,
    /// Amount in paise.
    pub amount: i64,
    /// ISO currency code.
    pub currency: String,
    /// Receipt reference passed at creation.
    pub receipt: String,
    /// Gateway order status, e.g. `created`.
    pub status: String,
}

#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    description: String,
}

/// Razorpay orders client.
///
/// Cheap to clone; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct RazorpayClient {
    inner: Arc<RazorpayClientInner>,
}

struct RazorpayClientInner {
    client: reqwest::Client,
    key_id: String,
    key_secret: SecretString,
}

impl RazorpayClient {
    /// Create a new Razorpay client.
    #[must_use]
    pub fn new(config: &RazorpayConfig) -> Self {
        Self {
            inner: Arc::new(RazorpayClientInner {
                client: reqwest::Client::new(),
                key_id: config.key_id.clone(),
                key_secret: config.key_secret.clone(),
            }),
        }
    }

    /// Public key id, echoed to clients so they can open the checkout widget.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.inner.key_id
    }

    /// Create an order for `amount` rupees (INR).
    ///
    /// The gateway wants the amount in paise; the receipt is stamped with the
    /// current unix time in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `RazorpayError::InvalidAmount` when the amount does not
    /// convert to a whole number of paise, and API/HTTP errors otherwise.
    #[instrument(skip(self), fields(key_id = %self.inner.key_id))]
    pub async fn create_order(&self, amount: Decimal) -> Result<GatewayOrder, RazorpayError> {
        let paise = amount * Decimal::from(100);
        if !paise.is_integer() {
            return Err(RazorpayError::InvalidAmount(amount));
        }
        let paise = paise
            .to_i64()
            .ok_or(RazorpayError::InvalidAmount(amount))?;

        let receipt = format!("receipt_order_{}", chrono::Utc::now().timestamp_millis());
        let body = CreateOrderBody {
            amount: paise,
            currency: "INR",
            receipt: &receipt,
        };

        let response = self
            .inner
            .client
            .post(ORDERS_URL)
            .basic_auth(
                &self.inner.key_id,
                Some(self.inner.key_secret.expose_secret()),
            )
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map_or(text, |e| e.error.description);
            return Err(RazorpayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| RazorpayError::Parse(format!("Failed to parse response: {e}")))
    }
}

/// Verify a payment callback signature.
///
/// The gateway signs `"{order_id}|{payment_id}"` with HMAC-SHA256 under the
/// key secret and hex-encodes the tag. Returns whether `signature` matches.
#[must_use]
pub fn verify_payment_signature(
    order_id: &str,
    payment_id: &str,
    signature: &str,
    key_secret: &str,
) -> bool {
    let Ok(mut mac) = HmacSha256::new_from_slice(key_secret.as_bytes()) else {
        return false;
    };
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());

    let computed = hex::encode(mac.finalize().into_bytes());
    computed == signature
}
