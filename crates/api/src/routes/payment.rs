//! Payment route handlers: gateway order creation and callback verification.
//!
//! Nothing is persisted here; the gateway is the system of record for payment
//! state in this release.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::extract::Json;
use crate::middleware::Auth;
use crate::services::razorpay::{GatewayOrder, verify_payment_signature};
use crate::state::AppState;

/// Body for order creation: the cart total in rupees.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub amount: Decimal,
}

/// Response for order creation: the gateway order plus the public key id the
/// checkout widget needs.
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    pub order: GatewayOrder,
    pub key_id: String,
}

/// Body for callback verification, field names as the gateway delivers them.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

/// Verification verdict.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub message: &'static str,
}

/// POST /api/payment/create-order
///
/// # Errors
///
/// 400 for a non-positive amount, 500 when the gateway rejects the order.
#[instrument(skip(state, _auth, body), fields(amount = %body.amount))]
pub async fn create_order(
    State(state): State<AppState>,
    _auth: Auth,
    Json(body): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>> {
    if body.amount <= Decimal::ZERO {
        return Err(AppError::BadRequest("A valid amount is required.".into()));
    }

    let order = state.razorpay().create_order(body.amount).await?;

    Ok(Json(CreateOrderResponse {
        success: true,
        order,
        key_id: state.razorpay().key_id().to_owned(),
    }))
}

/// POST /api/payment/verify
///
/// Recomputes the callback HMAC and reports the verdict. A mismatch is a 400
/// with `success: false`, not an error.
///
/// # Errors
///
/// 400 when any verification field is blank.
#[instrument(skip_all, fields(order = %body.razorpay_order_id))]
pub async fn verify(
    State(state): State<AppState>,
    _auth: Auth,
    Json(body): Json<VerifyRequest>,
) -> Result<impl IntoResponse> {
    if body.razorpay_order_id.is_empty()
        || body.razorpay_payment_id.is_empty()
        || body.razorpay_signature.is_empty()
    {
        return Err(AppError::BadRequest(
            "Payment verification details are required.".into(),
        ));
    }

    let authentic = verify_payment_signature(
        &body.razorpay_order_id,
        &body.razorpay_payment_id,
        &body.razorpay_signature,
        state.config().razorpay.key_secret.expose_secret(),
    );

    let (status, response) = if authentic {
        (
            StatusCode::OK,
            VerifyResponse {
                success: true,
                message: "Payment verified successfully.",
            },
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            VerifyResponse {
                success: false,
                message: "Payment verification failed.",
            },
        )
    };

    Ok((status, Json(response)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_request_parses_gateway_field_names() {
        let body: VerifyRequest = serde_json::from_str(
            r#"{
                "razorpay_order_id": "order_abc",
                "razorpay_payment_id": "pay_xyz",
                "razorpay_signature": "deadbeef"
            }"#,
        )
        .unwrap();
        assert_eq!(body.razorpay_order_id, "order_abc");
    }

    #[test]
    fn test_create_order_request_accepts_decimal_amounts() {
        let body: CreateOrderRequest = serde_json::from_str(r#"{"amount": "1200.50"}"#).unwrap();
        assert_eq!(body.amount, Decimal::new(120_050, 2));
    }
}
