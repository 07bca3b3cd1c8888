//! Cart route handlers.
//!
//! All endpoints require a session; every mutation responds with the full
//! resolved cart so the client never has to diff.

use axum::extract::{Path, State};
use serde::Deserialize;
use tracing::instrument;

use mandi_core::ListingId;

use crate::error::Result;
use crate::extract::Json;
use crate::middleware::Auth;
use crate::models::ResolvedCart;
use crate::services::cart::CartService;
use crate::state::AppState;

/// Body for add and update.
#[derive(Debug, Deserialize)]
pub struct CartItemRequest {
    pub listing_id: ListingId,
    pub quantity: i32,
}

/// GET /api/cart
///
/// # Errors
///
/// 401 without a session.
pub async fn get(State(state): State<AppState>, auth: Auth) -> Result<Json<ResolvedCart>> {
    let cart = CartService::new(state.pool()).get(auth.user.id).await?;
    Ok(Json(cart))
}

/// POST /api/cart/add
///
/// Adds to any existing entry for the listing; creates the cart on first use.
///
/// # Errors
///
/// 400 for a non-positive quantity, 404 when the listing does not exist.
#[instrument(skip(state, auth), fields(buyer = %auth.user.id, listing = %body.listing_id))]
pub async fn add(
    State(state): State<AppState>,
    auth: Auth,
    Json(body): Json<CartItemRequest>,
) -> Result<Json<ResolvedCart>> {
    let cart = CartService::new(state.pool())
        .add(auth.user.id, body.listing_id, body.quantity)
        .await?;
    Ok(Json(cart))
}

/// PUT /api/cart/update
///
/// Sets the entry's quantity; zero or less removes it.
///
/// # Errors
///
/// 404 when the buyer has no cart or the entry is absent.
#[instrument(skip(state, auth), fields(buyer = %auth.user.id, listing = %body.listing_id))]
pub async fn update(
    State(state): State<AppState>,
    auth: Auth,
    Json(body): Json<CartItemRequest>,
) -> Result<Json<ResolvedCart>> {
    let cart = CartService::new(state.pool())
        .update(auth.user.id, body.listing_id, body.quantity)
        .await?;
    Ok(Json(cart))
}

/// DELETE /api/cart/remove/{listing_id}
///
/// Removing a listing that was never added is a no-op.
///
/// # Errors
///
/// 404 when the buyer has no cart at all.
#[instrument(skip(state, auth), fields(buyer = %auth.user.id))]
pub async fn remove(
    State(state): State<AppState>,
    auth: Auth,
    Path(listing_id): Path<ListingId>,
) -> Result<Json<ResolvedCart>> {
    let cart = CartService::new(state.pool())
        .remove(auth.user.id, listing_id)
        .await?;
    Ok(Json(cart))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_item_request_parses() {
        let body: CartItemRequest =
            serde_json::from_str(r#"{"listing_id": 7, "quantity": 3}"#).unwrap();
        assert_eq!(body.listing_id, ListingId::new(7));
        assert_eq!(body.quantity, 3);
    }
}
