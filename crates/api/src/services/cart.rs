//! Cart service.
//!
//! One cart per buyer, created lazily on the first add and never deleted.
//! Quantity merges happen inside the database so concurrent adds from the
//! same buyer cannot lose updates.

use axum::http::StatusCode;
use sqlx::PgPool;
use thiserror::Error;

use mandi_core::{ListingId, UserId};

use crate::db::{CartRepository, ListingRepository, RepositoryError};
use crate::models::ResolvedCart;

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity must be a positive integer.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The listing being added does not exist.
    #[error("listing {0} not found")]
    ListingNotFound(ListingId),

    /// The buyer has no cart yet.
    #[error("cart not found")]
    CartNotFound,

    /// The cart holds no entry for this listing.
    #[error("cart has no entry for listing {0}")]
    EntryNotFound(ListingId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl CartError {
    /// HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidQuantity => StatusCode::BAD_REQUEST,
            Self::ListingNotFound(_) | Self::CartNotFound | Self::EntryNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::InvalidQuantity => "Quantity must be at least 1.".to_owned(),
            Self::ListingNotFound(_) => "Listing not found.".to_owned(),
            Self::CartNotFound => "Cart not found.".to_owned(),
            Self::EntryNotFound(_) => "Item not found in cart.".to_owned(),
            Self::Repository(_) => "Internal server error".to_owned(),
        }
    }
}

/// Cart service.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
    listings: ListingRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
            listings: ListingRepository::new(pool),
        }
    }

    /// The buyer's resolved cart. A buyer with no cart reads as empty.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` on database failure.
    pub async fn get(&self, buyer_id: UserId) -> Result<ResolvedCart, CartError> {
        Ok(self.carts.resolve(buyer_id).await?)
    }

    /// Add `quantity` of a listing, merging with any existing entry.
    ///
    /// Creates the buyer's cart if this is their first add.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for non-positive quantities and
    /// `CartError::ListingNotFound` when the listing does not exist.
    pub async fn add(
        &self,
        buyer_id: UserId,
        listing_id: ListingId,
        quantity: i32,
    ) -> Result<ResolvedCart, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }
        if self.listings.get_by_id(listing_id).await?.is_none() {
            return Err(CartError::ListingNotFound(listing_id));
        }

        let cart_id = self.carts.ensure_cart(buyer_id).await?;
        self.carts.upsert_item(cart_id, listing_id, quantity).await?;

        self.get(buyer_id).await
    }

    /// Set an entry's quantity. A quantity of zero or less removes the entry.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CartNotFound` when the buyer has no cart and
    /// `CartError::EntryNotFound` when the cart holds no such entry.
    pub async fn update(
        &self,
        buyer_id: UserId,
        listing_id: ListingId,
        quantity: i32,
    ) -> Result<ResolvedCart, CartError> {
        let cart_id = self
            .carts
            .find_cart_id(buyer_id)
            .await?
            .ok_or(CartError::CartNotFound)?;

        let touched = if quantity > 0 {
            self.carts
                .set_item_quantity(cart_id, listing_id, quantity)
                .await?
        } else {
            self.carts.delete_item(cart_id, listing_id).await?
        };
        if !touched {
            return Err(CartError::EntryNotFound(listing_id));
        }

        self.get(buyer_id).await
    }

    /// Remove an entry. Removing a listing that is not in the cart is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CartNotFound` when the buyer has no cart.
    pub async fn remove(
        &self,
        buyer_id: UserId,
        listing_id: ListingId,
    ) -> Result<ResolvedCart, CartError> {
        let cart_id = self
            .carts
            .find_cart_id(buyer_id)
            .await?
            .ok_or(CartError::CartNotFound)?;

        self.carts.delete_item(cart_id, listing_id).await?;

        self.get(buyer_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(CartError::InvalidQuantity.status(), StatusCode::BAD_REQUEST);
        assert_eq!(CartError::CartNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            CartError::EntryNotFound(ListingId::from(3)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CartError::ListingNotFound(ListingId::from(3)).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_messages_do_not_leak_internal_detail() {
        let err = CartError::Repository(RepositoryError::DataCorruption("bad row".into()));
        assert_eq!(err.message(), "Internal server error");
    }
}
