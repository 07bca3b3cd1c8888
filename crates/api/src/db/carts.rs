//! Cart repository.
//!
//! Cart mutations are single SQL statements so that two concurrent requests
//! for the same buyer cannot lose an update: the `(cart_id, listing_id)`
//! unique constraint plus `ON CONFLICT` upserts make the quantity merge
//! atomic in the database.

use sqlx::PgPool;

use mandi_core::{CartId, ListingId, UserId};

use super::RepositoryError;
use crate::models::cart::{CartItemView, ResolvedCart};
use crate::models::listing::Listing;

#[derive(sqlx::FromRow)]
struct ItemRow {
    #[sqlx(flatten)]
    listing: super::listings::ListingRow,
    item_quantity: i32,
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The buyer's cart ID, if a cart has ever been created for them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_cart_id(&self, buyer_id: UserId) -> Result<Option<CartId>, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>("SELECT id FROM cart WHERE buyer_id = $1")
            .bind(buyer_id)
            .fetch_optional(self.pool)
            .await?;

        Ok(id.map(CartId::new))
    }

    /// Get or lazily create the buyer's cart, returning its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn ensure_cart(&self, buyer_id: UserId) -> Result<CartId, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO cart (buyer_id) VALUES ($1) \
             ON CONFLICT (buyer_id) DO UPDATE SET updated_at = now() \
             RETURNING id",
        )
        .bind(buyer_id)
        .fetch_one(self.pool)
        .await?;

        Ok(CartId::new(id))
    }

    /// Add `quantity` of a listing, merging into an existing entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn upsert_item(
        &self,
        cart_id: CartId,
        listing_id: ListingId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO cart_item (cart_id, listing_id, quantity) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (cart_id, listing_id) \
             DO UPDATE SET quantity = cart_item.quantity + EXCLUDED.quantity",
        )
        .bind(cart_id)
        .bind(listing_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Set an entry's quantity. Returns false if the entry does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn set_item_quantity(
        &self,
        cart_id: CartId,
        listing_id: ListingId,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE cart_item SET quantity = $3 WHERE cart_id = $1 AND listing_id = $2",
        )
        .bind(cart_id)
        .bind(listing_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an entry. Returns false if the entry did not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn delete_item(
        &self,
        cart_id: CartId,
        listing_id: ListingId,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM cart_item WHERE cart_id = $1 AND listing_id = $2")
                .bind(cart_id)
                .bind(listing_id)
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// The buyer's cart with each entry resolved to its live listing.
    ///
    /// An absent cart resolves to an empty one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn resolve(&self, buyer_id: UserId) -> Result<ResolvedCart, RepositoryError> {
        let Some(cart_id) = self.find_cart_id(buyer_id).await? else {
            return Ok(ResolvedCart::empty(buyer_id));
        };

        let rows = sqlx::query_as::<_, ItemRow>(
            "SELECT l.id, l.farmer_id, l.produce_item, l.quantity, l.unit, l.price, \
                    l.image_url, l.status, l.longitude, l.latitude, \
                    l.ai_quality_assessment, l.ai_generated_ad, l.created_at, \
                    ci.quantity AS item_quantity \
             FROM cart_item ci \
             JOIN listing l ON l.id = ci.listing_id \
             WHERE ci.cart_id = $1 \
             ORDER BY ci.id",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(|row| {
                Ok(CartItemView {
                    listing: Listing::try_from(row.listing)?,
                    quantity: row.item_quantity,
                })
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        Ok(ResolvedCart {
            id: Some(cart_id),
            buyer_id,
            items,
        })
    }
}
