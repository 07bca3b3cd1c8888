//! Cart models.

use serde::Serialize;

use mandi_core::{CartId, UserId};

use super::listing::Listing;

/// One cart entry resolved against its live listing.
///
/// The listing details (price, availability) are whatever they are *now*;
/// no staleness check is made against the moment the entry was added.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub listing: Listing,
    pub quantity: i32,
}

/// A buyer's cart with every entry resolved.
///
/// An absent cart reads as an empty one; the cart row itself is only created
/// on the first add.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedCart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CartId>,
    pub buyer_id: UserId,
    pub items: Vec<CartItemView>,
}

impl ResolvedCart {
    /// The empty cart for a buyer who has never added anything.
    #[must_use]
    pub const fn empty(buyer_id: UserId) -> Self {
        Self {
            id: None,
            buyer_id,
            items: Vec::new(),
        }
    }
}
