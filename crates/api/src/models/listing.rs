//! Listing models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mandi_core::{GeoPoint, ListingId, ListingStatus, UserId};

/// A persisted produce listing.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub id: ListingId,
    pub farmer_id: UserId,
    pub produce_item: String,
    pub quantity: Decimal,
    pub unit: String,
    pub price: Decimal,
    pub image_url: String,
    pub status: ListingStatus,
    pub location: GeoPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_quality_assessment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_generated_ad: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A listing returned from a proximity query, augmented with the owner's
/// public name and its distance from the caller.
#[derive(Debug, Clone, Serialize)]
pub struct NearbyListing {
    #[serde(flatten)]
    pub listing: Listing,
    pub farmer_name: String,
    /// Great-circle distance from the querying buyer, in metres.
    pub distance_meters: f64,
}

/// Validated input for creating a listing (the confirmed draft).
#[derive(Debug, Clone, Deserialize)]
pub struct NewListing {
    pub produce_item: String,
    pub quantity: Decimal,
    pub unit: String,
    pub price: Decimal,
    pub image_url: String,
    #[serde(default)]
    pub ai_quality_assessment: Option<String>,
    #[serde(default)]
    pub ai_generated_ad: Option<String>,
}

/// The unpersisted output of the analysis step, returned to the farmer for
/// confirmation (and possible editing) before anything is written.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ListingDraft {
    pub produce_item: String,
    pub quantity: Decimal,
    pub unit: String,
    pub quality_assessment: String,
    pub suggested_price: Decimal,
    pub generated_ad: String,
    /// Durable public URL from the image host.
    pub image_url: String,
}
