//! Listing repository, including the proximity query.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use mandi_core::{GeoPoint, ListingId, ListingStatus, UserId};

use super::RepositoryError;
use crate::models::listing::{Listing, NearbyListing, NewListing};

const LISTING_COLUMNS: &str = "id, farmer_id, produce_item, quantity, unit, price, image_url, \
     status, longitude, latitude, ai_quality_assessment, ai_generated_ad, created_at";

/// Proximity query over available listings.
///
/// Distance is computed as haversine great-circle distance in SQL, so sorting
/// and the radius cut both happen in the database. `$1`/`$2` are the origin
/// longitude/latitude in degrees, `$3` the radius in metres.
const NEARBY_SQL: &str = "SELECT * FROM ( \
         SELECT l.id, l.farmer_id, l.produce_item, l.quantity, l.unit, l.price, \
                l.image_url, l.status, l.longitude, l.latitude, \
                l.ai_quality_assessment, l.ai_generated_ad, l.created_at, \
                u.name AS farmer_name, \
                6371000.0 * 2 * asin(sqrt( \
                    pow(sin(radians(l.latitude - $2) / 2), 2) \
                    + cos(radians($2)) * cos(radians(l.latitude)) \
                      * pow(sin(radians(l.longitude - $1) / 2), 2) \
                )) AS distance_meters \
         FROM listing l \
         JOIN app_user u ON u.id = l.farmer_id \
         WHERE l.status = 'available' \
     ) nearby \
     WHERE distance_meters <= $3 \
     ORDER BY distance_meters";

/// Raw listing row; shared with the cart repository's resolve join.
#[derive(sqlx::FromRow)]
pub(crate) struct ListingRow {
    id: i32,
    farmer_id: i32,
    produce_item: String,
    quantity: Decimal,
    unit: String,
    price: Decimal,
    image_url: String,
    status: String,
    longitude: f64,
    latitude: f64,
    ai_quality_assessment: Option<String>,
    ai_generated_ad: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct NearbyRow {
    #[sqlx(flatten)]
    listing: ListingRow,
    farmer_name: String,
    distance_meters: f64,
}

impl TryFrom<ListingRow> for Listing {
    type Error = RepositoryError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<ListingStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid listing status in database: {e}"))
        })?;
        let location = GeoPoint::new(row.longitude, row.latitude).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid listing location in database: {e}"))
        })?;

        Ok(Self {
            id: ListingId::new(row.id),
            farmer_id: UserId::new(row.farmer_id),
            produce_item: row.produce_item,
            quantity: row.quantity,
            unit: row.unit,
            price: row.price,
            image_url: row.image_url,
            status,
            location,
            ai_quality_assessment: row.ai_quality_assessment,
            ai_generated_ad: row.ai_generated_ad,
            created_at: row.created_at,
        })
    }
}

/// Repository for listing database operations.
pub struct ListingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ListingRepository<'a> {
    /// Create a new listing repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a confirmed listing with the owner's geolocation and
    /// status `available`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        farmer_id: UserId,
        location: GeoPoint,
        new_listing: &NewListing,
    ) -> Result<Listing, RepositoryError> {
        let row = sqlx::query_as::<_, ListingRow>(&format!(
            "INSERT INTO listing \
                 (farmer_id, produce_item, quantity, unit, price, image_url, \
                  longitude, latitude, ai_quality_assessment, ai_generated_ad) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {LISTING_COLUMNS}"
        ))
        .bind(farmer_id)
        .bind(&new_listing.produce_item)
        .bind(new_listing.quantity)
        .bind(&new_listing.unit)
        .bind(new_listing.price)
        .bind(&new_listing.image_url)
        .bind(location.longitude())
        .bind(location.latitude())
        .bind(&new_listing.ai_quality_assessment)
        .bind(&new_listing.ai_generated_ad)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Get a listing by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ListingId) -> Result<Option<Listing>, RepositoryError> {
        let row = sqlx::query_as::<_, ListingRow>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listing WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Listing::try_from).transpose()
    }

    /// All of a farmer's listings, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_owner(&self, farmer_id: UserId) -> Result<Vec<Listing>, RepositoryError> {
        let rows = sqlx::query_as::<_, ListingRow>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listing \
             WHERE farmer_id = $1 ORDER BY created_at DESC"
        ))
        .bind(farmer_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Listing::try_from).collect()
    }

    /// Available listings within `radius_meters` of `origin`, nearest first,
    /// each augmented with the owner's public name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_nearby(
        &self,
        origin: GeoPoint,
        radius_meters: f64,
    ) -> Result<Vec<NearbyListing>, RepositoryError> {
        let rows = sqlx::query_as::<_, NearbyRow>(NEARBY_SQL)
            .bind(origin.longitude())
            .bind(origin.latitude())
            .bind(radius_meters)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(NearbyListing {
                    listing: row.listing.try_into()?,
                    farmer_name: row.farmer_name,
                    distance_meters: row.distance_meters,
                })
            })
            .collect()
    }
}
