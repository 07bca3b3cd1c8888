//! Listing route handlers: create, my-listings, nearby, and AI analysis.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::db::ListingRepository;
use crate::error::{AppError, Result};
use crate::extract::Json;
use crate::middleware::{Auth, FarmerOnly};
use crate::models::{Listing, ListingDraft, NearbyListing, NewListing};
use crate::services::analysis::{AnalysisService, ImageUpload};
use crate::state::AppState;

/// Fixed discovery radius: 150 km.
const NEARBY_RADIUS_METERS: f64 = 150_000.0;

/// POST /api/listings
///
/// Persists a confirmed (possibly edited) draft as an available listing at
/// the farmer's registered location.
///
/// # Errors
///
/// 400 naming the first missing field, 403 for non-farmers.
#[instrument(skip(state, auth, body), fields(farmer = %auth.user.id))]
pub async fn create(
    State(state): State<AppState>,
    auth: Auth<FarmerOnly>,
    Json(mut body): Json<NewListing>,
) -> Result<impl IntoResponse> {
    validate_new_listing(&body)?;
    body.produce_item = body.produce_item.trim().to_lowercase();
    body.unit = body.unit.trim().to_lowercase();

    let listing = ListingRepository::new(state.pool())
        .create(auth.user.id, auth.user.location, &body)
        .await?;

    Ok((StatusCode::CREATED, Json(listing)))
}

/// GET /api/listings/my-listings
///
/// The calling farmer's listings, newest first.
///
/// # Errors
///
/// 401 without a session, 403 for non-farmers.
pub async fn my_listings(
    State(state): State<AppState>,
    auth: Auth<FarmerOnly>,
) -> Result<Json<Vec<Listing>>> {
    let listings = ListingRepository::new(state.pool())
        .list_by_owner(auth.user.id)
        .await?;
    Ok(Json(listings))
}

/// GET /api/listings/nearby
///
/// Available listings within 150 km of the caller's registered location,
/// nearest first, each carrying the farmer's name and its distance.
///
/// # Errors
///
/// 401 without a session.
pub async fn nearby(
    State(state): State<AppState>,
    auth: Auth,
) -> Result<Json<Vec<NearbyListing>>> {
    let listings = ListingRepository::new(state.pool())
        .find_nearby(auth.user.location, NEARBY_RADIUS_METERS)
        .await?;
    Ok(Json(listings))
}

/// POST /api/listings/analyze
///
/// Multipart: a `text` part (the farmer's description) and an `image` part.
/// Returns an unpersisted draft for the farmer to confirm or edit.
///
/// # Errors
///
/// 400 when either part is missing, 500 when the image host or the model
/// fails (the farmer simply retries).
#[instrument(skip(state, auth, multipart), fields(farmer = %auth.user.id))]
pub async fn analyze(
    State(state): State<AppState>,
    auth: Auth<FarmerOnly>,
    mut multipart: Multipart,
) -> Result<Json<ListingDraft>> {
    let mut text: Option<String> = None;
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("text") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Unreadable text part: {e}")))?;
                text = Some(value);
            }
            Some("image") => {
                let content_type = field
                    .content_type()
                    .unwrap_or("image/jpeg")
                    .to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Unreadable image part: {e}")))?;
                image = Some(ImageUpload {
                    bytes: bytes.to_vec(),
                    content_type,
                });
            }
            _ => {}
        }
    }

    let text = text.filter(|t| !t.trim().is_empty());
    let (Some(text), Some(image)) = (text, image) else {
        return Err(AppError::BadRequest(
            "Description text and an image are required.".into(),
        ));
    };

    let analysis = AnalysisService::new(state.gemini(), state.cloudinary());
    let draft = analysis.analyze(&text, image, auth.user.location).await?;

    Ok(Json(draft))
}

/// Reject a draft with the first missing field named, matching what the
/// confirmation form shows the farmer.
fn validate_new_listing(body: &NewListing) -> Result<()> {
    if body.produce_item.trim().is_empty() {
        return Err(AppError::BadRequest("Produce item is missing.".into()));
    }
    if body.quantity <= Decimal::ZERO {
        return Err(AppError::BadRequest("Quantity is missing.".into()));
    }
    if body.unit.trim().is_empty() {
        return Err(AppError::BadRequest("Unit is missing.".into()));
    }
    if body.price <= Decimal::ZERO {
        return Err(AppError::BadRequest("Price is missing.".into()));
    }
    if body.image_url.trim().is_empty() {
        return Err(AppError::BadRequest("Image URL is missing.".into()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft() -> NewListing {
        serde_json::from_str(
            r#"{
                "produce_item": "Tomato",
                "quantity": "50",
                "unit": "KG",
                "price": "22.5",
                "image_url": "https://img.example/t.jpg",
                "ai_generated_ad": "Taaza tamatar!"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_validate_accepts_complete_draft() {
        assert!(validate_new_listing(&draft()).is_ok());
    }

    #[test]
    fn test_validate_names_the_first_missing_field() {
        let mut body = draft();
        body.produce_item = "  ".to_owned();
        let err = validate_new_listing(&body).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "Produce item is missing."));

        let mut body = draft();
        body.price = Decimal::ZERO;
        let err = validate_new_listing(&body).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "Price is missing."));
    }
}
