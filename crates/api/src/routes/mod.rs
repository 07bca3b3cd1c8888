//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                       - Liveness check
//! GET    /health/ready                 - Readiness check (database ping)
//!
//! # Users
//! POST   /api/users/register           - Create account, start session
//! POST   /api/users/login              - Start session
//! POST   /api/users/logout             - End session
//! GET    /api/users/profile            - Current user
//!
//! # Listings
//! POST   /api/listings                 - Create listing (farmer)
//! GET    /api/listings/my-listings     - Own listings, newest first (farmer)
//! GET    /api/listings/nearby          - Available listings within 150 km
//! POST   /api/listings/analyze         - AI draft from text + image (farmer)
//!
//! # Cart
//! GET    /api/cart                     - Resolved cart
//! POST   /api/cart/add                 - Add/merge an entry
//! PUT    /api/cart/update              - Set/remove an entry's quantity
//! DELETE /api/cart/remove/{listing_id} - Remove an entry
//!
//! # Payment
//! POST   /api/payment/create-order     - Create a gateway order
//! POST   /api/payment/verify           - Verify a callback signature
//!
//! # Chat
//! POST   /api/chat                     - Assistant reply
//! ```

pub mod cart;
pub mod chat;
pub mod listings;
pub mod payment;
pub mod users;

use axum::{
    Json,
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde_json::json;

use crate::state::AppState;

/// The full `/api` tree.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", user_routes())
        .nest("/listings", listing_routes())
        .nest("/cart", cart_routes())
        .nest("/payment", payment_routes())
        .route("/chat", post(chat::chat))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/logout", post(users::logout))
        .route("/profile", get(users::profile))
}

fn listing_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(listings::create))
        .route("/my-listings", get(listings::my_listings))
        .route("/nearby", get(listings::nearby))
        .route("/analyze", post(listings::analyze))
}

fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::get))
        .route("/add", post(cart::add))
        .route("/update", put(cart::update))
        .route("/remove/{listing_id}", delete(cart::remove))
}

fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/create-order", post(payment::create_order))
        .route("/verify", post(payment::verify))
}

/// Health check routes.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
}

/// GET /health - process is up.
async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// GET /health/ready - process can reach the database.
async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(state.pool())
        .await
    {
        Ok(_) => (StatusCode::OK, Json(json!({"status": "ready"}))),
        Err(e) => {
            tracing::error!(error = %e, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"status": "unavailable"})),
            )
        }
    }
}
