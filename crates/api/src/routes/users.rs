//! User route handlers: registration, login, logout, profile.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use mandi_core::{GeoPoint, Role};

use crate::error::Result;
use crate::extract::Json;
use crate::middleware::Auth;
use crate::models::{FarmerProfile, PublicProfile};
use crate::services::auth::{AuthService, Registration};
use crate::services::session::{removal_cookie, session_cookie};
use crate::state::AppState;

/// Registration request body.
///
/// Location is GeoJSON (`{"type": "Point", "coordinates": [lon, lat]}`), the
/// shape the map picker on the frontend produces.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub location: GeoPoint,
    /// Farmer-only profile details.
    #[serde(default)]
    pub farmer: Option<FarmerProfile>,
    /// Buyer-only shopping needs.
    #[serde(default)]
    pub needs: Vec<String>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/users/register
///
/// Creates the account and signs the caller in immediately.
///
/// # Errors
///
/// 400 for invalid input, 409 for a duplicate email.
#[instrument(skip(state, jar, body), fields(email = %body.email, role = ?body.role))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .register(Registration {
            name: body.name,
            email: body.email,
            password: body.password,
            role: body.role,
            longitude: body.location.longitude(),
            latitude: body.location.latitude(),
            farmer: body.farmer,
            needs: body.needs,
        })
        .await?;

    let token = state.sessions().mint(user.id)?;
    let jar = jar.add(session_cookie(token, state.config().is_https()));

    Ok((StatusCode::CREATED, jar, Json(PublicProfile::from(user))))
}

/// POST /api/users/login
///
/// # Errors
///
/// 401 when the email or password is wrong.
#[instrument(skip(state, jar, body), fields(email = %body.email))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool());
    let user = auth.login(&body.email, &body.password).await?;

    let token = state.sessions().mint(user.id)?;
    let jar = jar.add(session_cookie(token, state.config().is_https()));

    Ok((jar, Json(PublicProfile::from(user))))
}

/// POST /api/users/logout
///
/// Expires the session cookie. Always succeeds, token or not.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = jar.add(removal_cookie(state.config().is_https()));
    (jar, Json(json!({"message": "Logged out successfully."})))
}

/// GET /api/users/profile
///
/// # Errors
///
/// 401 without a valid session.
pub async fn profile(auth: Auth) -> Result<Json<PublicProfile>> {
    Ok(Json(PublicProfile::from(auth.user)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_parses_geojson_location() {
        let body: RegisterRequest = serde_json::from_str(
            r#"{
                "name": "Ramesh",
                "email": "ramesh@example.com",
                "password": "grow-tomatoes",
                "role": "farmer",
                "location": {"type": "Point", "coordinates": [77.1, 28.6]},
                "farmer": {"phone": "9876543210", "produce_types": ["tomato"]}
            }"#,
        )
        .unwrap();

        assert_eq!(body.role, Role::Farmer);
        assert!((body.location.longitude() - 77.1).abs() < f64::EPSILON);
        assert_eq!(body.farmer.unwrap().produce_types, vec!["tomato"]);
        assert!(body.needs.is_empty());
    }

    #[test]
    fn test_register_request_rejects_unknown_role() {
        let result = serde_json::from_str::<RegisterRequest>(
            r#"{
                "name": "X",
                "email": "x@example.com",
                "password": "password1",
                "role": "wholesaler",
                "location": {"type": "Point", "coordinates": [0, 0]}
            }"#,
        );
        assert!(result.is_err());
    }
}
