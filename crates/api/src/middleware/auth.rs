//! Session authentication extractor.
//!
//! `Auth<R>` reads the session cookie, verifies the token, loads the user,
//! and applies the role requirement `R`. Handlers declare what they need in
//! their signature:
//!
//! ```rust,ignore
//! async fn profile(auth: Auth) -> impl IntoResponse { ... }
//! async fn create(auth: Auth<FarmerOnly>) -> impl IntoResponse { ... }
//! ```
//!
//! The token carries only the user id, so a stale cookie for a deleted user
//! fails here, and role changes are picked up on the next request.

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use mandi_core::Role;

use crate::db::UserRepository;
use crate::error::AppError;
use crate::models::User;
use crate::services::session::SESSION_COOKIE;
use crate::state::AppState;

/// A role gate applied after the session is verified.
pub trait RoleRequirement: Send + Sync + 'static {
    /// Whether a user with `role` passes this gate.
    fn allows(role: Role) -> bool;

    /// Message for the 403 when the gate rejects.
    fn denial_message() -> &'static str;
}

/// Any authenticated user.
pub struct AnyRole;

impl RoleRequirement for AnyRole {
    fn allows(_role: Role) -> bool {
        true
    }

    fn denial_message() -> &'static str {
        ""
    }
}

/// Farmers only.
pub struct FarmerOnly;

impl RoleRequirement for FarmerOnly {
    fn allows(role: Role) -> bool {
        role == Role::Farmer
    }

    fn denial_message() -> &'static str {
        "Access restricted to farmers."
    }
}

/// Admins only.
pub struct AdminOnly;

impl RoleRequirement for AdminOnly {
    fn allows(role: Role) -> bool {
        role == Role::Admin
    }

    fn denial_message() -> &'static str {
        "Access restricted to admins."
    }
}

/// Extractor that authenticates the request and enforces a role requirement.
pub struct Auth<R: RoleRequirement = AnyRole> {
    /// The authenticated user.
    pub user: User,
    _role: PhantomData<R>,
}

impl<R: RoleRequirement> FromRequestParts<AppState> for Auth<R> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_owned())
            .ok_or_else(|| AppError::Unauthorized("Not authorized, no token.".into()))?;

        let user_id = state.sessions().verify(&token)?;

        let user = UserRepository::new(state.pool())
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Not authorized.".into()))?;

        if !R::allows(user.role) {
            return Err(AppError::Forbidden(R::denial_message().to_owned()));
        }

        Ok(Self {
            user,
            _role: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_role_allows_everyone() {
        assert!(AnyRole::allows(Role::Farmer));
        assert!(AnyRole::allows(Role::Buyer));
        assert!(AnyRole::allows(Role::Admin));
    }

    #[test]
    fn test_farmer_only_rejects_buyers_and_admins() {
        assert!(FarmerOnly::allows(Role::Farmer));
        assert!(!FarmerOnly::allows(Role::Buyer));
        assert!(!FarmerOnly::allows(Role::Admin));
    }

    #[test]
    fn test_admin_only_rejects_everyone_else() {
        assert!(AdminOnly::allows(Role::Admin));
        assert!(!AdminOnly::allows(Role::Farmer));
        assert!(!AdminOnly::allows(Role::Buyer));
    }
}
