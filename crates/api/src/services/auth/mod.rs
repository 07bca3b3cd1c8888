//! Authentication service.
//!
//! Registration and login over the user repository, with argon2 password
//! hashing. Session issuance lives in [`crate::services::session`].

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use mandi_core::{Email, GeoPoint, Role};

use crate::db::RepositoryError;
use crate::db::users::{NewUser, UserRepository};
use crate::models::{FarmerProfile, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Everything needed to create an account.
#[derive(Debug)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub longitude: f64,
    pub latitude: f64,
    pub farmer: Option<FarmerProfile>,
    pub needs: Vec<String>,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user.
    ///
    /// Admin accounts cannot self-register.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail`, `AuthError::InvalidLocation`, or
    /// `AuthError::WeakPassword` for bad input, `AuthError::UserAlreadyExists`
    /// for a duplicate email, and `AuthError::Repository` for database
    /// failures.
    pub async fn register(&self, registration: Registration) -> Result<User, AuthError> {
        if registration.name.trim().is_empty() {
            return Err(AuthError::EmptyName);
        }
        if registration.role == Role::Admin {
            return Err(AuthError::InvalidRole("admin".into()));
        }

        let email = Email::parse(&registration.email)?;
        let location = GeoPoint::new(registration.longitude, registration.latitude)?;
        validate_password(&registration.password)?;
        let password_hash = hash_password(&registration.password)?;

        // Only farmers carry a farmer profile, only buyers carry needs.
        let farmer = (registration.role == Role::Farmer)
            .then_some(registration.farmer.as_ref())
            .flatten();
        let needs = if registration.role == Role::Buyer {
            registration.needs
        } else {
            Vec::new()
        };

        let user = self
            .users
            .create(&NewUser {
                name: registration.name.trim(),
                email: &email,
                role: registration.role,
                password_hash: &password_hash,
                location,
                farmer,
                needs: &needs,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when the email is unknown or
    /// the password does not match. The two cases are indistinguishable to the
    /// caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }
}

/// Validate password strength.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("hunter2hunter2").expect("hash");
        assert!(hash.starts_with("$argon2"));
        verify_password("hunter2hunter2", &hash).expect("verify");
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let hash = hash_password("hunter2hunter2").expect("hash");
        assert!(matches!(
            verify_password("wrong-password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(matches!(
            verify_password("whatever", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("exactly8c").is_ok());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-password").expect("hash");
        let b = hash_password("same-password").expect("hash");
        assert_ne!(a, b);
    }
}
