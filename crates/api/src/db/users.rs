//! User repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use mandi_core::{Email, GeoPoint, Role, UserId};

use super::RepositoryError;
use crate::models::user::{FarmerProfile, User};

/// Columns selected for every user load, in `UserRow` order.
const USER_COLUMNS: &str = "id, name, email, role, longitude, latitude, phone, address, \
     district, state, id_document_url, land_size_acres, produce_types, needs, created_at";

/// Input for creating a user. The hash is computed by the auth service;
/// this layer never sees a plaintext password.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a Email,
    pub role: Role,
    pub password_hash: &'a str,
    pub location: GeoPoint,
    pub farmer: Option<&'a FarmerProfile>,
    pub needs: &'a [String],
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
    role: String,
    longitude: f64,
    latitude: f64,
    phone: Option<String>,
    address: Option<String>,
    district: Option<String>,
    state: Option<String>,
    id_document_url: Option<String>,
    land_size_acres: Option<Decimal>,
    produce_types: Vec<String>,
    needs: Vec<String>,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct UserAuthRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role = row.role.parse::<Role>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;
        let location = GeoPoint::new(row.longitude, row.latitude).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid location in database: {e}"))
        })?;

        let farmer = (role == Role::Farmer).then(|| FarmerProfile {
            phone: row.phone,
            address: row.address,
            district: row.district,
            state: row.state,
            id_document_url: row.id_document_url,
            land_size_acres: row.land_size_acres,
            produce_types: row.produce_types,
        });

        Ok(Self {
            id: UserId::new(row.id),
            name: row.name,
            email,
            role,
            location,
            farmer,
            needs: row.needs,
            created_at: row.created_at,
        })
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_user: &NewUser<'_>) -> Result<User, RepositoryError> {
        let empty_profile = FarmerProfile::default();
        let profile = new_user.farmer.unwrap_or(&empty_profile);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO app_user \
                 (name, email, role, password_hash, longitude, latitude, \
                  phone, address, district, state, id_document_url, \
                  land_size_acres, produce_types, needs) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(new_user.name)
        .bind(new_user.email)
        .bind(new_user.role)
        .bind(new_user.password_hash)
        .bind(new_user.location.longitude())
        .bind(new_user.location.latitude())
        .bind(&profile.phone)
        .bind(&profile.address)
        .bind(&profile.district)
        .bind(&profile.state)
        .bind(&profile.id_document_url)
        .bind(profile.land_size_acres)
        .bind(&profile.produce_types)
        .bind(new_user.needs)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "email already registered"))?;

        row.try_into()
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if the row fails domain validation.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM app_user WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if the row fails domain validation.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM app_user WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user together with their credential hash, for login.
    ///
    /// This is the only path that exposes the hash, and it stops at the auth
    /// service.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if the row fails domain validation.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserAuthRow>(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM app_user WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some((r.user.try_into()?, r.password_hash))),
            None => Ok(None),
        }
    }
}
