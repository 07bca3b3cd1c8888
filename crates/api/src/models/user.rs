//! User models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mandi_core::{Email, GeoPoint, Role, UserId};

/// A user as loaded from the database.
///
/// The credential hash never leaves the repository layer; this struct is what
/// `verifySession` resolves and what gets attached to the request context.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    pub location: GeoPoint,
    /// Present only for farmers.
    pub farmer: Option<FarmerProfile>,
    /// Produce the buyer is shopping for (empty for farmers/admins).
    pub needs: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Farmer-specific profile attributes collected at registration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FarmerProfile {
    pub phone: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    /// Reference to an uploaded identity document.
    pub id_document_url: Option<String>,
    pub land_size_acres: Option<Decimal>,
    #[serde(default)]
    pub produce_types: Vec<String>,
}

impl FarmerProfile {
    /// Whether any field carries data (used to elide the profile for buyers).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phone.is_none()
            && self.address.is_none()
            && self.district.is_none()
            && self.state.is_none()
            && self.id_document_url.is_none()
            && self.land_size_acres.is_none()
            && self.produce_types.is_empty()
    }
}

/// The client-visible view of a user.
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfile {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    pub location: GeoPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farmer: Option<FarmerProfile>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub needs: Vec<String>,
}

impl From<User> for PublicProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            location: user.location,
            farmer: user.farmer,
            needs: user.needs,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: UserId::new(1),
            name: "Ramesh".to_owned(),
            email: Email::parse("ramesh@example.com").unwrap(),
            role: Role::Farmer,
            location: GeoPoint::new(77.1, 28.6).unwrap(),
            farmer: Some(FarmerProfile {
                phone: Some("9876543210".to_owned()),
                produce_types: vec!["tomato".to_owned()],
                ..FarmerProfile::default()
            }),
            needs: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_public_profile_keeps_identity_fields() {
        let profile = PublicProfile::from(sample_user());
        assert_eq!(profile.id, UserId::new(1));
        assert_eq!(profile.role, Role::Farmer);
        assert!(profile.farmer.is_some());
    }

    #[test]
    fn test_public_profile_serializes_without_empty_optionals() {
        let mut user = sample_user();
        user.farmer = None;
        let json = serde_json::to_value(PublicProfile::from(user)).unwrap();
        assert!(json.get("farmer").is_none());
        assert!(json.get("needs").is_none());
    }

    #[test]
    fn test_farmer_profile_is_empty() {
        assert!(FarmerProfile::default().is_empty());
        let profile = FarmerProfile {
            phone: Some("9876543210".to_owned()),
            ..FarmerProfile::default()
        };
        assert!(!profile.is_empty());
    }
}
