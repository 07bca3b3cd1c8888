//! Core types for Mandi.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod geo;
pub mod id;
pub mod role;
pub mod status;

pub use email::{Email, EmailError};
pub use geo::{GeoError, GeoPoint};
pub use id::*;
pub use role::{Role, RoleParseError};
pub use status::{ListingStatus, ListingStatusParseError};
