//! Request middleware and extractors.

pub mod auth;

pub use auth::{AdminOnly, AnyRole, Auth, FarmerOnly, RoleRequirement};
