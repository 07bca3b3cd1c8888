//! Mandi Core - Shared types library.
//!
//! This crate provides common types used across all Mandi components:
//! - `api` - The marketplace HTTP API server
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, roles, statuses,
//!   and geolocation points

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
