//! Mandi API library.
//!
//! This crate provides the marketplace backend as a library, allowing it to
//! be tested and reused from the CLI and integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod gemini;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
