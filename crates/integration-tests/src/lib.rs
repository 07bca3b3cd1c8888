//! Integration tests for Mandi.
//!
//! The tests under `tests/` exercise the `mandi-api` library surface that
//! does not need a live database or network: session token round-trips,
//! payment signature verification, AI draft parsing, and geospatial math.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mandi-integration-tests
//! ```
