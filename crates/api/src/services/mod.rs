//! Application services.
//!
//! Each service owns one concern: credential handling, session tokens,
//! cart mutation, payment-gateway access, image upload, and AI-backed
//! listing analysis. Route handlers stay thin and delegate here.

pub mod analysis;
pub mod assistant;
pub mod auth;
pub mod cart;
pub mod cloudinary;
pub mod razorpay;
pub mod session;
