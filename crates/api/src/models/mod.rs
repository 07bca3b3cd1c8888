//! Domain models shared between repositories, services, and routes.

pub mod cart;
pub mod listing;
pub mod user;

pub use cart::{CartItemView, ResolvedCart};
pub use listing::{Listing, ListingDraft, NearbyListing, NewListing};
pub use user::{FarmerProfile, PublicProfile, User};
