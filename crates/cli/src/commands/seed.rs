//! Seed the database with demo data for local development.
//!
//! Creates one farmer and one buyer (password `password123` for both) plus a
//! few listings around the farmer's location, so the nearby feed has content
//! straight away. Safe to re-run: existing accounts are left alone.

use rust_decimal::Decimal;
use tracing::info;

use mandi_core::Role;

use mandi_api::db::{self, ListingRepository, UserRepository};
use mandi_api::models::{FarmerProfile, NewListing, User};
use mandi_api::services::auth::{AuthError, AuthService, Registration};

const DEMO_PASSWORD: &str = "password123";

/// Seed demo accounts and listings.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    let auth = AuthService::new(&pool);

    // Farmer outside Pune, buyer in the city ~30 km away.
    let farmer = ensure_account(
        &auth,
        &pool,
        Registration {
            name: "Ramesh Patil".to_owned(),
            email: "ramesh@example.com".to_owned(),
            password: DEMO_PASSWORD.to_owned(),
            role: Role::Farmer,
            longitude: 73.75,
            latitude: 18.65,
            farmer: Some(FarmerProfile {
                phone: Some("9876543210".to_owned()),
                district: Some("Pune".to_owned()),
                state: Some("Maharashtra".to_owned()),
                land_size_acres: Some(Decimal::new(35, 1)),
                produce_types: vec!["tomato".to_owned(), "onion".to_owned()],
                ..FarmerProfile::default()
            }),
            needs: Vec::new(),
        },
    )
    .await?;

    ensure_account(
        &auth,
        &pool,
        Registration {
            name: "Sunita Joshi".to_owned(),
            email: "sunita@example.com".to_owned(),
            password: DEMO_PASSWORD.to_owned(),
            role: Role::Buyer,
            longitude: 73.86,
            latitude: 18.52,
            farmer: None,
            needs: vec!["tomato".to_owned(), "spinach".to_owned()],
        },
    )
    .await?;

    let listings = ListingRepository::new(&pool);
    if listings.list_by_owner(farmer.id).await?.is_empty() {
        for (item, quantity, unit, price) in [
            ("tomato", 50, "kg", "22.50"),
            ("onion", 200, "kg", "18.00"),
            ("spinach", 30, "bundle", "12.00"),
        ] {
            listings
                .create(
                    farmer.id,
                    farmer.location,
                    &NewListing {
                        produce_item: item.to_owned(),
                        quantity: Decimal::from(quantity),
                        unit: unit.to_owned(),
                        price: price.parse()?,
                        image_url: format!("https://placehold.co/600x400?text={item}"),
                        ai_quality_assessment: None,
                        ai_generated_ad: None,
                    },
                )
                .await?;
            info!(item, "Seeded listing");
        }
    } else {
        info!("Listings already present, skipping");
    }

    info!("Seed complete!");
    Ok(())
}

/// Register an account, or load it if the email is already taken.
async fn ensure_account(
    auth: &AuthService<'_>,
    pool: &sqlx::PgPool,
    registration: Registration,
) -> Result<User, Box<dyn std::error::Error>> {
    let email = registration.email.clone();
    match auth.register(registration).await {
        Ok(user) => {
            info!(email, "Created account");
            Ok(user)
        }
        Err(AuthError::UserAlreadyExists) => {
            info!(email, "Account already exists, skipping");
            let parsed = mandi_core::Email::parse(&email)?;
            UserRepository::new(pool)
                .get_by_email(&parsed)
                .await?
                .ok_or_else(|| "account vanished between insert and lookup".into())
        }
        Err(e) => Err(e.into()),
    }
}
