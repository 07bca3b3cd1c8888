//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::gemini::GeminiClient;
use crate::services::cloudinary::CloudinaryClient;
use crate::services::razorpay::RazorpayClient;
use crate::services::session::TokenSigner;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// connection pool, configuration, and the external SaaS clients, all
/// constructed exactly once at startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    gemini: GeminiClient,
    cloudinary: CloudinaryClient,
    razorpay: RazorpayClient,
    sessions: TokenSigner,
}

impl AppState {
    /// Create a new application state from configuration and a pool.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let gemini = GeminiClient::new(&config.gemini);
        let cloudinary = CloudinaryClient::new(&config.cloudinary);
        let razorpay = RazorpayClient::new(&config.razorpay);
        let sessions = TokenSigner::new(&config.session_secret);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                gemini,
                cloudinary,
                razorpay,
                sessions,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the generative AI client.
    #[must_use]
    pub fn gemini(&self) -> &GeminiClient {
        &self.inner.gemini
    }

    /// Get a reference to the image host client.
    #[must_use]
    pub fn cloudinary(&self) -> &CloudinaryClient {
        &self.inner.cloudinary
    }

    /// Get a reference to the payment gateway client.
    #[must_use]
    pub fn razorpay(&self) -> &RazorpayClient {
        &self.inner.razorpay
    }

    /// Get a reference to the session token signer.
    #[must_use]
    pub fn sessions(&self) -> &TokenSigner {
        &self.inner.sessions
    }
}
