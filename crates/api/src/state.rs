use std::sync::Arc;
use std::time::Duration;

use sweetbox_core::cache::TtlCache;
use sweetbox_core::queue::TaskQueue;
use sweetbox_db::models::category::Category;

use crate::auth::identity::IdentityVerifier;
use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};
use crate::gateways::cloudinary::MediaStore;
use crate::gateways::razorpay::PaymentGateway;

/// Read-mostly public data kept in memory between requests.
pub struct PublicCaches {
    /// Active categories in display order.
    pub categories: TtlCache<(), Vec<Category>>,
    /// Rendered `sitemap.xml`.
    pub sitemap: TtlCache<(), String>,
}

impl PublicCaches {
    pub fn new(ttl: Duration) -> Self {
        Self {
            categories: TtlCache::new(ttl),
            sitemap: TtlCache::new(ttl),
        }
    }

    /// Drop everything derived from the catalog after an admin edit.
    pub async fn invalidate_catalog(&self) {
        self.categories.invalidate_all().await;
        self.sitemap.invalidate_all().await;
    }

    /// Drop expired entries and return how many were removed.
    pub async fn purge_expired(&self) -> usize {
        self.categories.purge_expired().await + self.sitemap.purge_expired().await
    }
}

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already `Clone`.
/// Optional integrations are `None` when their credentials are not configured.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: sweetbox_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Event bus feeding the e-mail notifier.
    pub event_bus: Arc<sweetbox_events::EventBus>,
    /// Cached public catalog data.
    pub caches: Arc<PublicCaches>,
    /// Serialized background jobs (account cleanup).
    pub task_queue: Arc<TaskQueue>,
    /// Identity-provider token verifier.
    pub identity: Option<Arc<dyn IdentityVerifier>>,
    /// Payment gateway client.
    pub payments: Option<Arc<dyn PaymentGateway>>,
    /// Media storage client.
    pub media: Option<Arc<dyn MediaStore>>,
}

impl AppState {
    pub fn identity_verifier(&self) -> AppResult<&dyn IdentityVerifier> {
        self.identity
            .as_deref()
            .ok_or_else(|| AppError::ServiceUnavailable("Sign-in is not configured".into()))
    }

    pub fn payment_gateway(&self) -> AppResult<&dyn PaymentGateway> {
        self.payments
            .as_deref()
            .ok_or_else(|| AppError::ServiceUnavailable("Online payments are not configured".into()))
    }

    pub fn media_store(&self) -> AppResult<&dyn MediaStore> {
        self.media
            .as_deref()
            .ok_or_else(|| AppError::ServiceUnavailable("Media uploads are not configured".into()))
    }
}
