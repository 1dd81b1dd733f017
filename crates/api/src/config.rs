use sweetbox_core::shop_hours::ShopHours;
use sweetbox_core::types::Paise;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. Outbound
/// integrations (payments, media, identity, e-mail) are configured
/// separately and are optional.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on post-shutdown draining in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Public storefront URL used in sitemap and e-mail links.
    pub site_url: String,
    /// Daily opening window.
    pub shop_hours: ShopHours,
    /// TTL for cached public catalog data.
    pub catalog_cache_ttl_secs: u64,
    /// Flat delivery fee added to every order.
    pub delivery_fee_paise: Paise,
    /// Subtotal at which the delivery fee is waived.
    pub free_delivery_threshold_paise: Option<Paise>,
    /// Inbox receiving contact-form submissions.
    pub admin_inbox: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default                    |
    /// |----------------------------------|----------------------------|
    /// | `HOST`                           | `0.0.0.0`                  |
    /// | `PORT`                           | `3000`                     |
    /// | `CORS_ORIGINS`                   | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`           | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`          | `30`                       |
    /// | `SITE_URL`                       | `http://localhost:5173`    |
    /// | `SHOP_OPENS_AT`                  | `09:00`                    |
    /// | `SHOP_CLOSES_AT`                 | `23:00`                    |
    /// | `SHOP_UTC_OFFSET_MINUTES`        | `330`                      |
    /// | `CATALOG_CACHE_TTL_SECS`         | `300`                      |
    /// | `DELIVERY_FEE_PAISE`             | `0`                        |
    /// | `FREE_DELIVERY_THRESHOLD_PAISE`  | unset                      |
    /// | `ADMIN_INBOX`                    | unset                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let site_url = std::env::var("SITE_URL")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .trim_end_matches('/')
            .to_string();

        let offset_minutes: i32 = std::env::var("SHOP_UTC_OFFSET_MINUTES")
            .unwrap_or_else(|_| "330".into())
            .parse()
            .expect("SHOP_UTC_OFFSET_MINUTES must be a valid i32");
        let shop_hours = ShopHours::parse(
            &std::env::var("SHOP_OPENS_AT").unwrap_or_else(|_| "09:00".into()),
            &std::env::var("SHOP_CLOSES_AT").unwrap_or_else(|_| "23:00".into()),
            offset_minutes,
        )
        .unwrap_or_else(|e| panic!("Invalid shop hours: {e}"));

        let catalog_cache_ttl_secs: u64 = std::env::var("CATALOG_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("CATALOG_CACHE_TTL_SECS must be a valid u64");

        let delivery_fee_paise: Paise = std::env::var("DELIVERY_FEE_PAISE")
            .unwrap_or_else(|_| "0".into())
            .parse()
            .expect("DELIVERY_FEE_PAISE must be a valid i64");

        let free_delivery_threshold_paise: Option<Paise> =
            std::env::var("FREE_DELIVERY_THRESHOLD_PAISE").ok().map(|v| {
                v.parse()
                    .expect("FREE_DELIVERY_THRESHOLD_PAISE must be a valid i64")
            });

        let admin_inbox = std::env::var("ADMIN_INBOX")
            .ok()
            .filter(|v| !v.trim().is_empty());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            site_url,
            shop_hours,
            catalog_cache_ttl_secs,
            delivery_fee_paise,
            free_delivery_threshold_paise,
            admin_inbox,
        }
    }
}
