//! Identity-provider token verification.
//!
//! Customers sign in on the storefront with Firebase Authentication. The
//! browser sends the resulting ID token once to `POST /auth/session`, where
//! it is verified here and exchanged for a local access token.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use sweetbox_core::cache::TtlCache;
use sweetbox_core::retry::{retry_with_backoff, BackoffPolicy};
use tokio::time::Instant;

use crate::gateways::{parse_response, GatewayError};

const SERVICE: &str = "firebase";

/// Google's public signing keys for Firebase ID tokens, in JWK form.
const DEFAULT_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// How long fetched signing keys are trusted before refetching.
const JWKS_TTL: Duration = Duration::from_secs(3600);

/// Minimum gap between key fetches forced by an unknown key id.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Identity fields extracted from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub uid: String,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The token is malformed, expired, or signed by an unknown key.
    #[error("Invalid identity token: {0}")]
    InvalidToken(String),

    /// Signing keys could not be fetched.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Verifies identity-provider tokens.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError>;
}

/// Firebase project settings.
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    pub project_id: String,
    pub jwks_url: String,
}

impl FirebaseConfig {
    /// Load from `FIREBASE_PROJECT_ID` (required) and `FIREBASE_JWKS_URL`.
    ///
    /// Returns `None` when no project is configured.
    pub fn from_env() -> Option<Self> {
        let project_id = std::env::var("FIREBASE_PROJECT_ID")
            .ok()
            .filter(|v| !v.is_empty())?;
        Some(Self {
            project_id,
            jwks_url: std::env::var("FIREBASE_JWKS_URL")
                .unwrap_or_else(|_| DEFAULT_JWKS_URL.into()),
        })
    }

    pub fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }
}

#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    name: Option<String>,
    phone_number: Option<String>,
}

/// Rate limit for forced refreshes. Every fetch is recorded; a forced
/// refresh is allowed only once `interval` has passed since the last one.
struct RefreshGate {
    interval: Duration,
    last_fetch: Mutex<Option<Instant>>,
}

impl RefreshGate {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fetch: Mutex::new(None),
        }
    }

    fn record_fetch(&self) {
        let mut last = self.last_fetch.lock().unwrap_or_else(|p| p.into_inner());
        *last = Some(Instant::now());
    }

    fn allows_refresh(&self) -> bool {
        let last = self.last_fetch.lock().unwrap_or_else(|p| p.into_inner());
        last.map_or(true, |at| at.elapsed() >= self.interval)
    }
}

pub struct FirebaseVerifier {
    client: reqwest::Client,
    config: FirebaseConfig,
    keys: TtlCache<(), Arc<JwkSet>>,
    refresh_gate: RefreshGate,
    retry: BackoffPolicy,
}

impl FirebaseVerifier {
    pub fn new(config: FirebaseConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            keys: TtlCache::new(JWKS_TTL),
            refresh_gate: RefreshGate::new(MIN_REFRESH_INTERVAL),
            retry: BackoffPolicy::default(),
        }
    }

    async fn fetch_keys(&self) -> Result<Arc<JwkSet>, GatewayError> {
        let (client, url) = (&self.client, self.config.jwks_url.as_str());
        let set = retry_with_backoff(
            &self.retry,
            "firebase.fetch_jwks",
            GatewayError::is_retryable,
            || async move {
                let response = client
                    .get(url)
                    .send()
                    .await
                    .map_err(|source| GatewayError::Request {
                        service: SERVICE,
                        source,
                    })?;
                parse_response::<JwkSet>(SERVICE, response).await
            },
        )
        .await?;
        self.refresh_gate.record_fetch();
        tracing::debug!(keys = set.keys.len(), "Fetched identity provider signing keys");
        Ok(Arc::new(set))
    }

    async fn signing_keys(&self) -> Result<Arc<JwkSet>, GatewayError> {
        self.keys
            .get_or_try_insert_with((), || self.fetch_keys())
            .await
    }
}

#[async_trait]
impl IdentityVerifier for FirebaseVerifier {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let header =
            decode_header(id_token).map_err(|e| IdentityError::InvalidToken(e.to_string()))?;
        if header.alg != Algorithm::RS256 {
            return Err(IdentityError::InvalidToken(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| IdentityError::InvalidToken("missing key id".into()))?;

        let mut keys = self.signing_keys().await?;
        if keys.find(&kid).is_none() {
            // Keys rotate; refetch before giving up, at most once per interval.
            if self.refresh_gate.allows_refresh() {
                self.keys.invalidate(&()).await;
                keys = self.signing_keys().await?;
            } else {
                tracing::debug!(kid = %kid, "Unknown key id; skipping refresh, keys fetched recently");
            }
        }
        let jwk = keys
            .find(&kid)
            .ok_or_else(|| IdentityError::InvalidToken(format!("unknown key id '{kid}'")))?;
        let key =
            DecodingKey::from_jwk(jwk).map_err(|e| IdentityError::InvalidToken(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.config.project_id.as_str()]);
        validation.set_issuer(&[self.config.issuer()]);

        let claims = decode::<FirebaseClaims>(id_token, &key, &validation)
            .map_err(|e| IdentityError::InvalidToken(e.to_string()))?
            .claims;

        identity_from_claims(claims)
    }
}

fn identity_from_claims(claims: FirebaseClaims) -> Result<VerifiedIdentity, IdentityError> {
    let email = claims
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| IdentityError::InvalidToken("token has no email address".into()))?;
    if !claims.email_verified {
        tracing::debug!(uid = %claims.sub, "Signing in with an unverified email address");
    }
    Ok(VerifiedIdentity {
        uid: claims.sub,
        email: sweetbox_core::validation::normalize_email(&email),
        name: claims.name.filter(|n| !n.trim().is_empty()),
        phone: claims.phone_number,
    })
}
