//! Razorpay payment gateway client.
//!
//! Checkout happens in the browser: the server creates a gateway order for
//! the exact amount, the browser completes payment and posts back the
//! `(order_id, payment_id, signature)` triple, which is checked with
//! HMAC-SHA256 under the key secret. Razorpay also calls the webhook
//! endpoint with a body signed by a separate webhook secret.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sweetbox_core::error::CoreError;
use sweetbox_core::payment::{verify_checkout_signature, verify_webhook_signature, CURRENCY_INR};
use sweetbox_core::retry::{retry_with_backoff, BackoffPolicy};
use sweetbox_core::types::Paise;

use super::{parse_response, GatewayError};

const SERVICE: &str = "razorpay";
const DEFAULT_API_BASE: &str = "https://api.razorpay.com/v1";

/// Razorpay credentials.
#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    /// Secret used to sign webhook bodies. Webhooks are rejected when unset.
    pub webhook_secret: Option<String>,
    pub api_base: String,
}

impl RazorpayConfig {
    /// Load from `RAZORPAY_KEY_ID`, `RAZORPAY_KEY_SECRET`,
    /// `RAZORPAY_WEBHOOK_SECRET` and `RAZORPAY_API_BASE`.
    ///
    /// Returns `None` when the key pair is missing.
    pub fn from_env() -> Option<Self> {
        let key_id = std::env::var("RAZORPAY_KEY_ID").ok().filter(|v| !v.is_empty())?;
        let key_secret = std::env::var("RAZORPAY_KEY_SECRET")
            .ok()
            .filter(|v| !v.is_empty())?;
        Some(Self {
            key_id,
            key_secret,
            webhook_secret: std::env::var("RAZORPAY_WEBHOOK_SECRET")
                .ok()
                .filter(|v| !v.is_empty()),
            api_base: std::env::var("RAZORPAY_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.into()),
        })
    }
}

/// Order created on the gateway for one checkout.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: Paise,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
}

/// Payment gateway operations used by checkout and payment confirmation.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Public key handed to the browser checkout widget.
    fn key_id(&self) -> &str;

    /// Create a gateway order for `amount_paise`. `receipt` is our order number.
    async fn create_order(
        &self,
        amount_paise: Paise,
        receipt: &str,
    ) -> Result<GatewayOrder, GatewayError>;

    /// Check the signature returned by the browser after checkout.
    fn verify_checkout(
        &self,
        gateway_order_id: &str,
        gateway_payment_id: &str,
        signature: &str,
    ) -> Result<bool, CoreError>;

    /// Check the `X-Razorpay-Signature` header of a webhook body.
    fn verify_webhook(&self, body: &str, signature: &str) -> Result<bool, CoreError>;
}

#[derive(Serialize)]
struct CreateOrderRequest<'a> {
    amount: Paise,
    currency: &'a str,
    receipt: &'a str,
}

pub struct RazorpayClient {
    client: reqwest::Client,
    config: RazorpayConfig,
    retry: BackoffPolicy,
}

impl RazorpayClient {
    pub fn new(config: RazorpayConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(client: reqwest::Client, config: RazorpayConfig) -> Self {
        Self {
            client,
            config,
            retry: BackoffPolicy::default(),
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    fn key_id(&self) -> &str {
        &self.config.key_id
    }

    async fn create_order(
        &self,
        amount_paise: Paise,
        receipt: &str,
    ) -> Result<GatewayOrder, GatewayError> {
        let url = format!("{}/orders", self.config.api_base);
        let body = CreateOrderRequest {
            amount: amount_paise,
            currency: CURRENCY_INR,
            receipt,
        };
        let (client, config, url, body) = (&self.client, &self.config, url.as_str(), &body);

        retry_with_backoff(
            &self.retry,
            "razorpay.create_order",
            GatewayError::is_retryable,
            || async move {
                let response = client
                    .post(url)
                    .basic_auth(&config.key_id, Some(&config.key_secret))
                    .json(&body)
                    .send()
                    .await
                    .map_err(|source| GatewayError::Request {
                        service: SERVICE,
                        source,
                    })?;
                parse_response::<GatewayOrder>(SERVICE, response).await
            },
        )
        .await
    }

    fn verify_checkout(
        &self,
        gateway_order_id: &str,
        gateway_payment_id: &str,
        signature: &str,
    ) -> Result<bool, CoreError> {
        verify_checkout_signature(
            gateway_order_id,
            gateway_payment_id,
            signature,
            &self.config.key_secret,
        )
    }

    fn verify_webhook(&self, body: &str, signature: &str) -> Result<bool, CoreError> {
        match &self.config.webhook_secret {
            Some(secret) => verify_webhook_signature(body, signature, secret),
            None => {
                tracing::warn!("Webhook received but RAZORPAY_WEBHOOK_SECRET is not set");
                Ok(false)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Webhook payloads
// ---------------------------------------------------------------------------

pub const EVENT_PAYMENT_CAPTURED: &str = "payment.captured";
pub const EVENT_PAYMENT_FAILED: &str = "payment.failed";

/// The subset of a Razorpay webhook body the server acts on.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub payload: WebhookPayload,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    pub payment: Option<WebhookPaymentWrapper>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookPaymentWrapper {
    pub entity: WebhookPayment,
}

#[derive(Debug, Deserialize)]
pub struct WebhookPayment {
    pub id: String,
    pub order_id: Option<String>,
    pub amount: Paise,
    #[serde(default)]
    pub currency: Option<String>,
}

impl WebhookEvent {
    pub fn payment(&self) -> Option<&WebhookPayment> {
        self.payload.payment.as_ref().map(|p| &p.entity)
    }
}
