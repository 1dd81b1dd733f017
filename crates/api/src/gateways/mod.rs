//! HTTP clients for third-party services.
//!
//! - [`razorpay`] -- payment orders and signature checks.
//! - [`cloudinary`] -- signed media uploads and deletion.
//!
//! Each client sits behind a trait so handlers and tests can swap in a
//! different implementation through [`AppState`](crate::state::AppState).

pub mod cloudinary;
pub mod razorpay;

/// Errors from outbound gateway calls.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("{service} request failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-2xx status code.
    #[error("{service} API error ({status}): {body}")]
    Api {
        service: &'static str,
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl GatewayError {
    /// Network failures, rate limiting and 5xx answers are worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Request { source, .. } => source.is_timeout() || source.is_connect(),
            GatewayError::Api { status, .. } => *status == 429 || *status >= 500,
        }
    }
}

/// Ensure the response has a success status code, capturing the body otherwise.
pub(crate) async fn ensure_success(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(GatewayError::Api {
            service,
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Parse a successful JSON response body into the expected type.
pub(crate) async fn parse_response<T: serde::de::DeserializeOwned>(
    service: &'static str,
    response: reqwest::Response,
) -> Result<T, GatewayError> {
    let response = ensure_success(service, response).await?;
    response
        .json::<T>()
        .await
        .map_err(|source| GatewayError::Request { service, source })
}
