//! Shared response envelope for API handlers.
//!
//! Every successful JSON response is `{ "success": true, "message": ..., "data": ... }`.
//! Use [`ApiResponse`] instead of ad-hoc `serde_json::json!` bodies so the
//! envelope stays consistent.

use serde::Serialize;

/// Standard success envelope.
///
/// ```ignore
/// Ok(Json(ApiResponse::ok(items)))
/// Ok((StatusCode::CREATED, Json(ApiResponse::new("Category created", category))))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self::new("OK", data)
    }

    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}
