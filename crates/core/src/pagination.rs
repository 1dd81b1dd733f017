//! Pagination defaults and clamping helpers shared by list endpoints.

/// Default page size for admin list endpoints.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Maximum page size for admin list endpoints.
pub const MAX_LIST_LIMIT: i64 = 200;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
