//! Background tasks and queued jobs.
//!
//! - [`cache_sweeper`] -- long-running loop, stopped through a
//!   [`CancellationToken`](tokio_util::sync::CancellationToken).
//! - [`user_cleanup`] -- per-account job submitted to the task queue.

pub mod cache_sweeper;
pub mod user_cleanup;
