//! Shop opening hours.
//!
//! The shop runs on a fixed daily window expressed in local time. A window
//! whose closing time is earlier than its opening time wraps past midnight
//! (e.g. `18:00`-`02:00`). Identical opening and closing times mean the shop
//! never closes.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::error::CoreError;

/// Daily opening window in a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct ShopHours {
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
    pub offset: FixedOffset,
}

/// Shop state at a given instant.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ShopStatus {
    pub is_open: bool,
    pub opens_at: String,
    pub closes_at: String,
    pub next_change_at: Option<DateTime<Utc>>,
    pub seconds_until_change: Option<i64>,
}

impl ShopHours {
    /// Build from `HH:MM` strings and an offset in minutes east of UTC.
    pub fn parse(opens_at: &str, closes_at: &str, offset_minutes: i32) -> Result<Self, CoreError> {
        let parse = |field: &str, value: &str| {
            NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
                CoreError::Validation(format!("{field} must be formatted as HH:MM (got '{value}')"))
            })
        };
        let offset = FixedOffset::east_opt(offset_minutes * 60).ok_or_else(|| {
            CoreError::Validation(format!("UTC offset of {offset_minutes} minutes is out of range"))
        })?;
        Ok(Self {
            opens_at: parse("opens_at", opens_at)?,
            closes_at: parse("closes_at", closes_at)?,
            offset,
        })
    }

    pub fn always_open(&self) -> bool {
        self.opens_at == self.closes_at
    }

    /// Whether the shop is open at `now`.
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        let t = now.with_timezone(&self.offset).time();
        if self.opens_at < self.closes_at {
            t >= self.opens_at && t < self.closes_at
        } else if self.opens_at > self.closes_at {
            t >= self.opens_at || t < self.closes_at
        } else {
            true
        }
    }

    /// Full status at `now`, including when the shop next opens or closes.
    pub fn status_at(&self, now: DateTime<Utc>) -> ShopStatus {
        let is_open = self.is_open_at(now);
        let next_change_at = if self.always_open() {
            None
        } else {
            let target = if is_open { self.closes_at } else { self.opens_at };
            let local = now.with_timezone(&self.offset).naive_local();
            let mut candidate = local.date().and_time(target);
            if candidate <= local {
                candidate += Duration::days(1);
            }
            let utc_naive = candidate - Duration::seconds(i64::from(self.offset.local_minus_utc()));
            Some(Utc.from_utc_datetime(&utc_naive))
        };

        ShopStatus {
            is_open,
            opens_at: self.opens_at.format("%H:%M").to_string(),
            closes_at: self.closes_at.format("%H:%M").to_string(),
            next_change_at,
            seconds_until_change: next_change_at.map(|at| (at - now).num_seconds()),
        }
    }
}
