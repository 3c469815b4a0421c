//! Cache key for order counts.

use std::time::Duration;

use chrono::{DateTime, Utc};
use order_counter_core::{DateRange, Period};

/// Cache key: the period, the start of its resolved range, and the TTL-sized
/// time bucket `now` falls in.
///
/// Requests for the same period within one bucket share an entry, so a page
/// refreshing faster than the TTL hits the upstream once per bucket. Buckets
/// follow the Unix epoch rather than local midnight, so the range start keeps
/// a bucket that straddles a period boundary from mixing two windows.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct CacheKey {
    period: Period,
    range_start: Option<i64>,
    bucket: i64,
}

impl CacheKey {
    pub fn new(period: Period, range: &DateRange, now: DateTime<Utc>, ttl: Duration) -> Self {
        let width = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX).max(1);
        Self {
            period,
            range_start: range.start().map(|start| start.timestamp()),
            bucket: now.timestamp().div_euclid(width),
        }
    }
}
