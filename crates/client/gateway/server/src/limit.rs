//! Per-peer token-bucket rate limiting.

use dashmap::DashMap;
use std::time::Instant;

/// Process-wide set of token buckets keyed by peer address.
///
/// Buckets are created lazily on a peer's first call and live for the
/// process lifetime. The map locks per key: unrelated peers never contend.
pub struct BucketLimiter {
    buckets: DashMap<String, TokenBucket>,
    capacity: f64,
    refill_per_sec: f64,
}

#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl BucketLimiter {
    /// `per_sec` is the sustained rate, `burst` the bucket capacity.
    pub fn new(per_sec: u64, burst: u64) -> Self {
        Self { buckets: DashMap::new(), capacity: burst as f64, refill_per_sec: per_sec as f64 }
    }

    /// Consumes one token from `key`'s bucket. Returns false when the
    /// bucket is exhausted.
    pub fn allow(&self, key: &str) -> bool {
        let mut bucket = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket { tokens: self.capacity, last_refill: Instant::now() });

        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}
