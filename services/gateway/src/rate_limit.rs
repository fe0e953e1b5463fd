//! Per-user token buckets over the gateway surfaces.

use crate::error::AppError;
use dashmap::DashMap;
use std::time::Instant;
use types::ids::UserId;

/// Surfaces with independent budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Discover,
    Decision,
    Messages,
    WsConnect,
}

impl Surface {
    /// (bucket capacity, tokens refilled per second)
    fn budget(self) -> (u32, f64) {
        match self {
            Surface::Discover => (30, 10.0),
            Surface::Decision => (20, 5.0),
            Surface::Messages => (60, 20.0),
            Surface::WsConnect => (10, 1.0),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Surface::Discover => "discover",
            Surface::Decision => "decision",
            Surface::Messages => "messages",
            Surface::WsConnect => "ws_connect",
        }
    }
}

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token buckets keyed by (user, surface), created on first use.
pub struct RateLimiter {
    buckets: DashMap<(UserId, Surface), Bucket>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            buckets: DashMap::new(),
        }
    }

    /// Consume one token, or reject with 429.
    pub fn check(&self, user: &UserId, surface: Surface) -> Result<(), AppError> {
        let (capacity, refill_rate) = surface.budget();
        let mut bucket = self
            .buckets
            .entry((user.clone(), surface))
            .or_insert_with(|| Bucket {
                tokens: capacity as f64,
                last_refill: Instant::now(),
            });

        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = f64::min(capacity as f64, bucket.tokens + elapsed * refill_rate);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(())
        } else {
            Err(AppError::RateLimitExceeded(format!(
                "Rate limit for {}:{}",
                user,
                surface.name()
            )))
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
