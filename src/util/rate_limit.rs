//! Per-connection message throttling

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::num::NonZeroU32;
use std::sync::Arc;

pub type Limiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Build a direct limiter allowing `per_second` cells with the same burst
pub fn create_limiter(per_second: u32) -> Arc<Limiter> {
    let quota = Quota::per_second(NonZeroU32::new(per_second).unwrap_or(NonZeroU32::MIN));
    Arc::new(RateLimiter::direct(quota))
}

/// Client messages per second. Well above a 60 Hz input stream so normal
/// play is never throttled.
pub const INPUT_RATE_LIMIT: u32 = 240;

/// Throttle for one WebSocket's inbound text frames
#[derive(Clone)]
pub struct ConnectionRateLimiter {
    limiter: Arc<Limiter>,
}

impl ConnectionRateLimiter {
    pub fn new() -> Self {
        Self::with_rate(INPUT_RATE_LIMIT)
    }

    pub fn with_rate(per_second: u32) -> Self {
        Self {
            limiter: create_limiter(per_second),
        }
    }

    /// True if the message may be processed
    pub fn check_message(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl Default for ConnectionRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_beyond_quota_is_refused() {
        let limiter = ConnectionRateLimiter::with_rate(5);
        let allowed = (0..20).filter(|_| limiter.check_message()).count();
        assert_eq!(allowed, 5);
    }

    #[test]
    fn zero_rate_still_admits_one() {
        let limiter = ConnectionRateLimiter::with_rate(0);
        assert!(limiter.check_message());
    }

    #[test]
    fn default_rate_covers_sixty_hertz_input() {
        let limiter = ConnectionRateLimiter::new();
        assert!((0..60).all(|_| limiter.check_message()));
    }
}
