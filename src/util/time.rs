//! Time utilities for game simulation

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Get current Unix timestamp in milliseconds
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}

/// Server start time for uptime tracking
static SERVER_START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize server start time (call once at startup)
pub fn init_server_time() {
    SERVER_START.get_or_init(Instant::now);
}

/// Get server uptime in seconds
pub fn uptime_secs() -> u64 {
    SERVER_START
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0)
}

/// Tick rate configuration
pub const SIMULATION_HZ: u32 = 120; // fixed physics steps per simulated second
pub const DEFAULT_BROADCAST_HZ: u32 = 20;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 8;

/// Upper bound on real time fed into the accumulator per scheduler invocation
pub const MAX_FRAME_SECS: f32 = 0.05;

/// Fixed physics step (in seconds)
pub fn fixed_step() -> f32 {
    1.0 / SIMULATION_HZ as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_step_is_one_hundred_twentieth() {
        assert!((fixed_step() * 120.0 - 1.0).abs() < 1e-6);
        assert!(MAX_FRAME_SECS > fixed_step());
    }

    #[test]
    fn uptime_starts_after_init() {
        init_server_time();
        assert!(uptime_secs() < 5);
        assert!(unix_millis() > 0);
    }
}
