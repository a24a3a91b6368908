//! Sliding-window rate limiting for the speech-to-text endpoint.
//!
//! Each client key (usually the caller's IP) gets a per-minute and a per-hour
//! budget, and all clients share a global hourly budget. Only allowed
//! requests are recorded.

use axum::http::HeaderMap;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::RateLimitConfig;

const ONE_MINUTE: Duration = Duration::from_secs(60);
const ONE_HOUR: Duration = Duration::from_secs(3600);
const CLEANUP_INTERVAL: Duration = Duration::from_secs(5 * 60);
const RETRY_AFTER_SECONDS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub retry_after_seconds: Option<u64>,
}

impl RateLimitDecision {
    fn allow() -> Self {
        Self {
            allowed: true,
            retry_after_seconds: None,
        }
    }

    fn deny() -> Self {
        Self {
            allowed: false,
            retry_after_seconds: Some(RETRY_AFTER_SECONDS),
        }
    }
}

struct LimiterState {
    per_key: HashMap<String, Vec<Instant>>,
    global: Vec<Instant>,
    last_cleanup: Instant,
}

pub struct RateLimiter {
    config: RateLimitConfig,
    state: Mutex<LimiterState>,
}

fn within(window: Duration, now: Instant) -> impl Fn(&Instant) -> bool {
    move |t: &Instant| now.saturating_duration_since(*t) < window
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            state: Mutex::new(LimiterState {
                per_key: HashMap::new(),
                global: Vec::new(),
                last_cleanup: Instant::now(),
            }),
        }
    }

    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Self::maybe_cleanup(&mut state, now);

        state.global.retain(within(ONE_HOUR, now));
        if state.global.len() >= self.config.global_per_hour {
            warn!("Global rate limit reached ({} per hour)", self.config.global_per_hour);
            return RateLimitDecision::deny();
        }

        let mut recent_hour: Vec<Instant> = state
            .per_key
            .get(key)
            .map(|timestamps| timestamps.iter().copied().filter(within(ONE_HOUR, now)).collect())
            .unwrap_or_default();
        let in_last_minute = within(ONE_MINUTE, now);
        let recent_minute = recent_hour.iter().filter(|t| in_last_minute(*t)).count();

        if recent_minute >= self.config.per_minute || recent_hour.len() >= self.config.per_hour {
            debug!("Rate limit reached for {}", key);
            return RateLimitDecision::deny();
        }

        recent_hour.push(now);
        state.per_key.insert(key.to_string(), recent_hour);
        state.global.push(now);

        RateLimitDecision::allow()
    }

    /// Clear all recorded requests.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.per_key.clear();
        state.global.clear();
    }

    pub fn tracked_keys(&self) -> usize {
        let state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.per_key.len()
    }

    fn maybe_cleanup(state: &mut LimiterState, now: Instant) {
        if now.saturating_duration_since(state.last_cleanup) < CLEANUP_INTERVAL {
            return;
        }
        state.last_cleanup = now;

        state.per_key.retain(|_, timestamps| {
            timestamps.retain(within(ONE_HOUR, now));
            !timestamps.is_empty()
        });
        state.global.retain(within(ONE_HOUR, now));
    }
}

/// Client address for rate limiting: first `x-forwarded-for` entry, then
/// `x-real-ip`, then `"unknown"`.
pub fn client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            return first.trim().to_string();
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
