// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sliding window rate limiter for contact form submissions.
//!
//! Each identifier owns an ordered list of the instants at which attempts
//! were admitted. A check drops instants that left the trailing window,
//! rejects when the remaining count has reached `max_attempts`, and
//! otherwise records the new attempt. Identifiers never interact.

use crate::clock::{Clock, SystemClock};
use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Attempt admitted and recorded
    Allowed {
        /// Attempts still available in the current window
        remaining: usize,
    },
    /// Attempt rejected, nothing recorded
    Limited {
        /// User-facing explanation
        message: String,
        /// Whole seconds until the oldest attempt leaves the window
        remaining_seconds: u64,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            RateLimitResult::Allowed { .. } => None,
            RateLimitResult::Limited { message, .. } => Some(message),
        }
    }

    pub fn remaining_seconds(&self) -> Option<u64> {
        match self {
            RateLimitResult::Allowed { .. } => None,
            RateLimitResult::Limited {
                remaining_seconds, ..
            } => Some(*remaining_seconds),
        }
    }
}

/// Thread-safe sliding window rate limiter.
pub struct RateLimiter {
    /// Configuration
    config: RateLimitConfig,
    /// Time source
    clock: Arc<dyn Clock>,
    /// Admitted attempt instants per identifier, oldest first
    attempts: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    /// Create a new rate limiter using the system clock.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a new rate limiter with an explicit time source.
    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Check and, when admitted, record an attempt for `identifier`.
    ///
    /// The filter, count and append happen under a single lock so two
    /// overlapping checks can never both take the last free slot.
    pub async fn check(&self, identifier: &str) -> RateLimitResult {
        let now = self.clock.now();
        let window = self.config.window_duration();

        let mut attempts = self.attempts.lock().await;
        let recorded = attempts.entry(identifier.to_string()).or_default();
        recorded.retain(|t| now.saturating_duration_since(*t) < window);

        if recorded.len() >= self.config.max_attempts {
            let remaining_seconds = seconds_until_expiry(recorded.first().copied(), now, window);
            debug!(identifier, remaining_seconds, "Rate limit exceeded");
            return RateLimitResult::Limited {
                message: format!("Too many attempts. Please wait {remaining_seconds} seconds."),
                remaining_seconds,
            };
        }

        recorded.push(now);
        let remaining = self.config.max_attempts - recorded.len();
        debug!(identifier, remaining, "Attempt admitted");
        RateLimitResult::Allowed { remaining }
    }

    /// Number of attempts for `identifier` still inside the window.
    pub async fn attempts(&self, identifier: &str) -> usize {
        let now = self.clock.now();
        let window = self.config.window_duration();
        let attempts = self.attempts.lock().await;
        attempts.get(identifier).map_or(0, |recorded| {
            recorded
                .iter()
                .filter(|t| now.saturating_duration_since(**t) < window)
                .count()
        })
    }

    /// Drop identifiers with no attempts left in the window (should be
    /// called periodically).
    pub async fn cleanup(&self) {
        let now = self.clock.now();
        let window = self.config.window_duration();

        let mut attempts = self.attempts.lock().await;
        let before = attempts.len();
        attempts.retain(|_, recorded| {
            recorded.retain(|t| now.saturating_duration_since(*t) < window);
            !recorded.is_empty()
        });
        let evicted = before - attempts.len();
        if evicted > 0 {
            debug!(evicted, "Evicted idle rate limit entries");
        }
    }
}

/// Seconds, rounded up, until `oldest` falls out of the window. Zero when
/// nothing has been recorded.
fn seconds_until_expiry(oldest: Option<Instant>, now: Instant, window: Duration) -> u64 {
    let Some(oldest) = oldest else {
        return 0;
    };
    let left = window.saturating_sub(now.saturating_duration_since(oldest));
    left.as_secs() + u64::from(left.subsec_nanos() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn limiter(max_attempts: usize, window_ms: u64) -> (RateLimiter, ManualClock) {
        let clock = ManualClock::default();
        let config = RateLimitConfig {
            max_attempts,
            window_ms,
            ..Default::default()
        };
        (RateLimiter::with_clock(config, Arc::new(clock.clone())), clock)
    }

    #[tokio::test]
    async fn test_limits_after_max_attempts() {
        let (limiter, _clock) = limiter(3, 60_000);

        for remaining in [2, 1, 0] {
            assert_eq!(
                limiter.check("contact-form").await,
                RateLimitResult::Allowed { remaining }
            );
        }

        let result = limiter.check("contact-form").await;
        assert!(!result.is_allowed());
        assert_eq!(result.remaining_seconds(), Some(60));
        assert_eq!(
            result.message(),
            Some("Too many attempts. Please wait 60 seconds.")
        );
    }

    #[tokio::test]
    async fn test_rejected_attempt_is_not_recorded() {
        let (limiter, clock) = limiter(1, 10_000);

        assert!(limiter.check("k").await.is_allowed());
        clock.advance(Duration::from_secs(4));
        assert!(!limiter.check("k").await.is_allowed());
        assert_eq!(limiter.attempts("k").await, 1);

        // Only the first admitted attempt counts, so the window reopens
        // ten seconds after it rather than after the rejected one.
        clock.advance(Duration::from_secs(6));
        assert!(limiter.check("k").await.is_allowed());
    }

    #[tokio::test]
    async fn test_remaining_seconds_rounds_up_and_decreases() {
        let (limiter, clock) = limiter(1, 60_000);
        limiter.check("k").await;

        clock.advance(Duration::from_millis(500));
        assert_eq!(limiter.check("k").await.remaining_seconds(), Some(60));

        clock.advance(Duration::from_millis(30_000));
        assert_eq!(limiter.check("k").await.remaining_seconds(), Some(30));

        clock.advance(Duration::from_millis(29_400));
        assert_eq!(limiter.check("k").await.remaining_seconds(), Some(1));
    }

    #[tokio::test]
    async fn test_sub_millisecond_remainder_still_waits_one_second() {
        let (limiter, clock) = limiter(1, 60_000);
        assert!(limiter.check("k").await.is_allowed());

        clock.advance(Duration::from_micros(59_999_500));
        let result = limiter.check("k").await;
        assert!(!result.is_allowed());
        assert_eq!(result.remaining_seconds(), Some(1));
        assert_eq!(
            result.message(),
            Some("Too many attempts. Please wait 1 seconds.")
        );
    }

    #[tokio::test]
    async fn test_window_expiry_readmits() {
        let (limiter, clock) = limiter(2, 60_000);
        limiter.check("k").await;
        clock.advance(Duration::from_secs(30));
        limiter.check("k").await;
        assert!(!limiter.check("k").await.is_allowed());

        // Oldest attempt leaves the window, second one is still inside
        clock.advance(Duration::from_secs(30));
        assert!(limiter.check("k").await.is_allowed());
        assert!(!limiter.check("k").await.is_allowed());
    }

    #[tokio::test]
    async fn test_identifiers_are_independent() {
        let (limiter, _clock) = limiter(1, 60_000);

        assert!(limiter.check("contact-form").await.is_allowed());
        assert!(!limiter.check("contact-form").await.is_allowed());
        assert!(limiter.check("newsletter").await.is_allowed());
    }

    #[tokio::test]
    async fn test_cleanup_evicts_idle_identifiers() {
        let (limiter, clock) = limiter(3, 1_000);
        limiter.check("old").await;
        clock.advance(Duration::from_millis(1_500));
        limiter.check("fresh").await;

        limiter.cleanup().await;

        let attempts = limiter.attempts.lock().await;
        assert!(!attempts.contains_key("old"));
        assert_eq!(attempts.get("fresh").map(Vec::len), Some(1));
    }

    #[test]
    fn test_seconds_until_expiry_empty_is_zero() {
        let now = Instant::now();
        assert_eq!(seconds_until_expiry(None, now, Duration::from_secs(60)), 0);
    }

    #[test]
    fn test_seconds_until_expiry_clamps_at_zero() {
        let oldest = Instant::now();
        let now = oldest + Duration::from_secs(120);
        assert_eq!(
            seconds_until_expiry(Some(oldest), now, Duration::from_secs(60)),
            0
        );
    }
}
