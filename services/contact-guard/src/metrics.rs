// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for submission outcomes.

use crate::pipeline::Outcome;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use tracing::warn;

/// Submission counters in a private registry.
pub struct Metrics {
    registry: Registry,
    submissions: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let submissions = IntCounterVec::new(
            Opts::new(
                "contact_submissions_total",
                "Contact form submissions by final outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(submissions.clone()))?;
        Ok(Self {
            registry,
            submissions,
        })
    }

    /// Count one finished submission.
    pub fn record(&self, outcome: Outcome) {
        self.submissions.with_label_values(&[outcome.label()]).inc();
    }

    /// Render all metrics in the text exposition format.
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        if let Err(err) = TextEncoder::new().encode(&self.registry.gather(), &mut buffer) {
            warn!(error = %err, "Failed to encode metrics");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_render() {
        let metrics = Metrics::new().unwrap();
        metrics.record(Outcome::Delivered);
        metrics.record(Outcome::RateLimited {
            remaining_seconds: 12,
        });
        metrics.record(Outcome::RateLimited {
            remaining_seconds: 3,
        });

        let text = metrics.render();
        assert!(text.contains("contact_submissions_total{outcome=\"delivered\"} 1"));
        assert!(text.contains("contact_submissions_total{outcome=\"rate_limited\"} 2"));
    }
}
