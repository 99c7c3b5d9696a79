// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Security event log.
//!
//! The pipeline reports every rejection and every final outcome here.
//! Logging is fire-and-forget: `log_event` cannot fail, so a broken sink can
//! never turn into a failed submission.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::{Mutex, PoisonError};
use tracing::warn;

/// Kinds of security event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityEventKind {
    BotDetected,
    RateLimitExceeded,
    ValidationFailed,
    DeliveryNotConfigured,
    SubmissionSucceeded,
    SubmissionFailed,
}

impl std::fmt::Display for SecurityEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BotDetected => write!(f, "Bot detected via honeypot"),
            Self::RateLimitExceeded => write!(f, "Rate limit exceeded"),
            Self::ValidationFailed => write!(f, "Form validation failed"),
            Self::DeliveryNotConfigured => write!(f, "Email service not configured"),
            Self::SubmissionSucceeded => write!(f, "Form submitted successfully"),
            Self::SubmissionFailed => write!(f, "Form submission failed"),
        }
    }
}

/// Capability for recording security events.
pub trait EventLog: Send + Sync {
    fn log_event(&self, kind: SecurityEventKind, details: Value);
}

/// Writes events through `tracing` on the `security` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventLog;

impl EventLog for TracingEventLog {
    fn log_event(&self, kind: SecurityEventKind, details: Value) {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        warn!(
            target: "security",
            %timestamp,
            event = %kind,
            %details,
            "[SECURITY] {kind}"
        );
    }
}

/// One recorded event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggedEvent {
    pub kind: SecurityEventKind,
    pub details: Value,
    pub timestamp: DateTime<Utc>,
}

/// Keeps events in memory for inspection.
#[derive(Debug, Default)]
pub struct RecordingEventLog {
    events: Mutex<Vec<LoggedEvent>>,
}

impl RecordingEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LoggedEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn kinds(&self) -> Vec<SecurityEventKind> {
        self.events().into_iter().map(|e| e.kind).collect()
    }
}

impl EventLog for RecordingEventLog {
    fn log_event(&self, kind: SecurityEventKind, details: Value) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LoggedEvent {
                kind,
                details,
                timestamp: Utc::now(),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recording_log_keeps_order_and_details() {
        let log = RecordingEventLog::new();
        log.log_event(SecurityEventKind::RateLimitExceeded, json!({"remaining_seconds": 42}));
        log.log_event(SecurityEventKind::BotDetected, Value::Null);

        let events = log.events();
        assert_eq!(
            log.kinds(),
            vec![SecurityEventKind::RateLimitExceeded, SecurityEventKind::BotDetected]
        );
        assert_eq!(events[0].details["remaining_seconds"], 42);
        assert!(events[0].timestamp <= events[1].timestamp);
    }

    #[test]
    fn test_tracing_log_does_not_panic_without_subscriber() {
        TracingEventLog.log_event(SecurityEventKind::SubmissionFailed, json!({"error": "boom"}));
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(SecurityEventKind::DeliveryNotConfigured).unwrap(),
            json!("delivery_not_configured")
        );
    }
}
