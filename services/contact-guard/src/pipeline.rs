// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact form submission pipeline.
//!
//! Stages run strictly in order and any of them may end the submission:
//!
//! 1. Honeypot check. A bot gets a fake success and nothing else runs.
//! 2. Rate limit check.
//! 3. Field validation, reporting every violation at once.
//! 4. Sanitization of the accepted fields.
//! 5. Delivery through the email collaborator.
//!
//! Every rejection and every final outcome is written to the event log.

use crate::bot::is_bot;
use crate::clock::{Clock, SystemClock};
use crate::config::{Config, DeliveryConfig};
use crate::delivery::{DeliveryClient, DeliveryRequest};
use crate::events::{EventLog, SecurityEventKind};
use crate::limiter::{RateLimitResult, RateLimiter};
use crate::sanitizer::SanitizedPayload;
use crate::status::{PipelineState, Status, StatusBoard};
use crate::validator::{FormValidator, Submission};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

pub const BOT_MESSAGE: &str = "Thanks for your message!";
pub const SUCCESS_MESSAGE: &str = "Thanks for your message! I'll get back to you soon.";
pub const NOT_CONFIGURED_MESSAGE: &str =
    "Thanks for your message! (Note: Email service not configured)";
pub const DELIVERY_FAILED_MESSAGE: &str =
    "Something went wrong. Please try again or email me directly.";
pub const VALIDATION_FAILED_MESSAGE: &str = "Please fix the errors below and try again.";

/// Pipeline settings taken from the service configuration.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Rate limiter key for contact form submissions
    pub identifier: String,
    /// Delivery service identifiers
    pub delivery: DeliveryConfig,
    /// How long a final status stays on display
    pub status_display: Duration,
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            identifier: config.rate_limit.identifier.clone(),
            delivery: config.delivery.clone(),
            status_display: config.status.display_duration(),
        }
    }
}

/// Why a submission ended where it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    BotDetected,
    RateLimited { remaining_seconds: u64 },
    Invalid,
    DeliveryNotConfigured,
    Delivered,
    DeliveryFailed,
}

impl Outcome {
    /// Short label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::BotDetected => "bot_detected",
            Outcome::RateLimited { .. } => "rate_limited",
            Outcome::Invalid => "invalid",
            Outcome::DeliveryNotConfigured => "not_configured",
            Outcome::Delivered => "delivered",
            Outcome::DeliveryFailed => "delivery_failed",
        }
    }
}

/// What the presentation layer receives for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionOutcome {
    pub status: Status,
    pub errors: Vec<String>,
    /// Terminal reason
    #[serde(skip)]
    pub stage: Outcome,
}

/// Contact form guard pipeline.
pub struct ContactPipeline {
    limiter: Arc<RateLimiter>,
    validator: FormValidator,
    delivery: Arc<dyn DeliveryClient>,
    events: Arc<dyn EventLog>,
    board: StatusBoard,
    settings: PipelineSettings,
}

impl ContactPipeline {
    /// Create a pipeline whose status display runs on the system clock.
    pub fn new(
        limiter: Arc<RateLimiter>,
        validator: FormValidator,
        delivery: Arc<dyn DeliveryClient>,
        events: Arc<dyn EventLog>,
        settings: PipelineSettings,
    ) -> Self {
        let board = StatusBoard::new(Arc::new(SystemClock), settings.status_display);
        Self {
            limiter,
            validator,
            delivery,
            events,
            board,
            settings,
        }
    }

    /// Replace the clock driving the status display.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.board = StatusBoard::new(clock, self.settings.status_display);
        self
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn board(&self) -> &StatusBoard {
        &self.board
    }

    /// Run one submission through every stage.
    pub async fn submit(&self, submission: Submission) -> SubmissionOutcome {
        self.board.enter(PipelineState::CheckingBot);
        if is_bot(Some(submission.honeypot.as_str())) {
            self.events.log_event(
                SecurityEventKind::BotDetected,
                json!({ "honeypot_len": submission.honeypot.chars().count() }),
            );
            return self.finish(
                PipelineState::Success,
                Status::success(BOT_MESSAGE),
                Vec::new(),
                Outcome::BotDetected,
            );
        }

        self.board.enter(PipelineState::CheckingRate);
        if let RateLimitResult::Limited {
            message,
            remaining_seconds,
        } = self.limiter.check(&self.settings.identifier).await
        {
            self.events.log_event(
                SecurityEventKind::RateLimitExceeded,
                json!({
                    "identifier": self.settings.identifier,
                    "remaining_seconds": remaining_seconds,
                }),
            );
            return self.finish(
                PipelineState::Failure,
                Status::error(message),
                Vec::new(),
                Outcome::RateLimited { remaining_seconds },
            );
        }

        self.board.enter(PipelineState::CheckingValidation);
        let validation = self.validator.validate(&submission);
        if !validation.is_valid() {
            let errors = validation.messages();
            self.events.log_event(
                SecurityEventKind::ValidationFailed,
                json!({ "errors": errors }),
            );
            return self.finish(
                PipelineState::Failure,
                Status::error(VALIDATION_FAILED_MESSAGE),
                errors,
                Outcome::Invalid,
            );
        }

        self.board.enter(PipelineState::Sanitizing);
        let payload = SanitizedPayload::from_submission(&submission);

        if !self.settings.delivery.is_configured() {
            info!(
                name = %payload.name,
                email = %payload.email,
                message_len = payload.message.len(),
                "Submission accepted, email service not configured"
            );
            self.events
                .log_event(SecurityEventKind::DeliveryNotConfigured, json!({}));
            return self.finish(
                PipelineState::Success,
                Status::success(NOT_CONFIGURED_MESSAGE),
                Vec::new(),
                Outcome::DeliveryNotConfigured,
            );
        }

        self.board.enter(PipelineState::Sending);
        let request = DeliveryRequest::new(&self.settings.delivery, payload);
        match self.delivery.send(&request).await {
            Ok(()) => {
                self.events
                    .log_event(SecurityEventKind::SubmissionSucceeded, json!({}));
                self.finish(
                    PipelineState::Success,
                    Status::success(SUCCESS_MESSAGE),
                    Vec::new(),
                    Outcome::Delivered,
                )
            }
            Err(err) => {
                error!(error = %err, "Email delivery failed");
                self.events.log_event(
                    SecurityEventKind::SubmissionFailed,
                    json!({ "error": err.to_string() }),
                );
                self.finish(
                    PipelineState::Failure,
                    Status::error(DELIVERY_FAILED_MESSAGE),
                    Vec::new(),
                    Outcome::DeliveryFailed,
                )
            }
        }
    }

    fn finish(
        &self,
        state: PipelineState,
        status: Status,
        errors: Vec<String>,
        stage: Outcome,
    ) -> SubmissionOutcome {
        debug!(stage = stage.label(), "Submission finished");
        self.board.finish(state, status.clone());
        SubmissionOutcome {
            status,
            errors,
            stage,
        }
    }
}
