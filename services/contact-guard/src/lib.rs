// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Guard
//!
//! This crate guards the contact form of a personal site. Each submission
//! passes, in order, through:
//!
//! - Honeypot bot detection (bots receive a fake success)
//! - Sliding window rate limiting (3 attempts per minute default)
//! - Field validation with accumulated error messages
//! - HTML escaping of the accepted fields
//! - Delivery through an email service
//!
//! Every rejection and outcome is recorded to a security event log.

pub mod bot;
pub mod clock;
pub mod config;
pub mod delivery;
pub mod events;
pub mod handlers;
pub mod limiter;
pub mod metrics;
pub mod patterns;
pub mod pipeline;
pub mod sanitizer;
pub mod status;
pub mod validator;

pub use config::Config;
pub use limiter::{RateLimitResult, RateLimiter};
pub use pipeline::{ContactPipeline, PipelineSettings, SubmissionOutcome};
pub use validator::{FormValidator, Submission, ValidationResult};
