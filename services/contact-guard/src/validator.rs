// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Contact form validator.
//!
//! Every rule is evaluated; violations accumulate so the visitor can fix
//! all of them in one pass:
//! - Name length bounds and suspicious content
//! - Email grammar and length
//! - Message length bounds and suspicious content

use crate::config::ValidationConfig;
use crate::patterns::SuspiciousPatterns;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";

/// A contact form submission as posted by the browser.
///
/// Missing fields deserialize to empty strings and are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
    /// Hidden bot trap, empty for real visitors
    #[serde(default)]
    pub honeypot: String,
}

/// Validation error types.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name must be at least {min} characters")]
    NameTooShort { min: usize },

    #[error("Name is too long")]
    NameTooLong,

    #[error("Invalid characters in name")]
    NameSuspicious,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Message must be at least {min} characters")]
    MessageTooShort { min: usize },

    #[error("Message is too long")]
    MessageTooLong,

    #[error("Message contains invalid content")]
    MessageSuspicious,
}

/// Result of validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Human-readable messages in rule order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Contact form validator.
pub struct FormValidator {
    config: ValidationConfig,
    patterns: SuspiciousPatterns,
}

impl FormValidator {
    /// Create a new validator with the default suspicious content rules.
    pub fn new(config: ValidationConfig) -> Self {
        Self::with_patterns(config, SuspiciousPatterns::default())
    }

    /// Create a new validator with a custom rule set.
    pub fn with_patterns(config: ValidationConfig, patterns: SuspiciousPatterns) -> Self {
        Self { config, patterns }
    }

    /// Validate all fields of a submission.
    pub fn validate(&self, submission: &Submission) -> ValidationResult {
        let mut errors = Vec::new();
        let cfg = &self.config;

        let name = submission.name.as_str();
        if name.trim().chars().count() < cfg.name_min_chars {
            errors.push(ValidationError::NameTooShort {
                min: cfg.name_min_chars,
            });
        }
        if name.chars().count() > cfg.name_max_chars {
            errors.push(ValidationError::NameTooLong);
        }
        if !name.is_empty() {
            if let Some(rule) = self.patterns.first_match(name) {
                debug!(rule, "Suspicious content in name");
                errors.push(ValidationError::NameSuspicious);
            }
        }

        if !self.is_valid_email(&submission.email) {
            errors.push(ValidationError::InvalidEmail);
        }

        let message = submission.message.as_str();
        if message.trim().chars().count() < cfg.message_min_chars {
            errors.push(ValidationError::MessageTooShort {
                min: cfg.message_min_chars,
            });
        }
        if message.chars().count() > cfg.message_max_chars {
            errors.push(ValidationError::MessageTooLong);
        }
        if !message.is_empty() {
            if let Some(rule) = self.patterns.first_match(message) {
                debug!(rule, "Suspicious content in message");
                errors.push(ValidationError::MessageSuspicious);
            }
        }

        debug!(error_count = errors.len(), "Submission validated");
        ValidationResult { errors }
    }

    /// Check an address against the email grammar and the length cap.
    pub fn is_valid_email(&self, email: &str) -> bool {
        !email.is_empty()
            && email.chars().count() <= self.config.email_max_chars
            && email_regex().is_some_and(|re| re.is_match(email))
    }
}

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}
