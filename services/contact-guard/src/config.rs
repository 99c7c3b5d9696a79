// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact form guard.
//!
//! Defaults reproduce the behaviour of the portfolio contact form:
//! three submissions per minute, the field limits shown in the form, and a
//! five second status display.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Placeholder identifiers shipped in the site configuration before the
/// email service is set up.
pub const PLACEHOLDER_SERVICE_ID: &str = "YOUR_SERVICE_ID";
pub const PLACEHOLDER_TEMPLATE_ID: &str = "YOUR_TEMPLATE_ID";
pub const PLACEHOLDER_PUBLIC_KEY: &str = "YOUR_PUBLIC_KEY";

/// Configuration for the contact guard service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Field validation configuration
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Email delivery configuration
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Status display configuration
    #[serde(default)]
    pub status: StatusConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Sliding window rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Key under which contact form submissions are counted (default: contact-form)
    #[serde(default = "default_identifier")]
    pub identifier: String,

    /// Maximum admitted attempts inside one window (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Trailing window length in milliseconds (default: 60000)
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// How often idle identifiers are evicted, in seconds (default: 60)
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

/// Field limits for contact form submissions.
///
/// All lengths are counted in characters, not bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Minimum trimmed name length (default: 2)
    #[serde(default = "default_name_min")]
    pub name_min_chars: usize,

    /// Maximum raw name length (default: 100)
    #[serde(default = "default_name_max")]
    pub name_max_chars: usize,

    /// Maximum email length (default: 254)
    #[serde(default = "default_email_max")]
    pub email_max_chars: usize,

    /// Minimum trimmed message length (default: 10)
    #[serde(default = "default_message_min")]
    pub message_min_chars: usize,

    /// Maximum raw message length (default: 5000)
    #[serde(default = "default_message_max")]
    pub message_max_chars: usize,
}

/// Email delivery service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// REST endpoint of the delivery service
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Service identifier
    #[serde(default = "default_service_id")]
    pub service_id: String,

    /// Template identifier
    #[serde(default = "default_template_id")]
    pub template_id: String,

    /// Public key of the account
    #[serde(default = "default_public_key")]
    pub public_key: String,
}

/// Status display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    /// How long a final status stays visible, in milliseconds (default: 5000)
    #[serde(default = "default_display_ms")]
    pub display_ms: u64,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_identifier() -> String {
    "contact-form".to_string()
}

fn default_max_attempts() -> usize {
    3
}

fn default_window_ms() -> u64 {
    60_000
}

fn default_cleanup_interval_secs() -> u64 {
    60
}

fn default_name_min() -> usize {
    2
}

fn default_name_max() -> usize {
    100
}

fn default_email_max() -> usize {
    254
}

fn default_message_min() -> usize {
    10
}

fn default_message_max() -> usize {
    5000
}

fn default_endpoint() -> String {
    "https://api.emailjs.com/api/v1.0/email/send".to_string()
}

fn default_service_id() -> String {
    PLACEHOLDER_SERVICE_ID.to_string()
}

fn default_template_id() -> String {
    PLACEHOLDER_TEMPLATE_ID.to_string()
}

fn default_public_key() -> String {
    PLACEHOLDER_PUBLIC_KEY.to_string()
}

fn default_display_ms() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            validation: ValidationConfig::default(),
            delivery: DeliveryConfig::default(),
            status: StatusConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            identifier: default_identifier(),
            max_attempts: default_max_attempts(),
            window_ms: default_window_ms(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            name_min_chars: default_name_min(),
            name_max_chars: default_name_max(),
            email_max_chars: default_email_max(),
            message_min_chars: default_message_min(),
            message_max_chars: default_message_max(),
        }
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            service_id: default_service_id(),
            template_id: default_template_id(),
            public_key: default_public_key(),
        }
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            display_ms: default_display_ms(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the trailing window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Get the eviction interval (never shorter than one second)
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }
}

impl DeliveryConfig {
    /// True once every identifier has been replaced with a real value.
    pub fn is_configured(&self) -> bool {
        [
            (&self.service_id, PLACEHOLDER_SERVICE_ID),
            (&self.template_id, PLACEHOLDER_TEMPLATE_ID),
            (&self.public_key, PLACEHOLDER_PUBLIC_KEY),
        ]
        .iter()
        .all(|(value, placeholder)| !value.trim().is_empty() && value.as_str() != *placeholder)
    }
}

impl StatusConfig {
    /// Get the status display duration
    pub fn display_duration(&self) -> Duration {
        Duration::from_millis(self.display_ms)
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        Config {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            rate_limit: RateLimitConfig {
                identifier: lookup("RATE_LIMIT_IDENTIFIER")
                    .unwrap_or(defaults.rate_limit.identifier),
                max_attempts: parse_var(&lookup, "RATE_LIMIT_MAX_ATTEMPTS")
                    .unwrap_or(defaults.rate_limit.max_attempts),
                window_ms: parse_var(&lookup, "RATE_LIMIT_WINDOW_MS")
                    .unwrap_or(defaults.rate_limit.window_ms),
                ..defaults.rate_limit
            },
            delivery: DeliveryConfig {
                endpoint: lookup("EMAIL_ENDPOINT").unwrap_or(defaults.delivery.endpoint),
                service_id: lookup("EMAIL_SERVICE_ID").unwrap_or(defaults.delivery.service_id),
                template_id: lookup("EMAIL_TEMPLATE_ID").unwrap_or(defaults.delivery.template_id),
                public_key: lookup("EMAIL_PUBLIC_KEY").unwrap_or(defaults.delivery.public_key),
            },
            status: StatusConfig {
                display_ms: parse_var(&lookup, "STATUS_DISPLAY_MS")
                    .unwrap_or(defaults.status.display_ms),
            },
            metrics: MetricsConfig {
                enabled: parse_var(&lookup, "METRICS_ENABLED").unwrap_or(defaults.metrics.enabled),
                ..defaults.metrics
            },
            validation: defaults.validation,
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}
