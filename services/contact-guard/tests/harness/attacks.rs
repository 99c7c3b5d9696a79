// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Attack simulation patterns for security testing.

use contact_guard::validator::Submission;

/// Attack pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of submissions to send
    pub total_submissions: usize,
    /// Share of submissions with the honeypot filled (0.0-1.0)
    pub bot_ratio: f64,
    /// Share of submissions carrying a hostile message (0.0-1.0)
    pub hostile_ratio: f64,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_submissions: 20,
            bot_ratio: 0.0,
            hostile_ratio: 0.0,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// Scripted bot filling every field, honeypot included.
    pub fn bot_swarm() -> Self {
        Self {
            total_submissions: 50,
            bot_ratio: 1.0,
            ..Default::default()
        }
    }

    /// Single visitor hammering the submit button with valid input.
    pub fn submit_flood() -> Self {
        Self {
            total_submissions: 25,
            ..Default::default()
        }
    }

    /// Mixed traffic of injection attempts and bots.
    pub fn injection_probe() -> Self {
        Self {
            total_submissions: 40,
            bot_ratio: 0.25,
            hostile_ratio: 1.0,
        }
    }

    /// Generate the submissions for this pattern.
    pub fn submissions(&self, hostile: &[&str], benign: &[&str]) -> Vec<Submission> {
        (0..self.total_submissions)
            .map(|i| {
                let message = if spread(self.hostile_ratio, i) {
                    hostile[i % hostile.len()]
                } else {
                    benign[i % benign.len()]
                };
                let honeypot = if spread(self.bot_ratio, i) {
                    format!("https://spam{i}.example")
                } else {
                    String::new()
                };
                Submission {
                    name: format!("Visitor {i}"),
                    email: format!("visitor{i}@example.com"),
                    message: message.to_string(),
                    honeypot,
                }
            })
            .collect()
    }
}

/// Deterministic spread of `ratio` over indices.
fn spread(ratio: f64, index: usize) -> bool {
    if ratio >= 1.0 {
        true
    } else if ratio <= 0.0 {
        false
    } else {
        (index as f64 * 0.618033988749895) % 1.0 < ratio
    }
}
