// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTML escaping of accepted submissions.
//!
//! Applied after validation, before the payload leaves the service.

use crate::validator::Submission;
use serde::Serialize;

/// Replacements in application order. `&` goes first so entities inserted
/// by later steps are not escaped again.
const ESCAPES: &[(&str, &str)] = &[
    ("&", "&amp;"),
    ("<", "&lt;"),
    (">", "&gt;"),
    ("\"", "&quot;"),
    ("'", "&#x27;"),
    ("/", "&#x2F;"),
    ("`", "&#96;"),
];

/// Escape markup-significant characters, then trim surrounding whitespace.
///
/// Not idempotent: escaping an already escaped string escapes its `&` again.
pub fn sanitize_input(input: &str) -> String {
    let escaped = ESCAPES
        .iter()
        .fold(input.to_string(), |acc, (from, to)| acc.replace(from, to));
    escaped.trim().to_string()
}

/// Sanitized fields handed to the delivery service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SanitizedPayload {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl SanitizedPayload {
    pub fn from_submission(submission: &Submission) -> Self {
        Self {
            name: sanitize_input(&submission.name),
            email: sanitize_input(&submission.email),
            message: sanitize_input(&submission.message),
        }
    }
}
