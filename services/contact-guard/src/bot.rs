// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Honeypot bot detection.
//!
//! The contact form carries a field that is hidden from people and skipped
//! in tab order. Anything typed into it came from an automated client.

/// Returns true when the honeypot field carries any value.
pub fn is_bot(honeypot: Option<&str>) -> bool {
    honeypot.is_some_and(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_honeypot_is_human() {
        assert!(!is_bot(None));
        assert!(!is_bot(Some("")));
    }

    #[test]
    fn test_filled_honeypot_is_bot() {
        assert!(is_bot(Some("http://spam.example")));
        // Whitespace is still a value a person could not have typed
        assert!(is_bot(Some(" ")));
    }
}
