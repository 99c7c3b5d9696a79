// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Suspicious content detection.
//!
//! A blunt, ordered list of regular expressions that flags markup, script
//! URIs, inline handlers, and SQL-looking text. It produces false positives
//! on purpose (any `<`, `>`, `{`, `}` or `--` is rejected) and is not an
//! injection boundary: escaping in [`crate::sanitizer`] is what protects
//! downstream renderers.

use regex::Regex;
use std::sync::OnceLock;

/// Default rules, evaluated in this order.
///
/// Rules compile in Unicode mode, so `\w` and `(?i)` also match non-ASCII
/// letters (`onécrit=` is flagged). Unicode `\s` excludes U+FEFF, which
/// browsers treat as whitespace, so the whitespace classes below add it.
const DEFAULT_RULES: &[(&str, &str)] = &[
    ("script_tag", r"(?i)<script"),
    ("javascript_uri", r"(?i)javascript:"),
    ("event_handler", r"(?i)on\w+[\s\x{FEFF}]*="),
    ("data_uri", r"(?i)data:"),
    ("vbscript_uri", r"(?i)vbscript:"),
    ("iframe_tag", r"(?i)<iframe"),
    ("object_tag", r"(?i)<object"),
    ("embed_tag", r"(?i)<embed"),
    ("form_tag", r"(?i)<form"),
    ("eval_call", r"(?i)eval[\s\x{FEFF}]*\("),
    ("expression_call", r"(?i)expression[\s\x{FEFF}]*\("),
    ("url_call", r"(?i)url[\s\x{FEFF}]*\("),
    (
        "sql_keyword",
        r"(?i)(union|select|insert|update|delete|drop|create|alter|exec|execute)[\s\x{FEFF}]",
    ),
    ("sql_comment", r"--"),
    ("markup_chars", r"[<>{}]"),
];

/// A named detection rule.
#[derive(Debug, Clone)]
pub struct PatternRule {
    name: String,
    regex: Regex,
}

impl PatternRule {
    /// Compile a rule.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            regex: Regex::new(pattern)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Ordered set of detection rules.
#[derive(Debug, Clone)]
pub struct SuspiciousPatterns {
    rules: Vec<PatternRule>,
}

impl SuspiciousPatterns {
    /// An empty rule set that matches nothing.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule after the existing ones.
    pub fn with_rule(
        mut self,
        name: impl Into<String>,
        pattern: &str,
    ) -> Result<Self, regex::Error> {
        self.rules.push(PatternRule::new(name, pattern)?);
        Ok(self)
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// True if any rule matches.
    pub fn matches(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    /// Name of the first rule that matches, in rule order.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.is_match(text))
            .map(PatternRule::name)
    }
}

impl Default for SuspiciousPatterns {
    fn default() -> Self {
        static DEFAULT: OnceLock<SuspiciousPatterns> = OnceLock::new();
        DEFAULT
            .get_or_init(|| {
                let rules = DEFAULT_RULES
                    .iter()
                    .filter_map(|(name, pattern)| PatternRule::new(*name, pattern).ok())
                    .collect();
                SuspiciousPatterns { rules }
            })
            .clone()
    }
}

/// Check `text` against the default rule set.
pub fn is_suspicious_content(text: &str) -> bool {
    static DEFAULT: OnceLock<SuspiciousPatterns> = OnceLock::new();
    DEFAULT.get_or_init(SuspiciousPatterns::default).matches(text)
}
