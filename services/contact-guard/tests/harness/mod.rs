// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for contact guard attack simulation.
//!
//! Provides hostile payloads and submission generators used to check the
//! guard against the kinds of traffic a public contact form receives.

pub mod attacks;
pub mod payloads;
