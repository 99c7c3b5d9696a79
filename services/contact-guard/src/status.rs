// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Pipeline state and the user-facing status message.
//!
//! A terminal state (`Success` or `Failure`) and its status stay visible
//! for the configured display duration, after which the board reads back
//! as `Idle` with no status.

use crate::clock::Clock;
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::trace;

/// States of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    CheckingBot,
    CheckingRate,
    CheckingValidation,
    Sanitizing,
    Sending,
    Success,
    Failure,
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Success | PipelineState::Failure)
    }
}

/// Status kind shown to the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Success,
    Error,
}

/// Message shown to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    #[serde(rename = "type")]
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug)]
struct Board {
    state: PipelineState,
    status: Option<Status>,
    /// When the current terminal state was entered
    since: Option<Instant>,
}

/// Tracks the state machine and expires terminal statuses.
pub struct StatusBoard {
    clock: Arc<dyn Clock>,
    display_for: Duration,
    board: Mutex<Board>,
}

impl StatusBoard {
    pub fn new(clock: Arc<dyn Clock>, display_for: Duration) -> Self {
        Self {
            clock,
            display_for,
            board: Mutex::new(Board {
                state: PipelineState::Idle,
                status: None,
                since: None,
            }),
        }
    }

    /// Enter a non-terminal state. Clears any status still on display.
    pub fn enter(&self, state: PipelineState) {
        let mut board = self.board.lock().unwrap_or_else(PoisonError::into_inner);
        trace!(from = ?board.state, to = ?state, "Pipeline transition");
        board.state = state;
        board.status = None;
        board.since = None;
    }

    /// Enter a terminal state and show `status`.
    pub fn finish(&self, state: PipelineState, status: Status) {
        let now = self.clock.now();
        let mut board = self.board.lock().unwrap_or_else(PoisonError::into_inner);
        trace!(from = ?board.state, to = ?state, "Pipeline finished");
        board.state = state;
        board.status = Some(status);
        board.since = Some(now);
    }

    /// Current state, with expired terminal states reported as `Idle`.
    pub fn state(&self) -> PipelineState {
        self.snapshot().0
    }

    /// Status currently on display, if any.
    pub fn status(&self) -> Option<Status> {
        self.snapshot().1
    }

    /// State and status read under one lock.
    pub fn snapshot(&self) -> (PipelineState, Option<Status>) {
        let now = self.clock.now();
        let mut board = self.board.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(since) = board.since {
            if now.saturating_duration_since(since) >= self.display_for {
                board.state = PipelineState::Idle;
                board.status = None;
                board.since = None;
            }
        }
        (board.state, board.status.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn board() -> (StatusBoard, ManualClock) {
        let clock = ManualClock::default();
        (
            StatusBoard::new(Arc::new(clock.clone()), Duration::from_secs(5)),
            clock,
        )
    }

    #[test]
    fn test_starts_idle() {
        let (board, _clock) = board();
        assert_eq!(board.snapshot(), (PipelineState::Idle, None));
    }

    #[test]
    fn test_terminal_status_expires_after_display_duration() {
        let (board, clock) = board();
        board.enter(PipelineState::Sending);
        board.finish(PipelineState::Success, Status::success("Thanks for your message!"));

        clock.advance(Duration::from_millis(4_999));
        assert_eq!(board.state(), PipelineState::Success);
        assert_eq!(
            board.status().map(|s| s.message),
            Some("Thanks for your message!".to_string())
        );

        clock.advance(Duration::from_millis(1));
        assert_eq!(board.snapshot(), (PipelineState::Idle, None));
    }

    #[test]
    fn test_entering_new_state_clears_status() {
        let (board, _clock) = board();
        board.finish(PipelineState::Failure, Status::error("nope"));
        board.enter(PipelineState::CheckingBot);
        assert_eq!(board.snapshot(), (PipelineState::CheckingBot, None));
    }

    #[test]
    fn test_status_serializes_with_type_field() {
        let json = serde_json::to_value(Status::error("Too many attempts.")).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["message"], "Too many attempts.");
        assert!(PipelineState::Failure.is_terminal());
        assert!(!PipelineState::Sending.is_terminal());
    }
}
