//! Per-frame driver: applies queued user input, reads the latest hand snapshot,
//! updates the quiz, and renders. Halts permanently if the detector is unavailable.

use std::time::Instant;

use tracing::{debug, error};

use crate::game::QuizSession;
use crate::render::{render, Frame};
use crate::telemetry::TARGET_QUIZ;
use crate::tracking::HandSnapshotReader;

pub struct FrameLoop {
  session: QuizSession,
  hands: HandSnapshotReader,
  start_requested: bool,
  halted: bool,
}

impl FrameLoop {
  pub fn new(session: QuizSession, hands: HandSnapshotReader) -> Self {
    Self { session, hands, start_requested: false, halted: false }
  }

  pub fn session(&self) -> &QuizSession {
    &self.session
  }

  pub fn is_halted(&self) -> bool {
    self.halted
  }

  /// Start button pressed; applied at the beginning of the next tick.
  pub fn request_start(&mut self) {
    self.start_requested = true;
  }

  /// Stop updating for good. Returns true only on the first call.
  pub fn halt(&mut self, reason: &str) -> bool {
    if self.halted {
      return false;
    }
    error!(target: TARGET_QUIZ, %reason, "Hand detector unavailable; halting game loop");
    self.halted = true;
    true
  }

  /// Run one frame to completion. `None` once halted.
  pub fn tick(&mut self, now: Instant) -> Option<Frame> {
    if self.halted {
      return None;
    }
    if std::mem::take(&mut self.start_requested) {
      self.session.start(now);
    }
    let snapshot = self.hands.latest();
    if let Some(t) = self.session.update(now, &snapshot) {
      debug!(target: TARGET_QUIZ, transition = ?t, "Frame transition");
    }
    Some(render(&self.session, &snapshot, now))
  }
}
