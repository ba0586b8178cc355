//! Domain models: quiz questions, answer labels, and validated hand observations.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Number of options every question carries (one marker per option).
pub const OPTIONS_PER_QUESTION: usize = 3;

/// Label of the correct option. Options are written as "A. …", "B. …", "C. …".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerLabel {
  A,
  B,
  C,
}

impl AnswerLabel {
  pub fn as_char(self) -> char {
    match self {
      AnswerLabel::A => 'A',
      AnswerLabel::B => 'B',
      AnswerLabel::C => 'C',
    }
  }
}

/// Immutable quiz question. Built once at startup and never mutated.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Question {
  pub text: String,
  pub options: Vec<String>,
  pub answer: AnswerLabel,
}

impl Question {
  /// True if option `index` carries the correct label.
  /// The label is the option's first character, compared against the answer.
  pub fn is_correct(&self, index: usize) -> bool {
    self.options
      .get(index)
      .and_then(|o| o.chars().next())
      .map(|c| c == self.answer.as_char())
      .unwrap_or(false)
  }
}

/// Screen-space point in canvas units (640×480, mirrored like the video).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
  pub x: f32,
  pub y: f32,
}

impl Point {
  pub fn new(x: f32, y: f32) -> Self {
    Self { x, y }
  }

  pub fn distance(self, other: Point) -> f32 {
    ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
  Left,
  Right,
}

/// Semantic landmarks resolved at the ingestion boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Landmark {
  PalmBase,
  ThumbTip,
  IndexFingerTip,
  MiddleFingerTip,
  RingFingerTip,
  PinkyTip,
}

/// One detector result for one hand in one detection cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct HandObservation {
  /// `None` when the detector reported a label other than left/right.
  pub handedness: Option<Handedness>,
  pub confidence: f32,
  pub keypoints: Vec<Point>,
  pub landmarks: HashMap<Landmark, Point>,
}

impl HandObservation {
  /// Stand-in for a detector entry that could not be read. Keeps the entry's
  /// position in the batch without being drawn or able to answer.
  pub fn unreadable() -> Self {
    Self { handedness: None, confidence: 0.0, keypoints: Vec::new(), landmarks: HashMap::new() }
  }

  pub fn landmark(&self, which: Landmark) -> Option<Point> {
    self.landmarks.get(&which).copied()
  }

  /// Fingertip used for answering.
  pub fn index_finger_tip(&self) -> Option<Point> {
    self.landmark(Landmark::IndexFingerTip)
  }
}

#[cfg(test)]
impl HandObservation {
  /// Test hand whose only keypoint is the index fingertip (if any).
  pub fn pointing(handedness: Handedness, confidence: f32, tip: Option<Point>) -> Self {
    let landmarks = tip.map(|p| (Landmark::IndexFingerTip, p)).into_iter().collect();
    Self { handedness: Some(handedness), confidence, keypoints: tip.into_iter().collect(), landmarks }
  }
}
