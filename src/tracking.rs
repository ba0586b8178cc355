//! Hand tracking bridge: detector ingestion and the latest-wins observation slot.
//!
//! The browser-side detector delivers results whenever its own inference cycle
//! completes. Each delivery is validated once here and then *replaces* the slot;
//! the frame loop reads whatever is current on its next tick. Nothing is queued.

use std::{collections::HashMap, sync::Arc};

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, trace};

use crate::domain::{HandObservation, Handedness, Landmark, Point};
use crate::telemetry::TARGET_TRACKING;

/// Latest detector output, shared without copying between writer and reader.
pub type HandSnapshot = Arc<[HandObservation]>;

/// Keypoint count of the full 21-point hand model.
const FULL_HAND_KEYPOINTS: usize = 21;

#[derive(Debug, Error)]
pub enum IngestError {
  #[error("malformed hand payload: {0}")]
  Malformed(#[from] serde_json::Error),
  #[error("non-finite confidence")]
  NonFiniteConfidence,
}

/// Loosely-typed detector output, as produced by the browser hand-pose model.
#[derive(Debug, Deserialize)]
pub struct RawHand {
  pub handedness: String,
  #[serde(default, alias = "score", alias = "handInViewConfidence")]
  pub confidence: Option<f32>,
  #[serde(default)]
  pub keypoints: Vec<RawKeypoint>,
  /// Finger chains keyed by name ("indexFinger", …), each point `[x, y, z?]`.
  #[serde(default)]
  pub annotations: HashMap<String, Vec<Vec<f32>>>,
}

#[derive(Debug, Deserialize)]
pub struct RawKeypoint {
  pub x: f32,
  pub y: f32,
  #[serde(default)]
  pub name: Option<String>,
}

/// (landmark, annotation chain, index within chain, keypoint name, index in the 21-point layout)
const LANDMARK_SOURCES: [(Landmark, &str, usize, &str, usize); 6] = [
  (Landmark::PalmBase, "palmBase", 0, "wrist", 0),
  (Landmark::ThumbTip, "thumb", 3, "thumb_tip", 4),
  (Landmark::IndexFingerTip, "indexFinger", 3, "index_finger_tip", 8),
  (Landmark::MiddleFingerTip, "middleFinger", 3, "middle_finger_tip", 12),
  (Landmark::RingFingerTip, "ringFinger", 3, "ring_finger_tip", 16),
  (Landmark::PinkyTip, "pinky", 3, "pinky_finger_tip", 20),
];

fn finite_point(x: f32, y: f32) -> Option<Point> {
  (x.is_finite() && y.is_finite()).then(|| Point::new(x, y))
}

fn chain_point(raw: &RawHand, chain: &str, index: usize) -> Option<Point> {
  let coords = raw.annotations.get(chain)?.get(index)?;
  match coords.as_slice() {
    [x, y, ..] => finite_point(*x, *y),
    _ => None,
  }
}

fn resolve_landmark(raw: &RawHand, chain: &str, chain_index: usize, name: &str, layout_index: usize) -> Option<Point> {
  if let Some(p) = chain_point(raw, chain, chain_index) {
    return Some(p);
  }
  if let Some(k) = raw.keypoints.iter().find(|k| k.name.as_deref() == Some(name)) {
    return finite_point(k.x, k.y);
  }
  if raw.keypoints.len() == FULL_HAND_KEYPOINTS {
    let k = &raw.keypoints[layout_index];
    return finite_point(k.x, k.y);
  }
  None
}

impl TryFrom<RawHand> for HandObservation {
  type Error = IngestError;

  fn try_from(raw: RawHand) -> Result<Self, Self::Error> {
    let handedness = match raw.handedness.as_str() {
      "Left" | "left" => Some(Handedness::Left),
      "Right" | "right" => Some(Handedness::Right),
      other => {
        debug!(target: TARGET_TRACKING, handedness = other, "Unrecognised handedness");
        None
      }
    };

    let confidence = raw.confidence.unwrap_or(0.0);
    if !confidence.is_finite() {
      return Err(IngestError::NonFiniteConfidence);
    }

    let landmarks = LANDMARK_SOURCES
      .iter()
      .filter_map(|&(lm, chain, ci, name, li)| resolve_landmark(&raw, chain, ci, name, li).map(|p| (lm, p)))
      .collect();

    let keypoints = raw.keypoints.iter().filter_map(|k| finite_point(k.x, k.y)).collect();

    Ok(HandObservation { handedness, confidence: confidence.clamp(0.0, 1.0), keypoints, landmarks })
  }
}

/// Validate one detector batch. The output has one entry per input entry, in order;
/// entries that fail validation become `HandObservation::unreadable()`.
pub fn ingest_hands(batch: Vec<serde_json::Value>) -> Vec<HandObservation> {
  batch
    .into_iter()
    .map(|v| {
      serde_json::from_value::<RawHand>(v)
        .map_err(IngestError::from)
        .and_then(HandObservation::try_from)
        .unwrap_or_else(|e| {
          debug!(target: TARGET_TRACKING, error = %e, "Unreadable hand observation");
          HandObservation::unreadable()
        })
    })
    .collect()
}

/// Writer half of the latest-observations slot.
pub struct HandTrackingBridge {
  tx: watch::Sender<HandSnapshot>,
}

/// Reader half used by the frame loop.
pub struct HandSnapshotReader {
  rx: watch::Receiver<HandSnapshot>,
}

pub fn hand_tracking_bridge() -> (HandTrackingBridge, HandSnapshotReader) {
  let (tx, rx) = watch::channel::<HandSnapshot>(Arc::from(Vec::new()));
  (HandTrackingBridge { tx }, HandSnapshotReader { rx })
}

impl HandTrackingBridge {
  /// Replace the slot wholesale. Never blocks; older unread batches are discarded.
  pub fn publish(&self, hands: Vec<HandObservation>) {
    trace!(target: TARGET_TRACKING, hands = hands.len(), "Publishing hand snapshot");
    self.tx.send_replace(Arc::from(hands));
  }
}

impl HandSnapshotReader {
  pub fn latest(&self) -> HandSnapshot {
    self.rx.borrow().clone()
  }
}
