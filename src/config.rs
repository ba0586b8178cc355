//! Loading game configuration (tunables + optional question bank) from TOML.
//!
//! Example file (all keys optional):
//!
//! ```toml
//! [game]
//! dwell_ms = 2000
//! tick_hz = 30
//! hit_radius = 25.0
//! hit_test_min_confidence = 0.1   # unset = low-confidence hands may still answer
//!
//! [[questions]]
//! text = "2 + 2 = ?"
//! options = ["A. 3", "B. 4", "C. 5"]
//! answer = "B"
//! ```

use std::{path::Path, time::Duration};

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::{AnswerLabel, Question, OPTIONS_PER_QUESTION};
use crate::telemetry::{TARGET_QUIZ, TARGET_SERVER};

/// Upper bound for the per-session tick rate.
pub const MAX_TICK_HZ: u32 = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read {path}: {source}")]
  Io {
    path: String,
    #[source]
    source: std::io::Error,
  },
  #[error("failed to parse {path}: {source}")]
  Parse {
    path: String,
    #[source]
    source: toml::de::Error,
  },
  #[error("question #{index}: {reason}")]
  InvalidQuestion { index: usize, reason: String },
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct QuizConfig {
  #[serde(default)]
  pub game: GameConfig,
  #[serde(default)]
  pub questions: Vec<QuestionCfg>,
}

/// Question entry accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct QuestionCfg {
  pub text: String,
  pub options: Vec<String>,
  pub answer: AnswerLabel,
}

/// Timing, layout and threshold tunables. Defaults reproduce the classic 640×480 layout.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
  pub canvas_width: f32,
  pub canvas_height: f32,
  /// How long a result stays on screen before advancing.
  pub dwell_ms: u64,
  pub tick_hz: u32,
  /// Interactive radius; a hit needs a strictly smaller distance.
  pub hit_radius: f32,
  pub marker_diameter: f32,
  pub base_x: f32,
  pub spacing: f32,
  pub row_y: f32,
  pub keypoint_diameter: f32,
  /// Hands at or below this confidence are not drawn.
  pub render_min_confidence: f32,
  /// Hands at or below this confidence cannot answer. `None` disables the filter.
  pub hit_test_min_confidence: Option<f32>,
}

impl Default for GameConfig {
  fn default() -> Self {
    Self {
      canvas_width: 640.0,
      canvas_height: 480.0,
      dwell_ms: 2000,
      tick_hz: 30,
      hit_radius: 25.0,
      marker_diameter: 50.0,
      base_x: 100.0,
      spacing: 150.0,
      row_y: 300.0,
      keypoint_diameter: 16.0,
      render_min_confidence: 0.1,
      hit_test_min_confidence: None,
    }
  }
}

impl GameConfig {
  pub fn dwell(&self) -> Duration {
    Duration::from_millis(self.dwell_ms)
  }

  pub fn tick_period(&self) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(self.tick_hz.clamp(1, MAX_TICK_HZ)))
  }

  /// Replace out-of-range values with their defaults, warning for each one.
  pub fn sanitized(self) -> Self {
    let d = GameConfig::default();
    let tick_hz = if (1..=MAX_TICK_HZ).contains(&self.tick_hz) {
      self.tick_hz
    } else {
      warn!(target: TARGET_SERVER, tick_hz = self.tick_hz, max = MAX_TICK_HZ, fallback = d.tick_hz, "tick_hz out of range; using default");
      d.tick_hz
    };
    let hit_test_min_confidence = match self.hit_test_min_confidence {
      Some(c) if !c.is_finite() => {
        warn!(target: TARGET_SERVER, "hit_test_min_confidence is not finite; disabling the filter");
        None
      }
      other => other,
    };
    Self {
      canvas_width: positive("canvas_width", self.canvas_width, d.canvas_width),
      canvas_height: positive("canvas_height", self.canvas_height, d.canvas_height),
      dwell_ms: self.dwell_ms,
      tick_hz,
      hit_radius: positive("hit_radius", self.hit_radius, d.hit_radius),
      marker_diameter: positive("marker_diameter", self.marker_diameter, d.marker_diameter),
      base_x: finite("base_x", self.base_x, d.base_x),
      spacing: positive("spacing", self.spacing, d.spacing),
      row_y: finite("row_y", self.row_y, d.row_y),
      keypoint_diameter: positive("keypoint_diameter", self.keypoint_diameter, d.keypoint_diameter),
      render_min_confidence: finite("render_min_confidence", self.render_min_confidence, d.render_min_confidence),
      hit_test_min_confidence,
    }
  }
}

fn finite(key: &str, value: f32, fallback: f32) -> f32 {
  if value.is_finite() {
    value
  } else {
    warn!(target: TARGET_SERVER, key, %value, fallback, "Non-finite config value; using default");
    fallback
  }
}

fn positive(key: &str, value: f32, fallback: f32) -> f32 {
  if value.is_finite() && value > 0.0 {
    value
  } else {
    warn!(target: TARGET_SERVER, key, %value, fallback, "Config value must be positive; using default");
    fallback
  }
}

impl QuestionCfg {
  fn validate(self, index: usize) -> Result<Question, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidQuestion { index, reason };
    if self.text.trim().is_empty() {
      return Err(invalid("empty text".into()));
    }
    if self.options.len() != OPTIONS_PER_QUESTION {
      return Err(invalid(format!(
        "expected {} options, got {}",
        OPTIONS_PER_QUESTION,
        self.options.len()
      )));
    }
    if self.options.iter().any(|o| o.trim().is_empty()) {
      return Err(invalid("empty option".into()));
    }
    Ok(Question { text: self.text, options: self.options, answer: self.answer })
  }
}

impl QuizConfig {
  /// Validated question bank. Invalid entries are skipped with a warning.
  pub fn validated_questions(&self) -> Vec<Question> {
    self.questions
      .iter()
      .cloned()
      .enumerate()
      .filter_map(|(i, q)| match q.validate(i) {
        Ok(q) => Some(q),
        Err(e) => {
          warn!(target: TARGET_QUIZ, error = %e, "Skipping invalid question");
          None
        }
      })
      .collect()
  }
}

pub fn load_quiz_config(path: &Path) -> Result<QuizConfig, ConfigError> {
  let display = path.display().to_string();
  let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Io { path: display.clone(), source })?;
  toml::from_str::<QuizConfig>(&s).map_err(|source| ConfigError::Parse { path: display, source })
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_quiz_config_from_env() -> Option<QuizConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match load_quiz_config(Path::new(&path)) {
    Ok(cfg) => {
      info!(target: TARGET_SERVER, %path, questions = cfg.questions.len(), "Loaded quiz config (TOML)");
      Some(cfg)
    }
    Err(e) => {
      error!(target: TARGET_SERVER, %path, error = %e, "Failed to load quiz config");
      None
    }
  }
}
