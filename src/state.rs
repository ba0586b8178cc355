//! Application state: the immutable question bank and game tunables shared by all sessions.
//!
//! Each WebSocket connection builds its own `QuizSession` from this state; nothing
//! here is mutated after startup.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::config::{load_quiz_config_from_env, GameConfig, QuizConfig};
use crate::domain::Question;
use crate::game::QuizSession;
use crate::seeds::seed_questions;
use crate::telemetry::TARGET_SERVER;

#[derive(Clone)]
pub struct AppState {
    pub config: GameConfig,
    pub questions: Arc<[Question]>,
}

impl AppState {
    /// Build state from env: load config, validate the bank, fall back to built-in questions.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        Self::from_config(load_quiz_config_from_env())
    }

    /// Pick tunables and the question bank. A missing config, or one without a single
    /// valid question, yields the built-in bank.
    pub fn from_config(cfg_opt: Option<QuizConfig>) -> Self {
        let config = cfg_opt.as_ref().map(|c| c.game.clone().sanitized()).unwrap_or_default();

        let mut questions = cfg_opt.as_ref().map(|c| c.validated_questions()).unwrap_or_default();
        let source = if questions.is_empty() {
            if cfg_opt.as_ref().is_some_and(|c| !c.questions.is_empty()) {
                warn!(target: TARGET_SERVER, "No valid questions in config; using built-in bank");
            }
            questions = seed_questions();
            "seed"
        } else {
            "config"
        };

        info!(
            target: TARGET_SERVER,
            questions = questions.len(),
            %source,
            dwell_ms = config.dwell_ms,
            tick_hz = config.tick_hz,
            hit_radius = config.hit_radius,
            hit_test_min_confidence = ?config.hit_test_min_confidence,
            "Question bank ready"
        );

        Self::with(config, questions)
    }

    pub fn with(config: GameConfig, questions: Vec<Question>) -> Self {
        Self { config, questions: Arc::from(questions) }
    }

    /// Fresh per-connection session.
    pub fn new_session(&self) -> QuizSession {
        QuizSession::new(self.questions.clone(), self.config.clone())
    }
}
