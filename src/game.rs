//! Quiz state machine.
//!
//! `NotStarted → Answering ⇄ ShowingResult → Ended`. All time-dependent logic takes
//! `now` explicitly; the session never reads the clock itself.

use std::{
  sync::Arc,
  time::{Duration, Instant},
};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::domain::{HandObservation, Question};
use crate::hit_test::hit_option;
use crate::telemetry::TARGET_QUIZ;

pub const CORRECT_MESSAGE: &str = "正確！";
pub const INCORRECT_MESSAGE: &str = "錯誤！";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
  NotStarted,
  Answering,
  ShowingResult,
  Ended,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShownResult {
  pub message: &'static str,
  pub correct: bool,
  pub shown_at: Instant,
}

/// What changed during one update, if anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
  Started,
  Answered { option: usize, correct: bool },
  Advanced { question: usize },
  Ended,
}

pub struct QuizSession {
  questions: Arc<[Question]>,
  cfg: GameConfig,
  phase: Phase,
  current_question_index: usize,
  score: usize,
  started_at: Option<Instant>,
  result: Option<ShownResult>,
}

impl QuizSession {
  pub fn new(questions: Arc<[Question]>, cfg: GameConfig) -> Self {
    Self {
      questions,
      cfg,
      phase: Phase::NotStarted,
      current_question_index: 0,
      score: 0,
      started_at: None,
      result: None,
    }
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn score(&self) -> usize {
    self.score
  }

  pub fn current_question_index(&self) -> usize {
    self.current_question_index
  }

  pub fn question_count(&self) -> usize {
    self.questions.len()
  }

  pub fn config(&self) -> &GameConfig {
    &self.cfg
  }

  /// Question on screen while answering. `None` before start and after the last question.
  pub fn current_question(&self) -> Option<&Question> {
    match self.phase {
      Phase::Answering | Phase::ShowingResult => self.questions.get(self.current_question_index),
      Phase::NotStarted | Phase::Ended => None,
    }
  }

  pub fn result(&self) -> Option<&ShownResult> {
    self.result.as_ref()
  }

  /// Time since the start action; zero before it.
  pub fn elapsed(&self, now: Instant) -> Duration {
    self.started_at
      .map(|t| now.saturating_duration_since(t))
      .unwrap_or_default()
  }

  /// Explicit user start action. Only the first call has an effect.
  pub fn start(&mut self, now: Instant) -> Option<Transition> {
    if self.phase != Phase::NotStarted {
      debug!(target: TARGET_QUIZ, phase = ?self.phase, "Ignoring repeated start");
      return None;
    }
    self.started_at = Some(now);
    if self.questions.is_empty() {
      self.phase = Phase::Ended;
      info!(target: TARGET_QUIZ, "Started with an empty question bank; ending immediately");
      return Some(Transition::Ended);
    }
    self.phase = Phase::Answering;
    info!(target: TARGET_QUIZ, questions = self.questions.len(), "Game started");
    Some(Transition::Started)
  }

  /// Per-frame update: hit-test while answering, advance once the dwell window passes.
  pub fn update(&mut self, now: Instant, hands: &[HandObservation]) -> Option<Transition> {
    match self.phase {
      Phase::NotStarted | Phase::Ended => None,
      Phase::Answering => {
        let question = self.questions.get(self.current_question_index)?;
        let option = hit_option(&self.cfg, question, hands)?;
        let correct = question.is_correct(option);
        Some(self.show_result(now, option, correct))
      }
      Phase::ShowingResult => {
        let shown_at = self.result.as_ref()?.shown_at;
        if now.saturating_duration_since(shown_at) > self.cfg.dwell() {
          Some(self.advance())
        } else {
          None
        }
      }
    }
  }

  fn show_result(&mut self, now: Instant, option: usize, correct: bool) -> Transition {
    if correct {
      self.score += 1;
    }
    self.result = Some(ShownResult {
      message: if correct { CORRECT_MESSAGE } else { INCORRECT_MESSAGE },
      correct,
      shown_at: now,
    });
    self.phase = Phase::ShowingResult;
    info!(target: TARGET_QUIZ, question = self.current_question_index, option, correct, score = self.score, "Answer registered");
    Transition::Answered { option, correct }
  }

  fn advance(&mut self) -> Transition {
    self.result = None;
    self.current_question_index += 1;
    if self.current_question_index >= self.questions.len() {
      self.phase = Phase::Ended;
      info!(target: TARGET_QUIZ, score = self.score, questions = self.questions.len(), "Game over");
      Transition::Ended
    } else {
      self.phase = Phase::Answering;
      debug!(target: TARGET_QUIZ, question = self.current_question_index, "Next question");
      Transition::Advanced { question: self.current_question_index }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{AnswerLabel, Handedness, Point};
  use crate::hit_test::marker_center;
  use crate::seeds::seed_questions;

  fn session() -> QuizSession {
    QuizSession::new(Arc::from(seed_questions()), GameConfig::default())
  }

  fn touching(cfg: &GameConfig, option: usize) -> Vec<HandObservation> {
    vec![HandObservation::pointing(Handedness::Left, 0.9, Some(marker_center(cfg, option)))]
  }

  fn correct_option(q: &Question) -> usize {
    (0..q.options.len()).find(|&i| q.is_correct(i)).expect("correct option")
  }

  #[test]
  fn start_is_not_reenterable() {
    let mut s = session();
    let t0 = Instant::now();
    assert_eq!(s.start(t0), Some(Transition::Started));
    assert_eq!(s.phase(), Phase::Answering);
    assert_eq!(s.start(t0 + Duration::from_secs(5)), None);
    assert_eq!(s.elapsed(t0 + Duration::from_secs(1)), Duration::from_secs(1));
  }

  #[test]
  fn hands_are_ignored_before_start() {
    let mut s = session();
    let hands = touching(s.config(), 1);
    assert_eq!(s.update(Instant::now(), &hands), None);
    assert_eq!(s.phase(), Phase::NotStarted);
  }

  #[test]
  fn correct_hit_then_dwell_advances_with_one_point() {
    let mut s = session();
    let t0 = Instant::now();
    s.start(t0);
    let hands = touching(s.config(), 1);

    assert_eq!(s.update(t0, &hands), Some(Transition::Answered { option: 1, correct: true }));
    assert_eq!(s.phase(), Phase::ShowingResult);
    assert_eq!(s.score(), 1);
    assert_eq!(s.result().map(|r| r.message), Some(CORRECT_MESSAGE));

    // Still touching during the dwell: nothing changes.
    assert_eq!(s.update(t0 + Duration::from_millis(1000), &hands), None);
    assert_eq!(s.update(t0 + Duration::from_millis(2000), &hands), None);
    assert_eq!(s.score(), 1);

    assert_eq!(s.update(t0 + Duration::from_millis(2001), &[]), Some(Transition::Advanced { question: 1 }));
    assert_eq!(s.phase(), Phase::Answering);
    assert_eq!(s.current_question_index(), 1);
    assert!(s.result().is_none());
  }

  #[test]
  fn wrong_hit_leaves_score_unchanged() {
    let mut s = session();
    let t0 = Instant::now();
    s.start(t0);
    let hands = touching(s.config(), 0);
    assert_eq!(s.update(t0, &hands), Some(Transition::Answered { option: 0, correct: false }));
    assert_eq!(s.score(), 0);
    assert_eq!(s.result().map(|r| r.correct), Some(false));
    assert_eq!(s.result().map(|r| r.message), Some(INCORRECT_MESSAGE));
  }

  #[test]
  fn three_correct_answers_end_with_full_score() {
    let mut s = session();
    let mut now = Instant::now();
    s.start(now);
    for _ in 0..3 {
      let q = s.current_question().expect("question").clone();
      let hands = touching(s.config(), correct_option(&q));
      assert!(matches!(s.update(now, &hands), Some(Transition::Answered { correct: true, .. })));
      now += Duration::from_millis(2500);
      s.update(now, &[]);
    }
    assert_eq!(s.phase(), Phase::Ended);
    assert_eq!(s.score(), 3);
    assert_eq!(s.current_question_index(), s.question_count());
    assert!(s.elapsed(now) >= Duration::from_millis(7500));

    // Terminal: more hits change nothing.
    let hands = touching(s.config(), 0);
    assert_eq!(s.update(now + Duration::from_secs(10), &hands), None);
    assert_eq!(s.score(), 3);
  }

  #[test]
  fn no_hands_stalls_forever() {
    let mut s = session();
    let t0 = Instant::now();
    s.start(t0);
    for i in 0..1000u64 {
      assert_eq!(s.update(t0 + Duration::from_secs(i), &[]), None);
    }
    assert_eq!(s.phase(), Phase::Answering);
    assert_eq!(s.current_question_index(), 0);
  }

  #[test]
  fn hand_without_fingertip_stalls() {
    let mut s = session();
    let t0 = Instant::now();
    s.start(t0);
    let hands = vec![HandObservation::pointing(Handedness::Right, 1.0, None)];
    assert_eq!(s.update(t0, &hands), None);
    assert_eq!(s.phase(), Phase::Answering);
  }

  #[test]
  fn empty_bank_ends_at_start() {
    let mut s = QuizSession::new(Arc::from(Vec::<Question>::new()), GameConfig::default());
    assert_eq!(s.start(Instant::now()), Some(Transition::Ended));
    assert_eq!(s.phase(), Phase::Ended);
    assert_eq!(s.score(), 0);
  }

  #[test]
  fn finger_far_from_markers_does_nothing() {
    let mut s = QuizSession::new(
      Arc::from(vec![Question {
        text: "q".into(),
        options: vec!["A".into(), "B".into(), "C".into()],
        answer: AnswerLabel::A,
      }]),
      GameConfig::default(),
    );
    let t0 = Instant::now();
    s.start(t0);
    let hands = vec![HandObservation::pointing(Handedness::Left, 1.0, Some(Point::new(600.0, 20.0)))];
    assert_eq!(s.update(t0, &hands), None);
  }
}
