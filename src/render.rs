//! Display list for the browser canvas.
//!
//! `render` is a pure function of the session and the hand snapshot: it never
//! mutates game state. The page draws the elements in order over the video.

use std::time::Instant;

use serde::Serialize;

use crate::domain::{HandObservation, Handedness};
use crate::game::{Phase, QuizSession};
use crate::hit_test::marker_center;

const LEFT_HAND_COLOR: &str = "magenta";
const RIGHT_HAND_COLOR: &str = "yellow";
const MARKER_COLOR: &str = "rgb(255,0,0)";
const TEXT_COLOR: &str = "black";
const CORRECT_COLOR: &str = "green";
const INCORRECT_COLOR: &str = "red";
const LABEL_OFFSET_Y: f32 = 40.0;

pub const START_PROMPT: &str = "請按下按鈕開始遊戲";
pub const START_BUTTON_LABEL: &str = "開始遊戲";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
  LeftTop,
  Center,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawElement {
  Circle {
    x: f32,
    y: f32,
    diameter: f32,
    fill: &'static str,
  },
  Text {
    x: f32,
    y: f32,
    size: f32,
    align: Align,
    fill: &'static str,
    text: String,
  },
  Button {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    label: &'static str,
    background: &'static str,
    color: &'static str,
  },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame {
  pub phase: Phase,
  pub score: usize,
  pub question: usize,
  pub elements: Vec<DrawElement>,
}

pub fn render(session: &QuizSession, hands: &[HandObservation], now: Instant) -> Frame {
  let cfg = session.config();
  let (cx, cy) = (cfg.canvas_width / 2.0, cfg.canvas_height / 2.0);
  let mut elements = Vec::new();

  for hand in hands.iter().filter(|h| h.confidence > cfg.render_min_confidence) {
    let fill = match hand.handedness {
      Some(Handedness::Left) => LEFT_HAND_COLOR,
      Some(Handedness::Right) | None => RIGHT_HAND_COLOR,
    };
    elements.extend(
      hand.keypoints
        .iter()
        .map(|p| DrawElement::Circle { x: p.x, y: p.y, diameter: cfg.keypoint_diameter, fill }),
    );
  }

  match session.phase() {
    Phase::NotStarted => {
      elements.push(centered(cx, cy - 50.0, TEXT_COLOR, START_PROMPT.to_string()));
      elements.push(DrawElement::Button {
        x: cx - 40.0,
        y: cy - 20.0,
        width: 100.0,
        height: 40.0,
        label: START_BUTTON_LABEL,
        background: "#A6E1FA",
        color: "#001C55",
      });
    }
    Phase::Answering => {
      if let Some(q) = session.current_question() {
        elements.push(DrawElement::Text {
          x: 50.0,
          y: 50.0,
          size: 20.0,
          align: Align::LeftTop,
          fill: TEXT_COLOR,
          text: format!("題目 {}: {}", session.current_question_index() + 1, q.text),
        });
        for (i, option) in q.options.iter().enumerate() {
          let c = marker_center(cfg, i);
          elements.push(DrawElement::Circle { x: c.x, y: c.y, diameter: cfg.marker_diameter, fill: MARKER_COLOR });
          elements.push(DrawElement::Text {
            x: c.x,
            y: c.y + LABEL_OFFSET_Y,
            size: 20.0,
            align: Align::Center,
            fill: TEXT_COLOR,
            text: option.clone(),
          });
        }
      }
    }
    Phase::ShowingResult => {
      if let Some(r) = session.result() {
        let fill = if r.correct { CORRECT_COLOR } else { INCORRECT_COLOR };
        elements.push(centered(cx, cy, fill, r.message.to_string()));
      }
    }
    Phase::Ended => {
      let secs = session.elapsed(now).as_secs_f64();
      elements.push(centered(cx, cy - 20.0, TEXT_COLOR, format!("遊戲結束！總分：{} 分", session.score())));
      elements.push(centered(cx, cy + 20.0, TEXT_COLOR, format!("完成時間：{:.2} 秒", secs)));
    }
  }

  Frame {
    phase: session.phase(),
    score: session.score(),
    question: session.current_question_index(),
    elements,
  }
}

fn centered(x: f32, y: f32, fill: &'static str, text: String) -> DrawElement {
  DrawElement::Text { x, y, size: 32.0, align: Align::Center, fill, text }
}

#[cfg(test)]
mod tests {
  use std::{sync::Arc, time::Duration};

  use super::*;
  use crate::config::GameConfig;
  use crate::domain::{Point, Question};
  use crate::seeds::seed_questions;

  fn texts(frame: &Frame) -> Vec<&str> {
    frame
      .elements
      .iter()
      .filter_map(|e| match e {
        DrawElement::Text { text, .. } => Some(text.as_str()),
        _ => None,
      })
      .collect()
  }

  fn correct_option(q: &Question) -> usize {
    (0..q.options.len()).find(|&i| q.is_correct(i)).expect("correct option")
  }

  #[test]
  fn each_question_shows_only_its_own_options() {
    let questions = seed_questions();
    let cfg = GameConfig::default();
    let mut s = QuizSession::new(Arc::from(questions.clone()), cfg.clone());
    let mut now = Instant::now();
    s.start(now);

    for (i, q) in questions.iter().enumerate() {
      assert_eq!(s.current_question_index(), i);
      let frame = render(&s, &[], now);
      let shown = texts(&frame);
      assert_eq!(shown.len(), 1 + q.options.len());
      assert_eq!(shown[0], format!("題目 {}: {}", i + 1, q.text));
      for opt in &q.options {
        assert!(shown.contains(&opt.as_str()));
      }
      for other in questions.iter().enumerate().filter(|(j, _)| *j != i) {
        for opt in &other.1.options {
          assert!(!shown.contains(&opt.as_str()), "option {opt:?} leaked into question {i}");
        }
      }

      let hands = vec![HandObservation::pointing(Handedness::Left, 1.0, Some(marker_center(&cfg, correct_option(q))))];
      s.update(now, &hands);
      now += Duration::from_millis(2100);
      s.update(now, &[]);
    }
  }

  #[test]
  fn low_confidence_hands_are_not_drawn() {
    let s = QuizSession::new(Arc::from(seed_questions()), GameConfig::default());
    let hands = vec![
      HandObservation::pointing(Handedness::Left, 0.1, Some(Point::new(1.0, 1.0))),
      HandObservation::pointing(Handedness::Right, 0.8, Some(Point::new(2.0, 2.0))),
    ];
    let frame = render(&s, &hands, Instant::now());
    let circles: Vec<_> = frame
      .elements
      .iter()
      .filter_map(|e| match e {
        DrawElement::Circle { fill, .. } => Some(*fill),
        _ => None,
      })
      .collect();
    assert_eq!(circles, vec![RIGHT_HAND_COLOR]);
  }

  #[test]
  fn unlabelled_hands_use_the_right_hand_color() {
    let s = QuizSession::new(Arc::from(seed_questions()), GameConfig::default());
    let mut hand = HandObservation::pointing(Handedness::Left, 0.8, Some(Point::new(3.0, 3.0)));
    hand.handedness = None;
    let frame = render(&s, &[hand, HandObservation::unreadable()], Instant::now());
    assert!(matches!(frame.elements[0], DrawElement::Circle { fill, .. } if fill == RIGHT_HAND_COLOR));
    assert!(!matches!(frame.elements[1], DrawElement::Circle { .. }));
  }

  #[test]
  fn not_started_shows_prompt_and_button() {
    let s = QuizSession::new(Arc::from(seed_questions()), GameConfig::default());
    let frame = render(&s, &[], Instant::now());
    assert_eq!(frame.phase, Phase::NotStarted);
    assert_eq!(texts(&frame), vec![START_PROMPT]);
    assert!(frame.elements.iter().any(|e| matches!(e, DrawElement::Button { label, .. } if *label == START_BUTTON_LABEL)));
  }

  #[test]
  fn result_and_game_over_screens() {
    let cfg = GameConfig::default();
    let questions = vec![seed_questions().remove(0)];
    let mut s = QuizSession::new(Arc::from(questions), cfg.clone());
    let t0 = Instant::now();
    s.start(t0);
    let hands = vec![HandObservation::pointing(Handedness::Right, 1.0, Some(marker_center(&cfg, 0)))];
    s.update(t0, &hands);

    let frame = render(&s, &[], t0);
    assert!(frame.elements.contains(&DrawElement::Text {
      x: 320.0,
      y: 240.0,
      size: 32.0,
      align: Align::Center,
      fill: INCORRECT_COLOR,
      text: "錯誤！".into(),
    }));

    let end = t0 + Duration::from_millis(2500);
    s.update(end, &[]);
    let frame = render(&s, &[], end);
    assert_eq!(texts(&frame), vec!["遊戲結束！總分：0 分", "完成時間：2.50 秒"]);
  }

  #[test]
  fn frames_serialize_with_tagged_elements() {
    let s = QuizSession::new(Arc::from(seed_questions()), GameConfig::default());
    let v = serde_json::to_value(render(&s, &[], Instant::now())).expect("json");
    assert_eq!(v["phase"], "not_started");
    assert_eq!(v["elements"][0]["kind"], "text");
    assert_eq!(v["elements"][1]["kind"], "button");
  }
}
