//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::domain::Question;
use crate::render::Frame;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    /// Start button pressed.
    Start,
    /// One detector delivery. Hands are validated individually on ingestion.
    Hands {
        #[serde(default)]
        hands: Vec<serde_json::Value>,
    },
    /// The browser could not load the hand-pose model.
    DetectorUnavailable {
        #[serde(default)]
        message: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Frame { frame: Frame },
    Halted { reason: String },
    Error { message: String },
}

/// Question as exposed over HTTP. The answer is not revealed.
#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub number: usize,
    pub text: String,
    pub options: Vec<String>,
}

pub fn to_out(number: usize, q: &Question) -> QuestionOut {
    QuestionOut { number, text: q.text.clone(), options: q.options.clone() }
}

#[derive(Debug, Serialize)]
pub struct QuestionsOut {
    pub questions: Vec<QuestionOut>,
}

#[derive(Debug, Serialize)]
pub struct MarkerOut {
    pub x: f32,
    pub y: f32,
    pub diameter: f32,
    pub hit_radius: f32,
}

#[derive(Debug, Serialize)]
pub struct LayoutOut {
    pub width: f32,
    pub height: f32,
    pub mirrored: bool,
    pub tick_hz: u32,
    pub dwell_ms: u64,
    pub markers: Vec<MarkerOut>,
}

pub fn layout_out(cfg: &GameConfig) -> LayoutOut {
    LayoutOut {
        width: cfg.canvas_width,
        height: cfg.canvas_height,
        mirrored: true,
        tick_hz: cfg.tick_hz,
        dwell_ms: cfg.dwell_ms,
        markers: (0..crate::domain::OPTIONS_PER_QUESTION)
            .map(|i| {
                let c = crate::hit_test::marker_center(cfg, i);
                MarkerOut { x: c.x, y: c.y, diameter: cfg.marker_diameter, hit_radius: cfg.hit_radius }
            })
            .collect(),
    }
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
