//! WebSocket upgrade + per-session game loop.
//!
//! One task per connection multiplexes two sources with `select!`:
//! - client messages, which only write the hand slot or queue a start request;
//! - a fixed-rate tick, which runs a whole frame and pushes the display list.

use std::{sync::Arc, time::Instant};
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, error, instrument, debug};
use uuid::Uuid;

use crate::frame_loop::FrameLoop;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;
use crate::telemetry::{TARGET_QUIZ, TARGET_SERVER};
use crate::tracking::{hand_tracking_bridge, ingest_hands, HandTrackingBridge};

#[instrument(level = "info", skip(ws, state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: TARGET_SERVER, "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state, Uuid::new_v4()))
}

#[instrument(level = "info", skip(socket, state), fields(%session_id))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>, session_id: Uuid) {
  info!(target: TARGET_SERVER, "WebSocket connected");

  let (bridge, reader) = hand_tracking_bridge();
  let mut frames = FrameLoop::new(state.new_session(), reader);
  let mut ticker = interval(state.config.tick_period());
  ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

  loop {
    tokio::select! {
      incoming = socket.recv() => {
        let Some(Ok(msg)) = incoming else { break };
        match msg {
          Message::Text(txt) => {
            let reply = match serde_json::from_str::<ClientWsMessage>(&txt) {
              Ok(incoming) => handle_client_ws(incoming, &bridge, &mut frames),
              Err(e) => Some(ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }),
            };
            if let Some(reply) = reply {
              if send(&mut socket, &reply).await.is_err() { break; }
            }
          }
          Message::Close(_) => break,
          // Pings are answered by axum itself.
          _ => {}
        }
      }
      _ = ticker.tick(), if !frames.is_halted() => {
        if let Some(frame) = frames.tick(Instant::now()) {
          if send(&mut socket, &ServerWsMessage::Frame { frame }).await.is_err() { break; }
        }
      }
    }
  }

  let session = frames.session();
  info!(
    target: TARGET_SERVER,
    phase = ?session.phase(),
    score = session.score(),
    question = session.current_question_index(),
    questions = session.question_count(),
    "WebSocket disconnected"
  );
}

/// Apply one client message. Returns an immediate reply when the message warrants one.
fn handle_client_ws(msg: ClientWsMessage, bridge: &HandTrackingBridge, frames: &mut FrameLoop) -> Option<ServerWsMessage> {
  match msg {
    ClientWsMessage::Ping => Some(ServerWsMessage::Pong),

    ClientWsMessage::Start => {
      debug!(target: TARGET_QUIZ, "Start requested");
      frames.request_start();
      None
    }

    ClientWsMessage::Hands { hands } => {
      bridge.publish(ingest_hands(hands));
      None
    }

    ClientWsMessage::DetectorUnavailable { message } => {
      let reason = if message.is_empty() { "hand detector unavailable".to_string() } else { message };
      frames.halt(&reason).then(|| ServerWsMessage::Halted { reason })
    }
  }
}

async fn send(socket: &mut WebSocket, msg: &ServerWsMessage) -> Result<(), axum::Error> {
  let out = serde_json::to_string(msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
  });
  socket.send(Message::Text(out)).await.map_err(|e| {
    error!(target: TARGET_SERVER, error = %e, "WS send error");
    e
  })
}
