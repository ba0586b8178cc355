//! HTTP endpoint handlers. These are thin read-only views over the shared state.

use std::sync::Arc;
use axum::{extract::State, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::protocol::*;
use crate::state::AppState;
use crate::telemetry::TARGET_SERVER;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_questions(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let questions: Vec<QuestionOut> = state.questions.iter().enumerate().map(|(i, q)| to_out(i + 1, q)).collect();
  info!(target: TARGET_SERVER, count = questions.len(), "HTTP questions served");
  Json(QuestionsOut { questions })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_layout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(layout_out(&state.config))
}
