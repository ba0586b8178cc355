//! Telemetry initialization (tracing/tracing-subscriber) and the log targets used across the crate.
//!
//! Behavior:
//! - LOG_LEVEL controls the filter (e.g. "debug" or detailed directives like
//!   "info,quiz=debug,tracking=trace,handpose_quiz=debug,tower_http=info").
//! - LOG_FORMAT selects "pretty" (default) or "json" structured logs.

use tracing_subscriber::EnvFilter;

/// Server, config and session lifecycle.
pub const TARGET_SERVER: &str = "handpose_quiz";
/// Game state transitions.
pub const TARGET_QUIZ: &str = "quiz";
/// Detector ingestion and the hand snapshot slot.
pub const TARGET_TRACKING: &str = "tracking";

/// Per-target levels used when LOG_LEVEL is unset.
const DEFAULT_LEVELS: [(&str, &str); 3] = [(TARGET_SERVER, "debug"), (TARGET_QUIZ, "debug"), (TARGET_TRACKING, "info")];

fn default_directives() -> String {
    let mut directives = vec!["info".to_string()];
    directives.extend(DEFAULT_LEVELS.iter().map(|(target, level)| format!("{target}={level}")));
    directives.push("tower_http=info".into());
    directives.push("axum=info".into());
    directives.join(",")
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(default_directives()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => {
            builder.json().init();
        }
        _ => {
            builder.init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_names_every_crate_target() {
        let directives = default_directives();
        assert_eq!(directives, "info,handpose_quiz=debug,quiz=debug,tracking=info,tower_http=info,axum=info");
        assert!(directives.parse::<EnvFilter>().is_ok());
    }
}
