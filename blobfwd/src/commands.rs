use anyhow::Context;
use serde_json::Value;
use tokio::io::AsyncReadExt;

use crate::config::validate_config;
use crate::service::events::{EventsOutcome, handle_events};
use crate::utils::cli::Args;
use crate::utils::state::AppState;

/// Runs one event file (or `-` for stdin) through the handler once.
pub async fn handle_event_file(args: &Args, event: &str) -> anyhow::Result<EventsOutcome> {
    let config = validate_config(args).await?;
    let body = read_event(event).await?;
    let state = AppState::new(config).await;
    Ok(handle_events(&state, body).await?)
}

async fn read_event(path: &str) -> anyhow::Result<Value> {
    let raw = if path == "-" {
        let mut buf = Vec::new();
        tokio::io::stdin().read_to_end(&mut buf).await?;
        buf
    } else {
        tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read event from {path}"))?
    };
    serde_json::from_slice(&raw).context("event is not valid JSON")
}
