use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;
use crate::event::{Notification, parse_envelopes};
use crate::service::audit_log::LogEntry;
use crate::utils::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EventsOutcome {
    #[serde(rename_all = "camelCase")]
    Validation { validation_response: String },
    Processed { processed: Vec<LogEntry> },
}

/// Entry point for a delivered request body.
///
/// A subscription handshake is answered without forwarding anything. Every
/// other event is parsed up front so a malformed batch is rejected before any
/// object is forwarded; the notifications are then handled one by one.
pub async fn handle_events(state: &AppState, body: Value) -> Result<EventsOutcome, AppError> {
    let envelopes = parse_envelopes(body)?;

    if let Some(validation) = envelopes.iter().find(|e| e.is_subscription_validation()) {
        let code = validation.validation_code()?;
        tracing::info!("answering subscription validation {:?}", validation.id);
        return Ok(EventsOutcome::Validation {
            validation_response: code.to_string(),
        });
    }

    let notifications = envelopes
        .iter()
        .map(|e| Notification::from_payload(&e.data, &state.schema))
        .collect::<Result<Vec<_>, _>>()?;

    let mut processed = Vec::with_capacity(notifications.len());
    for notification in &notifications {
        processed.push(state.forwarder.handle(notification).await?);
    }
    Ok(EventsOutcome::Processed { processed })
}
