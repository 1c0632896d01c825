use std::sync::Arc;

use bytes::Bytes;
use reqwest::StatusCode;

use crate::error::AppError;
use crate::event::Notification;
use crate::routing::RoutingTable;
use crate::service::audit_log::{LogEntry, ProcessingLog};
use crate::storage::ObjectStore;

/// Result of a POST that reached the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub status: StatusCode,
}

/// Fetches an object, posts it to the destination for its data type and
/// records the outcome in the processing log.
pub struct Forwarder {
    store: Arc<dyn ObjectStore>,
    routes: Arc<RoutingTable>,
    http: reqwest::Client,
    container: String,
    log: ProcessingLog,
}

impl Forwarder {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        routes: Arc<RoutingTable>,
        http: reqwest::Client,
        container: impl Into<String>,
        log: ProcessingLog,
    ) -> Self {
        Self {
            store,
            routes,
            http,
            container: container.into(),
            log,
        }
    }

    pub async fn handle(&self, notification: &Notification) -> Result<LogEntry, AppError> {
        self.process(&notification.object_id, &notification.data_type)
            .await
    }

    /// Forwards one object and appends exactly one entry to the processing
    /// log. Forwarding errors end up in that entry; only a failed log write is
    /// returned as `Err`.
    pub async fn process(&self, object_id: &str, data_type: &str) -> Result<LogEntry, AppError> {
        let entry = match self.forward(object_id, data_type).await {
            Ok((destination, delivery)) if delivery.status == StatusCode::OK => {
                tracing::info!("Successfully sent blob '{object_id}' to {destination}.");
                LogEntry::success(object_id)
            }
            Ok((destination, delivery)) => {
                let code = delivery.status.as_u16();
                tracing::warn!(
                    "Failed to send blob '{object_id}' to {destination}. Status code: {code}"
                );
                LogEntry::failed(object_id, format!("Status code: {code}"))
            }
            Err(e) => {
                tracing::error!("Error processing blob '{object_id}': {e}");
                LogEntry::error(object_id, e.to_string())
            }
        };

        self.log.append(entry.clone()).await?;
        Ok(entry)
    }

    async fn forward(&self, object_id: &str, data_type: &str) -> Result<(String, Delivery), AppError> {
        let data = self.store.fetch(&self.container, object_id).await?;

        let destination = self
            .routes
            .resolve(data_type)
            .ok_or_else(|| AppError::Configuration(data_type.to_string()))?
            .to_string();

        let delivery = self.post(&destination, data).await?;
        Ok((destination, delivery))
    }

    async fn post(&self, destination: &str, data: Bytes) -> Result<Delivery, AppError> {
        tracing::debug!("POST {} bytes to {destination}", data.len());
        let resp = self.http.post(destination).body(data).send().await?;
        Ok(Delivery {
            status: resp.status(),
        })
    }
}
