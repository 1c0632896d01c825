use crate::config::{Config, StorageKind};
use crate::event::PayloadSchema;
use crate::service::audit_log::ProcessingLog;
use crate::service::forwarder::Forwarder;
use crate::storage::ObjectStore;
use crate::storage::driver::{filesystem::FilesystemStorage, s3::S3Storage};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<Forwarder>,
    pub schema: PayloadSchema,
}

impl AppState {
    /// Builds every client once; they are shared by all invocations.
    pub async fn new(config: Config) -> Self {
        let storage_backend: Arc<dyn ObjectStore> = match config.storage {
            StorageKind::Filesystem { root } => Arc::new(FilesystemStorage::new(root)),
            StorageKind::S3(s3_config) => Arc::new(S3Storage::new(s3_config).await),
        };

        let log = ProcessingLog::new(
            storage_backend.clone(),
            config.log_container,
            config.log_object,
        );
        let forwarder = Forwarder::new(
            storage_backend,
            Arc::new(config.routes),
            reqwest::Client::new(),
            config.container,
            log,
        );

        Self::with_forwarder(forwarder, config.schema)
    }

    pub fn with_forwarder(forwarder: Forwarder, schema: PayloadSchema) -> Self {
        AppState {
            forwarder: Arc::new(forwarder),
            schema,
        }
    }
}
