#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use blobfwd::routing::RoutingTable;
use blobfwd::service::audit_log::{DEFAULT_LOG_OBJECT, ProcessingLog};
use blobfwd::service::forwarder::Forwarder;
use blobfwd::storage::ObjectStore;
use blobfwd::storage::driver::filesystem::FilesystemStorage;
use tempfile::TempDir;

pub const CONTAINER: &str = "incoming";
pub const LOG_CONTAINER: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub path: String,
    pub body: Bytes,
}

/// A local HTTP endpoint that records every POST and answers with a fixed status.
#[derive(Clone)]
pub struct Destination {
    pub base_url: String,
    status: StatusCode,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Destination {
    pub async fn spawn(status: StatusCode) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let dest = Destination {
            base_url: format!("http://{addr}"),
            status,
            requests: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route("/{*path}", post(record))
            .with_state(dest.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        dest
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

async fn record(
    State(dest): State<Destination>,
    Path(path): Path<String>,
    body: Bytes,
) -> StatusCode {
    dest.requests.lock().unwrap().push(Recorded { path, body });
    dest.status
}

pub struct Harness {
    pub tmp: TempDir,
    pub store: Arc<dyn ObjectStore>,
    pub log: ProcessingLog,
    pub forwarder: Forwarder,
}

impl Harness {
    pub fn new(routes: RoutingTable) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let store: Arc<dyn ObjectStore> = Arc::new(FilesystemStorage::new(tmp.path()));
        Self::with_store(tmp, store, routes)
    }

    pub fn with_store(tmp: TempDir, store: Arc<dyn ObjectStore>, routes: RoutingTable) -> Self {
        let log = ProcessingLog::new(store.clone(), LOG_CONTAINER, DEFAULT_LOG_OBJECT);
        let forwarder = Forwarder::new(
            store.clone(),
            Arc::new(routes),
            reqwest::Client::new(),
            CONTAINER,
            log.clone(),
        );
        Self {
            tmp,
            store,
            log,
            forwarder,
        }
    }

    pub async fn put_object(&self, name: &str, data: &'static [u8]) {
        self.store
            .store(CONTAINER, name, Bytes::from_static(data), true)
            .await
            .unwrap();
    }
}
