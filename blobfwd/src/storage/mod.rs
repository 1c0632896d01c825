use bytes::Bytes;
use std::io;
use thiserror::Error;

pub mod driver;
pub mod paths;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("object {container}/{name} not found")]
    NotFound { container: String, name: String },

    #[error("object {container}/{name} already exists")]
    AlreadyExists { container: String, name: String },

    #[error("invalid object or container name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Key-addressed blob storage, grouped into containers.
///
/// `fetch` fails with [`StorageError::NotFound`] when the object does not
/// exist. `store` with `overwrite == false` fails with
/// [`StorageError::AlreadyExists`] instead of replacing an existing object.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    async fn fetch(&self, container: &str, name: &str) -> Result<Bytes, StorageError>;
    async fn store(
        &self,
        container: &str,
        name: &str,
        data: Bytes,
        overwrite: bool,
    ) -> Result<(), StorageError>;
}
