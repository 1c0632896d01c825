//! S3-compatible driver: containers are buckets, object names are keys.

use crate::storage::{ObjectStore, StorageError};

use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct S3Config {
    /// Custom endpoint for S3-compatible services (MinIO, RustFS, ...).
    pub endpoint_url: Option<String>,
    pub region: Option<String>,
}

pub struct S3Storage {
    client: Client,
}

impl S3Storage {
    pub async fn new(config: S3Config) -> Self {
        let mut loader = aws_config::ConfigLoader::default();
        if let Some(region) = config.region {
            loader = loader.region(aws_config::Region::new(region));
        }
        if let Some(endpoint) = config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let conf = loader.load().await;
        Self::from_client(Client::new(&conf))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3Storage {
    async fn fetch(&self, container: &str, name: &str) -> Result<Bytes, StorageError> {
        let resp = self
            .client
            .get_object()
            .bucket(container)
            .key(name)
            .send()
            .await
            .map_err(|err| {
                let err = err.into_service_error();
                if err.is_no_such_key() {
                    StorageError::NotFound {
                        container: container.to_string(),
                        name: name.to_string(),
                    }
                } else {
                    StorageError::Backend(format!("get_object {container}/{name}: {err}"))
                }
            })?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(format!("read body of {container}/{name}: {e}")))?;
        Ok(data.into_bytes())
    }

    async fn store(
        &self,
        container: &str,
        name: &str,
        data: Bytes,
        overwrite: bool,
    ) -> Result<(), StorageError> {
        let mut req = self
            .client
            .put_object()
            .bucket(container)
            .key(name)
            .body(ByteStream::from(data));
        if !overwrite {
            req = req.if_none_match("*");
        }

        match req.send().await {
            Ok(_) => Ok(()),
            // 412: the `If-None-Match: *` precondition found an existing key.
            Err(err) if err.raw_response().map(|r| r.status().as_u16()) == Some(412) => {
                Err(StorageError::AlreadyExists {
                    container: container.to_string(),
                    name: name.to_string(),
                })
            }
            Err(err) => Err(StorageError::Backend(format!(
                "put_object {container}/{name}: {}",
                err.into_service_error()
            ))),
        }
    }
}
