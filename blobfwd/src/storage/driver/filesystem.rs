use std::path::{Path, PathBuf};

use crate::storage::paths::PathManager;
use crate::storage::{ObjectStore, StorageError};

use bytes::Bytes;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::{
    fs::{File, create_dir_all, hard_link, remove_file, rename},
    io::{self, AsyncWriteExt, BufWriter},
};

static UPLOAD_SEQ: AtomicU64 = AtomicU64::new(0);

pub struct FilesystemStorage {
    path_manager: PathManager,
}

impl FilesystemStorage {
    pub fn new(root: impl AsRef<Path>) -> Self {
        FilesystemStorage {
            path_manager: PathManager::new(root),
        }
    }

    async fn create_path(&self, path: &Path) -> io::Result<PathBuf> {
        if let Some(parent) = path.parent() {
            create_dir_all(parent).await?;
        }
        Ok(path.to_path_buf())
    }
}

#[async_trait::async_trait]
impl ObjectStore for FilesystemStorage {
    async fn fetch(&self, container: &str, name: &str) -> Result<Bytes, StorageError> {
        let path = self.path_manager.object_path(container, name)?;
        match tokio::fs::read(&path).await {
            Ok(buf) => Ok(Bytes::from(buf)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StorageError::NotFound {
                container: container.to_string(),
                name: name.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(
        &self,
        container: &str,
        name: &str,
        data: Bytes,
        overwrite: bool,
    ) -> Result<(), StorageError> {
        let path = self
            .create_path(&self.path_manager.object_path(container, name)?)
            .await?;
        let upload_path = self.path_manager.upload_path(
            container,
            name,
            &format!(
                "{}-{}",
                std::process::id(),
                UPLOAD_SEQ.fetch_add(1, Ordering::Relaxed)
            ),
        )?;

        let result = async {
            let mut writer = BufWriter::new(File::create(&upload_path).await?);
            writer.write_all(&data).await?;
            writer.flush().await?;
            writer.into_inner().sync_all().await?;

            // Readers only ever see the old or the new object, never a partial one.
            if overwrite {
                rename(&upload_path, &path).await
            } else {
                hard_link(&upload_path, &path).await
            }
        }
        .await;

        if !overwrite || result.is_err() {
            let _ = remove_file(&upload_path).await;
        }
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(StorageError::AlreadyExists {
                container: container.to_string(),
                name: name.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}
