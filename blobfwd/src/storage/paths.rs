// PathManager maps container and object names onto the filesystem driver's
// directory tree.
//
// The layout under the configured root is flat:
//
//	<root>
//	└── <container>
//	    └── <object name>
//
// Both levels are single path segments. Names that would escape their parent
// directory are rejected before a path is ever built.

use std::path::{Path, PathBuf};

use crate::storage::StorageError;

#[derive(Clone, Debug)]
pub struct PathManager {
    root_path: PathBuf,
}

impl PathManager {
    pub fn new(root: impl AsRef<Path>) -> Self {
        PathManager {
            root_path: root.as_ref().to_path_buf(),
        }
    }

    /// Returns the path to a container directory,
    /// (e.g. `<root>/<container>`).
    pub fn container_path(&self, container: &str) -> Result<PathBuf, StorageError> {
        validate_segment(container)?;
        Ok(self.root_path.join(container))
    }

    /// Returns the path to a single object,
    /// (e.g. `<root>/<container>/<name>`).
    pub fn object_path(&self, container: &str, name: &str) -> Result<PathBuf, StorageError> {
        validate_segment(name)?;
        Ok(self.container_path(container)?.join(name))
    }

    /// Returns the path an object is staged at before it replaces `name`,
    /// (e.g. `<root>/<container>/.<name>.<id>.upload`).
    pub fn upload_path(&self, container: &str, name: &str, id: &str) -> Result<PathBuf, StorageError> {
        validate_segment(name)?;
        Ok(self
            .container_path(container)?
            .join(format!(".{name}.{id}.upload")))
    }
}

/// Accepts a single, non-empty path segment that cannot leave its parent.
pub fn validate_segment(segment: &str) -> Result<(), StorageError> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains('/')
        || segment.contains('\\')
        || segment.contains('\0')
    {
        return Err(StorageError::InvalidName(segment.to_string()));
    }
    Ok(())
}
