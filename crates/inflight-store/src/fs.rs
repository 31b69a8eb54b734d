use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::StorageClient;

/// Storage client backed by a local directory tree.
///
/// Objects live at `root/<container>/<key>`. Writes go to a temporary file in
/// the destination directory that is then persisted over the target, so a
/// reader never observes a half-written object. Content types are accepted
/// but not persisted.
#[derive(Clone, Debug)]
pub struct FsStorageClient {
    root: PathBuf,
}

impl FsStorageClient {
    /// Serve objects from `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `container`/`key` to a path below the root.
    ///
    /// Keys are split on `/`; parent segments and empty keys are rejected so
    /// no object can escape its container.
    pub fn object_path(&self, container: &str, key: &str) -> StoreResult<PathBuf> {
        if container.is_empty() || container.contains('/') || container == "." || container == ".."
        {
            return Err(StoreError::InvalidKey {
                key: container.to_string(),
                reason: "container must be a single path segment".into(),
            });
        }

        let mut path = self.root.join(container);
        let mut segments = 0;
        for segment in key.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    return Err(StoreError::InvalidKey {
                        key: key.to_string(),
                        reason: "parent segments are not allowed".into(),
                    })
                }
                other => {
                    path.push(other);
                    segments += 1;
                }
            }
        }

        if segments == 0 {
            return Err(StoreError::InvalidKey {
                key: key.to_string(),
                reason: "key has no segments".into(),
            });
        }
        Ok(path)
    }
}

impl StorageClient for FsStorageClient {
    type Error = StoreError;
    type Body = File;

    fn put_object(
        &self,
        container: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> StoreResult<()> {
        let path = self.object_path(container, key)?;
        let parent = path.parent().ok_or_else(|| StoreError::InvalidKey {
            key: key.to_string(),
            reason: "object has no parent directory".into(),
        })?;
        fs::create_dir_all(parent).map_err(|e| map_io(e, container, key))?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(body)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| map_io(e.error, container, key))?;

        debug!(container, key, len = body.len(), content_type, "object stored");
        Ok(())
    }

    fn get_object(&self, container: &str, key: &str) -> StoreResult<File> {
        let path = self.object_path(container, key)?;
        if path.is_dir() {
            return Err(StoreError::NotFound {
                container: container.to_string(),
                key: key.to_string(),
            });
        }
        let file = File::open(&path).map_err(|e| map_io(e, container, key))?;
        debug!(container, key, "object opened");
        Ok(file)
    }

    fn is_retryable(&self, err: &StoreError) -> bool {
        err.is_transient()
    }
}

fn map_io(err: io::Error, container: &str, key: &str) -> StoreError {
    match err.kind() {
        io::ErrorKind::NotFound => StoreError::NotFound {
            container: container.to_string(),
            key: key.to_string(),
        },
        io::ErrorKind::PermissionDenied => StoreError::AccessDenied {
            container: container.to_string(),
            reason: err.to_string(),
        },
        _ => StoreError::Io(err),
    }
}
