//! File system-based atomic blob store.
//!
//! Writes follow the write-to-temp-then-rename sequence:
//!
//! 1. Write data to a temporary file in the target's directory
//! 2. `fsync` the temporary file
//! 3. Atomically rename it over the target
//! 4. `fsync` the parent directory (Unix only)
//!
//! Readers therefore see either the old or the new content, never a partial write.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use super::error::{StorageError, StorageResult};
use super::traits::AtomicBlobStore;

/// Blob store rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    directory: PathBuf,
}

impl FsBlobStore {
    /// Opens a blob store rooted at `directory`, creating it if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new<P: AsRef<Path>>(directory: P) -> StorageResult<Self> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory).map_err(|err| {
            StorageError::io(
                format!("create blob store directory '{}'", directory.display()),
                &err,
            )
        })?;
        Ok(Self { directory })
    }

    /// Root directory of the store.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Resolves a blob name to a path, rejecting names that escape the root.
    fn blob_path(&self, name: &str) -> StorageResult<PathBuf> {
        let relative = Path::new(name);
        let is_plain = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if name.is_empty() || !is_plain {
            return Err(StorageError::BlobStore(format!("invalid blob name '{name}'")));
        }
        Ok(self.directory.join(relative))
    }

    fn temp_path(path: &Path) -> StorageResult<PathBuf> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                StorageError::BlobStore(format!("invalid blob path '{}'", path.display()))
            })?;
        Ok(path.with_file_name(format!(".{file_name}.tmp")))
    }

    #[cfg(unix)]
    fn sync_directory(directory: &Path) -> StorageResult<()> {
        File::open(directory)
            .and_then(|dir| dir.sync_all())
            .map_err(|err| {
                StorageError::io(format!("sync directory '{}'", directory.display()), &err)
            })
    }

    #[cfg(not(unix))]
    fn sync_directory(_directory: &Path) -> StorageResult<()> {
        Ok(())
    }
}

impl AtomicBlobStore for FsBlobStore {
    fn read(&self, name: &str) -> StorageResult<Option<Vec<u8>>> {
        let path = self.blob_path(name)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::io(format!("read blob '{name}'"), &err)),
        }
    }

    fn write_atomic(&self, name: &str, bytes: &[u8]) -> StorageResult<()> {
        let path = self.blob_path(name)?;
        let parent = path.parent().unwrap_or(&self.directory).to_path_buf();
        fs::create_dir_all(&parent).map_err(|err| {
            StorageError::io(format!("create directory '{}'", parent.display()), &err)
        })?;

        let temp = Self::temp_path(&path)?;
        let write_result = File::create(&temp).and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        });
        if let Err(err) = write_result {
            let _ = fs::remove_file(&temp);
            return Err(StorageError::io(format!("write blob '{name}'"), &err));
        }

        if let Err(err) = fs::rename(&temp, &path) {
            let _ = fs::remove_file(&temp);
            return Err(StorageError::io(format!("rename blob '{name}'"), &err));
        }
        Self::sync_directory(&parent)
    }

    fn delete(&self, name: &str) -> StorageResult<()> {
        let path = self.blob_path(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::io(format!("delete blob '{name}'"), &err)),
        }
    }
}
