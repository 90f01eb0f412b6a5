//! File-per-key blob store under the user data directory
//!
//! Each key maps to one file inside the store's root directory, so a
//! session survives process restarts. `clear` removes the whole directory,
//! which drops every key in a single operation.

use std::io::ErrorKind;
use std::path::PathBuf;

use super::{BlobStore, StoreError};

/// Durable store rooted at a directory
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open the store at the platform data directory
    /// (e.g. `~/.local/share/refpaint/session` on Linux).
    pub fn open_default() -> Self {
        Self::new(Self::default_root())
    }

    fn default_root() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("refpaint")
            .join("session")
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.bin", sanitize(key)))
    }
}

/// Map a key to a safe file-name stem
fn sanitize(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl BlobStore for DirStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match std::fs::read(self.file_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(self.file_path(key), bytes)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.file_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match std::fs::remove_dir_all(&self.root) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
