//! Directory-backed byte store used by the file service.
//!
//! Filenames are joined under the root as given; the extension allow-list
//! gates both reads and writes. Same-name writes replace the prior file,
//! last writer wins.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::http::mime;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Extension is not on the allow-list.
    #[error("unsupported file type")]
    UnsupportedType,
    #[error("file not found")]
    NotFound,
    #[error("storage failure: {0}")]
    Io(#[from] std::io::Error),
}

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads a stored file. The allow-list gates every read.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        self.check_extension(name)?;
        self.read_unchecked(name).await
    }

    /// Reads a stored file without consulting the allow-list.
    ///
    /// Reserved for fixed names such as the favicon.
    pub async fn read_unchecked(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        match tokio::fs::read(self.root.join(name)).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Creates or overwrites a stored file.
    pub async fn write(&self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        self.check_extension(name)?;
        tokio::fs::write(self.root.join(name), data).await?;
        Ok(())
    }

    fn check_extension(&self, name: &str) -> Result<(), StoreError> {
        let ext = mime::extension(name).unwrap_or("");
        if !mime::is_supported(ext) {
            return Err(StoreError::UnsupportedType);
        }
        Ok(())
    }
}
