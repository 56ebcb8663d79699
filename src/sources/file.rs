//! File-backed argument source
//!
//! Reads the provisioning argument blob from a local JSON file instead of
//! the metadata service. Used for dev runs and for environments that stage
//! arguments on disk; the search line and fallback nameserver have no
//! provider to come from, so they are configured on the source.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::ArgumentSource;
use crate::BootstrapError;

/// Argument source backed by a local JSON file
pub struct FileSource {
    path: PathBuf,
    search_line: String,
    fallback_nameserver: String,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            search_line: "search local".to_string(),
            fallback_nameserver: "169.254.169.254".to_string(),
        }
    }

    /// Set the search-domain line emitted first
    pub fn with_search_line(mut self, line: impl Into<String>) -> Self {
        self.search_line = line.into();
        self
    }

    /// Set the fallback nameserver appended last
    pub fn with_fallback_nameserver(mut self, addr: impl Into<String>) -> Self {
        self.fallback_nameserver = addr.into();
        self
    }
}

#[async_trait]
impl ArgumentSource for FileSource {
    fn name(&self) -> &'static str {
        "File"
    }

    fn args_label(&self) -> &'static str {
        "butio_salt_args (file)"
    }

    async fn fetch_args(&self) -> Result<String, BootstrapError> {
        debug!("Reading provisioning args from {}", self.path.display());
        fs::read_to_string(&self.path).await.map_err(|e| {
            BootstrapError::MetadataUnavailable(format!("{}: {e}", self.path.display()))
        })
    }

    async fn dns_search_line(&self) -> Result<String, BootstrapError> {
        Ok(self.search_line.clone())
    }

    fn fallback_nameserver(&self) -> &str {
        &self.fallback_nameserver
    }
}
