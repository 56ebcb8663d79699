//! GCE (Google Compute Engine) argument source
//!
//! Fetches instance and project metadata from the GCE metadata server.
//! <https://cloud.google.com/compute/docs/metadata/overview>

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::ArgumentSource;
use crate::BootstrapError;

/// GCE metadata service base URL
const GCE_METADATA_URL: &str = "http://metadata.google.internal/computeMetadata/v1";

/// Required header for GCE metadata requests
const METADATA_FLAVOR_HEADER: &str = "Metadata-Flavor";
const METADATA_FLAVOR_VALUE: &str = "Google";

/// Instance attribute holding the provisioning argument blob
const ARGS_KEY: &str = "attributes/butio_salt_args";

/// Project metadata key for the provider identity
const PROJECT_ID_KEY: &str = "project-id";

/// GCE metadata server nameserver, appended as the DNS fallback
const FALLBACK_NAMESERVER: &str = "169.254.169.254";

/// Client for the GCE metadata server
pub struct GceMetadata {
    client: Client,
    base_url: String,
}

impl GceMetadata {
    pub fn new() -> Self {
        Self::with_base_url(GCE_METADATA_URL)
    }

    /// Create with a custom base URL (for testing)
    pub fn with_base_url(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .connect_timeout(Duration::from_secs(2))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    /// Fetch a metadata path with the required Metadata-Flavor header
    ///
    /// 200 yields the body; any other status yields `None`. Transport
    /// failures propagate, since the run cannot proceed without the
    /// metadata service at all.
    async fn fetch(&self, path: &str) -> Result<Option<String>, BootstrapError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("Fetching GCE metadata: {}", url);

        let response = self
            .client
            .get(&url)
            .header(METADATA_FLAVOR_HEADER, METADATA_FLAVOR_VALUE)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(Some(response.text().await?))
        } else {
            debug!("GCE metadata {} returned {}", path, response.status());
            Ok(None)
        }
    }

    /// Fetch an instance metadata value
    pub async fn instance_value(&self, key: &str) -> Result<Option<String>, BootstrapError> {
        self.fetch(&format!("instance/{key}")).await
    }

    /// Fetch a project metadata value
    pub async fn project_value(&self, key: &str) -> Result<Option<String>, BootstrapError> {
        self.fetch(&format!("project/{key}")).await
    }
}

impl Default for GceMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// Argument source backed by the GCE metadata server
pub struct GceSource {
    metadata: GceMetadata,
}

impl GceSource {
    pub fn new() -> Self {
        Self {
            metadata: GceMetadata::new(),
        }
    }

    /// Create with a custom metadata base URL (for testing)
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            metadata: GceMetadata::with_base_url(base_url),
        }
    }
}

impl Default for GceSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArgumentSource for GceSource {
    fn name(&self) -> &'static str {
        "GCE"
    }

    fn args_label(&self) -> &'static str {
        "butio_salt_args"
    }

    async fn fetch_args(&self) -> Result<String, BootstrapError> {
        self.metadata
            .instance_value(ARGS_KEY)
            .await?
            .ok_or_else(|| BootstrapError::MetadataUnavailable(format!("instance/{ARGS_KEY}")))
    }

    async fn dns_search_line(&self) -> Result<String, BootstrapError> {
        let project_id = self
            .metadata
            .project_value(PROJECT_ID_KEY)
            .await?
            .ok_or_else(|| {
                BootstrapError::MetadataUnavailable(format!("project/{PROJECT_ID_KEY}"))
            })?;

        Ok(format!("search c.{project_id}.internal google.internal"))
    }

    fn fallback_nameserver(&self) -> &str {
        FALLBACK_NAMESERVER
    }
}
