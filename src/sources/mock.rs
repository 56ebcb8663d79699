//! Mock argument source for testing
//!
//! Configurable in-memory [`ArgumentSource`] used by unit and integration
//! tests.

use async_trait::async_trait;

use super::ArgumentSource;
use crate::BootstrapError;

/// Mock argument source
///
/// # Example
/// ```
/// use butio_salt_rs::sources::mock::MockSource;
///
/// let mock = MockSource::new()
///     .with_args(r#"{"dns_servers": []}"#)
///     .with_search_line("search c.proj1.internal google.internal");
/// ```
pub struct MockSource {
    args: Option<String>,
    search_line: String,
    fallback_nameserver: String,
    identity_unavailable: bool,
}

impl MockSource {
    /// Create a new mock source with default values
    pub fn new() -> Self {
        Self {
            args: None,
            search_line: "search c.test-project.internal google.internal".to_string(),
            fallback_nameserver: "169.254.169.254".to_string(),
            identity_unavailable: false,
        }
    }

    /// Set the raw argument blob to return
    pub fn with_args(mut self, args: impl Into<String>) -> Self {
        self.args = Some(args.into());
        self
    }

    /// Set the search-domain line
    pub fn with_search_line(mut self, line: impl Into<String>) -> Self {
        self.search_line = line.into();
        self
    }

    /// Set the fallback nameserver
    pub fn with_fallback_nameserver(mut self, addr: impl Into<String>) -> Self {
        self.fallback_nameserver = addr.into();
        self
    }

    /// Make the identity lookup fail, as if the metadata key were absent
    pub fn with_identity_unavailable(mut self) -> Self {
        self.identity_unavailable = true;
        self
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArgumentSource for MockSource {
    fn name(&self) -> &'static str {
        "Mock"
    }

    fn args_label(&self) -> &'static str {
        "butio_salt_args (mock)"
    }

    async fn fetch_args(&self) -> Result<String, BootstrapError> {
        self.args.clone().ok_or_else(|| {
            BootstrapError::MetadataUnavailable("mock: no args configured".to_string())
        })
    }

    async fn dns_search_line(&self) -> Result<String, BootstrapError> {
        if self.identity_unavailable {
            return Err(BootstrapError::MetadataUnavailable(
                "project/project-id".to_string(),
            ));
        }
        Ok(self.search_line.clone())
    }

    fn fallback_nameserver(&self) -> &str {
        &self.fallback_nameserver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_source_defaults() {
        let mock = MockSource::new();
        assert_eq!(mock.name(), "Mock");
        assert!(mock.fetch_args().await.is_err());
        assert!(mock.dns_search_line().await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_source_configured() {
        let mock = MockSource::new()
            .with_args("{}")
            .with_search_line("search test")
            .with_fallback_nameserver("10.0.0.1");

        assert_eq!(mock.fetch_args().await.unwrap(), "{}");
        assert_eq!(mock.dns_search_line().await.unwrap(), "search test");
        assert_eq!(mock.fallback_nameserver(), "10.0.0.1");
    }

    #[tokio::test]
    async fn test_mock_source_identity_unavailable() {
        let mock = MockSource::new().with_identity_unavailable();
        let err = mock.dns_search_line().await.unwrap_err();
        assert!(matches!(err, BootstrapError::MetadataUnavailable(_)));
    }
}
