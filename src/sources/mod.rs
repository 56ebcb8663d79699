//! Provisioning argument sources
//!
//! Each cloud provider implements [`ArgumentSource`] to supply the raw
//! argument blob and the provider-specific pieces of the resolver
//! configuration. The pipeline depends only on this trait, never on a
//! concrete provider.

pub mod file;
pub mod gce;
pub mod mock;

use async_trait::async_trait;

use crate::BootstrapError;

/// Trait for provisioning argument sources
#[async_trait]
pub trait ArgumentSource: Send + Sync {
    /// Name of this source (e.g., "GCE", "File")
    fn name(&self) -> &'static str;

    /// Label for the argument blob, used in parse diagnostics
    fn args_label(&self) -> &'static str;

    /// Fetch the raw JSON provisioning argument blob
    ///
    /// Fatal if the blob cannot be obtained; a bootstrap run cannot
    /// proceed without its arguments.
    async fn fetch_args(&self) -> Result<String, BootstrapError>;

    /// The search-domain line placed first in the resolver configuration
    ///
    /// Providers derive this from their identity metadata (e.g. the GCE
    /// project id); fatal if that identity is unavailable.
    async fn dns_search_line(&self) -> Result<String, BootstrapError>;

    /// The fixed fallback nameserver appended last
    fn fallback_nameserver(&self) -> &str;
}
