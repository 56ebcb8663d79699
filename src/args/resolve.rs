//! Resolves parsed provisioning arguments into concrete bootstrap inputs
//!
//! Turns the document plus provider context (search domain, fallback
//! nameserver) into the ordered resolver-config lines and the master.d
//! fragment set. Absence of a required top-level field is fatal here, so
//! the error can name the key the operator forgot.

use serde_json::{Map, Value};

use super::ProvisioningArgs;
use crate::BootstrapError;
use crate::sources::ArgumentSource;

/// Ordered resolver configuration lines
///
/// Order is significant: search domain first, operator-supplied
/// nameservers in document order, then the provider's fixed fallback
/// nameserver last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsEntries {
    lines: Vec<String>,
}

impl DnsEntries {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Fully resolved bootstrap inputs
#[derive(Debug, Clone)]
pub struct ResolvedArgs {
    pub dns_entries: DnsEntries,
    pub master_config: Map<String, Value>,
    pub bootstrap_salt_save_path: String,
    pub bootstrap_salt_hash_type: String,
    pub bootstrap_salt_expected_hash: String,
}

/// Resolve a parsed document against a provider argument source
pub async fn resolve(
    args: &ProvisioningArgs,
    source: &dyn ArgumentSource,
) -> Result<ResolvedArgs, BootstrapError> {
    let servers = args
        .dns_servers
        .as_ref()
        .ok_or(BootstrapError::MissingField("dns_servers"))?;

    let mut lines = Vec::with_capacity(servers.len() + 2);
    lines.push(source.dns_search_line().await?);
    for server in servers {
        lines.push(format!("nameserver {server}"));
    }
    lines.push(format!("nameserver {}", source.fallback_nameserver()));

    let master_config = args
        .master_config
        .clone()
        .ok_or(BootstrapError::MissingField("/etc/salt/master.d/"))?;

    Ok(ResolvedArgs {
        dns_entries: DnsEntries { lines },
        master_config,
        bootstrap_salt_save_path: args
            .bootstrap_salt_save_path
            .clone()
            .ok_or(BootstrapError::MissingField("bootstrap_salt_save_path"))?,
        bootstrap_salt_hash_type: args
            .bootstrap_salt_hash_type
            .clone()
            .ok_or(BootstrapError::MissingField("bootstrap_salt_hash_type"))?,
        bootstrap_salt_expected_hash: args
            .bootstrap_salt_expected_hash
            .clone()
            .ok_or(BootstrapError::MissingField("bootstrap_salt_expected_hash"))?,
    })
}
