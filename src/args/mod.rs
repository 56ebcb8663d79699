//! Provisioning argument parsing and resolution
//!
//! Handles the JSON blob handed to the instance via metadata
//! (`instance/attributes/butio_salt_args`).

pub mod diagnostic;
pub mod resolve;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::BootstrapError;

/// Parsed provisioning arguments
///
/// Every top-level field is optional at parse time; the resolver enforces
/// presence so the error can name the missing key. The fragment mapping
/// keeps the document's own key order (serde_json `preserve_order`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisioningArgs {
    /// Extra nameserver addresses, in the order they should appear
    pub dns_servers: Option<Vec<String>>,

    /// Master configuration fragments, one file per key under master.d
    #[serde(rename = "/etc/salt/master.d/")]
    pub master_config: Option<Map<String, Value>>,

    /// Where the salt bootstrap script should be saved
    pub bootstrap_salt_save_path: Option<String>,

    /// Hash algorithm for verifying the bootstrap script
    pub bootstrap_salt_hash_type: Option<String>,

    /// Expected digest of the bootstrap script
    pub bootstrap_salt_expected_hash: Option<String>,
}

/// Parse a provisioning argument blob
///
/// `description` labels the block in diagnostics only. Malformed JSON
/// yields [`BootstrapError::ConfigSyntax`] with a rendered diagnostic that
/// highlights a line near the mistake; the caller prints it and exits 1.
pub fn parse(text: &str, description: &str) -> Result<ProvisioningArgs, BootstrapError> {
    serde_json::from_str(text).map_err(|err| BootstrapError::ConfigSyntax {
        description: description.to_string(),
        diagnostic: diagnostic::render(text, &err, description),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_document() {
        let text = r#"{
            "dns_servers": ["10.0.0.5", "10.0.0.6"],
            "/etc/salt/master.d/": {"a.conf": {"k": 1}},
            "bootstrap_salt_save_path": "/tmp/bootstrap-salt.sh",
            "bootstrap_salt_hash_type": "sha256",
            "bootstrap_salt_expected_hash": "deadbeef"
        }"#;

        let args = parse(text, "butio_salt_args").unwrap();
        assert_eq!(
            args.dns_servers,
            Some(vec!["10.0.0.5".to_string(), "10.0.0.6".to_string()])
        );
        let fragments = args.master_config.unwrap();
        assert_eq!(fragments.get("a.conf"), Some(&json!({"k": 1})));
        assert_eq!(
            args.bootstrap_salt_save_path,
            Some("/tmp/bootstrap-salt.sh".to_string())
        );
        assert_eq!(args.bootstrap_salt_hash_type, Some("sha256".to_string()));
        assert_eq!(
            args.bootstrap_salt_expected_hash,
            Some("deadbeef".to_string())
        );
    }

    #[test]
    fn test_parse_round_trip() {
        let text = r#"{
            "dns_servers": ["10.0.0.5"],
            "/etc/salt/master.d/": {"reactor.conf": {"reactor": []}},
            "bootstrap_salt_save_path": "/tmp/bootstrap-salt.sh",
            "bootstrap_salt_hash_type": "sha256",
            "bootstrap_salt_expected_hash": "abc123"
        }"#;

        let args = parse(text, "round-trip").unwrap();
        let serialized = serde_json::to_string(&args).unwrap();
        let reparsed = parse(&serialized, "round-trip").unwrap();
        assert_eq!(args, reparsed);
    }

    #[test]
    fn test_parse_missing_fields_is_not_a_parse_error() {
        // Presence is the resolver's job; the loader only cares about
        // valid JSON.
        let args = parse("{}", "butio_salt_args").unwrap();
        assert!(args.dns_servers.is_none());
        assert!(args.master_config.is_none());
    }

    #[test]
    fn test_parse_malformed_never_returns_document() {
        let err = parse("{\"dns_servers\": [}", "butio_salt_args").unwrap_err();
        match err {
            BootstrapError::ConfigSyntax { description, .. } => {
                assert_eq!(description, "butio_salt_args");
            }
            other => panic!("expected ConfigSyntax, got {other:?}"),
        }
    }

    #[test]
    fn test_fragment_order_preserved() {
        let text = r#"{"/etc/salt/master.d/": {"z.conf": 1, "a.conf": 2, "m.conf": 3}}"#;
        let args = parse(text, "order").unwrap();
        let keys: Vec<&String> = args.master_config.as_ref().unwrap().keys().collect();
        assert_eq!(keys, ["z.conf", "a.conf", "m.conf"]);
    }
}
