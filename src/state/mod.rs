//! State application
//!
//! [`StateAction`] describes one desired configuration ("these lines are
//! present in this file", "this service was restarted"); a [`StateBackend`]
//! makes it true on the machine and reports whether anything actually
//! changed. The [`ExecutionContext`] bundles host grains, paths, and the
//! backend, and is built once at process start.

pub mod apply;
pub mod local;
pub mod mock;
pub mod paths;
pub mod restart;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use crate::BootstrapError;
pub use paths::SaltPaths;

/// Host OS classification driving action selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    /// Everything that is not Windows
    Default,
}

impl std::fmt::Display for OsFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OsFamily::Windows => write!(f, "windows"),
            OsFamily::Default => write!(f, "default"),
        }
    }
}

/// Host-identifying facts, determined once per run
#[derive(Debug, Clone)]
pub struct Grains {
    pub os_family: OsFamily,
}

impl Grains {
    /// Detect grains for the running host
    pub fn detect() -> Self {
        let os_family = if std::env::consts::OS == "windows" {
            OsFamily::Windows
        } else {
            OsFamily::Default
        };
        Self { os_family }
    }

    pub fn with_os_family(os_family: OsFamily) -> Self {
        Self { os_family }
    }

    /// Shell used for any commands the bootstrap shells out to
    pub fn shell(&self) -> &'static str {
        match self.os_family {
            OsFamily::Windows => "powershell",
            OsFamily::Default => "/usr/bin/sh",
        }
    }

    /// Location of the salt minion configuration on this host
    pub fn minion_config_path(&self) -> &'static str {
        match self.os_family {
            OsFamily::Windows => r"c:\salt\conf\minion",
            OsFamily::Default => "/etc/salt/minion",
        }
    }
}

/// One desired configuration, applied uniformly by a [`StateBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum StateAction {
    /// Ensure each line is present in the file, preserving unrelated lines
    EnsureLines { path: PathBuf, lines: Vec<String> },
    /// Set static DNS servers on a network adapter
    StaticDns {
        interface: String,
        servers: Vec<String>,
    },
    /// Serialize a structured value to a file as YAML
    SerializeFile { path: PathBuf, data: Value },
    /// Restart a system service
    RestartService { name: String },
}

impl StateAction {
    /// Identifier used as the result name and in error messages
    pub fn name(&self) -> String {
        match self {
            StateAction::EnsureLines { path, .. } => path.display().to_string(),
            StateAction::StaticDns { interface, .. } => interface.clone(),
            StateAction::SerializeFile { path, .. } => path.display().to_string(),
            StateAction::RestartService { name } => name.clone(),
        }
    }
}

/// Outcome of applying one state action
#[derive(Debug, Clone, Serialize)]
pub struct ApplyResult {
    /// State identifier (file path, adapter, or service name)
    pub name: String,
    /// Whether the action changed anything on the machine
    pub changed: bool,
    /// Human-readable summary
    pub comment: String,
    /// Opaque description of what changed, for display only
    #[serde(skip_serializing_if = "Value::is_null")]
    pub changes: Value,
}

impl ApplyResult {
    pub fn unchanged(name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            changed: false,
            comment: comment.into(),
            changes: Value::Null,
        }
    }

    pub fn changed(name: impl Into<String>, comment: impl Into<String>, changes: Value) -> Self {
        Self {
            name: name.into(),
            changed: true,
            comment: comment.into(),
            changes,
        }
    }
}

/// The external state-application capability
///
/// Applies a described state and reports whether it changed anything.
/// Substitutable with [`mock::MockState`] in tests.
#[async_trait]
pub trait StateBackend: Send + Sync {
    async fn apply(&self, action: &StateAction) -> Result<ApplyResult, BootstrapError>;
}

#[async_trait]
impl<T: StateBackend + ?Sized> StateBackend for std::sync::Arc<T> {
    async fn apply(&self, action: &StateAction) -> Result<ApplyResult, BootstrapError> {
        (**self).apply(action).await
    }
}

/// Everything a run needs to apply state, built once at process start
pub struct ExecutionContext {
    pub grains: Grains,
    pub paths: SaltPaths,
    backend: Box<dyn StateBackend>,
}

impl ExecutionContext {
    pub fn new(grains: Grains, paths: SaltPaths, backend: Box<dyn StateBackend>) -> Self {
        debug!(
            "Execution context: os_family={}, shell={}, minion_config={}",
            grains.os_family,
            grains.shell(),
            grains.minion_config_path()
        );
        Self {
            grains,
            paths,
            backend,
        }
    }

    /// Context for the running host, backed by [`local::LocalState`]
    pub fn local() -> Self {
        let grains = Grains::detect();
        let backend = Box::new(local::LocalState::new(grains.os_family));
        Self::new(grains, SaltPaths::new(), backend)
    }

    /// Apply one action through the backend
    pub async fn apply(&self, action: &StateAction) -> Result<ApplyResult, BootstrapError> {
        self.backend.apply(action).await
    }
}
