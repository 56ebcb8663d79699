//! Filesystem layout touched by the bootstrap
//!
//! Collects the host paths so tests can redirect everything under a
//! temporary directory.

use std::path::{Path, PathBuf};

/// System resolver configuration file
pub const RESOLV_CONF: &str = "/etc/resolv.conf";

/// Directory holding salt-master configuration fragments
pub const MASTER_D_DIR: &str = "/etc/salt/master.d";

/// Paths written by the bootstrap
#[derive(Debug, Clone)]
pub struct SaltPaths {
    /// Resolver configuration file (default: /etc/resolv.conf)
    pub resolv_conf: PathBuf,
    /// master.d fragment directory (default: /etc/salt/master.d)
    pub master_d: PathBuf,
}

impl Default for SaltPaths {
    fn default() -> Self {
        Self::new()
    }
}

impl SaltPaths {
    /// Create with default host paths
    pub fn new() -> Self {
        Self {
            resolv_conf: PathBuf::from(RESOLV_CONF),
            master_d: PathBuf::from(MASTER_D_DIR),
        }
    }

    /// Create with everything rooted under `base` (useful for testing)
    pub fn with_base(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            resolv_conf: base.join("resolv.conf"),
            master_d: base.join("master.d"),
        }
    }

    /// Path of a named master.d fragment file
    pub fn fragment(&self, name: &str) -> PathBuf {
        self.master_d.join(name)
    }
}
