//! State applier
//!
//! Selects the OS-appropriate action for each resolved input, applies it
//! through the execution context, and displays every result as it is
//! produced. Fragments are applied independently; no fragment's outcome
//! depends on another's.

use serde_json::{Map, Value};
use tracing::info;

use super::{ApplyResult, ExecutionContext, OsFamily, StateAction};
use crate::BootstrapError;
use crate::args::resolve::DnsEntries;
use crate::output;

/// Primary network adapter configured on Windows hosts
pub const PRIMARY_INTERFACE: &str = "Local Area Connection";

/// Applies resolved provisioning state through an [`ExecutionContext`]
pub struct StateApplier<'a> {
    ctx: &'a ExecutionContext,
}

impl<'a> StateApplier<'a> {
    pub fn new(ctx: &'a ExecutionContext) -> Self {
        Self { ctx }
    }

    /// Apply the resolver configuration
    ///
    /// Non-Windows hosts get the entry lines ensured present in the
    /// resolver config file; Windows hosts get static DNS on the primary
    /// adapter. Both receive the entry list as resolved.
    pub async fn apply_dns(&self, entries: &DnsEntries) -> Result<ApplyResult, BootstrapError> {
        let action = match self.ctx.grains.os_family {
            OsFamily::Default => StateAction::EnsureLines {
                path: self.ctx.paths.resolv_conf.clone(),
                lines: entries.lines().to_vec(),
            },
            OsFamily::Windows => StateAction::StaticDns {
                interface: PRIMARY_INTERFACE.to_string(),
                servers: entries.lines().to_vec(),
            },
        };

        info!("Applying DNS state ({})", self.ctx.grains.os_family);
        let result = self.ctx.apply(&action).await?;
        output::display_result(&result);
        Ok(result)
    }

    /// Apply each master.d fragment, one result per fragment name
    pub async fn apply_master_fragments(
        &self,
        fragments: &Map<String, Value>,
    ) -> Result<Vec<(String, ApplyResult)>, BootstrapError> {
        let mut results = Vec::with_capacity(fragments.len());

        for (name, data) in fragments {
            let action = StateAction::SerializeFile {
                path: self.ctx.paths.fragment(name),
                data: data.clone(),
            };
            let result = self.ctx.apply(&action).await?;
            output::display_result(&result);
            results.push((name.clone(), result));
        }

        Ok(results)
    }
}
