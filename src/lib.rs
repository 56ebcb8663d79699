//! butio-salt-rs library
//!
//! Bootstraps a freshly provisioned machine's DNS resolution and
//! salt-master configuration from provider-supplied provisioning
//! arguments.
//!
//! # Design Principles
//!
//! - **Safety First**: No unsafe code (`#![forbid(unsafe_code)]`)
//! - **Idempotent**: re-running the bootstrap never duplicates state
//! - **Provider-agnostic core**: the pipeline sees only the
//!   [`sources::ArgumentSource`] trait and the
//!   [`state::StateBackend`] capability

pub mod args;
pub mod output;
pub mod sources;
pub mod state;

mod error;

pub use error::BootstrapError;

use tracing::{debug, info};

use sources::ArgumentSource;
use state::apply::StateApplier;
use state::{ExecutionContext, restart};

/// Run one bootstrap cycle
///
/// Fetches the provisioning arguments from `source`, resolves them, applies
/// the DNS and master.d state through `ctx`, and restarts the salt-master
/// iff any fragment changed.
pub async fn run(ctx: &ExecutionContext, source: &dyn ArgumentSource) -> Result<(), BootstrapError> {
    info!("Bootstrapping from {} argument source", source.name());

    let raw = source.fetch_args().await?;
    let parsed = args::parse(&raw, source.args_label())?;
    let resolved = args::resolve::resolve(&parsed, source).await?;

    debug!(
        "Bootstrap script: save_path={}, hash_type={}, expected_hash={}",
        resolved.bootstrap_salt_save_path,
        resolved.bootstrap_salt_hash_type,
        resolved.bootstrap_salt_expected_hash
    );
    // TODO: download the bootstrap script to save_path and verify it
    // against expected_hash before the minion install step lands.

    let applier = StateApplier::new(ctx);
    applier.apply_dns(&resolved.dns_entries).await?;
    let fragment_results = applier.apply_master_fragments(&resolved.master_config).await?;

    let restarted = restart::maybe_restart(ctx, &fragment_results).await?;

    info!(
        "Bootstrap complete: {} fragment(s) applied, restart: {}",
        fragment_results.len(),
        restarted
    );
    Ok(())
}
