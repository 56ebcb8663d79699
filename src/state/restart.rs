//! Restart coordination
//!
//! Decides whether the salt-master needs a restart after the master.d
//! fragments have been applied.

use tracing::{debug, info};

use super::{ApplyResult, ExecutionContext, StateAction};
use crate::BootstrapError;
use crate::output;

/// Service restarted when any master.d fragment changes
pub const SALT_MASTER_SERVICE: &str = "salt-master";

/// Restart the salt-master iff any fragment result reports a change
///
/// Every result is visited; only the triggering decision latches on the
/// first change. Returns whether a restart happened.
pub async fn maybe_restart(
    ctx: &ExecutionContext,
    results: &[(String, ApplyResult)],
) -> Result<bool, BootstrapError> {
    let mut needs_restart = false;
    for (name, result) in results {
        debug!("Fragment {}: changed={}", name, result.changed);
        if result.changed {
            needs_restart = true;
        }
    }

    if !needs_restart {
        info!("No master.d fragment changed; {} left alone", SALT_MASTER_SERVICE);
        return Ok(false);
    }

    info!("master.d changed; restarting {}", SALT_MASTER_SERVICE);
    let action = StateAction::RestartService {
        name: SALT_MASTER_SERVICE.to_string(),
    };
    let result = ctx.apply(&action).await?;
    output::display_result(&result);

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::mock::MockState;
    use crate::state::{Grains, OsFamily, SaltPaths};
    use std::sync::Arc;

    fn context(mock: &Arc<MockState>) -> ExecutionContext {
        ExecutionContext::new(
            Grains::with_os_family(OsFamily::Default),
            SaltPaths::with_base("/bootstrap"),
            Box::new(Arc::clone(mock)),
        )
    }

    fn results(flags: &[(&str, bool)]) -> Vec<(String, ApplyResult)> {
        flags
            .iter()
            .map(|(name, changed)| {
                let result = if *changed {
                    ApplyResult::changed(*name, "changed", serde_json::json!({}))
                } else {
                    ApplyResult::unchanged(*name, "no-op")
                };
                (name.to_string(), result)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_no_restart_when_nothing_changed() {
        let mock = Arc::new(MockState::new());
        let ctx = context(&mock);

        let restarted = maybe_restart(&ctx, &results(&[("a.conf", false), ("b.conf", false)]))
            .await
            .unwrap();

        assert!(!restarted);
        assert_eq!(mock.restart_count(), 0);
    }

    #[tokio::test]
    async fn test_restart_once_when_any_changed() {
        let mock = Arc::new(MockState::new());
        let ctx = context(&mock);

        let restarted = maybe_restart(
            &ctx,
            &results(&[("a.conf", false), ("b.conf", true), ("c.conf", true)]),
        )
        .await
        .unwrap();

        assert!(restarted);
        assert_eq!(mock.restart_count(), 1);

        match &mock.applied()[0] {
            StateAction::RestartService { name } => assert_eq!(name, SALT_MASTER_SERVICE),
            other => panic!("expected RestartService, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_restart_when_only_last_changed() {
        let mock = Arc::new(MockState::new());
        let ctx = context(&mock);

        let restarted = maybe_restart(&ctx, &results(&[("a.conf", false), ("b.conf", true)]))
            .await
            .unwrap();

        assert!(restarted);
        assert_eq!(mock.restart_count(), 1);
    }

    #[tokio::test]
    async fn test_no_results_means_no_restart() {
        let mock = Arc::new(MockState::new());
        let ctx = context(&mock);

        assert!(!maybe_restart(&ctx, &[]).await.unwrap());
        assert_eq!(mock.restart_count(), 0);
    }
}
