//! Mock state backend for testing
//!
//! Records every action it is asked to apply and returns scripted change
//! flags, so tests can verify dispatch, ordering, and the restart decision
//! without touching the host.

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Mutex;

use super::{ApplyResult, StateAction, StateBackend};
use crate::BootstrapError;

/// Mock state backend
///
/// By default every action succeeds and reports `changed == false`;
/// actions whose name matches one registered via [`with_changed`] report
/// `changed == true`.
///
/// [`with_changed`]: MockState::with_changed
pub struct MockState {
    applied: Mutex<Vec<StateAction>>,
    changed_names: HashSet<String>,
    fail_name: Option<String>,
}

impl MockState {
    pub fn new() -> Self {
        Self {
            applied: Mutex::new(Vec::new()),
            changed_names: HashSet::new(),
            fail_name: None,
        }
    }

    /// Report `changed == true` for actions with this name
    pub fn with_changed(mut self, name: impl Into<String>) -> Self {
        self.changed_names.insert(name.into());
        self
    }

    /// Fail actions with this name
    pub fn with_failure(mut self, name: impl Into<String>) -> Self {
        self.fail_name = Some(name.into());
        self
    }

    /// Every action applied so far, in application order
    pub fn applied(&self) -> Vec<StateAction> {
        self.applied.lock().unwrap().clone()
    }

    /// How many service restarts were requested
    pub fn restart_count(&self) -> usize {
        self.applied()
            .iter()
            .filter(|a| matches!(a, StateAction::RestartService { .. }))
            .count()
    }
}

impl Default for MockState {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateBackend for MockState {
    async fn apply(&self, action: &StateAction) -> Result<ApplyResult, BootstrapError> {
        let name = action.name();
        self.applied.lock().unwrap().push(action.clone());

        if self.fail_name.as_deref() == Some(name.as_str()) {
            return Err(BootstrapError::state(name, "mock failure"));
        }

        if self.changed_names.contains(&name) {
            Ok(ApplyResult::changed(
                name,
                "mock change",
                json!({ "mock": true }),
            ))
        } else {
            Ok(ApplyResult::unchanged(name, "mock no-op"))
        }
    }
}
