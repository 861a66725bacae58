//! Re-entrancy guard for mutating actions

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::services::{ServiceError, ServiceResult};

/// Set of actions currently running for one browser session
#[derive(Debug, Default, Clone)]
pub(crate) struct InFlight {
    running: Arc<Mutex<HashSet<String>>>,
}

impl InFlight {
    /// Claim `action`, failing if an identical action has not finished yet
    pub(crate) fn begin(&self, action: String) -> ServiceResult<ActionGuard> {
        if !self.running.lock().insert(action.clone()) {
            return Err(ServiceError::in_progress(action));
        }
        Ok(ActionGuard {
            running: self.running.clone(),
            action,
        })
    }

    #[cfg(test)]
    pub(crate) fn is_running(&self, action: &str) -> bool {
        self.running.lock().contains(action)
    }
}

/// Releases its action when dropped
#[derive(Debug)]
#[must_use = "the action is released as soon as the guard is dropped"]
pub struct ActionGuard {
    running: Arc<Mutex<HashSet<String>>>,
    action: String,
}

impl ActionGuard {
    pub fn action(&self) -> &str {
        &self.action
    }
}

impl Drop for ActionGuard {
    fn drop(&mut self) {
        self.running.lock().remove(&self.action);
    }
}
