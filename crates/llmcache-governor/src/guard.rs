//! RAII guard that releases governed resources on drop.

use crate::governor::{Governor, ResourceKind};
use std::sync::Arc;

/// Holds one or more resource acquisitions against a [`Governor`] and
/// releases all of them when dropped, including on panic or early return.
pub struct ResourceGuard {
    governor: Arc<Governor>,
    held: Vec<(ResourceKind, u64)>,
}

impl ResourceGuard {
    pub fn new(governor: Arc<Governor>) -> Self {
        Self {
            governor,
            held: Vec::new(),
        }
    }

    /// Acquires `amount` of `kind` and adds it to this guard's holdings.
    /// On failure nothing already held by this guard is released.
    pub fn acquire(&mut self, kind: ResourceKind, amount: u64) -> Result<(), crate::error::GovernorError> {
        self.governor.acquire(kind, amount)?;
        self.held.push((kind, amount));
        Ok(())
    }

    /// Total amount of `kind` currently held by this guard.
    pub fn held(&self, kind: ResourceKind) -> u64 {
        self.held
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, amount)| amount)
            .sum()
    }
}

impl Drop for ResourceGuard {
    fn drop(&mut self) {
        for (kind, amount) in self.held.drain(..) {
            self.governor.release(kind, amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GovernorConfig;

    #[test]
    fn drop_releases_every_held_acquisition() {
        let governor = Governor::with_config(GovernorConfig::builder().task_limit(10).build());
        {
            let mut guard = ResourceGuard::new(Arc::clone(&governor));
            guard.acquire(ResourceKind::Tasks, 4).unwrap();
            guard.acquire(ResourceKind::Tasks, 3).unwrap();
            assert_eq!(governor.current(ResourceKind::Tasks), 7);
            assert_eq!(guard.held(ResourceKind::Tasks), 7);
        }
        assert_eq!(governor.current(ResourceKind::Tasks), 0);
    }

    #[test]
    fn failed_acquire_does_not_release_prior_holdings() {
        let governor = Governor::with_config(GovernorConfig::builder().task_limit(5).build());
        let mut guard = ResourceGuard::new(Arc::clone(&governor));
        guard.acquire(ResourceKind::Tasks, 5).unwrap();
        assert!(guard.acquire(ResourceKind::Tasks, 1).is_err());
        assert_eq!(governor.current(ResourceKind::Tasks), 5);
    }
}
