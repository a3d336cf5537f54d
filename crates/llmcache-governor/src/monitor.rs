//! Background task that periodically samples governor utilisation and
//! emits warning events when a quota runs hot.

use crate::events::GovernorEvent;
use crate::governor::{Governor, ResourceKind};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

#[cfg(feature = "tracing")]
use tracing::warn;

const TRACKED_KINDS: [ResourceKind; 3] = [ResourceKind::Memory, ResourceKind::Tasks, ResourceKind::Handles];

/// Spawns a task that samples `governor`'s utilisation every
/// `monitor_interval` and emits [`GovernorEvent::UtilisationWarning`] for any
/// quota above `warning_threshold`. Returns `None` if the governor's config
/// has no `monitor_interval` set.
pub fn spawn(governor: Arc<Governor>) -> Option<JoinHandle<()>> {
    let interval = governor.config.monitor_interval?;
    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            sample_once(&governor);
        }
    }))
}

fn sample_once(governor: &Governor) {
    let threshold = governor.config.warning_threshold;
    for kind in TRACKED_KINDS {
        let utilisation = governor.utilisation(kind);
        if utilisation >= threshold {
            let event = GovernorEvent::UtilisationWarning {
                name: governor.config.name.clone(),
                timestamp: Instant::now(),
                kind,
                utilisation,
                threshold,
            };
            governor.event_listeners.emit(&event);

            #[cfg(feature = "tracing")]
            warn!(governor = %governor.config.name, %kind, utilisation, threshold, "resource utilisation above warning threshold");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GovernorConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn sample_once_emits_warning_above_threshold() {
        let mut governor = Governor::new(
            GovernorConfig::builder()
                .task_limit(10)
                .warning_threshold(0.5)
                .build(),
        );
        let warnings = Arc::new(AtomicUsize::new(0));
        let warnings_clone = Arc::clone(&warnings);
        governor.add_listener(llmcache_core::events::FnListener::new(move |event: &GovernorEvent| {
            if matches!(event, GovernorEvent::UtilisationWarning { .. }) {
                warnings_clone.fetch_add(1, Ordering::SeqCst);
            }
        }));
        governor.acquire(ResourceKind::Tasks, 6).unwrap();

        sample_once(&governor);

        assert_eq!(warnings.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn sample_once_stays_quiet_under_threshold() {
        let mut governor = Governor::new(
            GovernorConfig::builder()
                .task_limit(10)
                .warning_threshold(0.9)
                .build(),
        );
        let warnings = Arc::new(AtomicUsize::new(0));
        let warnings_clone = Arc::clone(&warnings);
        governor.add_listener(llmcache_core::events::FnListener::new(move |_: &GovernorEvent| {
            warnings_clone.fetch_add(1, Ordering::SeqCst);
        }));
        governor.acquire(ResourceKind::Tasks, 1).unwrap();

        sample_once(&governor);

        assert_eq!(warnings.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn spawn_returns_none_when_monitor_disabled() {
        let governor = Governor::with_config(
            GovernorConfig::builder().monitor_interval(None).build(),
        );
        assert!(monitor_handle_is_none(governor).await);
    }

    async fn monitor_handle_is_none(governor: Arc<Governor>) -> bool {
        let handle = spawn(governor);
        if let Some(h) = &handle {
            h.abort();
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
        handle.is_none()
    }
}
