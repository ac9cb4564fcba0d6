use async_trait::async_trait;
use tokio::sync::watch;
use tracing::debug;

use scorecard_api::ConnectivityState;
use scorecard_core::ConnectivityMonitor;

/// Connectivity pushed in by the host
///
/// Mobile shells already receive network-change callbacks from the platform;
/// they forward each one to [`ManualConnectivity::set`].
pub struct ManualConnectivity {
    state_tx: watch::Sender<ConnectivityState>,
}

impl ManualConnectivity {
    pub fn new(initial: ConnectivityState) -> Self {
        Self {
            state_tx: watch::Sender::new(initial),
        }
    }

    /// Record a new state. Subscribers are only woken when it differs.
    pub fn set(&self, state: ConnectivityState) {
        let changed = self.state_tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
        if changed {
            debug!(
                "[ManualConnectivity] State changed (reachable: {})",
                state.is_reachable()
            );
        }
    }
}

#[async_trait]
impl ConnectivityMonitor for ManualConnectivity {
    async fn current(&self) -> ConnectivityState {
        *self.state_tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<ConnectivityState> {
        self.state_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_notifies_only_on_change() {
        let monitor = ManualConnectivity::new(ConnectivityState::offline());
        let mut rx = monitor.subscribe();
        assert!(!monitor.is_reachable().await);

        monitor.set(ConnectivityState::offline());
        assert!(!rx.has_changed().unwrap());

        monitor.set(ConnectivityState::online());
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_reachable());
        assert!(monitor.is_reachable().await);
    }
}
