//! Reachability snapshots.

use serde::{Deserialize, Serialize};

/// Network state as reported by the host platform.
///
/// Mirrors what mobile network APIs expose: whether a link is attached and,
/// separately, whether the internet was verified reachable (`None` while the
/// platform has not checked yet).
/// flutter_rust_bridge:non_opaque
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectivityState {
    pub is_connected: bool,
    pub is_internet_reachable: Option<bool>,
}

impl ConnectivityState {
    pub fn online() -> Self {
        Self {
            is_connected: true,
            is_internet_reachable: Some(true),
        }
    }

    pub fn offline() -> Self {
        Self {
            is_connected: false,
            is_internet_reachable: Some(false),
        }
    }

    /// Attached to a network that has no path to the internet (captive portal, dead uplink).
    pub fn attached_without_internet() -> Self {
        Self {
            is_connected: true,
            is_internet_reachable: Some(false),
        }
    }

    /// Reachable means attached and not known to lack internet access.
    pub fn is_reachable(&self) -> bool {
        self.is_connected && self.is_internet_reachable != Some(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reachability_requires_link_and_internet() {
        assert!(ConnectivityState::online().is_reachable());
        assert!(!ConnectivityState::offline().is_reachable());
        assert!(!ConnectivityState::attached_without_internet().is_reachable());
        assert!(ConnectivityState {
            is_connected: true,
            is_internet_reachable: None,
        }
        .is_reachable());
        assert!(!ConnectivityState::default().is_reachable());
    }
}
