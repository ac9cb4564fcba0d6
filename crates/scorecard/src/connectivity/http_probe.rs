//! Reachability by HTTP probe
//!
//! For hosts without a platform network API (desktop CLI, servers). A `HEAD`
//! request to the probe URL decides the state:
//! - any HTTP response: online
//! - timeout: attached, but no verified internet path
//! - anything else (refused, DNS failure, no route): offline

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use scorecard_api::ConnectivityState;
use scorecard_core::{ConnectivityMonitor, Result};

pub struct HttpProbeConnectivity {
    client: reqwest::Client,
    probe_url: String,
    state_tx: watch::Sender<ConnectivityState>,
}

impl HttpProbeConnectivity {
    pub fn new(probe_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to create probe HTTP client: {}", e))?;

        Ok(Self {
            client,
            probe_url: probe_url.into(),
            state_tx: watch::Sender::new(ConnectivityState::default()),
        })
    }

    /// Run one probe without publishing the result.
    pub async fn probe(&self) -> ConnectivityState {
        match self.client.head(&self.probe_url).send().await {
            Ok(response) => {
                debug!(
                    "[HttpProbeConnectivity] {} answered {}",
                    self.probe_url,
                    response.status()
                );
                ConnectivityState::online()
            }
            Err(e) if e.is_timeout() => {
                debug!("[HttpProbeConnectivity] Probe timed out: {}", e);
                ConnectivityState::attached_without_internet()
            }
            Err(e) => {
                debug!("[HttpProbeConnectivity] Probe failed: {}", e);
                ConnectivityState::offline()
            }
        }
    }

    /// Probe and publish the result to subscribers if it changed.
    pub async fn refresh(&self) -> ConnectivityState {
        let state = self.probe().await;
        let changed = self.state_tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
        if changed {
            info!(
                "[HttpProbeConnectivity] Reachability changed: {}",
                state.is_reachable()
            );
        }
        state
    }

    /// Re-probe every `interval` until the returned task is aborted.
    pub fn spawn_polling(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                self.refresh().await;
            }
        })
    }
}

#[async_trait]
impl ConnectivityMonitor for HttpProbeConnectivity {
    async fn current(&self) -> ConnectivityState {
        self.refresh().await
    }

    fn subscribe(&self) -> watch::Receiver<ConnectivityState> {
        self.state_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_refused_connection_is_offline() {
        // Grab a free port, then close it so the probe is refused.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let monitor =
            HttpProbeConnectivity::new(format!("http://127.0.0.1:{}/", port), Duration::from_secs(2))
                .unwrap();
        let state = monitor.current().await;
        assert!(!state.is_reachable());
        assert!(!monitor.subscribe().borrow().is_reachable());
    }
}
