//! Backend health probe
//!
//! Polls a liveness endpoint through the gateway client and publishes the
//! latest [`HealthStatus`] for a status badge. Probe traffic uses a silent
//! notifier so a backend outage shows up in the badge, not as a toast every
//! few seconds; transitions are logged instead.

use crate::client::{GatewayClient, RequestOptions};
use crate::defaults;
use crate::notify::NoopNotifier;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HealthStatus {
    /// No check has completed yet.
    #[default]
    Unknown,
    Up,
    Down { reason: String },
}

impl HealthStatus {
    pub fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }
}

/// One health endpoint, checked through a gateway client.
#[derive(Debug, Clone)]
pub struct HealthProbe {
    client: GatewayClient,
    path: String,
    interval: Duration,
}

impl HealthProbe {
    /// The probe follows the client's base address, including later
    /// `set_base_address` calls. Intervals shorter than
    /// [`MIN_INTERVAL`](defaults::health::MIN_INTERVAL) are raised to it.
    pub fn new(client: &GatewayClient, path: impl Into<String>, interval: Duration) -> Self {
        let path = path.into();
        if interval < defaults::health::MIN_INTERVAL {
            tracing::warn!(target: "console_core::health", path=%path, requested=?interval, "probe interval too short, using minimum");
        }
        Self {
            client: client.with_notifier(Arc::new(NoopNotifier)),
            path,
            interval: interval.max(defaults::health::MIN_INTERVAL),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run a single check.
    pub async fn check(&self) -> HealthStatus {
        match self.client.get(&self.path, RequestOptions::default()).await {
            Ok(_) => HealthStatus::Up,
            Err(err) => HealthStatus::Down {
                reason: err.message().to_string(),
            },
        }
    }

    /// Start polling on the tokio runtime. The first check runs immediately.
    pub fn spawn(self) -> HealthHandle {
        let (tx, rx) = watch::channel(HealthStatus::Unknown);
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let status = tokio::select! {
                            _ = token.cancelled() => break,
                            status = self.check() => status,
                        };
                        tx.send_if_modified(|current| {
                            if *current == status {
                                return false;
                            }
                            match &status {
                                HealthStatus::Down { reason } => {
                                    tracing::warn!(target: "console_core::health", path=%self.path, %reason, "backend unhealthy");
                                }
                                _ => {
                                    tracing::info!(target: "console_core::health", path=%self.path, status=?status, "backend healthy");
                                }
                            }
                            *current = status.clone();
                            true
                        });
                    }
                }
            }
            tracing::debug!(target: "console_core::health", path=%self.path, "health probe stopped");
        });

        HealthHandle {
            status: rx,
            cancel,
            task: Some(task),
        }
    }
}

/// Handle to a running probe. Dropping it stops the polling task.
#[derive(Debug)]
pub struct HealthHandle {
    status: watch::Receiver<HealthStatus>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl HealthHandle {
    /// Latest published status.
    pub fn status(&self) -> HealthStatus {
        self.status.borrow().clone()
    }

    /// Wait for the next status change and return it. Returns `None` once
    /// the probe has stopped.
    pub async fn changed(&mut self) -> Option<HealthStatus> {
        self.status.changed().await.ok()?;
        Some(self.status.borrow_and_update().clone())
    }

    /// Stop polling and wait for the task to finish.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for HealthHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
