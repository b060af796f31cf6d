use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::models::{GlobalStatus, StartReceipt};
use crate::api::PipelineBackend;
use crate::errors::ConsoleError;
use super::reconcile::StatusReconciler;
use super::registry::RunRegistry;

/// Keeps a fresh local copy of the backend's global status record.
///
/// One fetch per tick, ticks never overlap (the fetch is awaited inline),
/// and the reconciled view is republished to all watch subscribers after
/// every successful read. The poller is the console's only perpetual
/// background activity: spawned on mount, cancelled on unmount.
pub struct StatusPoller {
    backend: Arc<dyn PipelineBackend>,
    registry: Arc<RunRegistry>,
    reconciler: RwLock<StatusReconciler>,
    tx: watch::Sender<Option<GlobalStatus>>,
    interval: Duration,
    cancel: CancellationToken,
}

impl StatusPoller {
    pub fn new(
        backend: Arc<dyn PipelineBackend>,
        registry: Arc<RunRegistry>,
        interval: Duration,
    ) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            backend,
            registry,
            reconciler: RwLock::new(StatusReconciler::new()),
            tx,
            interval,
            cancel: CancellationToken::new(),
        }
    }

    /// Subscribe to reconciled status updates.
    pub fn subscribe(&self) -> watch::Receiver<Option<GlobalStatus>> {
        self.tx.subscribe()
    }

    /// The current reconciled view without waiting for a change.
    pub fn current(&self) -> Option<GlobalStatus> {
        self.tx.borrow().clone()
    }

    /// One status fetch outside the tick cadence. Used by each tick and by
    /// the dispatcher right after a command so the transition shows up
    /// without a full interval of lag. A failure keeps the previously
    /// published value untouched.
    pub async fn sync_now(&self) -> Result<(), ConsoleError> {
        let status = self.backend.global_status().await?;
        let (view, became_idle) = {
            let mut reconciler = self.reconciler.write().await;
            let became_idle = reconciler.apply_poll(status);
            (reconciler.view(), became_idle)
        };

        if became_idle {
            debug!("Pipeline transitioned to idle; refreshing run history");
            if let Err(e) = self.registry.refresh().await {
                warn!(error = %e, "Run history refresh after idle transition failed");
            }
        }

        self.tx.send_replace(view);
        Ok(())
    }

    /// Adopt a successful start response as the optimistic local state and
    /// republish.
    pub async fn note_started(&self, receipt: &StartReceipt) {
        let view = {
            let mut reconciler = self.reconciler.write().await;
            reconciler.note_started(receipt.pipeline_id, &receipt.message);
            reconciler.view()
        };
        self.tx.send_replace(view);
    }

    /// Overlay a pending stop on the current view. Idempotent: returns
    /// false (and publishes nothing) when a stop is already pending.
    pub async fn note_stop_requested(&self) -> bool {
        let (view, transitioned) = {
            let mut reconciler = self.reconciler.write().await;
            let transitioned = reconciler.note_stop_requested();
            (reconciler.view(), transitioned)
        };
        if transitioned {
            self.tx.send_replace(view);
        }
        transitioned
    }

    /// Start polling on the configured cadence until `stop` is called.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        let poller = self;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poller.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(interval_ms = poller.interval.as_millis() as u64, "Status poller started");

            loop {
                tokio::select! {
                    _ = poller.cancel.cancelled() => {
                        info!("Status poller stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = poller.sync_now().await {
                            // Transient failure: log, keep the last value visible
                            warn!(error = %e, "Status poll failed; retaining last known status");
                        }
                    }
                }
            }
        })
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}
