use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::warn;

use crate::api::models::PipelineRun;
use crate::api::PipelineBackend;
use crate::errors::ConsoleError;

/// Cached view of the backend's run history plus the one run the operator
/// is currently inspecting. The backend returns runs most-recent-first;
/// the order is preserved as-is.
pub struct RunRegistry {
    backend: Arc<dyn PipelineBackend>,
    runs: RwLock<Vec<PipelineRun>>,
    selected: RwLock<Option<i64>>,
    detail: RwLock<Option<PipelineRun>>,
}

impl RunRegistry {
    pub fn new(backend: Arc<dyn PipelineBackend>) -> Self {
        Self {
            backend,
            runs: RwLock::new(Vec::new()),
            selected: RwLock::new(None),
            detail: RwLock::new(None),
        }
    }

    /// Re-list the run history. On the first successful load the most
    /// recent run becomes the selection. A failure leaves the cache as it
    /// was and surfaces only a generic message.
    pub async fn refresh(&self) -> Result<(), ConsoleError> {
        let runs = self.backend.list_runs().await.map_err(|e| {
            warn!(error = %e, "Failed to fetch pipeline runs");
            ConsoleError::Api("Failed to load pipeline runs".into())
        })?;

        let most_recent = runs.first().map(|r| r.id);
        *self.runs.write().await = runs;

        {
            let mut selected = self.selected.write().await;
            if selected.is_none() {
                *selected = most_recent;
            }
        }

        // Keep the inspected run in step with the fresh history; a detail
        // failure is not a history failure.
        if let Err(e) = self.refresh_detail().await {
            warn!(error = %e, "Run detail refresh after history reload failed");
        }
        Ok(())
    }

    /// Point the detail view at a specific run and fetch its record.
    pub async fn select(&self, id: i64) -> Result<(), ConsoleError> {
        *self.selected.write().await = Some(id);
        self.refresh_detail().await
    }

    /// Re-fetch the selected run's record. Not polled automatically: a
    /// non-current run is allowed to go stale until the operator asks.
    pub async fn refresh_detail(&self) -> Result<(), ConsoleError> {
        let Some(id) = *self.selected.read().await else {
            return Ok(());
        };
        let run = self.backend.run_status(id).await.map_err(|e| {
            warn!(run_id = id, error = %e, "Failed to fetch run detail");
            ConsoleError::Api(format!("Failed to load run #{}", id))
        })?;
        *self.detail.write().await = Some(run);
        Ok(())
    }

    pub async fn runs(&self) -> Vec<PipelineRun> {
        self.runs.read().await.clone()
    }

    pub async fn selected(&self) -> Option<i64> {
        *self.selected.read().await
    }

    pub async fn selected_detail(&self) -> Option<PipelineRun> {
        self.detail.read().await.clone()
    }
}
