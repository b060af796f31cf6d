use std::sync::Arc;

use tracing::{error, info, warn};

use crate::api::models::{StartReceipt, StopReceipt};
use crate::api::PipelineBackend;
use crate::errors::ConsoleError;
use super::poller::StatusPoller;
use super::registry::RunRegistry;
use super::selection::StartCommand;

/// Translates validated operator intent into backend commands and keeps
/// the local state machine and run selection in step with the responses.
pub struct CommandDispatcher {
    backend: Arc<dyn PipelineBackend>,
    poller: Arc<StatusPoller>,
    registry: Arc<RunRegistry>,
}

impl CommandDispatcher {
    pub fn new(
        backend: Arc<dyn PipelineBackend>,
        poller: Arc<StatusPoller>,
        registry: Arc<RunRegistry>,
    ) -> Self {
        Self {
            backend,
            poller,
            registry,
        }
    }

    /// Dispatch a start command. Preconditions are checked locally first;
    /// an invalid command never reaches the network. On success the new
    /// run id becomes the registry selection, the reconciler flips to its
    /// optimistic running state, and one out-of-band status fetch pulls in
    /// the transition ahead of the next scheduled tick.
    pub async fn start(&self, command: &StartCommand) -> Result<StartReceipt, ConsoleError> {
        command.validate()?;

        let label = command.label();
        let receipt = self.send(command).await.map_err(|e| {
            error!(command = label, error = %e, "Start command failed");
            ConsoleError::Api(format!("Failed to start {}", label))
        })?;
        info!(command = label, pipeline_id = receipt.pipeline_id, "Pipeline started");

        self.poller.note_started(&receipt).await;
        if let Err(e) = self.registry.select(receipt.pipeline_id).await {
            warn!(error = %e, "Could not load detail for the new run");
        }
        if let Err(e) = self.poller.sync_now().await {
            warn!(error = %e, "Post-dispatch status refresh failed");
        }
        Ok(receipt)
    }

    /// Request a graceful stop of whatever is running. Safe to repeat
    /// while a stop is already pending.
    pub async fn stop(&self) -> Result<StopReceipt, ConsoleError> {
        let receipt = self.backend.stop_pipeline().await.map_err(|e| {
            error!(error = %e, "Stop command failed");
            ConsoleError::Api("Failed to stop pipeline".into())
        })?;
        info!("Pipeline stop requested");

        self.poller.note_stop_requested().await;
        if let Err(e) = self.poller.sync_now().await {
            warn!(error = %e, "Post-stop status refresh failed");
        }
        Ok(receipt)
    }

    async fn send(&self, command: &StartCommand) -> Result<StartReceipt, ConsoleError> {
        match command {
            StartCommand::LinkFinder { scrapers } => {
                self.backend.run_link_finder(scrapers).await
            }
            StartCommand::ArticleScraper => self.backend.run_article_scraper().await,
            StartCommand::Embeddings => self.backend.run_embeddings().await,
            StartCommand::Analysis {
                provider,
                model,
                temperature,
            } => {
                self.backend
                    .run_analysis(provider, model, *temperature)
                    .await
            }
            StartCommand::FullPipeline {
                scrapers,
                provider,
                model,
                temperature,
            } => {
                self.backend
                    .run_full_pipeline(scrapers, Some(provider), Some(model), *temperature)
                    .await
            }
        }
    }
}
