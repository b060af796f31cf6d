use std::sync::Arc;
use std::time::Duration;

use crate::cli::build_backend;
use crate::config::ConsoleConfig;
use crate::errors::ConsoleError;
use crate::pipeline::{CommandDispatcher, RunRegistry, StatusPoller};

pub async fn handle_stop(config: &ConsoleConfig) -> Result<(), ConsoleError> {
    let backend = build_backend(config)?;
    let registry = Arc::new(RunRegistry::new(backend.clone()));
    let poller = Arc::new(StatusPoller::new(
        backend.clone(),
        registry.clone(),
        Duration::from_millis(config.console.poll_interval_ms),
    ));
    let dispatcher = CommandDispatcher::new(backend, poller, registry);

    let receipt = dispatcher.stop().await?;
    println!("{}", receipt.message);
    Ok(())
}
