use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::cli::commands::StartArgs;
use crate::cli::build_backend;
use crate::config::ConsoleConfig;
use crate::errors::ConsoleError;
use crate::pipeline::{CommandDispatcher, RunRegistry, Stage, StageSelection, StatusPoller};
use crate::repl::renderer;

pub async fn handle_start(args: StartArgs, config: &ConsoleConfig) -> Result<(), ConsoleError> {
    let backend = build_backend(config)?;
    let stage: Stage = args.stage.parse()?;

    let mut selection = StageSelection::default();
    if let Some(provider) = &args.provider {
        selection.set_provider(provider);
    }
    if let Some(model) = &args.model {
        selection.set_model(model);
    }
    if let Some(t) = args.temperature {
        selection.set_temperature(t)?;
    }

    if matches!(stage, Stage::LinkFinder | Stage::FullPipeline) {
        match args.scrapers.as_deref() {
            // Same default as the console: everything selected
            None | Some("all") => {
                let names = backend.scraper_names().await?;
                selection.select_all(&names);
            }
            Some(list) => {
                selection.scrapers = list
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
        }
    }

    let command = selection.command(stage)?;

    let registry = Arc::new(RunRegistry::new(backend.clone()));
    let interval = Duration::from_millis(config.console.poll_interval_ms);
    let poller = Arc::new(StatusPoller::new(backend.clone(), registry.clone(), interval));
    let dispatcher = CommandDispatcher::new(backend, poller.clone(), registry.clone());

    let receipt = dispatcher.start(&command).await?;
    println!("{} (run #{})", receipt.message, receipt.pipeline_id);

    if args.wait {
        loop {
            tokio::time::sleep(interval).await;
            if let Err(e) = poller.sync_now().await {
                warn!(error = %e, "Status poll failed; retrying on next interval");
                continue;
            }
            if let Some(status) = poller.current() {
                println!("{}", renderer::status_line(&status));
                if status.is_idle() {
                    break;
                }
            }
        }
        if let Some(run) = registry.selected_detail().await {
            println!("{}", renderer::render_run_detail(&run));
        }
    }

    Ok(())
}
