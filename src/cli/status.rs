use std::time::Duration;

use tracing::info;

use crate::cli::commands::StatusArgs;
use crate::cli::build_backend;
use crate::config::ConsoleConfig;
use crate::errors::ConsoleError;
use crate::repl::renderer;

pub async fn handle_status(args: StatusArgs, config: &ConsoleConfig) -> Result<(), ConsoleError> {
    let backend = build_backend(config)?;
    let interval = Duration::from_millis(config.console.poll_interval_ms);

    if args.follow {
        info!("Following pipeline status until idle");
    }

    loop {
        let status = backend.global_status().await?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&status)?);
        } else {
            println!("{}", renderer::render_status(&status));
        }

        if !args.follow || status.is_idle() {
            break;
        }
        tokio::time::sleep(interval).await;
    }

    Ok(())
}
