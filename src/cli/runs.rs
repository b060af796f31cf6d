use crate::cli::commands::RunsArgs;
use crate::cli::build_backend;
use crate::config::ConsoleConfig;
use crate::errors::ConsoleError;
use crate::repl::renderer;

pub async fn handle_runs(args: RunsArgs, config: &ConsoleConfig) -> Result<(), ConsoleError> {
    let backend = build_backend(config)?;

    if let Some(id) = args.id {
        let run = backend.run_status(id).await?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&run)?);
        } else {
            println!("{}", renderer::render_run_detail(&run));
        }
        return Ok(());
    }

    let runs = backend.list_runs().await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&runs)?);
    } else {
        let limit = args.limit.unwrap_or(config.console.history_limit);
        println!("{}", renderer::render_runs_table(&runs, None, limit));
    }
    Ok(())
}
