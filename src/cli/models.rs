use console::style;
use tracing::warn;

use crate::catalog;
use crate::cli::commands::ModelsArgs;
use crate::cli::build_backend;
use crate::config::ConsoleConfig;
use crate::errors::ConsoleError;
use crate::pipeline::StageSelection;
use crate::repl::renderer;

pub async fn handle_models(args: ModelsArgs, config: &ConsoleConfig) -> Result<(), ConsoleError> {
    let backend = build_backend(config)?;

    let models = match backend.available_models().await {
        Ok(models) => models,
        Err(e) => {
            warn!(error = %e, "Models endpoint unavailable; using built-in catalog");
            catalog::fallback_catalog()
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&models)?);
    } else {
        let selection = StageSelection::default();
        print!("{}", renderer::render_models(&models, &selection));
        println!(
            "{}",
            style(format!("default: {} / {}", selection.provider, selection.model)).dim()
        );
    }
    Ok(())
}
