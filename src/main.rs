use std::path::Path;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tenderwatch::cli::{self, Cli, Commands};
use tenderwatch::config;
use tenderwatch::errors::ConsoleError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .init();

    let config = match config::load_config(cli.config.as_deref().map(Path::new)).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let result = match cli.command {
        Commands::Console(args) => cli::console::handle_console(args, &config).await,
        Commands::Status(args) => cli::status::handle_status(args, &config).await,
        Commands::Runs(args) => cli::runs::handle_runs(args, &config).await,
        Commands::Start(args) => cli::start::handle_start(args, &config).await,
        Commands::Stop => cli::stop::handle_stop(&config).await,
        Commands::Scrapers => cli::scrapers::handle_scrapers(&config).await,
        Commands::Models(args) => cli::models::handle_models(args, &config).await,
        Commands::Validate(args) => handle_validate(args).await,
    };

    match result {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            let exit_code = match &e {
                ConsoleError::Config(_) => 2,
                ConsoleError::Validation(_) => 3,
                ConsoleError::Authentication(_) => 4,
                _ => 1,
            };
            std::process::exit(exit_code);
        }
    }
}

async fn handle_validate(args: cli::commands::ValidateArgs) -> Result<(), ConsoleError> {
    let path = std::path::PathBuf::from(&args.path);
    let _config = config::parse_config(&path).await?;
    println!("Configuration is valid: {}", args.path);
    Ok(())
}
