use console::style;

use crate::cli::build_backend;
use crate::config::ConsoleConfig;
use crate::errors::ConsoleError;

pub async fn handle_scrapers(config: &ConsoleConfig) -> Result<(), ConsoleError> {
    let backend = build_backend(config)?;
    let names = backend.scraper_names().await?;

    if names.is_empty() {
        println!("{}", style("No scrapers reported by the backend.").dim());
        return Ok(());
    }
    println!("{}", style(format!("{} scrapers available:", names.len())).bold());
    for name in names {
        println!("  {}", name);
    }
    Ok(())
}
