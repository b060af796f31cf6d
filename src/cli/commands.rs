use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tenderwatch",
    version,
    about = "Operations console for the news-intelligence scraping and analysis pipeline"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive operator console
    Console(ConsoleArgs),
    /// Show the current pipeline status
    Status(StatusArgs),
    /// List pipeline runs or inspect a single run
    Runs(RunsArgs),
    /// Start a pipeline stage
    Start(StartArgs),
    /// Gracefully stop the running pipeline
    Stop,
    /// List the scrapers the backend knows about
    Scrapers,
    /// List available analysis models by provider
    Models(ModelsArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct ConsoleArgs {
    /// Access code for the console gate (prompted when omitted)
    #[arg(long)]
    pub access_code: Option<String>,
}

#[derive(Args, Clone)]
pub struct StatusArgs {
    /// Keep polling until the pipeline goes idle
    #[arg(short, long)]
    pub follow: bool,

    /// Print the raw status record as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct RunsArgs {
    /// Inspect one run by id instead of listing
    #[arg(long)]
    pub id: Option<i64>,

    /// Print raw JSON
    #[arg(long)]
    pub json: bool,

    /// Maximum number of runs to show
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[derive(Args, Clone)]
pub struct StartArgs {
    /// Stage to run: link-finder, article-scraper, embeddings, analysis, full
    pub stage: String,

    /// Comma-separated scraper names, or "all" (link-finder and full only)
    #[arg(long)]
    pub scrapers: Option<String>,

    /// Model provider for analysis stages
    #[arg(long)]
    pub provider: Option<String>,

    /// Model identifier for analysis stages
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature for analysis stages
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Block and print status updates until the pipeline goes idle
    #[arg(long)]
    pub wait: bool,
}

#[derive(Args, Clone)]
pub struct ModelsArgs {
    /// Print raw JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Path to the YAML configuration file to check
    pub path: String,
}
