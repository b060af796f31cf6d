use std::sync::Arc;
use std::time::Duration;

use console::{style, Term};
use rustyline::error::ReadlineError;
use rustyline::{Config, Editor, ExternalPrinter as _};
use tracing::{error, warn};

use crate::api::{HttpBackend, PipelineBackend};
use crate::catalog;
use crate::config::ConsoleConfig;
use crate::errors::ConsoleError;
use crate::pipeline::{CommandDispatcher, RunRegistry, Stage, StageSelection, StatusPoller};
use crate::repl::banner;
use crate::repl::commands::{parse_command, ScraperAction, SlashCommand};
use crate::repl::completer::ReplHelper;
use crate::repl::progress::StatusLine;
use crate::repl::renderer;

const PROMPT: &str = "tenderwatch> ";
const MAX_GATE_ATTEMPTS: u32 = 3;

/// The interactive operator console: access gate, slash-command loop, and
/// the live status line driven by the poller for as long as the session is
/// mounted.
pub struct ConsoleSession {
    config: ConsoleConfig,
}

/// Everything a command handler can touch.
struct SessionState {
    backend: Arc<dyn PipelineBackend>,
    poller: Arc<StatusPoller>,
    registry: Arc<RunRegistry>,
    dispatcher: CommandDispatcher,
    selection: StageSelection,
    available_scrapers: Vec<String>,
    history_limit: usize,
}

impl ConsoleSession {
    pub fn new(config: ConsoleConfig) -> Self {
        Self { config }
    }

    pub async fn run(self, access_code: Option<&str>) -> Result<(), ConsoleError> {
        banner::show();

        let rl_config = Config::builder().auto_add_history(true).build();
        let mut editor = Editor::with_config(rl_config)
            .map_err(|e| ConsoleError::Internal(format!("Failed to initialize console: {}", e)))?;
        editor.set_helper(Some(ReplHelper::default()));

        self.gate(&mut editor, access_code)?;

        let backend: Arc<dyn PipelineBackend> = Arc::new(HttpBackend::new(
            &self.config.api.base_url,
            Duration::from_secs(self.config.api.timeout_secs),
        )?);
        let registry = Arc::new(RunRegistry::new(backend.clone()));
        let poller = Arc::new(StatusPoller::new(
            backend.clone(),
            registry.clone(),
            Duration::from_millis(self.config.console.poll_interval_ms),
        ));
        let dispatcher = CommandDispatcher::new(backend.clone(), poller.clone(), registry.clone());

        let mut state = SessionState {
            backend,
            poller: poller.clone(),
            registry,
            dispatcher,
            selection: StageSelection::default(),
            available_scrapers: Vec::new(),
            history_limit: self.config.console.history_limit,
        };

        state.load_initial_data().await;

        // Mount: polling starts here and stops when the loop exits
        let poll_handle = poller.clone().spawn();

        let printer = editor
            .create_external_printer()
            .map_err(|e| ConsoleError::Internal(format!("Failed to create printer: {}", e)))?;
        let mut status_rx = poller.subscribe();
        let status_task = tokio::spawn(async move {
            let mut printer = printer;
            let mut line = StatusLine::new();
            while status_rx.changed().await.is_ok() {
                let status = status_rx.borrow_and_update().clone();
                if let Some(status) = status {
                    if let Some(transition) = line.update(&status) {
                        let _ = printer.print(transition);
                    }
                }
            }
            line.finish();
        });

        loop {
            match editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match parse_command(line) {
                        Ok(SlashCommand::Exit) => break,
                        Ok(command) => state.handle(command).await,
                        Err(msg) => println!("{}", style(msg).yellow()),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", style("(Use /exit to quit)").dim());
                }
                Err(ReadlineError::Eof) => break,
                Err(e) => {
                    error!(error = %e, "Console input failed");
                    break;
                }
            }
        }

        // Unmount: cancel the poller and drop the live status line. A poll
        // that is still in flight settles unobserved.
        poller.stop();
        let _ = poll_handle.await;
        status_task.abort();
        println!("{}", style("Console closed.").dim());
        Ok(())
    }

    /// Static shared-secret gate. Cosmetic access control, not a security
    /// boundary.
    fn gate(
        &self,
        editor: &mut Editor<ReplHelper, rustyline::history::DefaultHistory>,
        access_code: Option<&str>,
    ) -> Result<(), ConsoleError> {
        let expected = &self.config.console.access_code;
        if expected.is_empty() {
            return Ok(());
        }
        if let Some(code) = access_code {
            if code == expected.as_str() {
                return Ok(());
            }
            return Err(ConsoleError::Authentication("Invalid access code".into()));
        }

        for _ in 0..MAX_GATE_ATTEMPTS {
            match editor.readline("Access code: ") {
                Ok(input) => {
                    if input.trim() == expected.as_str() {
                        return Ok(());
                    }
                    println!("{}", style("Invalid access code").red());
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    return Err(ConsoleError::Authentication("Access cancelled".into()));
                }
                Err(e) => {
                    return Err(ConsoleError::Internal(format!("Console input failed: {}", e)));
                }
            }
        }
        Err(ConsoleError::Authentication("Too many failed attempts".into()))
    }
}

impl SessionState {
    /// First mount: scrapers, status, and history fetched concurrently and
    /// settled independently; one failing fetch never blocks the others.
    async fn load_initial_data(&mut self) {
        let (scrapers, status, runs) = tokio::join!(
            self.backend.scraper_names(),
            self.poller.sync_now(),
            self.registry.refresh(),
        );

        match scrapers {
            Ok(names) => {
                // Everything selected by default, matching the console's
                // first-load behavior
                self.selection.select_all(&names);
                self.available_scrapers = names;
            }
            Err(e) => warn!(error = %e, "Failed to fetch scraper list"),
        }

        if status.is_err() || runs.is_err() || self.available_scrapers.is_empty() {
            println!(
                "{}",
                style("Failed to load initial data. The backend may be unreachable.").red()
            );
        }
    }

    async fn handle(&mut self, command: SlashCommand) {
        match command {
            SlashCommand::Status => match self.poller.current() {
                Some(status) => println!("{}", renderer::render_status(&status)),
                None => println!("{}", style("No status received yet.").dim()),
            },
            SlashCommand::Runs => {
                let runs = self.registry.runs().await;
                let selected = self.registry.selected().await;
                println!("{}", renderer::render_runs_table(&runs, selected, self.history_limit));
            }
            SlashCommand::Select { id } => match self.registry.select(id).await {
                Ok(()) => self.print_detail().await,
                Err(e) => println!("{}", style(e).red()),
            },
            SlashCommand::Detail => match self.registry.refresh_detail().await {
                Ok(()) => self.print_detail().await,
                Err(e) => println!("{}", style(e).red()),
            },
            SlashCommand::Scrapers { action } => self.handle_scrapers(action),
            SlashCommand::Models => match self.backend.available_models().await {
                Ok(models) => println!("{}", renderer::render_models(&models, &self.selection)),
                Err(e) => {
                    warn!(error = %e, "Models endpoint unavailable");
                    println!(
                        "{}",
                        style("Backend models endpoint unavailable; showing built-in catalog.").dim()
                    );
                    println!(
                        "{}",
                        renderer::render_models(&catalog::fallback_catalog(), &self.selection)
                    );
                }
            },
            SlashCommand::Config { key, value } => self.handle_config(key, value),
            SlashCommand::Start { stage } => self.handle_start(&stage).await,
            SlashCommand::Stop => match self.dispatcher.stop().await {
                Ok(receipt) => println!("{}", style(receipt.message).green()),
                Err(e) => println!("{}", style(e).red()),
            },
            SlashCommand::Refresh => {
                let (status, runs) = tokio::join!(self.poller.sync_now(), self.registry.refresh());
                if status.is_err() || runs.is_err() {
                    println!("{}", style("Refresh failed. Is the backend reachable?").red());
                } else {
                    println!("{}", style("Refreshed.").green());
                }
            }
            SlashCommand::Version => {
                println!(
                    "tenderwatch v{} (built {}, {})",
                    env!("CARGO_PKG_VERSION"),
                    option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
                    option_env!("GIT_HASH").unwrap_or("dev"),
                );
            }
            SlashCommand::Clear => {
                let _ = Term::stdout().clear_screen();
            }
            SlashCommand::Help { command } => {
                println!("{}", renderer::render_help(command.as_deref()));
            }
            // Exit is intercepted by the session loop
            SlashCommand::Exit => {}
        }
    }

    async fn print_detail(&self) {
        match self.registry.selected_detail().await {
            Some(run) => println!("{}", renderer::render_run_detail(&run)),
            None => println!("{}", style("No run selected. Use /select <id>.").dim()),
        }
    }

    fn handle_scrapers(&mut self, action: ScraperAction) {
        match action {
            ScraperAction::List => {}
            ScraperAction::All => {
                let available = self.available_scrapers.clone();
                self.selection.select_all(&available);
            }
            ScraperAction::None => self.selection.scrapers.clear(),
            ScraperAction::Toggle(name) => {
                if self.available_scrapers.iter().any(|s| *s == name) {
                    self.selection.toggle_scraper(&name);
                } else {
                    println!("{}", style(format!("Unknown scraper: {}", name)).yellow());
                    return;
                }
            }
        }
        println!(
            "{}",
            renderer::render_scrapers(&self.available_scrapers, &self.selection.scrapers)
        );
    }

    fn handle_config(&mut self, key: Option<String>, value: Option<String>) {
        match (key.as_deref(), value) {
            (None, _) => println!("{}", renderer::render_config(&self.selection)),
            (Some("provider"), Some(provider)) => {
                self.selection.set_provider(&provider);
                println!(
                    "provider set to {} (model reset to {})",
                    style(&self.selection.provider).cyan(),
                    style(&self.selection.model).cyan(),
                );
            }
            (Some("model"), Some(model)) => {
                self.selection.set_model(&model);
                println!("model set to {}", style(&self.selection.model).cyan());
            }
            (Some("temperature"), Some(raw)) => match raw.parse::<f32>() {
                Ok(t) => match self.selection.set_temperature(t) {
                    Ok(()) => println!("temperature set to {}", t),
                    Err(e) => println!("{}", style(e).yellow()),
                },
                Err(_) => println!("{}", style(format!("Invalid temperature: {}", raw)).yellow()),
            },
            (Some(key), None) => {
                let value = match key {
                    "provider" => self.selection.provider.clone(),
                    "model" => self.selection.model.clone(),
                    "temperature" => self
                        .selection
                        .temperature
                        .map(|t| t.to_string())
                        .unwrap_or_else(|| "backend default".into()),
                    other => {
                        println!("{}", style(format!("Unknown config key: {}", other)).yellow());
                        return;
                    }
                };
                println!("{}: {}", key, style(value).cyan());
            }
            (Some(other), Some(_)) => {
                println!(
                    "{}",
                    style(format!(
                        "Unknown config key: {}. Use: provider, model, temperature",
                        other
                    ))
                    .yellow()
                );
            }
        }
    }

    async fn handle_start(&mut self, stage: &str) {
        let stage: Stage = match stage.parse() {
            Ok(stage) => stage,
            Err(e) => {
                println!("{}", style(e).yellow());
                return;
            }
        };
        let command = match self.selection.command(stage) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", style(e).yellow());
                return;
            }
        };
        match self.dispatcher.start(&command).await {
            Ok(receipt) => println!(
                "{} {}",
                style(receipt.message).green(),
                style(format!("(run #{})", receipt.pipeline_id)).dim(),
            ),
            Err(e) => println!("{}", style(e).red()),
        }
    }
}
