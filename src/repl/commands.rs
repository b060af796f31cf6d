/// All slash commands supported by the console.
#[derive(Debug, Clone, PartialEq)]
pub enum SlashCommand {
    Status,
    Runs,
    Select {
        id: i64,
    },
    Detail,
    Scrapers {
        action: ScraperAction,
    },
    Models,
    Config {
        key: Option<String>,
        value: Option<String>,
    },
    Start {
        stage: String,
    },
    Stop,
    Refresh,
    Version,
    Clear,
    Help {
        command: Option<String>,
    },
    Exit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScraperAction {
    List,
    All,
    None,
    Toggle(String),
}

/// Description of a command for help display.
pub struct CommandHelp {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
}

pub static COMMAND_HELP: &[CommandHelp] = &[
    CommandHelp {
        name: "status",
        usage: "/status",
        description: "Show the current pipeline status",
    },
    CommandHelp {
        name: "runs",
        usage: "/runs",
        description: "Show recent pipeline runs",
    },
    CommandHelp {
        name: "select",
        usage: "/select <run-id>",
        description: "Inspect a specific run in the detail view",
    },
    CommandHelp {
        name: "detail",
        usage: "/detail",
        description: "Re-fetch and show the selected run's counters",
    },
    CommandHelp {
        name: "scrapers",
        usage: "/scrapers [all|none|toggle <name>]",
        description: "Show or edit the scraper selection for link discovery",
    },
    CommandHelp {
        name: "models",
        usage: "/models",
        description: "List available analysis models by provider",
    },
    CommandHelp {
        name: "config",
        usage: "/config [provider|model|temperature] [value]",
        description: "View or set the analysis model configuration",
    },
    CommandHelp {
        name: "start",
        usage: "/start link-finder|article-scraper|embeddings|analysis|full",
        description: "Start a pipeline stage with the current selection",
    },
    CommandHelp {
        name: "stop",
        usage: "/stop",
        description: "Gracefully stop the running pipeline",
    },
    CommandHelp {
        name: "refresh",
        usage: "/refresh",
        description: "Force a status and run-history refresh now",
    },
    CommandHelp {
        name: "version",
        usage: "/version",
        description: "Show version and build info",
    },
    CommandHelp {
        name: "clear",
        usage: "/clear",
        description: "Clear the terminal screen",
    },
    CommandHelp {
        name: "help",
        usage: "/help [command]",
        description: "Show help for all or a specific command",
    },
    CommandHelp {
        name: "exit",
        usage: "/exit",
        description: "Quit the console",
    },
];

/// All command names for tab completion.
pub static COMMAND_NAMES: &[&str] = &[
    "/status",
    "/runs",
    "/select",
    "/detail",
    "/scrapers",
    "/models",
    "/config",
    "/start",
    "/stop",
    "/refresh",
    "/version",
    "/clear",
    "/help",
    "/exit",
];

/// Parse a raw input line into a SlashCommand, or return an error message.
pub fn parse_command(input: &str) -> Result<SlashCommand, String> {
    let input = input.trim();
    if !input.starts_with('/') {
        return Err("Commands must start with /. Type /help for available commands.".into());
    }

    let parts: Vec<&str> = input.split_whitespace().collect();
    if parts.is_empty() {
        return Err("Empty command".into());
    }

    let cmd = parts[0];
    let args = &parts[1..];

    match cmd {
        "/status" => Ok(SlashCommand::Status),
        "/runs" => Ok(SlashCommand::Runs),
        "/select" => parse_select(args),
        "/detail" => Ok(SlashCommand::Detail),
        "/scrapers" => parse_scrapers(args),
        "/models" => Ok(SlashCommand::Models),
        "/config" => Ok(SlashCommand::Config {
            key: args.first().map(|s| s.to_string()),
            value: args.get(1).map(|s| s.to_string()),
        }),
        "/start" => match args.first() {
            Some(stage) => Ok(SlashCommand::Start {
                stage: stage.to_string(),
            }),
            None => Err("Usage: /start link-finder|article-scraper|embeddings|analysis|full".into()),
        },
        "/stop" => Ok(SlashCommand::Stop),
        "/refresh" => Ok(SlashCommand::Refresh),
        "/version" => Ok(SlashCommand::Version),
        "/clear" => Ok(SlashCommand::Clear),
        "/help" => Ok(SlashCommand::Help {
            command: args.first().map(|s| s.trim_start_matches('/').to_string()),
        }),
        "/exit" | "/quit" | "/q" => Ok(SlashCommand::Exit),
        other => Err(format!(
            "Unknown command: {}. Type /help for available commands.",
            other
        )),
    }
}

fn parse_select(args: &[&str]) -> Result<SlashCommand, String> {
    match args.first() {
        Some(raw) => {
            let id = raw
                .trim_start_matches('#')
                .parse::<i64>()
                .map_err(|_| format!("Invalid run id: {}", raw))?;
            Ok(SlashCommand::Select { id })
        }
        None => Err("Usage: /select <run-id>".into()),
    }
}

fn parse_scrapers(args: &[&str]) -> Result<SlashCommand, String> {
    let action = match args.first().copied() {
        None => ScraperAction::List,
        Some("all") => ScraperAction::All,
        Some("none") => ScraperAction::None,
        Some("toggle") => match args.get(1) {
            Some(name) => ScraperAction::Toggle(name.to_string()),
            None => return Err("Usage: /scrapers toggle <name>".into()),
        },
        Some(other) => {
            return Err(format!(
                "Unknown scrapers action: {}. Use: all, none, toggle <name>",
                other
            ));
        }
    };
    Ok(SlashCommand::Scrapers { action })
}
