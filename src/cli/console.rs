use crate::cli::commands::ConsoleArgs;
use crate::config::ConsoleConfig;
use crate::errors::ConsoleError;
use crate::repl::ConsoleSession;

pub async fn handle_console(args: ConsoleArgs, config: &ConsoleConfig) -> Result<(), ConsoleError> {
    ConsoleSession::new(config.clone())
        .run(args.access_code.as_deref())
        .await
}
