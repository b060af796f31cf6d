pub mod commands;
pub mod console;
pub mod models;
pub mod runs;
pub mod scrapers;
pub mod start;
pub mod status;
pub mod stop;

pub use commands::{Cli, Commands};

use std::sync::Arc;
use std::time::Duration;

use crate::api::{HttpBackend, PipelineBackend};
use crate::config::ConsoleConfig;
use crate::errors::ConsoleError;

pub(crate) fn build_backend(config: &ConsoleConfig) -> Result<Arc<dyn PipelineBackend>, ConsoleError> {
    Ok(Arc::new(HttpBackend::new(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_secs),
    )?))
}
