pub mod parser;
pub mod types;

pub use parser::{load_config, parse_config};
pub use types::{ApiConfig, ConsoleConfig, UiConfig};
