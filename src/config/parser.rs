use std::path::Path;

use crate::errors::ConsoleError;
use super::types::ConsoleConfig;

/// Load the console configuration: file (when given), then environment
/// overrides, then semantic validation.
pub async fn load_config(path: Option<&Path>) -> Result<ConsoleConfig, ConsoleError> {
    let mut config = match path {
        Some(p) => parse_config(p).await?,
        None => ConsoleConfig::default(),
    };
    apply_env_overrides(&mut config);
    validate(&config)?;
    Ok(config)
}

pub async fn parse_config(path: &Path) -> Result<ConsoleConfig, ConsoleError> {
    if !path.exists() {
        return Err(ConsoleError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(ConsoleError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config: ConsoleConfig = serde_yaml::from_str(&content)?;

    // Semantic validation, so `validate` reports the same errors a real
    // startup would hit
    validate(&config)?;

    Ok(config)
}

fn apply_env_overrides(config: &mut ConsoleConfig) {
    if let Ok(url) = std::env::var("TENDERWATCH_API_URL") {
        if !url.is_empty() {
            config.api.base_url = url;
        }
    }
    if let Ok(code) = std::env::var("TENDERWATCH_ACCESS_CODE") {
        if !code.is_empty() {
            config.console.access_code = code;
        }
    }
}

fn validate(config: &ConsoleConfig) -> Result<(), ConsoleError> {
    if !config.api.base_url.starts_with("http://") && !config.api.base_url.starts_with("https://") {
        return Err(ConsoleError::Config(format!(
            "api.base_url must be an http(s) URL, got: {}",
            config.api.base_url
        )));
    }
    if config.console.poll_interval_ms < 100 {
        return Err(ConsoleError::Config(
            "console.poll_interval_ms must be at least 100".into(),
        ));
    }
    if config.console.history_limit == 0 {
        return Err(ConsoleError::Config("console.history_limit must be positive".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn defaults_when_no_file() {
        let config = load_config(None).await.unwrap();
        assert_eq!(config.console.poll_interval_ms, 1000);
        assert_eq!(config.console.history_limit, 10);
    }

    #[tokio::test]
    async fn parses_partial_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "api:\n  base_url: https://pipeline.example.com/api\n  timeout_secs: 10\n"
        )
        .unwrap();

        let config = parse_config(file.path()).await.unwrap();
        assert_eq!(config.api.base_url, "https://pipeline.example.com/api");
        assert_eq!(config.api.timeout_secs, 10);
        // Unspecified sections fall back to defaults
        assert_eq!(config.console.access_code, "dev123");
    }

    #[tokio::test]
    async fn rejects_bad_poll_interval() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "console:\n  poll_interval_ms: 5\n  access_code: x\n  history_limit: 10").unwrap();

        let err = parse_config(file.path()).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Config(_)));
    }

    #[tokio::test]
    async fn rejects_non_http_base_url() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api:\n  base_url: ftp://pipeline.example.com\n  timeout_secs: 30").unwrap();

        let err = parse_config(file.path()).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Config(_)));
    }

    #[tokio::test]
    async fn missing_file_is_a_config_error() {
        let err = parse_config(Path::new("/nonexistent/tenderwatch.yaml"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConsoleError::Config(_)));
    }
}
