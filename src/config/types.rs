use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub console: UiConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the backend REST API, including the `/api` prefix.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    /// Cadence of the global status poll while the console is mounted.
    pub poll_interval_ms: u64,
    /// Shared secret for the console gate. Cosmetic access control only.
    pub access_code: String,
    /// How many recent runs the monitoring table shows.
    pub history_limit: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            access_code: "dev123".to_string(),
            history_limit: 10,
        }
    }
}
