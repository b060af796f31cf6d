use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Stage label the backend reports when no pipeline is active.
pub const IDLE_STAGE: &str = "Idle";
/// Stage label shown while a stop request is draining. The backend never
/// writes this value itself; the console overlays it after a stop command.
pub const STOPPING_STAGE: &str = "Stopping...";

/// The singleton status record describing whatever pipeline is currently
/// active. Overwritten in place by the backend on every write; the console
/// polls it and never owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalStatus {
    pub current_pipeline_id: Option<i64>,
    pub current_stage: String,
    pub is_running: bool,
    #[serde(default)]
    pub progress: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub details: StatusDetails,
    pub last_update: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusDetails {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub scraper_stats: HashMap<String, serde_json::Value>,
}

impl GlobalStatus {
    /// True when the backend reports nothing active. The `"Idle"` stage
    /// literal is an integration assumption confirmed against the backend,
    /// classified here and nowhere else.
    pub fn is_idle(&self) -> bool {
        !self.is_running && self.current_stage == IDLE_STAGE
    }

    pub fn is_stopping(&self) -> bool {
        self.current_stage == STOPPING_STAGE
    }

    /// Completion ratio in [0, 1] when the backend reported a total.
    pub fn completion_ratio(&self) -> Option<f64> {
        (self.total > 0).then(|| self.progress as f64 / self.total as f64)
    }
}

/// Lifecycle states a pipeline run moves through on the backend. Terminal
/// runs are immutable; the console only ever reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
    Paused,
    Stopped,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Stopped)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "RUNNING"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Failed => write!(f, "FAILED"),
            Self::Paused => write!(f, "PAUSED"),
            Self::Stopped => write!(f, "STOPPED"),
        }
    }
}

/// One execution record of a pipeline stage (or the full chain), created
/// by the backend at dispatch time and mutated server-side until terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRun {
    pub id: i64,
    pub status: RunStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub new_links_found: u64,
    #[serde(default)]
    pub articles_scraped: u64,
    #[serde(default)]
    pub articles_embedded: u64,
    #[serde(default)]
    pub articles_analyzed: u64,
    #[serde(default)]
    pub embedding_cost: f64,
    #[serde(default)]
    pub analysis_cost: f64,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub details: Option<String>,
    /// Free-form per-source counts; displayed verbatim, never interpreted.
    #[serde(default)]
    pub scraper_stats: Option<serde_json::Value>,
}

impl PipelineRun {
    /// Wall-clock duration in seconds, once the run has ended.
    pub fn duration_secs(&self) -> Option<i64> {
        self.end_time
            .map(|end| end.signed_duration_since(self.start_time).num_seconds())
    }
}

/// Response to every start command: a human message plus the id of the
/// run the backend just created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartReceipt {
    pub message: String,
    pub pipeline_id: i64,
}

/// Response to a stop command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopReceipt {
    pub message: String,
}

/// Provider tag → model names, as served by the backend's models endpoint.
pub type ModelCatalog = BTreeMap<String, Vec<String>>;
