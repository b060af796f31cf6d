use crate::api::models::{GlobalStatus, StatusDetails, STOPPING_STAGE};

/// Stage label shown between a successful start response and the first
/// confirming poll. Console-asserted, never sent by the backend.
pub const STARTING_STAGE: &str = "Starting...";

pub const STOPPING_MESSAGE: &str = "Pipeline stop requested. Shutting down gracefully...";

/// Locally-asserted state bridging the gap between a command response and
/// the next authoritative poll.
#[derive(Debug, Clone, PartialEq)]
enum Overlay {
    Starting { pipeline_id: i64, message: String },
    Stopping,
}

/// Merges the two writers of "what is happening right now" (operator
/// commands and the status poller) into one coherent view.
///
/// Policy: the last confirmed poll always wins. A command installs an
/// optimistic overlay so the console never flashes stale idle (after a
/// start) or stale running (after a stop) state, and every successful
/// poll replaces the whole picture and discards the overlay.
#[derive(Debug, Default)]
pub struct StatusReconciler {
    last_polled: Option<GlobalStatus>,
    overlay: Option<Overlay>,
    /// Whether any activity (a non-idle poll or a locally-issued command)
    /// has been seen since the last idle observation. Drives the
    /// exactly-once history refresh on the active→idle edge.
    active_since_idle: bool,
}

impl StatusReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful start response. The view flips to an optimistic
    /// "starting" status immediately rather than waiting out a poll
    /// interval of stale idle.
    pub fn note_started(&mut self, pipeline_id: i64, message: &str) {
        self.overlay = Some(Overlay::Starting {
            pipeline_id,
            message: message.to_string(),
        });
        self.active_since_idle = true;
    }

    /// Record a stop request. Returns false when the view already shows a
    /// pending stop; a second stop is harmless and changes nothing.
    pub fn note_stop_requested(&mut self) -> bool {
        if self.is_stopping() {
            return false;
        }
        self.overlay = Some(Overlay::Stopping);
        // A stop implies an active run is ending, even if no running poll
        // was ever absorbed; the next idle observation must refresh history
        self.active_since_idle = true;
        true
    }

    /// Absorb an authoritative status read. The confirmed value replaces
    /// the previous one wholesale and supersedes any optimistic overlay.
    ///
    /// Returns true when this poll completed an active-to-idle transition,
    /// the one signal that the run history just went stale. Subsequent
    /// idle polls return false until activity is seen again.
    pub fn apply_poll(&mut self, status: GlobalStatus) -> bool {
        let became_idle = status.is_idle() && self.active_since_idle;
        self.active_since_idle = !status.is_idle();
        self.last_polled = Some(status);
        self.overlay = None;
        became_idle
    }

    /// The externally visible status: the last confirmed poll with any
    /// optimistic overlay composed on top. None until the first poll or
    /// command succeeds.
    pub fn view(&self) -> Option<GlobalStatus> {
        match &self.overlay {
            Some(Overlay::Starting { pipeline_id, message }) => Some(GlobalStatus {
                current_pipeline_id: Some(*pipeline_id),
                current_stage: STARTING_STAGE.to_string(),
                is_running: true,
                progress: 0,
                total: 0,
                details: StatusDetails {
                    message: message.clone(),
                    scraper_stats: Default::default(),
                },
                last_update: self.last_polled.as_ref().and_then(|s| s.last_update),
            }),
            Some(Overlay::Stopping) => {
                let mut view = self.last_polled.clone().unwrap_or(GlobalStatus {
                    current_pipeline_id: None,
                    current_stage: String::new(),
                    is_running: true,
                    progress: 0,
                    total: 0,
                    details: StatusDetails::default(),
                    last_update: None,
                });
                view.current_stage = STOPPING_STAGE.to_string();
                view.details.message = STOPPING_MESSAGE.to_string();
                Some(view)
            }
            None => self.last_polled.clone(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.view().map(|v| v.is_running).unwrap_or(false)
    }

    pub fn is_stopping(&self) -> bool {
        self.view().map(|v| v.is_stopping()).unwrap_or(false)
    }
}
