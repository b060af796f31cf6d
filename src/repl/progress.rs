use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::models::GlobalStatus;
use crate::repl::renderer::status_line;

/// Live one-line status display fed by the poller subscription.
pub struct StatusLine {
    bar: ProgressBar,
    last_stage: Option<String>,
}

impl StatusLine {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}")
                .unwrap(),
        );
        bar.set_message("Waiting for first status poll...");
        bar.enable_steady_tick(Duration::from_millis(120));
        Self {
            bar,
            last_stage: None,
        }
    }

    /// Absorb a reconciled status. Returns a transition line to print when
    /// the stage changed since the last update.
    pub fn update(&mut self, status: &GlobalStatus) -> Option<String> {
        self.bar.set_message(status_line(status));

        let changed = self.last_stage.as_deref() != Some(status.current_stage.as_str());
        self.last_stage = Some(status.current_stage.clone());
        changed.then(|| transition_line(status))
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}

fn transition_line(status: &GlobalStatus) -> String {
    if status.is_idle() {
        format!(
            "{} {}",
            style("■").dim(),
            style("Pipeline idle").dim(),
        )
    } else if status.is_stopping() {
        format!(
            "{} {}",
            style("◼").yellow(),
            style(&status.current_stage).yellow(),
        )
    } else {
        format!(
            "{} {}",
            style("▶").cyan().bold(),
            style(&status.current_stage).cyan(),
        )
    }
}
