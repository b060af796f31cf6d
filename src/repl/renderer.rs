use console::style;

use crate::api::models::{GlobalStatus, ModelCatalog, PipelineRun, RunStatus};
use crate::pipeline::StageSelection;
use crate::repl::commands::COMMAND_HELP;
use crate::utils::formatting::{format_cost, format_duration_secs};

/// Render the reconciled global status as a multi-line block.
pub fn render_status(status: &GlobalStatus) -> String {
    let badge = if status.is_stopping() {
        style(" STOPPING ").black().on_yellow().to_string()
    } else if status.is_running {
        style(" RUNNING ").black().on_cyan().to_string()
    } else {
        style(" IDLE ").black().on_white().to_string()
    };

    let mut out = format!(
        "{} {}",
        badge,
        style(&status.current_stage).white().bold(),
    );

    if let Some(id) = status.current_pipeline_id {
        out.push_str(&format!("  {}", style(format!("run #{}", id)).cyan()));
    }
    if let Some(ratio) = status.completion_ratio() {
        out.push_str(&format!(
            "  {} ({:.0}%)",
            style(format!("{}/{}", status.progress, status.total)).dim(),
            ratio * 100.0,
        ));
    }
    if !status.details.message.is_empty() {
        out.push_str(&format!("\n  {}", style(&status.details.message).dim()));
    }
    if let Some(ts) = status.last_update {
        out.push_str(&format!(
            "\n  {}",
            style(format!("last update {}", ts.format("%H:%M:%S"))).dim(),
        ));
    }
    out
}

/// One-line summary used for the live status spinner.
pub fn status_line(status: &GlobalStatus) -> String {
    let progress = match status.completion_ratio() {
        Some(_) => format!(" {}/{}", status.progress, status.total),
        None => String::new(),
    };
    if status.details.message.is_empty() {
        format!("{}{}", status.current_stage, progress)
    } else {
        format!("{}{} | {}", status.current_stage, progress, status.details.message)
    }
}

fn status_badge(status: RunStatus) -> String {
    match status {
        RunStatus::Running => style("RUNNING").cyan().to_string(),
        RunStatus::Completed => style("COMPLETED").green().to_string(),
        RunStatus::Failed => style("FAILED").red().to_string(),
        RunStatus::Paused => style("PAUSED").yellow().to_string(),
        RunStatus::Stopped => style("STOPPED").color256(208).to_string(),
    }
}

/// Render the run-history table, most recent first, capped for display.
pub fn render_runs_table(runs: &[PipelineRun], selected: Option<i64>, limit: usize) -> String {
    if runs.is_empty() {
        return style("No pipeline runs yet.").dim().to_string();
    }

    let mut out = format!(
        "{:<2} {:>5}  {:<10} {:<20} {:>9} {:>7} {:>7} {:>9}\n",
        "", "ID", "STATUS", "STARTED", "DURATION", "LINKS", "ARTS", "COST"
    );
    for run in runs.iter().take(limit) {
        let marker = if selected == Some(run.id) { "▸" } else { " " };
        let duration = match run.duration_secs() {
            Some(secs) => format_duration_secs(secs),
            None => "running".to_string(),
        };
        out.push_str(&format!(
            "{:<2} {:>5}  {:<19} {:<20} {:>9} {:>7} {:>7} {:>9}\n",
            marker,
            run.id,
            status_badge(run.status),
            run.start_time.format("%Y-%m-%d %H:%M:%S"),
            duration,
            run.new_links_found,
            run.articles_scraped,
            format_cost(run.total_cost),
        ));
    }
    if runs.len() > limit {
        out.push_str(&style(format!("  … {} older runs not shown", runs.len() - limit)).dim().to_string());
    }
    out
}

/// Render the detail view for one run: lifecycle, counters, costs.
pub fn render_run_detail(run: &PipelineRun) -> String {
    let mut out = format!(
        "{} {}\n",
        style(format!("Run #{}", run.id)).white().bold(),
        status_badge(run.status),
    );
    out.push_str(&format!(
        "  started {}",
        run.start_time.format("%Y-%m-%d %H:%M:%S"),
    ));
    match (run.end_time, run.duration_secs()) {
        (Some(end), Some(secs)) => out.push_str(&format!(
            ", ended {} ({})\n",
            end.format("%H:%M:%S"),
            format_duration_secs(secs),
        )),
        _ => out.push_str(&format!(", {}\n", style("still running").cyan())),
    }

    out.push_str(&format!(
        "  links found {}  articles scraped {}  embedded {}  analyzed {}\n",
        style(run.new_links_found).green(),
        style(run.articles_scraped).cyan(),
        style(run.articles_embedded).magenta(),
        style(run.articles_analyzed).yellow(),
    ));
    out.push_str(&format!(
        "  cost: embeddings {} + analysis {} = {}\n",
        format_cost(run.embedding_cost),
        format_cost(run.analysis_cost),
        style(format_cost(run.total_cost)).bold(),
    ));

    if let Some(details) = &run.details {
        if !details.is_empty() {
            out.push_str(&format!("  {}\n", style(details).dim()));
        }
    }
    if let Some(stats) = &run.scraper_stats {
        if let Some(map) = stats.as_object() {
            for (source, count) in map {
                out.push_str(&format!("    {} {}\n", style(source).dim(), count));
            }
        }
    }
    out
}

/// Render the scraper checklist with selection markers.
pub fn render_scrapers(available: &[String], selected: &[String]) -> String {
    if available.is_empty() {
        return style("No scrapers reported by the backend.").dim().to_string();
    }
    let mut out = format!(
        "{} ({} of {} selected)\n",
        style("Scrapers").white().bold(),
        selected.len(),
        available.len(),
    );
    for name in available {
        let mark = if selected.iter().any(|s| s == name) {
            style("[x]").green().to_string()
        } else {
            style("[ ]").dim().to_string()
        };
        out.push_str(&format!("  {} {}\n", mark, name));
    }
    out
}

/// Render the provider → models catalog, marking the current choice.
pub fn render_models(catalog: &ModelCatalog, selection: &StageSelection) -> String {
    let mut out = String::new();
    for (provider, models) in catalog {
        let marker = if *provider == selection.provider { "▸" } else { " " };
        out.push_str(&format!("{} {}\n", marker, style(provider).white().bold()));
        for model in models {
            let mark = if *provider == selection.provider && *model == selection.model {
                style("●").green().to_string()
            } else {
                style("○").dim().to_string()
            };
            out.push_str(&format!("    {} {}\n", mark, model));
        }
    }
    out
}

pub fn render_config(selection: &StageSelection) -> String {
    let temperature = selection
        .temperature
        .map(|t| t.to_string())
        .unwrap_or_else(|| "backend default".to_string());
    format!(
        "provider: {}\nmodel: {}\ntemperature: {}\nscrapers selected: {}",
        style(&selection.provider).cyan(),
        style(&selection.model).cyan(),
        style(temperature).dim(),
        selection.scrapers.len(),
    )
}

pub fn render_help(command: Option<&str>) -> String {
    match command {
        Some(name) => {
            match COMMAND_HELP.iter().find(|h| h.name == name) {
                Some(help) => format!(
                    "{}\n  {}\n",
                    style(help.usage).white().bold(),
                    help.description,
                ),
                None => format!("No such command: {}", name),
            }
        }
        None => {
            let mut out = format!("{}\n", style("Commands").white().bold());
            for help in COMMAND_HELP {
                out.push_str(&format!(
                    "  {:<52} {}\n",
                    style(help.usage).cyan(),
                    help.description,
                ));
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_run(id: i64, status: RunStatus) -> PipelineRun {
        PipelineRun {
            id,
            status,
            start_time: Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap(),
            end_time: status
                .is_terminal()
                .then(|| Utc.with_ymd_and_hms(2025, 6, 1, 10, 2, 30).unwrap()),
            new_links_found: 120,
            articles_scraped: 48,
            articles_embedded: 48,
            articles_analyzed: 40,
            embedding_cost: 0.002,
            analysis_cost: 0.0294,
            total_cost: 0.0314,
            details: Some("Completed successfully".into()),
            scraper_stats: None,
        }
    }

    #[test]
    fn runs_table_marks_selection_and_caps_rows() {
        let runs: Vec<_> = (0..12)
            .map(|i| sample_run(100 - i, RunStatus::Completed))
            .collect();
        let table = render_runs_table(&runs, Some(100), 10);
        assert!(table.contains('▸'));
        assert!(table.contains("2 older runs not shown"));
    }

    #[test]
    fn detail_shows_counters_and_total_cost() {
        let rendered = render_run_detail(&sample_run(7, RunStatus::Completed));
        assert!(rendered.contains("Run #7"));
        assert!(rendered.contains("$0.0314"));
        assert!(rendered.contains("2m 30s"));
    }

    #[test]
    fn running_run_has_no_duration() {
        let rendered = render_run_detail(&sample_run(8, RunStatus::Running));
        assert!(rendered.contains("still running"));
    }

    #[test]
    fn help_lists_every_command() {
        let rendered = render_help(None);
        for help in COMMAND_HELP {
            assert!(rendered.contains(help.name));
        }
    }
}
