use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use tenderwatch::api::models::{
    GlobalStatus, ModelCatalog, PipelineRun, RunStatus, StartReceipt, StatusDetails, StopReceipt,
    IDLE_STAGE, STOPPING_STAGE,
};
use tenderwatch::api::PipelineBackend;
use tenderwatch::catalog;
use tenderwatch::errors::ConsoleError;
use tenderwatch::pipeline::{CommandDispatcher, RunRegistry, StartCommand, StatusPoller};

/// Scripted stand-in for the backend: status polls are served from a
/// queue, run ids are handed out sequentially, and every call is counted.
struct ScriptedBackend {
    polls: std::sync::Mutex<VecDeque<ScriptedPoll>>,
    runs: std::sync::Mutex<Vec<PipelineRun>>,
    next_id: AtomicI64,
    fail_starts: AtomicBool,
    status_calls: AtomicUsize,
    list_calls: AtomicUsize,
    start_calls: AtomicUsize,
    stop_calls: AtomicUsize,
}

enum ScriptedPoll {
    Ok(GlobalStatus),
    Fail,
}

impl ScriptedBackend {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            polls: std::sync::Mutex::new(VecDeque::new()),
            runs: std::sync::Mutex::new(Vec::new()),
            next_id: AtomicI64::new(100),
            fail_starts: AtomicBool::new(false),
            status_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
        })
    }

    fn script_poll(&self, status: GlobalStatus) {
        self.polls.lock().unwrap().push_back(ScriptedPoll::Ok(status));
    }

    fn script_poll_failure(&self) {
        self.polls.lock().unwrap().push_back(ScriptedPoll::Fail);
    }

    fn seed_runs(&self, runs: Vec<PipelineRun>) {
        *self.runs.lock().unwrap() = runs;
    }

    fn receipt(&self, message: &str) -> Result<StartReceipt, ConsoleError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_starts.load(Ordering::SeqCst) {
            return Err(ConsoleError::Api("scripted 500".into()));
        }
        Ok(StartReceipt {
            message: message.to_string(),
            pipeline_id: self.next_id.fetch_add(1, Ordering::SeqCst),
        })
    }
}

#[async_trait]
impl PipelineBackend for ScriptedBackend {
    async fn scraper_names(&self) -> Result<Vec<String>, ConsoleError> {
        Ok(vec!["economymiddleeast".into(), "zawya".into()])
    }

    async fn run_link_finder(&self, _scrapers: &[String]) -> Result<StartReceipt, ConsoleError> {
        self.receipt("Link finder pipeline started.")
    }

    async fn run_article_scraper(&self) -> Result<StartReceipt, ConsoleError> {
        self.receipt("Article scraper pipeline started.")
    }

    async fn run_embeddings(&self) -> Result<StartReceipt, ConsoleError> {
        self.receipt("Embedding generation started.")
    }

    async fn run_analysis(
        &self,
        _model_type: &str,
        _model_name: &str,
        _temperature: Option<f32>,
    ) -> Result<StartReceipt, ConsoleError> {
        self.receipt("Analysis pipeline started.")
    }

    async fn run_full_pipeline(
        &self,
        _scrapers: &[String],
        _model_type: Option<&str>,
        _model_name: Option<&str>,
        _temperature: Option<f32>,
    ) -> Result<StartReceipt, ConsoleError> {
        self.receipt("Full pipeline started.")
    }

    async fn stop_pipeline(&self) -> Result<StopReceipt, ConsoleError> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        Ok(StopReceipt {
            message: "Pipeline stop signal sent.".into(),
        })
    }

    async fn global_status(&self) -> Result<GlobalStatus, ConsoleError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        match self.polls.lock().unwrap().pop_front() {
            Some(ScriptedPoll::Ok(status)) => Ok(status),
            Some(ScriptedPoll::Fail) => Err(ConsoleError::Network("scripted outage".into())),
            None => Ok(idle_status()),
        }
    }

    async fn list_runs(&self) -> Result<Vec<PipelineRun>, ConsoleError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.runs.lock().unwrap().clone())
    }

    async fn run_status(&self, id: i64) -> Result<PipelineRun, ConsoleError> {
        let found = self.runs.lock().unwrap().iter().find(|r| r.id == id).cloned();
        Ok(found.unwrap_or_else(|| running_run(id)))
    }

    async fn available_models(&self) -> Result<ModelCatalog, ConsoleError> {
        Ok(catalog::fallback_catalog())
    }
}

fn idle_status() -> GlobalStatus {
    GlobalStatus {
        current_pipeline_id: None,
        current_stage: IDLE_STAGE.to_string(),
        is_running: false,
        progress: 0,
        total: 0,
        details: StatusDetails {
            message: "No process is currently running.".into(),
            scraper_stats: Default::default(),
        },
        last_update: None,
    }
}

fn running_status(stage: &str, progress: u64, total: u64) -> GlobalStatus {
    GlobalStatus {
        current_pipeline_id: Some(100),
        current_stage: stage.to_string(),
        is_running: true,
        progress,
        total,
        details: StatusDetails {
            message: format!("{} in progress", stage),
            scraper_stats: Default::default(),
        },
        last_update: None,
    }
}

fn running_run(id: i64) -> PipelineRun {
    PipelineRun {
        id,
        status: RunStatus::Running,
        start_time: Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap(),
        end_time: None,
        new_links_found: 0,
        articles_scraped: 0,
        articles_embedded: 0,
        articles_analyzed: 0,
        embedding_cost: 0.0,
        analysis_cost: 0.0,
        total_cost: 0.0,
        details: None,
        scraper_stats: None,
    }
}

fn completed_run(id: i64) -> PipelineRun {
    PipelineRun {
        status: RunStatus::Completed,
        end_time: Some(Utc.with_ymd_and_hms(2025, 6, 1, 10, 5, 0).unwrap()),
        ..running_run(id)
    }
}

struct Harness {
    backend: Arc<ScriptedBackend>,
    registry: Arc<RunRegistry>,
    poller: Arc<StatusPoller>,
    dispatcher: CommandDispatcher,
}

fn harness() -> Harness {
    let backend = ScriptedBackend::new();
    let as_backend: Arc<dyn PipelineBackend> = backend.clone();
    let registry = Arc::new(RunRegistry::new(as_backend.clone()));
    let poller = Arc::new(StatusPoller::new(
        as_backend.clone(),
        registry.clone(),
        Duration::from_millis(1000),
    ));
    let dispatcher = CommandDispatcher::new(as_backend, poller.clone(), registry.clone());
    Harness {
        backend,
        registry,
        poller,
        dispatcher,
    }
}

#[tokio::test]
async fn empty_scraper_selection_makes_no_network_calls() {
    let h = harness();
    let err = h
        .dispatcher
        .start(&StartCommand::LinkFinder { scrapers: vec![] })
        .await
        .unwrap_err();
    assert!(matches!(err, ConsoleError::Validation(_)));

    let err = h
        .dispatcher
        .start(&StartCommand::FullPipeline {
            scrapers: vec![],
            provider: "openai".into(),
            model: "gpt-4o".into(),
            temperature: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ConsoleError::Validation(_)));

    assert_eq!(h.backend.start_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.backend.status_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn analysis_dispatch_has_no_scraper_precondition() {
    let h = harness();
    let receipt = h
        .dispatcher
        .start(&StartCommand::Analysis {
            provider: "openai".into(),
            model: "gpt-4o".into(),
            temperature: None,
        })
        .await
        .unwrap();
    assert_eq!(receipt.pipeline_id, 100);
    assert_eq!(h.backend.start_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn selection_follows_the_most_recently_started_run() {
    let h = harness();
    let first = h
        .dispatcher
        .start(&StartCommand::ArticleScraper)
        .await
        .unwrap();
    assert_eq!(h.registry.selected().await, Some(first.pipeline_id));

    let second = h.dispatcher.start(&StartCommand::Embeddings).await.unwrap();
    assert_ne!(first.pipeline_id, second.pipeline_id);
    assert_eq!(h.registry.selected().await, Some(second.pipeline_id));
    assert_eq!(
        h.registry.selected_detail().await.map(|r| r.id),
        Some(second.pipeline_id)
    );
}

#[tokio::test]
async fn never_running_without_a_successful_start() {
    let h = harness();
    assert!(h.poller.current().is_none());

    h.backend.fail_starts.store(true, Ordering::SeqCst);
    let err = h
        .dispatcher
        .start(&StartCommand::ArticleScraper)
        .await
        .unwrap_err();
    // Generic operator-facing message, not the transport detail
    assert_eq!(err.to_string(), "Backend error: Failed to start article scraper");

    // A failed start installs no optimistic state
    assert!(h.poller.current().map(|v| !v.is_running).unwrap_or(true));
}

#[tokio::test]
async fn start_transition_shows_without_a_full_interval_of_lag() {
    let h = harness();
    // Script the post-dispatch out-of-band fetch to confirm the run
    h.backend.script_poll(running_status("Finding Links", 0, 0));

    let receipt = h
        .dispatcher
        .start(&StartCommand::LinkFinder {
            scrapers: vec!["zawya".into()],
        })
        .await
        .unwrap();

    let view = h.poller.current().unwrap();
    assert!(view.is_running);
    assert_eq!(view.current_pipeline_id, Some(100));
    assert_eq!(receipt.pipeline_id, 100);
}

#[tokio::test]
async fn idle_transition_refreshes_history_exactly_once() {
    let h = harness();
    h.seeded_history();
    h.backend.script_poll(running_status("Scraping", 4, 10));
    h.backend.script_poll(idle_status());
    h.backend.script_poll(idle_status());

    h.poller.sync_now().await.unwrap();
    assert_eq!(h.poller.current().unwrap().completion_ratio(), Some(0.4));
    assert_eq!(h.backend.list_calls.load(Ordering::SeqCst), 0);

    // The transition into idle refreshes history once
    h.poller.sync_now().await.unwrap();
    assert_eq!(h.backend.list_calls.load(Ordering::SeqCst), 1);

    // Subsequent idle polls do not
    h.poller.sync_now().await.unwrap();
    assert_eq!(h.backend.list_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_polls_keep_the_last_status_visible() {
    let h = harness();
    h.backend.script_poll(running_status("Generating Embeddings", 2, 8));
    h.backend.script_poll_failure();
    h.backend.script_poll_failure();

    h.poller.sync_now().await.unwrap();
    let before = h.poller.current().unwrap();

    assert!(h.poller.sync_now().await.is_err());
    assert!(h.poller.sync_now().await.is_err());

    // Two consecutive failures: no blanking, value unchanged
    assert_eq!(h.poller.current().unwrap(), before);
}

#[tokio::test]
async fn stop_overlays_then_converges_to_polled_truth() {
    let h = harness();
    h.backend.script_poll(running_status("Analyzing Articles", 1, 5));
    h.poller.sync_now().await.unwrap();

    // The dispatcher's post-stop fetch still sees the backend draining
    h.backend.script_poll(running_status("Analyzing Articles", 2, 5));
    h.dispatcher.stop().await.unwrap();
    assert_eq!(h.backend.stop_calls.load(Ordering::SeqCst), 1);

    // A second stop while draining is harmless
    h.backend.script_poll(running_status("Analyzing Articles", 3, 5));
    h.dispatcher.stop().await.unwrap();
    assert_eq!(h.backend.stop_calls.load(Ordering::SeqCst), 2);

    // Once the backend reports idle, the view converges within one poll
    h.backend.script_poll(idle_status());
    h.poller.sync_now().await.unwrap();
    let view = h.poller.current().unwrap();
    assert!(view.is_idle());
    assert_ne!(view.current_stage, STOPPING_STAGE);
}

#[tokio::test]
async fn stop_overlay_is_visible_until_superseded() {
    let h = harness();
    h.backend.script_poll(running_status("Scraping Articles", 1, 4));
    h.poller.sync_now().await.unwrap();

    // Fail the out-of-band post-stop fetch: the optimistic overlay is all
    // the operator sees until the next successful poll
    h.backend.script_poll_failure();
    h.dispatcher.stop().await.unwrap();

    let view = h.poller.current().unwrap();
    assert_eq!(view.current_stage, STOPPING_STAGE);
    assert!(view.details.message.contains("stop requested"));
}

#[tokio::test]
async fn first_history_load_selects_the_most_recent_run() {
    let h = harness();
    h.backend
        .seed_runs(vec![completed_run(12), completed_run(11), completed_run(9)]);

    h.registry.refresh().await.unwrap();
    assert_eq!(h.registry.selected().await, Some(12));
    assert_eq!(h.registry.selected_detail().await.map(|r| r.id), Some(12));

    // Backend order is preserved, never re-sorted
    let ids: Vec<i64> = h.registry.runs().await.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![12, 11, 9]);
}

#[tokio::test]
async fn watch_subscribers_observe_reconciled_updates() {
    let h = harness();
    let mut rx = h.poller.subscribe();

    h.backend.script_poll(running_status("Finding Links", 1, 3));
    h.poller.sync_now().await.unwrap();

    rx.changed().await.unwrap();
    let seen = rx.borrow_and_update().clone().unwrap();
    assert_eq!(seen.current_stage, "Finding Links");
}

impl Harness {
    fn seeded_history(&self) {
        self.backend.seed_runs(vec![completed_run(50)]);
    }
}
