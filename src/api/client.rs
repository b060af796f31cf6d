use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::errors::ConsoleError;
use super::models::{GlobalStatus, ModelCatalog, PipelineRun, StartReceipt, StopReceipt};

/// The backend REST surface the console consumes. Everything the console
/// knows about the pipeline goes through this trait; tests substitute a
/// scripted implementation.
#[async_trait]
pub trait PipelineBackend: Send + Sync {
    async fn scraper_names(&self) -> Result<Vec<String>, ConsoleError>;
    async fn run_link_finder(&self, scrapers: &[String]) -> Result<StartReceipt, ConsoleError>;
    async fn run_article_scraper(&self) -> Result<StartReceipt, ConsoleError>;
    async fn run_embeddings(&self) -> Result<StartReceipt, ConsoleError>;
    async fn run_analysis(
        &self,
        model_type: &str,
        model_name: &str,
        temperature: Option<f32>,
    ) -> Result<StartReceipt, ConsoleError>;
    async fn run_full_pipeline(
        &self,
        scrapers: &[String],
        model_type: Option<&str>,
        model_name: Option<&str>,
        temperature: Option<f32>,
    ) -> Result<StartReceipt, ConsoleError>;
    async fn stop_pipeline(&self) -> Result<StopReceipt, ConsoleError>;
    async fn global_status(&self) -> Result<GlobalStatus, ConsoleError>;
    async fn list_runs(&self) -> Result<Vec<PipelineRun>, ConsoleError>;
    async fn run_status(&self, id: i64) -> Result<PipelineRun, ConsoleError>;
    async fn available_models(&self) -> Result<ModelCatalog, ConsoleError>;
}

/// reqwest implementation against the real backend.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConsoleError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConsoleError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConsoleError> {
        let url = format!("{}/{}", self.base_url, path);
        let resp = self.client.get(&url).send().await
            .map_err(|e| ConsoleError::Network(format!("GET {} failed: {}", path, e)))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ConsoleError::Api(format!("GET {} returned HTTP {}", path, status)));
        }
        resp.json().await
            .map_err(|e| ConsoleError::Api(format!("Invalid response from {}: {}", path, e)))
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ConsoleError> {
        let url = format!("{}/{}", self.base_url, path);
        let mut req = self.client.post(&url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let resp = req.send().await
            .map_err(|e| ConsoleError::Network(format!("POST {} failed: {}", path, e)))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ConsoleError::Api(format!("POST {} returned HTTP {}", path, status)));
        }
        resp.json().await
            .map_err(|e| ConsoleError::Api(format!("Invalid response from {}: {}", path, e)))
    }
}

#[async_trait]
impl PipelineBackend for HttpBackend {
    async fn scraper_names(&self) -> Result<Vec<String>, ConsoleError> {
        self.get("scraper/scraper-names").await
    }

    async fn run_link_finder(&self, scrapers: &[String]) -> Result<StartReceipt, ConsoleError> {
        self.post("scraper/run-link-finder", Some(json!({ "scrapers": scrapers }))).await
    }

    async fn run_article_scraper(&self) -> Result<StartReceipt, ConsoleError> {
        self.post("scraper/run-article-scraper", None).await
    }

    async fn run_embeddings(&self) -> Result<StartReceipt, ConsoleError> {
        self.post("analysis/run-embeddings", None).await
    }

    async fn run_analysis(
        &self,
        model_type: &str,
        model_name: &str,
        temperature: Option<f32>,
    ) -> Result<StartReceipt, ConsoleError> {
        let mut body = json!({
            "model_type": model_type,
            "model_name": model_name,
        });
        if let Some(t) = temperature {
            body["temperature"] = json!(t);
        }
        self.post("analysis/run-analysis", Some(body)).await
    }

    async fn run_full_pipeline(
        &self,
        scrapers: &[String],
        model_type: Option<&str>,
        model_name: Option<&str>,
        temperature: Option<f32>,
    ) -> Result<StartReceipt, ConsoleError> {
        let mut body = json!({ "scrapers": scrapers });
        if let Some(provider) = model_type {
            body["model_type"] = json!(provider);
        }
        if let Some(model) = model_name {
            body["model_name"] = json!(model);
        }
        if let Some(t) = temperature {
            body["temperature"] = json!(t);
        }
        self.post("pipeline/run-full", Some(body)).await
    }

    async fn stop_pipeline(&self) -> Result<StopReceipt, ConsoleError> {
        self.post("stop-pipeline", None).await
    }

    async fn global_status(&self) -> Result<GlobalStatus, ConsoleError> {
        self.get("status").await
    }

    async fn list_runs(&self) -> Result<Vec<PipelineRun>, ConsoleError> {
        self.get("pipeline/runs").await
    }

    async fn run_status(&self, id: i64) -> Result<PipelineRun, ConsoleError> {
        self.get(&format!("pipeline/runs/{}/status", id)).await
    }

    async fn available_models(&self) -> Result<ModelCatalog, ConsoleError> {
        self.get("models").await
    }
}
