use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::providers::huggingface::DEFAULT_INFERENCE_URL;
use crate::providers::models::SummarizationModel;
use crate::providers::newsapi::DEFAULT_NEWS_API_URL;

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Token for the hosted inference API (embeddings and model calls)
    pub hugging_face_api_key: String,
    /// NewsAPI key for article search
    pub news_api_key: String,
    /// Inference API base URL (override for self-hosted endpoints or tests)
    pub inference_url: String,
    /// NewsAPI base URL
    pub news_api_url: String,
    /// Port the HTTP server listens on
    pub port: u16,
    /// Address the HTTP server binds to
    pub bind: String,
    /// Upper bound on any single collaborator call
    pub request_timeout: Duration,
    /// How many article pages to fetch at once
    pub fetch_concurrency: usize,
    /// Which model backs summarization
    pub summarization_model: SummarizationModel,
    /// Outbound request rate for the inference API (0 disables pacing)
    pub inference_qps: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hugging_face_api_key: String::new(),
            news_api_key: String::new(),
            inference_url: DEFAULT_INFERENCE_URL.to_string(),
            news_api_url: DEFAULT_NEWS_API_URL.to_string(),
            port: 3000,
            bind: "0.0.0.0".to_string(),
            request_timeout: Duration::from_secs(30),
            fetch_concurrency: 8,
            summarization_model: SummarizationModel::default(),
            inference_qps: 5.0,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default except the two API keys, which are checked
    /// by `require_*` right before an operation needs them.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(v) => v.parse().with_context(|| format!("PORT is not a valid port: {v}"))?,
            Err(_) => defaults.port,
        };

        let request_timeout = match env::var("NEWSPRISM_TIMEOUT_SECS") {
            Ok(v) => Duration::from_secs(
                v.parse()
                    .with_context(|| format!("NEWSPRISM_TIMEOUT_SECS must be whole seconds: {v}"))?,
            ),
            Err(_) => defaults.request_timeout,
        };

        let fetch_concurrency = match env::var("NEWSPRISM_FETCH_CONCURRENCY") {
            Ok(v) => v
                .parse::<usize>()
                .with_context(|| format!("NEWSPRISM_FETCH_CONCURRENCY must be a number: {v}"))?
                .max(1),
            Err(_) => defaults.fetch_concurrency,
        };

        let summarization_model = match env::var("NEWSPRISM_SUMMARY_MODEL") {
            Ok(v) => v.parse()?,
            Err(_) => defaults.summarization_model,
        };

        let inference_qps = match env::var("NEWSPRISM_HF_QPS") {
            Ok(v) => v
                .parse()
                .with_context(|| format!("NEWSPRISM_HF_QPS must be a number: {v}"))?,
            Err(_) => defaults.inference_qps,
        };

        Ok(Self {
            hugging_face_api_key: env::var("HUGGING_FACE_API_KEY").unwrap_or_default(),
            news_api_key: env::var("NEWS_API_KEY").unwrap_or_default(),
            inference_url: env::var("HF_INFERENCE_URL").unwrap_or(defaults.inference_url),
            news_api_url: env::var("NEWS_API_URL").unwrap_or(defaults.news_api_url),
            port,
            bind: env::var("NEWSPRISM_BIND").unwrap_or(defaults.bind),
            request_timeout,
            fetch_concurrency,
            summarization_model,
            inference_qps,
        })
    }

    /// Check that the inference API key is configured.
    /// Call this before any operation that embeds or calls a hosted model.
    pub fn require_hugging_face(&self) -> Result<()> {
        if self.hugging_face_api_key.is_empty() {
            anyhow::bail!(
                "HUGGING_FACE_API_KEY not set. Add it to your .env file or export it."
            );
        }
        Ok(())
    }

    /// Check that the NewsAPI key is configured.
    pub fn require_news_api(&self) -> Result<()> {
        if self.news_api_key.is_empty() {
            anyhow::bail!(
                "NEWS_API_KEY not set. Add it to your .env file or export it."
            );
        }
        Ok(())
    }
}
