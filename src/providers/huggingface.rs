// Hugging Face Inference API client.
//
// One HTTP client serves every hosted-model capability: sentence embeddings,
// summarization, translation, sentiment and named-entity recognition. Each
// capability is its own trait impl, so the pipeline sees five independent
// collaborators that happen to share a connection pool and a rate limiter.
//
// API docs: https://huggingface.co/docs/api-inference

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::language::Language;
use super::models::ModelSet;
use super::rate_limiter::{with_retry, HttpStatusError, RateLimiter, RetryPolicy};
use super::traits::{
    EmbeddingProvider, Entity, EntityProvider, Sentiment, SentimentProvider,
    SummarizationProvider, TranslationProvider,
};

/// Default hosted inference endpoint.
pub const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co";

/// Texts per embedding request.
const EMBED_BATCH_SIZE: usize = 32;

/// Returned when the summarization model produced nothing usable.
pub const EMPTY_SUMMARY: &str = "No summary available.";

pub struct HuggingFaceClient {
    client: Client,
    base_url: String,
    api_key: String,
    models: ModelSet,
    rate_limiter: RateLimiter,
    retry: RetryPolicy,
}

impl HuggingFaceClient {
    pub fn new(
        base_url: &str,
        api_key: String,
        models: ModelSet,
        requests_per_second: f64,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("newsprism/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            models,
            rate_limiter: RateLimiter::new(requests_per_second),
            retry: RetryPolicy::default(),
        })
    }

    /// Override the retry schedule (tests use a near-zero backoff).
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// POST a JSON payload to `path` and deserialize the response, retrying
    /// throttled and model-loading responses.
    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let url = format!("{}/{}", self.base_url, path);
        let url = url.as_str();
        with_retry(&self.rate_limiter, &self.retry, move || async move {
            debug!(url = %url, "Inference request");

            let mut request = self.client.post(url).json(body);
            if !self.api_key.is_empty() {
                request = request.bearer_auth(&self.api_key);
            }

            let response = request
                .send()
                .await
                .with_context(|| format!("Inference request to {path} failed"))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(anyhow::Error::new(HttpStatusError {
                    status: status.as_u16(),
                    body,
                })
                .context(format!("Inference API rejected {path}")));
            }

            response
                .json::<T>()
                .await
                .with_context(|| format!("Failed to parse inference response from {path}"))
        })
        .await
    }

    fn model_path(model_id: &str) -> String {
        format!("models/{model_id}")
    }
}

#[async_trait]
impl EmbeddingProvider for HuggingFaceClient {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        let path = format!(
            "pipeline/feature-extraction/{}",
            self.models.embedding.model_id()
        );
        let mut embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(EMBED_BATCH_SIZE) {
            let request = InferenceRequest {
                inputs: chunk,
                parameters: None::<()>,
                options: Options::default(),
            };
            let batch: Vec<Vec<f64>> = self.post(&path, &request).await?;
            if batch.len() != chunk.len() {
                anyhow::bail!(
                    "Embedding model returned {} vectors for {} inputs",
                    batch.len(),
                    chunk.len()
                );
            }
            embeddings.extend(batch);
        }

        debug!(
            texts = texts.len(),
            dim = embeddings.first().map_or(0, Vec::len),
            "Computed embeddings"
        );

        Ok(embeddings)
    }
}

#[async_trait]
impl SummarizationProvider for HuggingFaceClient {
    async fn summarize(&self, text: &str) -> Result<String> {
        let request = InferenceRequest {
            inputs: text,
            parameters: None::<()>,
            options: Options::default(),
        };
        let path = Self::model_path(self.models.summarization.model_id());
        let response: Vec<SummaryOutput> = self.post(&path, &request).await?;

        Ok(response
            .into_iter()
            .next()
            .map(|s| s.summary_text)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| EMPTY_SUMMARY.to_string()))
    }
}

#[async_trait]
impl TranslationProvider for HuggingFaceClient {
    async fn translate(&self, text: &str, source: Language, target: Language) -> Result<String> {
        let request = InferenceRequest {
            inputs: text,
            parameters: Some(TranslationParameters {
                src_lang: source.nllb_code(),
                tgt_lang: target.nllb_code(),
                max_length: 512,
                num_beams: 4,
                early_stopping: true,
            }),
            options: Options::default(),
        };
        let path = Self::model_path(self.models.translation.model_id());
        let response: Vec<TranslationOutput> = self.post(&path, &request).await?;

        response
            .into_iter()
            .next()
            .map(|t| t.translation_text)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| anyhow::anyhow!("No translation received from the model"))
    }
}

#[async_trait]
impl SentimentProvider for HuggingFaceClient {
    async fn sentiment(&self, text: &str) -> Result<Vec<Sentiment>> {
        let request = InferenceRequest {
            inputs: text,
            parameters: None::<()>,
            options: Options::default(),
        };
        let path = Self::model_path(self.models.sentiment.model_id());
        let response: ClassificationOutput = self.post(&path, &request).await?;
        Ok(response.into_labels())
    }
}

#[async_trait]
impl EntityProvider for HuggingFaceClient {
    async fn entities(&self, text: &str) -> Result<Vec<Entity>> {
        let request = InferenceRequest {
            inputs: text,
            parameters: Some(EntityParameters {
                aggregation_strategy: "simple",
            }),
            options: Options::default(),
        };
        let path = Self::model_path(self.models.entities.model_id());
        self.post(&path, &request).await
    }
}

// --- Inference API request/response types ---

#[derive(Serialize)]
struct InferenceRequest<I: Serialize, P: Serialize> {
    inputs: I,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<P>,
    options: Options,
}

#[derive(Serialize)]
struct Options {
    wait_for_model: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            wait_for_model: true,
        }
    }
}

#[derive(Serialize)]
struct TranslationParameters {
    src_lang: &'static str,
    tgt_lang: &'static str,
    max_length: u32,
    num_beams: u32,
    early_stopping: bool,
}

#[derive(Serialize)]
struct EntityParameters {
    aggregation_strategy: &'static str,
}

#[derive(Deserialize)]
struct SummaryOutput {
    summary_text: String,
}

#[derive(Deserialize)]
struct TranslationOutput {
    translation_text: String,
}

/// Text classification comes back either flat or nested one level
/// (one inner list per input), depending on the model's pipeline.
#[derive(Deserialize)]
#[serde(untagged)]
enum ClassificationOutput {
    Nested(Vec<Vec<Sentiment>>),
    Flat(Vec<Sentiment>),
}

impl ClassificationOutput {
    fn into_labels(self) -> Vec<Sentiment> {
        let mut labels = match self {
            ClassificationOutput::Nested(outer) => outer.into_iter().flatten().collect(),
            ClassificationOutput::Flat(labels) => labels,
        };
        labels.sort_by(|a: &Sentiment, b: &Sentiment| b.score.total_cmp(&a.score));
        labels
    }
}
