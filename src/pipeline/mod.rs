// Pipeline facade: the one entry point the HTTP layer and CLI call.
//
// Sequences the external collaborators (article fetch, embeddings, hosted
// models, search) with the pure topic core. Every collaborator call is
// bounded by `timeout`, and any failure there is wrapped as
// `TopicError::Upstream`. Core errors pass through untouched.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Service, TimedOut, TopicError};
use crate::providers::article::JsonLdArticleFetcher;
use crate::providers::huggingface::HuggingFaceClient;
use crate::providers::models::ModelSet;
use crate::providers::newsapi::NewsApiClient;
use crate::providers::traits::{
    Article, ArticleFetcher, ArticleSearchProvider, ArticleSummary, EmbeddingProvider, Entity,
    EntityProvider, Sentiment, SentimentProvider, SummarizationProvider, TranslationProvider,
    Unconfigured,
};
use crate::providers::Language;
use crate::topics::ranking::{rank_document, rank_document_against};
use crate::topics::traits::{KMeansTopicExtractor, TopicExtractor};
use crate::topics::{Document, TopicRecord};

pub mod fetch;

/// Default number of topics when the caller doesn't ask for a count.
pub const DEFAULT_NUM_TOPICS: usize = 2;

/// Default keyword count for single-document extraction.
pub const DEFAULT_TOP_N: usize = 10;

/// The collaborators a pipeline is composed from.
#[derive(Clone)]
pub struct Providers {
    pub fetcher: Arc<dyn ArticleFetcher>,
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub summarizer: Arc<dyn SummarizationProvider>,
    pub translator: Arc<dyn TranslationProvider>,
    pub sentiment: Arc<dyn SentimentProvider>,
    pub entities: Arc<dyn EntityProvider>,
    pub search: Arc<dyn ArticleSearchProvider>,
}

impl Providers {
    /// Wire up the hosted providers described by `config`.
    ///
    /// Missing API keys don't fail here; the affected calls fail upstream
    /// instead, so one missing key doesn't take down unrelated routes.
    pub fn from_config(config: &Config) -> Result<Self> {
        let models = ModelSet {
            summarization: config.summarization_model,
            ..ModelSet::default()
        };
        let hf = Arc::new(HuggingFaceClient::new(
            &config.inference_url,
            config.hugging_face_api_key.clone(),
            models,
            config.inference_qps,
        )?);

        let search: Arc<dyn ArticleSearchProvider> = if config.news_api_key.is_empty() {
            warn!("NEWS_API_KEY not set; article search is disabled");
            Arc::new(Unconfigured("NEWS_API_KEY"))
        } else {
            Arc::new(NewsApiClient::new(
                &config.news_api_url,
                config.news_api_key.clone(),
            )?)
        };

        Ok(Self {
            fetcher: Arc::new(JsonLdArticleFetcher::new()?),
            embedder: hf.clone(),
            summarizer: hf.clone(),
            translator: hf.clone(),
            sentiment: hf.clone(),
            entities: hf,
            search,
        })
    }
}

pub struct Pipeline {
    providers: Providers,
    extractor: Box<dyn TopicExtractor>,
    timeout: Duration,
    fetch_concurrency: usize,
}

impl Pipeline {
    pub fn new(providers: Providers, timeout: Duration, fetch_concurrency: usize) -> Self {
        Self {
            providers,
            extractor: Box::new(KMeansTopicExtractor::default()),
            timeout,
            fetch_concurrency: fetch_concurrency.max(1),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            Providers::from_config(config)?,
            config.request_timeout,
            config.fetch_concurrency,
        ))
    }

    /// Replace the topic extraction strategy.
    pub fn with_extractor(mut self, extractor: Box<dyn TopicExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Top `top_n` TF-IDF keywords of one text. Pure; never calls out.
    ///
    /// The text is its own document set here; use
    /// `extract_keywords_against` to rank against other articles.
    pub fn extract_keywords(&self, text: &str, top_n: usize) -> Vec<String> {
        rank_document(text, top_n)
    }

    /// Like `extract_keywords`, with `background` texts supplying document
    /// frequencies.
    pub fn extract_keywords_against(
        &self,
        text: &str,
        background: &[String],
        top_n: usize,
    ) -> Vec<String> {
        rank_document_against(text, background, top_n)
    }

    /// Embed `texts` and group them into `num_topics` topics.
    pub async fn analyze_topics(
        &self,
        texts: &[String],
        num_topics: usize,
    ) -> Result<Vec<TopicRecord>, TopicError> {
        if texts.is_empty() {
            return Err(TopicError::ClusteringConfig(
                "no articles provided for topic modeling".to_string(),
            ));
        }
        if num_topics == 0 || num_topics > texts.len() {
            return Err(TopicError::ClusteringConfig(format!(
                "cannot form {num_topics} topics from {} articles",
                texts.len()
            )));
        }

        let embeddings = self
            .call(Service::Embedding, self.providers.embedder.embed(texts))
            .await?;

        if embeddings.len() != texts.len() {
            return Err(TopicError::upstream(
                Service::Embedding,
                anyhow::anyhow!(
                    "expected {} embeddings, received {}",
                    texts.len(),
                    embeddings.len()
                ),
            ));
        }

        let documents: Vec<Document> = texts
            .iter()
            .zip(embeddings)
            .map(|(text, embedding)| Document::with_embedding(text.clone(), embedding))
            .collect();

        let topics = self.extractor.extract(&documents, num_topics)?;

        info!(
            articles = texts.len(),
            topics = topics.len(),
            "Topic modeling complete"
        );

        Ok(topics)
    }

    /// Fetch `urls`, then model topics over the articles that came back.
    ///
    /// A URL that fails to fetch is dropped with a warning. If none of them
    /// succeed the whole call fails upstream.
    pub async fn analyze_articles(
        &self,
        urls: &[String],
        num_topics: usize,
    ) -> Result<Vec<TopicRecord>, TopicError> {
        let articles = self.fetch_batch(urls).await?;
        let texts: Vec<String> = articles.iter().map(Article::full_text).collect();
        self.analyze_topics(&texts, num_topics).await
    }

    pub async fn fetch_article(&self, url: &str) -> Result<Article, TopicError> {
        self.call(Service::ArticleFetch, self.providers.fetcher.fetch(url))
            .await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<ArticleSummary>, TopicError> {
        self.call(Service::Search, self.providers.search.search(query))
            .await
    }

    pub async fn summarize(&self, text: &str) -> Result<String, TopicError> {
        self.call(
            Service::Summarization,
            self.providers.summarizer.summarize(text),
        )
        .await
    }

    pub async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, TopicError> {
        self.call(
            Service::Translation,
            self.providers.translator.translate(text, source, target),
        )
        .await
    }

    pub async fn sentiment(&self, text: &str) -> Result<Vec<Sentiment>, TopicError> {
        self.call(Service::Sentiment, self.providers.sentiment.sentiment(text))
            .await
    }

    pub async fn entities(&self, text: &str) -> Result<Vec<Entity>, TopicError> {
        self.call(Service::Entities, self.providers.entities.entities(text))
            .await
    }

    /// Run one collaborator call under the timeout, wrapping any failure.
    async fn call<T, F>(&self, service: Service, fut: F) -> Result<T, TopicError>
    where
        F: Future<Output = Result<T>>,
    {
        bounded(service, self.timeout, fut).await
    }
}

/// Await `fut` for at most `timeout`, turning failure or expiry into an
/// upstream error for `service`.
pub(crate) async fn bounded<T, F>(
    service: Service,
    timeout: Duration,
    fut: F,
) -> Result<T, TopicError>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(TopicError::upstream(service, e)),
        Err(_) => Err(TopicError::upstream(
            service,
            anyhow::Error::new(TimedOut(timeout)),
        )),
    }
}
