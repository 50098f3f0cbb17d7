// In-memory collaborators shared by the pipeline and HTTP tests.
//
// No network: every provider here answers from fixed data, fails on
// purpose, or sleeps past the pipeline timeout.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use newsprism::pipeline::{Pipeline, Providers};
use newsprism::providers::traits::{
    Article, ArticleFetcher, ArticleSearchProvider, ArticleSummary, EmbeddingProvider, Entity,
    EntityProvider, Sentiment, SentimentProvider, SummarizationProvider, TranslationProvider,
};
use newsprism::providers::Language;

pub const TEST_TIMEOUT: Duration = Duration::from_millis(200);

// ============================================================
// Article fetcher
// ============================================================

/// Serves articles from a fixed URL map. Unknown URLs fail; URLs starting
/// with "slow:" never answer in time.
#[derive(Default)]
pub struct MapFetcher {
    pub pages: HashMap<String, Article>,
    pub calls: AtomicUsize,
}

impl MapFetcher {
    pub fn with(pages: &[(&str, &str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, headline, body)| {
                    (
                        url.to_string(),
                        Article {
                            headline: headline.to_string(),
                            body: body.to_string(),
                        },
                    )
                })
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ArticleFetcher for MapFetcher {
    async fn fetch(&self, url: &str) -> Result<Article> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if url.starts_with("slow:") {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        match self.pages.get(url) {
            Some(article) => Ok(article.clone()),
            None => bail!("404 Not Found for {url}"),
        }
    }
}

// ============================================================
// Embeddings
// ============================================================

/// Two-dimensional embedding: sports texts point one way, everything
/// else the other.
pub struct TopicEmbedder;

#[async_trait]
impl EmbeddingProvider for TopicEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        Ok(texts
            .iter()
            .map(|t| {
                let t = t.to_lowercase();
                if t.contains("football") || t.contains("striker") {
                    vec![1.0, 0.0]
                } else {
                    vec![0.0, 1.0]
                }
            })
            .collect())
    }
}

/// Returns one vector fewer than asked for.
pub struct ShortEmbedder;

#[async_trait]
impl EmbeddingProvider for ShortEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        Ok(texts.iter().skip(1).map(|_| vec![1.0, 0.0]).collect())
    }
}

// ============================================================
// Hosted models
// ============================================================

/// Deterministic stand-in for every model-backed capability.
pub struct EchoModels;

#[async_trait]
impl SummarizationProvider for EchoModels {
    async fn summarize(&self, text: &str) -> Result<String> {
        Ok(text.split('.').next().unwrap_or_default().trim().to_string())
    }
}

#[async_trait]
impl TranslationProvider for EchoModels {
    async fn translate(&self, text: &str, source: Language, target: Language) -> Result<String> {
        Ok(format!("[{}->{}] {text}", source.code(), target.code()))
    }
}

#[async_trait]
impl SentimentProvider for EchoModels {
    async fn sentiment(&self, _text: &str) -> Result<Vec<Sentiment>> {
        Ok(vec![
            Sentiment {
                label: "POSITIVE".to_string(),
                score: 0.93,
            },
            Sentiment {
                label: "NEGATIVE".to_string(),
                score: 0.07,
            },
        ])
    }
}

#[async_trait]
impl EntityProvider for EchoModels {
    async fn entities(&self, text: &str) -> Result<Vec<Entity>> {
        Ok(text
            .split_whitespace()
            .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
            .map(|w| Entity {
                entity_group: "MISC".to_string(),
                word: w.to_string(),
                score: 0.9,
                start: None,
                end: None,
            })
            .collect())
    }
}

#[async_trait]
impl ArticleSearchProvider for EchoModels {
    async fn search(&self, query: &str) -> Result<Vec<ArticleSummary>> {
        Ok(vec![ArticleSummary {
            title: Some(format!("Latest on {query}")),
            description: None,
            url: format!("https://news.test/{query}"),
            source: Some("Test Wire".to_string()),
            author: None,
            published_at: None,
            content: None,
        }])
    }
}

// ============================================================
// Failure modes
// ============================================================

/// Every call fails immediately.
pub struct Broken;

/// Every call sleeps well past `TEST_TIMEOUT`.
pub struct Stalled;

macro_rules! impl_all {
    ($ty:ty, $body:expr) => {
        #[async_trait]
        impl ArticleFetcher for $ty {
            async fn fetch(&self, _url: &str) -> Result<Article> {
                $body
            }
        }
        #[async_trait]
        impl EmbeddingProvider for $ty {
            async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f64>>> {
                $body
            }
        }
        #[async_trait]
        impl SummarizationProvider for $ty {
            async fn summarize(&self, _text: &str) -> Result<String> {
                $body
            }
        }
        #[async_trait]
        impl TranslationProvider for $ty {
            async fn translate(&self, _t: &str, _s: Language, _g: Language) -> Result<String> {
                $body
            }
        }
        #[async_trait]
        impl SentimentProvider for $ty {
            async fn sentiment(&self, _text: &str) -> Result<Vec<Sentiment>> {
                $body
            }
        }
        #[async_trait]
        impl EntityProvider for $ty {
            async fn entities(&self, _text: &str) -> Result<Vec<Entity>> {
                $body
            }
        }
        #[async_trait]
        impl ArticleSearchProvider for $ty {
            async fn search(&self, _query: &str) -> Result<Vec<ArticleSummary>> {
                $body
            }
        }
    };
}

impl_all!(Broken, { bail!("connection refused") });
impl_all!(Stalled, {
    tokio::time::sleep(Duration::from_secs(30)).await;
    bail!("unreachable")
});

// ============================================================
// Assembly
// ============================================================

pub fn sports_pages() -> MapFetcher {
    MapFetcher::with(&[
        (
            "https://news.test/derby",
            "Derby ends level",
            "The striker hit the post as football fans watched the derby.",
        ),
        (
            "https://news.test/pasta",
            "Weeknight pasta",
            "A quick recipe with garlic sauce and fresh pasta.",
        ),
        (
            "https://news.test/transfer",
            "Striker transfer",
            "The football club signed a striker before the deadline.",
        ),
    ])
}

/// All collaborators healthy.
pub fn providers() -> Providers {
    let models = Arc::new(EchoModels);
    Providers {
        fetcher: Arc::new(sports_pages()),
        embedder: Arc::new(TopicEmbedder),
        summarizer: models.clone(),
        translator: models.clone(),
        sentiment: models.clone(),
        entities: models.clone(),
        search: models,
    }
}

/// Every collaborator replaced by `svc`.
pub fn providers_all<T>(svc: T) -> Providers
where
    T: ArticleFetcher
        + EmbeddingProvider
        + SummarizationProvider
        + TranslationProvider
        + SentimentProvider
        + EntityProvider
        + ArticleSearchProvider
        + 'static,
{
    let svc = Arc::new(svc);
    Providers {
        fetcher: svc.clone(),
        embedder: svc.clone(),
        summarizer: svc.clone(),
        translator: svc.clone(),
        sentiment: svc.clone(),
        entities: svc.clone(),
        search: svc,
    }
}

pub fn pipeline(providers: Providers) -> Pipeline {
    Pipeline::new(providers, TEST_TIMEOUT, 4)
}
