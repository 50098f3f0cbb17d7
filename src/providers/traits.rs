// Collaborator traits: one per external capability.
//
// Each trait is a seam: the pipeline composes them as `Arc<dyn Trait>` and
// never asks which concrete service sits behind one. Implementations are
// async because every real provider is an HTTP call. They report failures as
// `anyhow::Error`; the pipeline wraps those into its typed upstream error.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::language::Language;

/// Headline and body text of a fetched news article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub headline: String,
    #[serde(rename = "articleBody")]
    pub body: String,
}

impl Article {
    /// Text used for embedding and ranking: headline, blank line, body.
    pub fn full_text(&self) -> String {
        if self.headline.is_empty() {
            self.body.clone()
        } else {
            format!("{}\n\n{}", self.headline, self.body)
        }
    }
}

/// A search hit from the article search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: String,
    pub source: Option<String>,
    pub author: Option<String>,
    pub published_at: Option<String>,
    pub content: Option<String>,
}

/// One sentiment label with its confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: String,
    pub score: f64,
}

/// A named entity span found in a text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_group: String,
    pub word: String,
    pub score: f64,
    pub start: Option<usize>,
    pub end: Option<usize>,
}

#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    /// Download the page at `url` and pull out its structured article content.
    async fn fetch(&self, url: &str) -> Result<Article>;
}

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed each text, returning one vector per input in the same order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f64>>>;
}

#[async_trait]
pub trait SummarizationProvider: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String>;
}

#[async_trait]
pub trait TranslationProvider: Send + Sync {
    async fn translate(&self, text: &str, source: Language, target: Language) -> Result<String>;
}

#[async_trait]
pub trait SentimentProvider: Send + Sync {
    async fn sentiment(&self, text: &str) -> Result<Vec<Sentiment>>;
}

#[async_trait]
pub trait EntityProvider: Send + Sync {
    async fn entities(&self, text: &str) -> Result<Vec<Entity>>;
}

#[async_trait]
pub trait ArticleSearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<ArticleSummary>>;
}

/// Stand-in for a capability that isn't configured.
/// Every call fails, so nothing ever returns fabricated results.
pub struct Unconfigured(pub &'static str);

#[async_trait]
impl ArticleSearchProvider for Unconfigured {
    async fn search(&self, _query: &str) -> Result<Vec<ArticleSummary>> {
        anyhow::bail!("{} is not configured", self.0)
    }
}
