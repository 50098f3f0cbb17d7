// NewsAPI client for keyword article search.
//
// Queries the `/v2/everything` endpoint. NewsAPI reports failures in the JSON
// body (`status: "error"`) as well as through the HTTP status, so both are
// checked. NewsAPI rejects requests without a User-Agent header.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::traits::{ArticleSearchProvider, ArticleSummary};

pub const DEFAULT_NEWS_API_URL: &str = "https://newsapi.org";

pub struct NewsApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NewsApiClient {
    pub fn new(base_url: &str, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("newsprism/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl ArticleSearchProvider for NewsApiClient {
    async fn search(&self, query: &str) -> Result<Vec<ArticleSummary>> {
        let url = format!("{}/v2/everything", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("apiKey", self.api_key.as_str())])
            .send()
            .await
            .context("NewsAPI request failed")?;

        let status = response.status();
        let body: EverythingResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse NewsAPI response (HTTP {status})"))?;

        if !status.is_success() || body.status != "ok" {
            anyhow::bail!(
                "NewsAPI returned {}: {} {}",
                status,
                body.code.unwrap_or_default(),
                body.message.unwrap_or_default()
            );
        }

        debug!(
            query = query,
            total = body.total_results.unwrap_or(0),
            returned = body.articles.len(),
            "NewsAPI search complete"
        );

        Ok(body
            .articles
            .into_iter()
            .filter_map(NewsApiArticle::into_summary)
            .collect())
    }
}

// --- NewsAPI response types ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EverythingResponse {
    status: String,
    total_results: Option<u64>,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    source: Option<NewsApiSource>,
    author: Option<String>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSource {
    name: Option<String>,
}

impl NewsApiArticle {
    /// Articles without a URL can't be fetched or linked, so they're dropped.
    fn into_summary(self) -> Option<ArticleSummary> {
        Some(ArticleSummary {
            url: self.url?,
            title: self.title,
            description: self.description,
            source: self.source.and_then(|s| s.name),
            author: self.author,
            published_at: self.published_at,
            content: self.content,
        })
    }
}
