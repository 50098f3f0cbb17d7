// Article fetcher that reads schema.org JSON-LD from a news page.
//
// Publishers embed the article as a `<script type="application/ld+json">`
// block. The preferred block carries the id `articleschemascript`; otherwise
// the first JSON-LD block with an `articleBody` wins. Pages without one are a
// fetch error. No other markup is interpreted.

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use super::traits::{Article, ArticleFetcher};

/// Element id of the preferred JSON-LD block.
pub const ARTICLE_SCRIPT_ID: &str = "articleschemascript";

pub struct JsonLdArticleFetcher {
    client: reqwest::Client,
}

impl JsonLdArticleFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("newsprism/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ArticleFetcher for JsonLdArticleFetcher {
    async fn fetch(&self, url: &str) -> Result<Article> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!("{url} returned {}", response.status());
        }

        let html = response
            .text()
            .await
            .with_context(|| format!("Failed to read body of {url}"))?;

        let article =
            extract_article(&html).with_context(|| format!("No article content found at {url}"))?;

        debug!(url = url, headline = %article.headline, "Fetched article");
        Ok(article)
    }
}

/// Pull the headline and body out of a page's JSON-LD.
pub fn extract_article(html: &str) -> Result<Article> {
    let script_re = Regex::new(r"(?is)<script([^>]*)>(.*?)</script>")
        .context("Invalid script pattern")?;

    let blocks: Vec<(bool, &str)> = script_re
        .captures_iter(html)
        .filter_map(|caps| {
            let attrs = caps.get(1)?.as_str();
            let body = caps.get(2)?.as_str();
            if !attrs.to_ascii_lowercase().contains("application/ld+json") {
                return None;
            }
            let preferred = attrs.contains(ARTICLE_SCRIPT_ID);
            Some((preferred, body))
        })
        .collect();

    if blocks.is_empty() {
        anyhow::bail!("Page has no JSON-LD blocks");
    }

    // Preferred block first, then document order.
    let ordered = blocks
        .iter()
        .filter(|(preferred, _)| *preferred)
        .chain(blocks.iter().filter(|(preferred, _)| !*preferred));

    for (preferred, body) in ordered {
        match serde_json::from_str::<serde_json::Value>(body.trim()) {
            Ok(value) => {
                if let Some(article) = find_article(&value) {
                    return Ok(article);
                }
            }
            Err(e) if *preferred => {
                return Err(e).context("Article JSON-LD block is malformed");
            }
            Err(_) => continue,
        }
    }

    anyhow::bail!("No JSON-LD block contains an articleBody")
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticleSchema {
    headline: Option<String>,
    article_body: Option<String>,
}

/// Search a JSON-LD value (object, array, or `@graph`) for an article.
fn find_article(value: &serde_json::Value) -> Option<Article> {
    match value {
        serde_json::Value::Array(items) => items.iter().find_map(find_article),
        serde_json::Value::Object(map) => {
            if let Some(graph) = map.get("@graph") {
                if let Some(article) = find_article(graph) {
                    return Some(article);
                }
            }
            let schema: ArticleSchema = serde_json::from_value(value.clone()).ok()?;
            let body = schema.article_body?;
            Some(Article {
                headline: schema.headline.unwrap_or_default(),
                body,
            })
        }
        _ => None,
    }
}
