// Concurrent article fetch for a topic batch.
//
// Fetches run side by side, each under its own timeout; one slow or broken
// page never cancels its siblings. Failed URLs are logged and dropped. The
// surviving articles keep the order of the input URLs.

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use super::{bounded, Pipeline};
use crate::error::{Service, TopicError};
use crate::providers::traits::Article;

impl Pipeline {
    /// Fetch every URL, dropping the ones that fail.
    ///
    /// Errors only if `urls` is empty or every fetch failed.
    pub async fn fetch_batch(&self, urls: &[String]) -> Result<Vec<Article>, TopicError> {
        if urls.is_empty() {
            return Err(TopicError::ClusteringConfig(
                "no articles provided for topic modeling".to_string(),
            ));
        }

        let fetcher = &self.providers.fetcher;
        let timeout = self.timeout;

        let mut results: Vec<(usize, Result<Article, TopicError>)> =
            stream::iter(urls.iter().cloned().enumerate().map(|(i, url)| async move {
                let result = bounded(Service::ArticleFetch, timeout, fetcher.fetch(&url)).await;
                (i, result)
            }))
            .buffer_unordered(self.fetch_concurrency)
            .collect()
            .await;

        results.sort_by_key(|(i, _)| *i);

        let mut articles = Vec::with_capacity(urls.len());
        let mut last_error = None;
        for (i, result) in results {
            match result {
                Ok(article) => articles.push(article),
                Err(e) => {
                    warn!(url = %urls[i], error = %e, "Failed to fetch article, skipping");
                    last_error = Some(e);
                }
            }
        }

        if articles.is_empty() {
            return Err(last_error.unwrap_or_else(|| {
                TopicError::upstream(
                    Service::ArticleFetch,
                    anyhow::anyhow!("no articles could be fetched"),
                )
            }));
        }

        info!(
            requested = urls.len(),
            fetched = articles.len(),
            "Article batch fetched"
        );

        Ok(articles)
    }
}
