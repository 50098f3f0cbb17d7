// Topic extractor trait: swap-ready abstraction.
//
// The pipeline only needs "documents with embeddings in, k topic records
// out". The default implementation is k-means plus frequency ranking; a
// different clustering strategy can slot in behind this trait without the
// facade or the HTTP layer changing.

use super::aggregate::{build_topics_with, Document, TopicRecord};
use super::kmeans::KMeans;
use crate::error::TopicError;

/// Trait for turning an embedded batch into exactly `k` topics.
pub trait TopicExtractor: Send + Sync {
    fn extract(&self, documents: &[Document], k: usize) -> Result<Vec<TopicRecord>, TopicError>;
}

/// K-means clustering followed by per-cluster term frequency ranking.
#[derive(Debug, Clone, Default)]
pub struct KMeansTopicExtractor {
    pub clusterer: KMeans,
}

impl TopicExtractor for KMeansTopicExtractor {
    fn extract(&self, documents: &[Document], k: usize) -> Result<Vec<TopicRecord>, TopicError> {
        build_topics_with(&self.clusterer, documents, k)
    }
}
