// Topic aggregation: cluster embeddings, then describe each cluster by the
// most frequent terms of its member texts.
//
// Pure computation over in-memory data. The embeddings must already be
// attached to each document; fetching them is the pipeline's job.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::kmeans::KMeans;
use super::ranking::rank_corpus;
use crate::error::TopicError;

/// Keywords kept per topic.
pub const MAX_TOPIC_KEYWORDS: usize = 5;

/// One article's text and, once embedded, its vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub text: String,
    pub embedding: Option<Vec<f64>>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            embedding: None,
        }
    }

    pub fn with_embedding(text: impl Into<String>, embedding: Vec<f64>) -> Self {
        Self {
            text: text.into(),
            embedding: Some(embedding),
        }
    }
}

/// A labelled topic and its representative keywords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicRecord {
    /// "Topic 1", "Topic 2", ... in cluster-id order.
    #[serde(rename = "topic")]
    pub label: String,
    /// Up to `MAX_TOPIC_KEYWORDS` terms, most frequent first. Empty when the
    /// cluster has no members.
    pub keywords: Vec<String>,
}

/// Group `documents` into `k` topics.
///
/// Always returns exactly `k` records on success. Any document without an
/// embedding is an error; nothing is skipped.
pub fn build_topics(documents: &[Document], k: usize) -> Result<Vec<TopicRecord>, TopicError> {
    build_topics_with(&KMeans::default(), documents, k)
}

pub(crate) fn build_topics_with(
    clusterer: &KMeans,
    documents: &[Document],
    k: usize,
) -> Result<Vec<TopicRecord>, TopicError> {
    let vectors: Vec<Vec<f64>> = documents
        .iter()
        .enumerate()
        .map(|(index, doc)| {
            doc.embedding
                .clone()
                .ok_or(TopicError::MissingEmbedding { index })
        })
        .collect::<Result<_, _>>()?;

    let assignment = clusterer.cluster(&vectors, k)?;

    let topics: Vec<TopicRecord> = assignment
        .members()
        .into_iter()
        .enumerate()
        .map(|(cluster_id, members)| {
            let texts: Vec<&str> = members
                .iter()
                .map(|&i| documents[i].text.as_str())
                .collect();
            let mut keywords = rank_corpus(&texts);
            keywords.truncate(MAX_TOPIC_KEYWORDS);
            TopicRecord {
                label: format!("Topic {}", cluster_id + 1),
                keywords,
            }
        })
        .collect();

    debug!(
        documents = documents.len(),
        topics = topics.len(),
        sizes = ?assignment.sizes(),
        "Built topics"
    );

    Ok(topics)
}
