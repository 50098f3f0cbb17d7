// Error types for the topic-modeling core and the pipeline facade.
//
// Core errors (ranking, clustering, dimension checks, missing embeddings)
// are caller mistakes and surface unchanged. Anything that goes wrong inside
// an external collaborator is wrapped as `Upstream` at the facade so callers
// can tell "our computation failed" apart from "a dependency failed".

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// The external collaborator a failed call was routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    ArticleFetch,
    Embedding,
    Summarization,
    Translation,
    Sentiment,
    Entities,
    Search,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::ArticleFetch => "article_fetch",
            Service::Embedding => "embedding",
            Service::Summarization => "summarization",
            Service::Translation => "translation",
            Service::Sentiment => "sentiment",
            Service::Entities => "entities",
            Service::Search => "search",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marker cause attached to `Upstream` errors produced by a timed-out call.
#[derive(Debug, Error)]
#[error("no response within {0:?}")]
pub struct TimedOut(pub Duration);

#[derive(Debug, Error)]
pub enum TopicError {
    /// An input entry could not be treated as text.
    #[error("entry {index} is not a string")]
    Ranking { index: usize },

    /// Invalid cluster count for the given batch.
    #[error("invalid clustering configuration: {0}")]
    ClusteringConfig(String),

    #[error("embedding {index} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("document {index} has no embedding vector")]
    MissingEmbedding { index: usize },

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// An external collaborator failed; the original cause is chained.
    #[error("{service} service failed: {source:#}")]
    Upstream {
        service: Service,
        #[source]
        source: anyhow::Error,
    },
}

impl TopicError {
    /// Wrap a collaborator failure.
    pub fn upstream(service: Service, source: anyhow::Error) -> Self {
        TopicError::Upstream { service, source }
    }

    /// Stable snake_case name for the error category, used in API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            TopicError::Ranking { .. } => "ranking_error",
            TopicError::ClusteringConfig(_) => "clustering_config_error",
            TopicError::DimensionMismatch { .. } => "dimension_mismatch_error",
            TopicError::MissingEmbedding { .. } => "missing_embedding_error",
            TopicError::UnsupportedLanguage(_) => "unsupported_language",
            TopicError::Upstream { .. } => "upstream_service_error",
        }
    }

    /// True for errors raised by the core's own input checks.
    pub fn is_core(&self) -> bool {
        !matches!(self, TopicError::Upstream { .. })
    }

    /// True when an upstream call was abandoned because it ran too long.
    pub fn is_timeout(&self) -> bool {
        match self {
            TopicError::Upstream { source, .. } => source.downcast_ref::<TimedOut>().is_some(),
            _ => false,
        }
    }
}
