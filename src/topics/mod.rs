// Topic modeling: term ranking, k-means clustering and topic aggregation.

pub mod aggregate;
pub mod kmeans;
pub mod ranking;
pub mod traits;

pub use aggregate::{build_topics, Document, TopicRecord, MAX_TOPIC_KEYWORDS};
pub use kmeans::{cluster, ClusterAssignment, KMeans};
pub use ranking::{rank_corpus, rank_document, rank_document_against, TermScore};
