// newsprism: topic modeling and keyword ranking for news articles.
//
// This is the library root. `topics` is the pure core (ranking, clustering,
// aggregation); `providers` holds the external collaborators; `pipeline`
// composes the two for the CLI and the HTTP API.

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod providers;
pub mod topics;

#[cfg(feature = "web")]
pub mod web;

pub use error::TopicError;
