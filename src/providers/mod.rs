// External collaborators: trait-based abstraction for swappable providers.
//
// The traits in `traits` define each capability. `HuggingFaceClient` backs
// the model-serving ones, `NewsApiClient` backs search and
// `JsonLdArticleFetcher` backs article fetch. Swapping a provider means
// writing another impl, not touching the pipeline.

pub mod article;
pub mod huggingface;
pub mod language;
pub mod models;
pub mod newsapi;
pub mod rate_limiter;
pub mod traits;

pub use language::Language;
