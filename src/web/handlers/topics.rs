// Topic modeling routes.
//
// POST /api/topics       { articles: [{ text }], num_topics? } or { texts: [...] }
// POST /api/topics/urls  { urls: [...], num_topics? }
//
// Both return { topics: [{ topic, keywords }] } with exactly num_topics
// entries (default 2).

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::pipeline::DEFAULT_NUM_TOPICS;
use crate::topics::ranking::texts_from_json;
use crate::web::{topic_error, AppState};

#[derive(Deserialize)]
pub struct ArticleText {
    pub text: serde_json::Value,
}

#[derive(Deserialize)]
pub struct TopicsRequest {
    #[serde(default)]
    pub articles: Vec<ArticleText>,
    /// Bare texts, used when `articles` is empty.
    #[serde(default)]
    pub texts: Vec<serde_json::Value>,
    pub num_topics: Option<usize>,
}

#[derive(Deserialize)]
pub struct UrlTopicsRequest {
    pub urls: Vec<String>,
    pub num_topics: Option<usize>,
}

pub async fn analyze_topics(
    State(state): State<AppState>,
    Json(req): Json<TopicsRequest>,
) -> Response {
    let values: Vec<serde_json::Value> = if req.articles.is_empty() {
        req.texts
    } else {
        req.articles.into_iter().map(|a| a.text).collect()
    };
    let texts = match texts_from_json(&values) {
        Ok(texts) => texts,
        Err(e) => return topic_error(&e),
    };

    let num_topics = req.num_topics.unwrap_or(DEFAULT_NUM_TOPICS);
    match state.pipeline.analyze_topics(&texts, num_topics).await {
        Ok(topics) => Json(serde_json::json!({ "topics": topics })).into_response(),
        Err(e) => topic_error(&e),
    }
}

pub async fn analyze_urls(
    State(state): State<AppState>,
    Json(req): Json<UrlTopicsRequest>,
) -> Response {
    let num_topics = req.num_topics.unwrap_or(DEFAULT_NUM_TOPICS);
    match state.pipeline.analyze_articles(&req.urls, num_topics).await {
        Ok(topics) => Json(serde_json::json!({ "topics": topics })).into_response(),
        Err(e) => topic_error(&e),
    }
}
