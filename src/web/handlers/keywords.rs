// POST /api/keywords: TF-IDF keywords for a single text, optionally ranked
// against a background of other articles.
//
// Pure computation; never touches a collaborator.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::pipeline::DEFAULT_TOP_N;
use crate::topics::ranking::texts_from_json;
use crate::web::{topic_error, AppState};

#[derive(Deserialize)]
pub struct KeywordsRequest {
    /// Kept untyped so a non-string value is reported as a ranking error.
    pub text: serde_json::Value,
    pub top_n: Option<usize>,
    /// Other articles to rank against; terms they share with `text` score lower.
    #[serde(default)]
    pub background: Vec<serde_json::Value>,
}

pub async fn extract_keywords(
    State(state): State<AppState>,
    Json(req): Json<KeywordsRequest>,
) -> Response {
    let text = match texts_from_json(std::slice::from_ref(&req.text)) {
        Ok(mut texts) => texts.remove(0),
        Err(e) => return topic_error(&e),
    };

    let background = match texts_from_json(&req.background) {
        Ok(texts) => texts,
        Err(e) => return topic_error(&e),
    };

    let keywords = state.pipeline.extract_keywords_against(
        &text,
        &background,
        req.top_n.unwrap_or(DEFAULT_TOP_N),
    );

    Json(serde_json::json!({ "keywords": keywords })).into_response()
}
