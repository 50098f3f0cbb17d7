// Article fetch and search.
//
// POST /api/article  { url }   → { headline, articleBody }
// POST /api/search   { query } → { articles: [...] }

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::web::{api_error, topic_error, AppState, BAD_REQUEST_KIND};

#[derive(Deserialize)]
pub struct ArticleRequest {
    pub url: String,
}

#[derive(Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

pub async fn fetch_article(
    State(state): State<AppState>,
    Json(req): Json<ArticleRequest>,
) -> Response {
    match state.pipeline.fetch_article(&req.url).await {
        Ok(article) => Json(article).into_response(),
        Err(e) => topic_error(&e),
    }
}

pub async fn search(State(state): State<AppState>, Json(req): Json<SearchRequest>) -> Response {
    if req.query.trim().is_empty() {
        return api_error(
            StatusCode::BAD_REQUEST,
            BAD_REQUEST_KIND,
            "query must not be empty",
        );
    }
    match state.pipeline.search(&req.query).await {
        Ok(articles) => Json(serde_json::json!({ "articles": articles })).into_response(),
        Err(e) => topic_error(&e),
    }
}
