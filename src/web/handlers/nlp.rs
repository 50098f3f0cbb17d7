// Pass-through routes to the hosted models.
//
// POST /api/summarize  { text }                             → { summary }
// POST /api/translate  { text, target_lang, source_lang? }  → { translation }
// POST /api/sentiment  { text }                             → { sentiment }
// POST /api/entities   { text }                             → { entities }

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::providers::Language;
use crate::web::{topic_error, AppState};

#[derive(Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub target_lang: String,
    /// Defaults to English.
    pub source_lang: Option<String>,
}

pub async fn summarize(State(state): State<AppState>, Json(req): Json<TextRequest>) -> Response {
    match state.pipeline.summarize(&req.text).await {
        Ok(summary) => Json(serde_json::json!({ "summary": summary })).into_response(),
        Err(e) => topic_error(&e),
    }
}

pub async fn translate(
    State(state): State<AppState>,
    Json(req): Json<TranslateRequest>,
) -> Response {
    let target = match req.target_lang.parse::<Language>() {
        Ok(lang) => lang,
        Err(e) => return topic_error(&e),
    };
    let source = match req.source_lang.as_deref().unwrap_or("en").parse::<Language>() {
        Ok(lang) => lang,
        Err(e) => return topic_error(&e),
    };

    match state.pipeline.translate(&req.text, source, target).await {
        Ok(translation) => Json(serde_json::json!({ "translation": translation })).into_response(),
        Err(e) => topic_error(&e),
    }
}

pub async fn sentiment(State(state): State<AppState>, Json(req): Json<TextRequest>) -> Response {
    match state.pipeline.sentiment(&req.text).await {
        Ok(sentiment) => Json(serde_json::json!({ "sentiment": sentiment })).into_response(),
        Err(e) => topic_error(&e),
    }
}

pub async fn entities(State(state): State<AppState>, Json(req): Json<TextRequest>) -> Response {
    match state.pipeline.entities(&req.text).await {
        Ok(entities) => Json(serde_json::json!({ "entities": entities })).into_response(),
        Err(e) => topic_error(&e),
    }
}
