//! Integration tests for the HTTP-backed providers.
//!
//! Each test stands up a local `wiremock` server, so no real network traffic
//! is made. Covers request shape (paths, auth, parameters), response parsing,
//! the empty-summary fallback, transient-status retries, NewsAPI's in-body
//! error reporting and JSON-LD article extraction.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use newsprism::providers::article::JsonLdArticleFetcher;
use newsprism::providers::huggingface::{HuggingFaceClient, EMPTY_SUMMARY};
use newsprism::providers::models::ModelSet;
use newsprism::providers::newsapi::NewsApiClient;
use newsprism::providers::rate_limiter::{HttpStatusError, RetryPolicy};
use newsprism::providers::traits::{
    ArticleFetcher, ArticleSearchProvider, EmbeddingProvider, EntityProvider, SentimentProvider,
    SummarizationProvider, TranslationProvider,
};
use newsprism::providers::Language;

const EMBED_PATH: &str = "/pipeline/feature-extraction/sentence-transformers/all-MiniLM-L6-v2";
const SUMMARY_PATH: &str = "/models/facebook/bart-large-cnn";
const TRANSLATE_PATH: &str = "/models/facebook/nllb-200-distilled-600M";
const SENTIMENT_PATH: &str =
    "/models/distilbert/distilbert-base-uncased-finetuned-sst-2-english";
const NER_PATH: &str = "/models/dslim/distilbert-NER";

/// Client with no rate limit and millisecond backoff.
fn hf_client(server: &MockServer) -> HuggingFaceClient {
    HuggingFaceClient::new(&server.uri(), "hf_test".to_string(), ModelSet::default(), 0.0)
        .expect("failed to build test HuggingFaceClient")
        .with_retry_policy(RetryPolicy {
            max_retries: 2,
            base_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(5),
        })
}

// ---------------------------------------------------------------------------
// Embeddings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn embed_posts_inputs_with_bearer_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(EMBED_PATH))
        .and(header("authorization", "Bearer hf_test"))
        .and(body_partial_json(json!({
            "inputs": ["first", "second"],
            "options": { "wait_for_model": true }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[0.1, 0.2], [0.3, 0.4]])))
        .expect(1)
        .mount(&server)
        .await;

    let texts = vec!["first".to_string(), "second".to_string()];
    let vectors = hf_client(&server).embed(&texts).await.unwrap();
    assert_eq!(vectors, vec![vec![0.1, 0.2], vec![0.3, 0.4]]);
}

#[tokio::test]
async fn embed_rejects_short_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(EMBED_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[0.1, 0.2]])))
        .mount(&server)
        .await;

    let texts = vec!["a".to_string(), "b".to_string()];
    let err = hf_client(&server).embed(&texts).await.unwrap_err();
    assert!(err.to_string().contains("1 vectors for 2 inputs"), "{err:#}");
}

// ---------------------------------------------------------------------------
// Retries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn model_loading_503_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SUMMARY_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("model is loading"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(SUMMARY_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "summary_text": "Rates held." }])),
        )
        .mount(&server)
        .await;

    let summary = hf_client(&server).summarize("long text").await.unwrap();
    assert_eq!(summary, "Rates held.");
}

#[tokio::test]
async fn retries_stop_after_policy_limit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SUMMARY_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .expect(3)
        .mount(&server)
        .await;

    let err = hf_client(&server).summarize("text").await.unwrap_err();
    let status = err
        .downcast_ref::<HttpStatusError>()
        .map(|e| e.status);
    assert_eq!(status, Some(429));
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SUMMARY_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
        .expect(1)
        .mount(&server)
        .await;

    let err = hf_client(&server).summarize("text").await.unwrap_err();
    assert!(format!("{err:#}").contains("bad token"));
}

// ---------------------------------------------------------------------------
// Summarization / translation / sentiment / entities
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_summary_falls_back_to_placeholder() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SUMMARY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let summary = hf_client(&server).summarize("text").await.unwrap();
    assert_eq!(summary, EMPTY_SUMMARY);
}

#[tokio::test]
async fn translation_sends_nllb_codes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TRANSLATE_PATH))
        .and(body_partial_json(json!({
            "inputs": "good morning",
            "parameters": { "src_lang": "eng_Latn", "tgt_lang": "deu_Latn" }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "translation_text": "guten Morgen" }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let out = hf_client(&server)
        .translate("good morning", Language::En, Language::De)
        .await
        .unwrap();
    assert_eq!(out, "guten Morgen");
}

#[tokio::test]
async fn empty_translation_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TRANSLATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = hf_client(&server)
        .translate("hello", Language::En, Language::Fr)
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn sentiment_labels_sorted_by_score() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SENTIMENT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[
            { "label": "NEGATIVE", "score": 0.02 },
            { "label": "POSITIVE", "score": 0.98 }
        ]])))
        .mount(&server)
        .await;

    let labels = hf_client(&server).sentiment("great news").await.unwrap();
    assert_eq!(labels.len(), 2);
    assert_eq!(labels[0].label, "POSITIVE");
    assert!(labels[0].score > labels[1].score);
}

#[tokio::test]
async fn entities_request_simple_aggregation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(NER_PATH))
        .and(body_partial_json(json!({
            "parameters": { "aggregation_strategy": "simple" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "entity_group": "LOC", "word": "Paris", "score": 0.99, "start": 0, "end": 5 },
            { "entity_group": "ORG", "word": "UNESCO", "score": 0.95, "start": 12, "end": 18 }
        ])))
        .mount(&server)
        .await;

    let entities = hf_client(&server)
        .entities("Paris hosts UNESCO")
        .await
        .unwrap();
    assert_eq!(entities.len(), 2);
    assert_eq!(entities[0].entity_group, "LOC");
    assert_eq!(entities[1].word, "UNESCO");
    assert_eq!(entities[1].start, Some(12));
}

// ---------------------------------------------------------------------------
// NewsAPI
// ---------------------------------------------------------------------------

#[tokio::test]
async fn newsapi_search_maps_articles() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("q", "wildfire"))
        .and(query_param("apiKey", "news_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {
                    "source": { "id": null, "name": "Wire" },
                    "author": "Reporter",
                    "title": "Wildfire spreads",
                    "description": "Evacuations ordered",
                    "url": "https://news.test/wildfire",
                    "publishedAt": "2024-07-01T08:00:00Z",
                    "content": "Crews are..."
                },
                { "source": { "id": null, "name": "Removed" }, "title": "[Removed]", "url": null }
            ]
        })))
        .mount(&server)
        .await;

    let client = NewsApiClient::new(&server.uri(), "news_test".to_string()).unwrap();
    let articles = client.search("wildfire").await.unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].title.as_deref(), Some("Wildfire spreads"));
    assert_eq!(articles[0].source.as_deref(), Some("Wire"));
    assert_eq!(articles[0].url, "https://news.test/wildfire");
}

#[tokio::test]
async fn newsapi_error_body_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "error",
            "code": "apiKeyInvalid",
            "message": "Your API key is invalid."
        })))
        .mount(&server)
        .await;

    let client = NewsApiClient::new(&server.uri(), "bad".to_string()).unwrap();
    let err = client.search("anything").await.unwrap_err();
    assert!(err.to_string().contains("apiKeyInvalid"), "{err:#}");
}

// ---------------------------------------------------------------------------
// Article fetcher
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetcher_reads_json_ld_from_page() {
    let server = MockServer::start().await;

    let html = r#"<html><head>
        <script type="application/ld+json" id="articleschemascript">
        {"@type":"NewsArticle","headline":"Bridge reopens","articleBody":"Traffic resumed on Monday."}
        </script></head><body></body></html>"#;

    Mock::given(method("GET"))
        .and(path("/story"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&server)
        .await;

    let fetcher = JsonLdArticleFetcher::new().unwrap();
    let article = fetcher
        .fetch(&format!("{}/story", server.uri()))
        .await
        .unwrap();
    assert_eq!(article.headline, "Bridge reopens");
    assert_eq!(article.body, "Traffic resumed on Monday.");
}

#[tokio::test]
async fn fetcher_fails_on_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = JsonLdArticleFetcher::new().unwrap();
    let err = fetcher
        .fetch(&format!("{}/gone", server.uri()))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("404"), "{err:#}");
}

#[tokio::test]
async fn fetcher_fails_on_page_without_article() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><p>hi</p></html>"))
        .mount(&server)
        .await;

    let fetcher = JsonLdArticleFetcher::new().unwrap();
    assert!(fetcher
        .fetch(&format!("{}/plain", server.uri()))
        .await
        .is_err());
}
