//! In-process fake of the News Pulse backend, bound to an ephemeral port.
//!
//! Queries with special meaning:
//!
//! | `q` | Behavior |
//! |-----|----------|
//! | `technology` | 237 results |
//! | `broken` | 500 with `{"detail": "Upstream quota exceeded"}` |
//! | `plain` | 500 with a non-JSON body |
//! | `garbled` | 200 with a non-JSON body |
//! | anything else | zero results |
//!
//! Summaries are made from the title, or from `content` when there is no
//! title. They fail with `detail.message` when that text contains `fail`, and
//! with a plain `detail` when it is blank.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

pub const TECHNOLOGY_TOTAL: u64 = 237;

type Params = Query<HashMap<String, String>>;

#[derive(Clone, Default)]
struct Hits(Arc<Mutex<Vec<String>>>);

impl Hits {
    fn record(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }
}

pub struct FakeBackend {
    pub base_url: String,
    hits: Hits,
    handle: tokio::task::JoinHandle<()>,
}

impl FakeBackend {
    /// Requests received so far, as `"<path> <sorted query>"`.
    pub fn hits(&self) -> Vec<String> {
        self.hits.0.lock().unwrap().clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.hits()
            .iter()
            .filter(|h| h.split(' ').next() == Some(path))
            .count()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn() -> FakeBackend {
    let hits = Hits::default();
    let app = Router::new()
        .route("/search", get(search))
        .route("/summarize", post(summarize))
        .route("/related-by-url", get(related_by_url))
        .route("/related/{index}", get(related_by_index))
        .route("/breaking", get(breaking))
        .route("/trends", get(trends))
        .route("/entities", get(entities))
        .route("/topics", get(topics))
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeBackend {
        base_url: format!("http://{}", addr),
        hits,
        handle,
    }
}

fn describe(path: &str, params: &HashMap<String, String>) -> String {
    let mut pairs: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    pairs.sort();
    format!("{} {}", path, pairs.join("&"))
}

pub fn article(query: &str, page: u32, i: u64) -> Value {
    let source_name = if i % 3 == 0 { Value::Null } else { json!("Wire") };
    json!({
        "source": {"id": null, "name": source_name},
        "author": null,
        "title": format!("{} story {}-{}", query, page, i),
        "description": format!("About {}", query),
        "url": format!("https://news.example/{}/{}/{}", query, page, i),
        "urlToImage": null,
        "publishedAt": "2025-01-02T03:04:05Z",
        "content": null,
        "sentiment": {"label": "positive", "score": 0.91}
    })
}

async fn search(State(hits): State<Hits>, Query(params): Params) -> Response {
    hits.record(describe("/search", &params));
    let q = params.get("q").cloned().unwrap_or_default();
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let page_size: u64 = params.get("pageSize").and_then(|p| p.parse().ok()).unwrap_or(50);

    match q.as_str() {
        "broken" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "Upstream quota exceeded"})),
        )
            .into_response(),
        "plain" => (StatusCode::INTERNAL_SERVER_ERROR, "oops").into_response(),
        "garbled" => (StatusCode::OK, "<html>not json</html>").into_response(),
        "technology" => {
            let start = u64::from(page.saturating_sub(1)) * page_size;
            let count = TECHNOLOGY_TOTAL.saturating_sub(start).min(page_size);
            let articles: Vec<Value> = (0..count).map(|i| article(&q, page, i)).collect();
            Json(json!({
                "articles": articles,
                "meta": {"totalResults": TECHNOLOGY_TOTAL, "q": q}
            }))
            .into_response()
        }
        _ => Json(json!({"articles": [], "meta": {"totalResults": 0, "q": q}})).into_response(),
    }
}

async fn summarize(State(hits): State<Hits>, Json(body): Json<Value>) -> Response {
    let fields: HashMap<String, String> = body
        .as_object()
        .into_iter()
        .flatten()
        .map(|(k, v)| (k.clone(), v.as_str().map_or_else(|| v.to_string(), str::to_string)))
        .collect();
    hits.record(describe("/summarize", &fields));
    let subject = body["title"]
        .as_str()
        .or_else(|| body["content"].as_str())
        .unwrap_or_default();
    if subject.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Nothing to summarize"})),
        )
            .into_response();
    }
    if subject.contains("fail") {
        return (
            StatusCode::BAD_GATEWAY,
            Json(json!({"detail": {"message": "Gemini unavailable"}})),
        )
            .into_response();
    }
    Json(json!({"summary": format!("Summary of {}", subject)})).into_response()
}

fn related_items(seed: &str, top_k: usize) -> Vec<Value> {
    (0..top_k)
        .map(|i| {
            json!({
                "title": format!("Related {} to {}", i, seed),
                "url": format!("https://related.example/{}", i),
                "source": "Daily",
                "similarity": 0.9 - (i as f64) * 0.1
            })
        })
        .collect()
}

async fn related_by_url(State(hits): State<Hits>, Query(params): Params) -> Json<Value> {
    hits.record(describe("/related-by-url", &params));
    let top_k = params.get("top_k").and_then(|k| k.parse().ok()).unwrap_or(5);
    let title = params.get("title").cloned().unwrap_or_default();
    Json(json!({"related": related_items(&title, top_k)}))
}

async fn related_by_index(
    State(hits): State<Hits>,
    Path(index): Path<usize>,
    Query(params): Params,
) -> Response {
    hits.record(describe(&format!("/related/{}", index), &params));
    if index >= 100 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Article index out of range"})),
        )
            .into_response();
    }
    let top_k = params.get("top_k").and_then(|k| k.parse().ok()).unwrap_or(5);
    Json(json!({"related": related_items(&format!("#{}", index), top_k)})).into_response()
}

async fn breaking(State(hits): State<Hits>, Query(params): Params) -> Json<Value> {
    hits.record(describe("/breaking", &params));
    let threshold: f64 = params
        .get("threshold")
        .and_then(|t| t.parse().ok())
        .unwrap_or(60.0);
    let stories = vec![
        json!({
            "url": "https://wire.example/quake",
            "title": "Earthquake hits coast",
            "source": "Wire",
            "score": 85.0,
            "article_count": 7,
            "detected_at": "2025-01-02T11:50:00",
            "novel_entities": ["Chile", "Valparaiso"]
        }),
        json!({
            "url": "https://wire.example/vote",
            "title": "Parliament vote delayed",
            "source": "Daily",
            "score": 65.0,
            "article_count": 3,
            "detected_at": null,
            "novel_entities": []
        }),
        json!({
            "url": "https://wire.example/fair",
            "title": "County fair opens",
            "source": "Local",
            "score": 40.0,
            "article_count": 2,
            "novel_entities": []
        }),
    ];
    let breaking: Vec<Value> = stories
        .into_iter()
        .filter(|s| s["score"].as_f64().unwrap_or(0.0) >= threshold)
        .collect();
    Json(json!({"breaking": breaking}))
}

async fn trends(State(hits): State<Hits>) -> Json<Value> {
    hits.record("/trends ".to_string());
    Json(json!({
        "meta": {"windowHours": 24, "splitHours": 12},
        "trending": [
            {
                "keyword": "chips",
                "currentCount": 12,
                "previousCount": 4,
                "growth": 2.0,
                "isNew": false
            },
            {
                "keyword": "quake",
                "currentCount": 9,
                "previousCount": 0,
                "growth": null,
                "isNew": true
            }
        ]
    }))
}

async fn entities(State(hits): State<Hits>) -> Json<Value> {
    hits.record("/entities ".to_string());
    Json(json!({
        "PERSON": [["Ada Lovelace", 4]],
        "ORG": [["Acme", 7], ["Globex", 2]],
        "GPE": [],
        "EVENT": [],
        "PRODUCT": []
    }))
}

async fn topics(State(hits): State<Hits>, Query(params): Params) -> Json<Value> {
    hits.record(describe("/topics", &params));
    Json(json!({
        "topics": [{
            "topic_id": 0,
            "label": "Chips & AI",
            "keywords": ["chips", "ai", "nvidia"],
            "article_count": 20,
            "sample_articles": [
                {"title": "Chip race", "url": "https://news.example/c", "source": "Wire"}
            ]
        }],
        "uncategorized_count": 4,
        "total_articles": 24
    }))
}
