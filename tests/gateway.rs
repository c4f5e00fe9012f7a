mod common;

use news_pulse::config::ApiConfig;
use news_pulse::gateway::HttpGateway;
use news_pulse_core::api::NewsApi;
use news_pulse_core::models::{SentimentLabel, SummaryInput};
use news_pulse_core::PulseError;

fn gateway(base_url: &str) -> HttpGateway {
    HttpGateway::new(&ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn search_sends_paging_parameters() {
    let backend = common::spawn().await;
    let api = gateway(&backend.base_url);

    let page = api.search("technology", 5, 50).await.unwrap();
    assert_eq!(page.meta.total_results, common::TECHNOLOGY_TOTAL);
    assert_eq!(page.meta.q, "technology");
    assert_eq!(page.articles.len(), 37);
    assert_eq!(page.articles[1].source_name(), Some("Wire"));
    assert_eq!(page.articles[0].source_name(), None);
    assert_eq!(
        page.articles[0].sentiment.as_ref().map(|s| s.label),
        Some(SentimentLabel::Positive)
    );

    assert_eq!(backend.hits(), vec!["/search page=5&pageSize=50&q=technology"]);
}

#[tokio::test]
async fn search_error_uses_server_detail() {
    let backend = common::spawn().await;
    let err = gateway(&backend.base_url)
        .search("broken", 1, 50)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        PulseError::Http {
            status: 500,
            message: "Upstream quota exceeded".to_string()
        }
    );
}

#[tokio::test]
async fn search_error_without_detail_uses_label() {
    let backend = common::spawn().await;
    let err = gateway(&backend.base_url)
        .search("plain", 1, 50)
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Search failed");
}

#[tokio::test]
async fn garbled_body_is_a_decode_error() {
    let backend = common::spawn().await;
    let err = gateway(&backend.base_url)
        .search("garbled", 1, 50)
        .await
        .unwrap_err();
    assert!(matches!(err, PulseError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = gateway(&format!("http://{}", addr))
        .search("technology", 1, 50)
        .await
        .unwrap_err();
    assert!(matches!(err, PulseError::Network(_)), "got {:?}", err);
    assert_eq!(err.user_message(), "Network error, try again");
}

#[tokio::test]
async fn summarize_posts_article_fields() {
    let backend = common::spawn().await;
    let api = gateway(&backend.base_url);
    let input = SummaryInput {
        title: "Chips".to_string(),
        description: Some("About chips".to_string()),
        content: None,
    };
    assert_eq!(api.summarize(&input).await.unwrap(), "Summary of Chips");
    assert_eq!(backend.hits(), vec!["/summarize description=About chips&title=Chips"]);
}

#[tokio::test]
async fn summarize_text_sends_content_only() {
    let backend = common::spawn().await;
    let api = gateway(&backend.base_url);
    let input = SummaryInput::from_text("  Markets rallied on chip news.\n").unwrap();
    assert_eq!(
        api.summarize(&input).await.unwrap(),
        "Summary of Markets rallied on chip news."
    );
    assert_eq!(backend.hits(), vec!["/summarize content=Markets rallied on chip news."]);
}

#[tokio::test]
async fn summarize_error_reads_plain_detail() {
    let backend = common::spawn().await;
    let input = SummaryInput {
        content: Some(" ".to_string()),
        ..Default::default()
    };
    let err = gateway(&backend.base_url).summarize(&input).await.unwrap_err();
    assert_eq!(err.user_message(), "Nothing to summarize");
    assert!(matches!(err, PulseError::Http { status: 400, .. }), "got {:?}", err);
}

#[tokio::test]
async fn summarize_error_reads_nested_detail() {
    let backend = common::spawn().await;
    let input = SummaryInput {
        title: "will fail".to_string(),
        ..Default::default()
    };
    let err = gateway(&backend.base_url).summarize(&input).await.unwrap_err();
    assert_eq!(
        err,
        PulseError::Http {
            status: 502,
            message: "Gemini unavailable".to_string()
        }
    );
}

#[tokio::test]
async fn related_by_url_passes_title_and_top_k() {
    let backend = common::spawn().await;
    let related = gateway(&backend.base_url)
        .related_by_url("https://news.example/a", "Chips", 3)
        .await
        .unwrap();
    assert_eq!(related.len(), 3);
    assert_eq!(related[0].title, "Related 0 to Chips");
    assert_eq!(
        backend.hits(),
        vec!["/related-by-url title=Chips&top_k=3&url=https://news.example/a"]
    );
}

#[tokio::test]
async fn related_by_index_maps_not_found() {
    let backend = common::spawn().await;
    let api = gateway(&backend.base_url);
    assert_eq!(api.related_by_index(4, 2).await.unwrap().len(), 2);
    let err = api.related_by_index(500, 2).await.unwrap_err();
    assert_eq!(err.user_message(), "Article index out of range");
}

#[tokio::test]
async fn breaking_sends_threshold() {
    let backend = common::spawn().await;
    let stories = gateway(&backend.base_url).breaking(60).await.unwrap();
    assert_eq!(stories.len(), 2);
    assert_eq!(stories[0].novel_entities, vec!["Chile", "Valparaiso"]);
    assert!(stories[1].detected_at.is_none());
    assert_eq!(backend.hits(), vec!["/breaking threshold=60"]);
}

#[tokio::test]
async fn read_only_feeds_decode() {
    let backend = common::spawn().await;
    let api = gateway(&backend.base_url);

    let trends = api.trends().await.unwrap();
    assert_eq!(trends.len(), 2);
    assert!(trends[1].is_new);
    assert_eq!(trends[0].growth, Some(2.0));

    let entities = api.entities().await.unwrap();
    assert_eq!(entities["ORG"][0], ("Acme".to_string(), 7));

    let topics = api.topics(24, 15).await.unwrap();
    assert_eq!(topics.topics[0].label, "Chips & AI");
    assert_eq!(topics.total_articles, 24);
    assert_eq!(backend.count("/topics"), 1);
    assert!(backend.hits().contains(&"/topics lookback_hours=24&min_articles=15".to_string()));
}
