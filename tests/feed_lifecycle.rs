//! Core components driven against a mocked TMDB server

use std::sync::Arc;

use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use telaviva_feeds::{
    models::{CategoryId, MovieId, TrackedSet},
    services::{
        recommend, CatalogClient, CategorizedFeedLoader, FeedLoadState, InfiniteScrollPaginator,
        LoadOutcome, RecommendationAggregator, TmdbClient, RECOMMENDATION_LIMIT,
    },
};

fn page_body(ids: impl IntoIterator<Item = u64>) -> serde_json::Value {
    json!({
        "results": ids
            .into_iter()
            .map(|id| json!({ "id": id, "title": format!("Filme {}", id) }))
            .collect::<Vec<_>>()
    })
}

async fn mount_page(server: &MockServer, endpoint: &str, page: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .and(query_param("page", page))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn catalog(server: &MockServer) -> Arc<dyn CatalogClient> {
    Arc::new(TmdbClient::new(
        "test_key".to_string(),
        server.uri(),
        "pt-BR".to_string(),
    ))
}

#[tokio::test]
async fn test_home_fails_when_popular_fails() {
    let server = MockServer::start().await;
    mount_page(&server, "/movie/top_rated", "1", page_body(1..=5)).await;
    mount_page(&server, "/movie/now_playing", "1", page_body(6..=10)).await;
    mount_page(&server, "/movie/upcoming", "1", page_body(11..=15)).await;
    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let loader = CategorizedFeedLoader::home(catalog(&server));
    let state = loader.load().await.unwrap();

    assert!(matches!(state, FeedLoadState::Failed(_)));
    assert!(matches!(loader.state(), FeedLoadState::Failed(_)));
}

#[tokio::test]
async fn test_home_ready_when_all_succeed() {
    let server = MockServer::start().await;
    mount_page(&server, "/movie/popular", "1", page_body(1..=20)).await;
    mount_page(&server, "/movie/top_rated", "1", page_body(21..=40)).await;
    mount_page(&server, "/movie/now_playing", "1", page_body(41..=60)).await;
    mount_page(&server, "/movie/upcoming", "1", page_body(61..=80)).await;

    let loader = CategorizedFeedLoader::home(catalog(&server));
    let Some(FeedLoadState::Ready(feeds)) = loader.load().await else {
        panic!("expected ready state");
    };

    assert_eq!(feeds.len(), 4);
    assert!(feeds.iter().all(|(_, movies)| movies.len() == 20));
}

#[tokio::test]
async fn test_infinite_scroll_until_empty_page() {
    let server = MockServer::start().await;
    mount_page(&server, "/movie/now_playing", "1", page_body(1..=20)).await;
    mount_page(&server, "/movie/now_playing", "2", page_body(21..=35)).await;
    Mock::given(method("GET"))
        .and(path("/movie/now_playing"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(Vec::<u64>::new())))
        .expect(1)
        .mount(&server)
        .await;

    let paginator = InfiniteScrollPaginator::new(catalog(&server), CategoryId::NowPlaying);

    assert!(matches!(paginator.activate().await, LoadOutcome::Appended(20)));
    assert!(matches!(paginator.load_more().await, LoadOutcome::Appended(15)));
    assert!(matches!(paginator.load_more().await, LoadOutcome::Exhausted));
    assert!(matches!(paginator.load_more().await, LoadOutcome::Skipped));

    let snapshot = paginator.snapshot();
    assert_eq!(snapshot.items.len(), 35);
    assert_eq!(snapshot.items[20].id, MovieId(21));
    assert!(snapshot.exhausted);
}

#[tokio::test]
async fn test_single_tracked_movie_yields_first_twelve() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/101/similar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(500..515)))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = TrackedSet::new(vec![MovieId(101)], Vec::new());
    let movies = recommend(catalog(&server), &snapshot, 4).await.unwrap();

    assert_eq!(movies.len(), RECOMMENDATION_LIMIT);
    let ids: Vec<u64> = movies.iter().map(|m| m.id.0).collect();
    assert_eq!(ids, (500..512).collect::<Vec<u64>>());
}

#[tokio::test]
async fn test_aggregator_failure_surfaces_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/1/similar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body([10, 11])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/2/similar"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let aggregator = RecommendationAggregator::new(catalog(&server), 2);
    let snapshot = TrackedSet::new(vec![MovieId(1)], vec![MovieId(2)]);

    assert!(aggregator.refresh(&snapshot).await);
    assert!(aggregator.recommendations().is_empty());
    assert!(aggregator.error().is_some());
}
