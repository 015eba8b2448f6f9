//! Category shelf aggregation against a scripted upstream
//!
//! Run with: cargo test --test category_aggregator_test

mod utils;

use reelshelf::modules::browse::{AggregatorConfig, CategoryAggregator};
use reelshelf::modules::catalog::{
    CatalogClient, CategoryParams, CategoryRequest, MediaType, TimeWindow,
};
use reelshelf::shared::errors::{AppError, NetworkErrorKind};
use std::sync::Arc;
use std::time::Duration;
use utils::factories::{ids, movies, page, RecordFactory};
use utils::fake_client::{CallEvent, FakeCatalogClient};
use utils::helpers::fast_retry;

fn aggregator(client: Arc<dyn CatalogClient>) -> CategoryAggregator {
    CategoryAggregator::new(client, AggregatorConfig::default().with_retry(fast_retry())).unwrap()
}

/// `count` distinct discover shelves, each answered with two movies
fn shelves(fake: &FakeCatalogClient, count: usize) -> Vec<CategoryRequest> {
    (0..count)
        .map(|index| {
            let params = CategoryParams::discover(MediaType::Movie)
                .with_filter("with_keywords", index.to_string());
            fake.respond(
                &FakeCatalogClient::key(&params),
                page(movies(index as u64 * 10, 2)),
            );
            CategoryRequest::new(format!("Shelf {}", index), params)
        })
        .collect()
}

fn key(request: &CategoryRequest) -> String {
    FakeCatalogClient::key(&request.params)
}

#[tokio::test]
async fn test_failed_categories_become_empty_slots_in_order() {
    let fake = Arc::new(FakeCatalogClient::new());
    let requests = shelves(&fake, 10);
    fake.fail_always(&key(&requests[2]), AppError::status(404, "not found"));
    fake.fail_always(&key(&requests[6]), AppError::status(401, "invalid api key"));

    let results = aggregator(fake.clone()).get_categorized_shows(&requests).await;

    assert_eq!(results.len(), 10);
    for (index, (result, request)) in results.iter().zip(&requests).enumerate() {
        assert_eq!(result.title, request.label);
        if index == 2 || index == 6 {
            assert!(result.shows.is_empty(), "slot {} should be empty", index);
        } else {
            assert_eq!(ids(&result.shows), vec![index as u64 * 10, index as u64 * 10 + 1]);
        }
        // permanent errors are not retried
        assert_eq!(fake.calls_for(&key(request)), 1);
    }
}

#[tokio::test]
async fn test_batches_cap_concurrency_and_never_overlap() {
    let fake = Arc::new(FakeCatalogClient::new().with_latency(Duration::from_millis(15)));
    let requests = shelves(&fake, 10);

    let results = aggregator(fake.clone()).get_categorized_shows(&requests).await;
    assert_eq!(results.len(), 10);
    assert_eq!(fake.max_in_flight(), 4);

    // Every request of batch N finishes before any request of batch N+1 starts
    let events = fake.events();
    let position = |event: CallEvent| events.iter().position(|e| *e == event).unwrap();
    let batches: Vec<&[CategoryRequest]> = requests.chunks(4).collect();
    for pair in batches.windows(2) {
        let last_finish = pair[0]
            .iter()
            .map(|request| position(CallEvent::Finished(key(request))))
            .max()
            .unwrap();
        let first_start = pair[1]
            .iter()
            .map(|request| position(CallEvent::Started(key(request))))
            .min()
            .unwrap();
        assert!(last_finish < first_start);
    }
}

#[tokio::test]
async fn test_media_type_override_for_listed_endpoints() {
    let fake = Arc::new(FakeCatalogClient::new());

    let discover = CategoryRequest::new(
        "Korean Dramas",
        CategoryParams::discover(MediaType::Tv).with_filter("with_original_language", "ko"),
    );
    fake.respond(
        &key(&discover),
        page(vec![
            RecordFactory::tv(1, "Crash Landing on You").tagged_as(Some(MediaType::Movie)).build(),
            RecordFactory::tv(2, "Kingdom").tagged_as(None).build(),
        ]),
    );

    let trending = CategoryRequest::new(
        "Trending",
        CategoryParams::trending(Some(MediaType::Tv), TimeWindow::Day),
    );
    fake.respond(
        &key(&trending),
        page(vec![RecordFactory::movie(3, "Dune").build()]),
    );

    let results = aggregator(fake.clone())
        .get_categorized_shows(&[discover, trending])
        .await;

    assert!(results[0]
        .shows
        .iter()
        .all(|show| show.media_type == Some(MediaType::Tv)));
    // trending tags each record itself
    assert_eq!(results[1].shows[0].media_type, Some(MediaType::Movie));
}

#[tokio::test]
async fn test_transient_failures_are_retried_per_request() {
    let fake = Arc::new(FakeCatalogClient::new());
    let requests = shelves(&fake, 3);
    fake.fail_times(
        &key(&requests[0]),
        2,
        AppError::network(NetworkErrorKind::Timeout, "timed out"),
    );
    fake.fail_always(&key(&requests[1]), AppError::status(429, "rate limited"));

    let results = aggregator(fake.clone()).get_categorized_shows(&requests).await;

    assert_eq!(ids(&results[0].shows), vec![0, 1]);
    assert_eq!(fake.calls_for(&key(&requests[0])), 3);

    assert!(results[1].shows.is_empty());
    assert_eq!(fake.calls_for(&key(&requests[1])), 3);

    assert_eq!(ids(&results[2].shows), vec![20, 21]);
    assert_eq!(fake.calls_for(&key(&requests[2])), 1);
}

#[tokio::test]
async fn test_visibility_is_carried_through_failures() {
    let fake = Arc::new(FakeCatalogClient::new());
    let mut requests = shelves(&fake, 2);
    requests[1] = requests[1].clone().with_visibility(false);
    fake.fail_always(&key(&requests[1]), AppError::status(404, "not found"));

    let results = aggregator(fake.clone()).get_categorized_shows(&requests).await;

    assert!(results[0].visible);
    assert!(!results[1].visible);
    assert!(results[1].shows.is_empty());
}

#[test]
fn test_no_requests_means_no_calls() {
    let fake = Arc::new(FakeCatalogClient::new());
    let aggregator = aggregator(fake.clone());

    let results = tokio_test::block_on(aggregator.get_categorized_shows(&[]));

    assert!(results.is_empty());
    assert_eq!(fake.total_calls(), 0);
}

#[test]
fn test_invalid_config_is_rejected() {
    let fake: Arc<dyn CatalogClient> = Arc::new(FakeCatalogClient::new());
    let result = CategoryAggregator::new(fake, AggregatorConfig::default().with_batch_size(0));
    assert!(matches!(result, Err(AppError::ConfigError(_))));
}
