use chrono::NaiveDate;
use httpmock::prelude::*;
use real_raise::{Currency, FetchError, MemorySessionStore, RateCache, RateFetcher};
use serde_json::json;

const HISTORY_PATH: &str = "/2023-10-18..2024-10-18";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, 18).unwrap()
}

fn latest_body() -> serde_json::Value {
    json!({
        "amount": 1.0,
        "base": "EUR",
        "date": "2024-10-18",
        "rates": {"TRY": 37.5, "USD": 1.25}
    })
}

#[tokio::test]
async fn test_fetch_rates_derives_cross_rates_and_averages() {
    let server = MockServer::start_async().await;

    let latest_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/latest")
                .query_param("from", "EUR")
                .query_param_exists("to");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(latest_body());
        })
        .await;

    let history_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(HISTORY_PATH)
                .query_param("from", "EUR");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "amount": 1.0,
                    "base": "EUR",
                    "start_date": "2023-10-18",
                    "end_date": "2024-10-18",
                    "rates": {
                        "2023-10-18": {"TRY": 30.0, "USD": 1.0},
                        "2024-01-02": {"TRY": 34.0, "USD": 1.25},
                        "2024-05-01": {"TRY": 35.0}
                    }
                }));
        })
        .await;

    let fetcher = RateFetcher::new(server.base_url());
    let pair = fetcher.fetch_rates_on(today()).await.unwrap();

    latest_mock.assert_async().await;
    history_mock.assert_async().await;

    assert_eq!(pair.eur.currency, Currency::Eur);
    assert_eq!(pair.eur.now, 37.5);
    assert_eq!(pair.eur.trailing_avg, 32.0);

    assert_eq!(pair.usd.currency, Currency::Usd);
    assert!((pair.usd.now - 30.0).abs() < 1e-12);
    assert!((pair.usd.trailing_avg - 28.6).abs() < 1e-9);
    assert!((pair.cross_rate_now() - 1.25).abs() < 1e-12);
}

#[tokio::test]
async fn test_fetched_pair_survives_cache_round_trip() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/latest");
            then.status(200).json_body(latest_body());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(HISTORY_PATH);
            then.status(200).json_body(json!({
                "rates": {
                    "2024-01-02": {"TRY": 34.1, "USD": 1.0921},
                    "2024-06-03": {"TRY": 35.3, "USD": 1.0874}
                }
            }));
        })
        .await;

    let fetcher = RateFetcher::new(server.base_url());
    let pair = fetcher.fetch_rates_on(today()).await.unwrap();
    assert_eq!(pair.captured_at().timestamp_subsec_nanos() % 1_000_000, 0);

    let cache = RateCache::new(MemorySessionStore::new());
    cache.put(&pair).unwrap();
    assert_eq!(cache.get(), Some(pair));
}

#[tokio::test]
async fn test_latest_http_failure() {
    let server = MockServer::start_async().await;

    let latest_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/latest");
            then.status(500);
        })
        .await;
    let history_mock = server
        .mock_async(|when, then| {
            when.method(GET).path(HISTORY_PATH);
            then.status(200).json_body(json!({"rates": {}}));
        })
        .await;

    let fetcher = RateFetcher::new(server.base_url());
    let err = fetcher.fetch_rates_on(today()).await.unwrap_err();

    assert!(matches!(err, FetchError::LatestUnavailable { .. }));
    latest_mock.assert_async().await;
    history_mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_latest_missing_rate() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/latest");
            then.status(200)
                .json_body(json!({"base": "EUR", "rates": {"TRY": 37.5, "USD": "1.25"}}));
        })
        .await;

    let fetcher = RateFetcher::new(server.base_url());
    let err = fetcher.fetch_rates_on(today()).await.unwrap_err();

    match err {
        FetchError::LatestUnavailable { reason } => assert!(reason.contains("USD")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_latest_invalid_body() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/latest");
            then.status(200).body("<html>maintenance</html>");
        })
        .await;

    let fetcher = RateFetcher::new(server.base_url());
    let err = fetcher.fetch_rates_on(today()).await.unwrap_err();
    assert!(matches!(err, FetchError::LatestUnavailable { .. }));
}

#[tokio::test]
async fn test_history_http_failure() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/latest");
            then.status(200).json_body(latest_body());
        })
        .await;
    let history_mock = server
        .mock_async(|when, then| {
            when.method(GET).path(HISTORY_PATH);
            then.status(503);
        })
        .await;

    let fetcher = RateFetcher::new(server.base_url());
    let err = fetcher.fetch_rates_on(today()).await.unwrap_err();

    assert!(matches!(err, FetchError::HistoryUnavailable { .. }));
    history_mock.assert_async().await;
}

#[tokio::test]
async fn test_history_without_usable_days() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/latest");
            then.status(200).json_body(latest_body());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(HISTORY_PATH);
            then.status(200).json_body(json!({
                "rates": {
                    "2024-01-02": {"TRY": 34.0},
                    "2024-01-03": {"USD": 1.1},
                    "2024-01-04": {"TRY": null, "USD": 1.1}
                }
            }));
        })
        .await;

    let fetcher = RateFetcher::new(server.base_url());
    let err = fetcher.fetch_rates_on(today()).await.unwrap_err();
    assert_eq!(err, FetchError::InsufficientHistory);
}

#[tokio::test]
async fn test_history_without_rates_field() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/latest");
            then.status(200).json_body(latest_body());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(HISTORY_PATH);
            then.status(200).json_body(json!({"base": "EUR"}));
        })
        .await;

    let fetcher = RateFetcher::new(server.base_url());
    let err = fetcher.fetch_rates_on(today()).await.unwrap_err();
    assert_eq!(err, FetchError::InsufficientHistory);
}

#[tokio::test]
async fn test_unreachable_provider() {
    // nothing listens on port 1
    let fetcher = RateFetcher::new("http://127.0.0.1:1");
    let err = fetcher.fetch_rates_on(today()).await.unwrap_err();
    assert!(matches!(err, FetchError::LatestUnavailable { .. }));
}
