//! Ported from `tests/test_sub_feed.py`.

mod support;

use serde_json::json;
use smartfeed::{Cursor, FeedConfig, FeedManager};

fn expect(user_id: &str, from: u64, to: u64) -> Vec<serde_json::Value> {
    (from..=to).map(|i| json!(format!("{user_id}_{i}"))).collect()
}

#[tokio::test]
async fn sub_feed_without_params() {
    let config = FeedConfig::parse(json!({
        "version": "1",
        "feed": {
            "subfeed_id": "subfeed_example",
            "type": "subfeed",
            "method_name": "ads",
        }
    }))
    .unwrap();
    let manager = FeedManager::builder(config)
        .with_fetchers(support::registry())
        .build();

    let result = manager
        .get_data("x", 15, &Cursor::empty(), &support::empty_extra())
        .await
        .unwrap();

    assert_eq!(result.data, expect("x", 1, 15));
}

#[tokio::test]
async fn sub_feed_with_params() {
    let config = FeedConfig::parse(json!({
        "version": "1",
        "feed": {
            "subfeed_id": "subfeed_with_params_example",
            "type": "subfeed",
            "method_name": "ads",
            "subfeed_params": {"limit_to_return": 10},
        }
    }))
    .unwrap();
    let manager = FeedManager::builder(config)
        .with_fetchers(support::registry())
        .build();

    let result = manager
        .get_data("x", 15, &Cursor::empty(), &support::empty_extra())
        .await
        .unwrap();

    assert_eq!(result.data, expect("x", 1, 10));
}

#[tokio::test]
async fn sub_feed_raise_error_false_substitutes_empty_page() {
    let config = FeedConfig::parse(json!({
        "version": "1",
        "feed": {
            "subfeed_id": "subfeed_error_example",
            "type": "subfeed",
            "method_name": "error",
            "raise_error": false,
        }
    }))
    .unwrap();
    let manager = FeedManager::builder(config)
        .with_fetchers(support::registry())
        .build();

    let result = manager
        .get_data("x", 15, &Cursor::empty(), &support::empty_extra())
        .await
        .unwrap();

    assert!(result.data.is_empty());
    assert!(!result.has_next_page);
}

#[tokio::test]
async fn sub_feed_raise_error_true_propagates() {
    let config = FeedConfig::parse(json!({
        "version": "1",
        "feed": {
            "subfeed_id": "subfeed_error_example",
            "type": "subfeed",
            "method_name": "error",
        }
    }))
    .unwrap();
    let manager = FeedManager::builder(config)
        .with_fetchers(support::registry())
        .build();

    let err = manager
        .get_data("x", 15, &Cursor::empty(), &support::empty_extra())
        .await
        .unwrap_err();

    assert!(matches!(err, smartfeed::FeedError::FetcherRaised(_, _)));
}

#[tokio::test]
async fn sub_feed_missing_fetcher() {
    let config = FeedConfig::parse(json!({
        "version": "1",
        "feed": {
            "subfeed_id": "subfeed_unregistered",
            "type": "subfeed",
            "method_name": "does_not_exist",
        }
    }))
    .unwrap();
    let manager = FeedManager::builder(config)
        .with_fetchers(support::registry())
        .build();

    let err = manager
        .get_data("x", 15, &Cursor::empty(), &support::empty_extra())
        .await
        .unwrap_err();

    assert!(matches!(err, smartfeed::FeedError::FetcherMissing(_)));
}
