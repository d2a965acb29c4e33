//! Config tree structural validation (§3, §6): `FeedConfig::parse` rejects
//! anything `serde`'s `deny_unknown_fields` or `FeedNode::validate`'s
//! cross-field checks catch.

use serde_json::json;
use smartfeed::{FeedConfig, FeedError};

fn assert_config_invalid(result: Result<FeedConfig, FeedError>) {
    match result {
        Err(FeedError::ConfigInvalid(_)) => {}
        other => panic!("expected FeedError::ConfigInvalid, got {other:?}"),
    }
}

#[test]
fn valid_tree_parses() {
    let config = json!({
        "version": "1",
        "feed": {
            "merger_id": "top",
            "type": "merger_append",
            "items": [
                {
                    "subfeed_id": "a",
                    "type": "subfeed",
                    "method_name": "ads",
                },
                {
                    "subfeed_id": "b",
                    "type": "subfeed",
                    "method_name": "followings",
                },
            ],
        }
    });

    let parsed = FeedConfig::parse(config).unwrap();
    assert_eq!(parsed.version, "1");
}

#[test]
fn duplicate_node_id_is_rejected() {
    let config = json!({
        "version": "1",
        "feed": {
            "merger_id": "top",
            "type": "merger_append",
            "items": [
                {
                    "subfeed_id": "dup",
                    "type": "subfeed",
                    "method_name": "ads",
                },
                {
                    "subfeed_id": "dup",
                    "type": "subfeed",
                    "method_name": "followings",
                },
            ],
        }
    });

    assert_config_invalid(FeedConfig::parse(config));
}

#[test]
fn positional_requires_positions_or_full_range() {
    let config = json!({
        "version": "1",
        "feed": {
            "merger_id": "top",
            "type": "merger_positional",
            "positional": {"subfeed_id": "p", "type": "subfeed", "method_name": "ads"},
            "default": {"subfeed_id": "d", "type": "subfeed", "method_name": "followings"},
        }
    });

    assert_config_invalid(FeedConfig::parse(config));
}

#[test]
fn positional_start_must_exceed_max_position() {
    let config = json!({
        "version": "1",
        "feed": {
            "merger_id": "top",
            "type": "merger_positional",
            "positions": [1, 5, 10],
            "start": 10,
            "end": 50,
            "step": 2,
            "positional": {"subfeed_id": "p", "type": "subfeed", "method_name": "ads"},
            "default": {"subfeed_id": "d", "type": "subfeed", "method_name": "followings"},
        }
    });

    assert_config_invalid(FeedConfig::parse(config));
}

#[test]
fn positional_end_must_exceed_start() {
    let config = json!({
        "version": "1",
        "feed": {
            "merger_id": "top",
            "type": "merger_positional",
            "start": 20,
            "end": 20,
            "step": 2,
            "positional": {"subfeed_id": "p", "type": "subfeed", "method_name": "ads"},
            "default": {"subfeed_id": "d", "type": "subfeed", "method_name": "followings"},
        }
    });

    assert_config_invalid(FeedConfig::parse(config));
}

#[test]
fn gradient_step_out_of_range_is_rejected() {
    let config = json!({
        "version": "1",
        "feed": {
            "merger_id": "top",
            "type": "merger_percentage_gradient",
            "item_from": {"percentage": 80, "data": {"subfeed_id": "a", "type": "subfeed", "method_name": "ads"}},
            "item_to": {"percentage": 20, "data": {"subfeed_id": "b", "type": "subfeed", "method_name": "followings"}},
            "step": 0,
            "size_to_step": 10,
        }
    });

    assert_config_invalid(FeedConfig::parse(config));
}

#[test]
fn gradient_size_to_step_must_be_positive() {
    let config = json!({
        "version": "1",
        "feed": {
            "merger_id": "top",
            "type": "merger_percentage_gradient",
            "item_from": {"percentage": 80, "data": {"subfeed_id": "a", "type": "subfeed", "method_name": "ads"}},
            "item_to": {"percentage": 20, "data": {"subfeed_id": "b", "type": "subfeed", "method_name": "followings"}},
            "step": 10,
            "size_to_step": 0,
        }
    });

    assert_config_invalid(FeedConfig::parse(config));
}

#[test]
fn unknown_field_is_rejected() {
    let config = json!({
        "version": "1",
        "feed": {
            "subfeed_id": "a",
            "type": "subfeed",
            "method_name": "ads",
            "not_a_real_field": true,
        }
    });

    assert_config_invalid(FeedConfig::parse(config));
}

#[test]
fn nested_duplicate_across_subtrees_is_rejected() {
    let config = json!({
        "version": "1",
        "feed": {
            "merger_id": "top",
            "type": "merger_percentage",
            "items": [
                {
                    "percentage": 50,
                    "data": {
                        "merger_id": "inner",
                        "type": "merger_append",
                        "items": [{"subfeed_id": "shared", "type": "subfeed", "method_name": "ads"}],
                    },
                },
                {
                    "percentage": 50,
                    "data": {"subfeed_id": "shared", "type": "subfeed", "method_name": "followings"},
                },
            ],
        }
    });

    assert_config_invalid(FeedConfig::parse(config));
}
