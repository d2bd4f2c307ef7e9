//! Property tests for normalization and truncation repair

use lexedit_repair::stages::TruncationRepair;
use lexedit_repair::{is_canonical, normalize, RepairStage};
use proptest::prelude::*;
use serde_json::{Map, Value};

fn leaf_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::from),
        "[a-z ]{0,8}".prop_map(Value::String),
    ]
}

fn container(depth: u32) -> impl Strategy<Value = Value> {
    leaf_value().prop_recursive(depth, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<String, Value>>())),
        ]
    })
}

fn object_or_array() -> impl Strategy<Value = Value> {
    prop_oneof![
        prop::collection::vec(container(3), 0..4).prop_map(Value::Array),
        prop::collection::btree_map("[a-z]{1,6}", container(3), 0..4)
            .prop_map(|m| Value::Object(m.into_iter().collect::<Map<String, Value>>())),
    ]
}

fn text_node() -> impl Strategy<Value = Value> {
    "[a-zA-Z ]{0,10}".prop_map(|t| serde_json::json!({"type": "text", "text": t}))
}

fn canonical_fragment() -> impl Strategy<Value = Value> {
    let block = (
        prop_oneof![Just("paragraph"), Just("heading"), Just("blockquote")],
        prop::collection::vec(text_node(), 0..3),
    )
        .prop_map(|(kind, children)| serde_json::json!({"type": kind, "children": children}));

    prop::collection::vec(block, 0..4)
        .prop_map(|children| serde_json::json!({"type": "document-root", "children": children}))
}

proptest! {
    #[test]
    fn normalization_is_idempotent(value in container(3)) {
        let once = normalize(value);
        let twice = normalize(once.clone());
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn canonical_fragments_are_unchanged(fragment in canonical_fragment()) {
        prop_assert!(is_canonical(&fragment));
        prop_assert_eq!(normalize(fragment.clone()), fragment);
    }

    #[test]
    fn truncation_repair_restores_trailing_closers(value in object_or_array(), cut in 1usize..8) {
        let text = serde_json::to_string(&value).unwrap();
        let closers = text.chars().rev().take_while(|c| matches!(c, '}' | ']')).count();
        let cut = cut.min(closers);
        let truncated = &text[..text.len() - cut];

        let repaired = TruncationRepair.attempt(truncated).unwrap();
        prop_assert_eq!(repaired, value);
    }
}
