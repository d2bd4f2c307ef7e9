//! End-to-end recovery scenarios over realistic model output

use lexedit_document::StructuredNode;
use lexedit_repair::fallback::GENERIC_MESSAGE;
use lexedit_repair::score::TEXT_CHANGED;
use lexedit_repair::{
    confidence, detect_changes, into_fragment, validate, RepairCascade, RepairStrategy,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn selection(text: &str) -> StructuredNode {
    StructuredNode {
        children: Some(vec![StructuredNode::paragraph(text)]),
        ..StructuredNode::default()
    }
}

#[test]
fn fenced_response_is_stripped_and_normalized() {
    let raw = "```json\n{\"type\":\"doc\",\"content\":[{\"type\":\"paragraph\",\"content\":[{\"type\":\"text\",\"text\":\"Hello\"}]}]}\n```";
    let original = selection("Hi");

    let recovered = RepairCascade::new().recover(raw, &original);
    assert_eq!(recovered.strategy, RepairStrategy::StripAndExtract);
    assert_eq!(
        recovered.value,
        json!({
            "type": "document-root",
            "children": [{"type": "paragraph", "children": [{"type": "text", "text": "Hello"}]}]
        })
    );

    let report = validate(&recovered.value, &original.plain_text());
    assert!(report.is_valid());

    let fragment = into_fragment(recovered.value).unwrap();
    let score = confidence(&fragment, "Hi", "make it friendlier", recovered.strategy);
    assert!(score >= 0.7);
}

#[test]
fn truncated_response_is_closed() {
    let raw = r#"{"type":"doc","content":[{"type":"paragraph","content":[{"type":"text","text":"Hello""#;
    let recovered = RepairCascade::new().recover(raw, &selection("Hi"));

    assert_eq!(recovered.strategy, RepairStrategy::TruncationRepair);
    assert_eq!(recovered.failures.len(), 3);

    let fragment = into_fragment(recovered.value).unwrap();
    assert!(fragment.is_root());
    assert_eq!(fragment.children()[0].kind(), "paragraph");
    assert_eq!(fragment.plain_text(), "Hello");
}

#[test]
fn empty_response_yields_generic_fragment() {
    let recovered = RepairCascade::new().recover("", &selection("Some clause"));
    assert_eq!(recovered.strategy, RepairStrategy::Generic);

    let fragment = into_fragment(recovered.value).unwrap();
    assert_eq!(fragment.plain_text(), GENERIC_MESSAGE);

    let score = confidence(&fragment, "Some clause", "tidy up", recovered.strategy);
    assert!((score - 0.5).abs() < 1e-9);
}

#[test]
fn prose_response_replaces_selected_text() {
    let original = selection("The respondent is Jane Doe");
    let recovered = RepairCascade::new().recover(
        "Sure! Here is the revised clause:\n\nJane Doe is named as the respondent.",
        &original,
    );

    assert_eq!(recovered.strategy, RepairStrategy::TextOnly);
    let fragment = into_fragment(recovered.value).unwrap();
    assert_eq!(fragment.children().len(), 1);
    assert!(fragment.plain_text().ends_with("Jane Doe is named as the respondent."));
}

#[test]
fn rephrase_reports_text_change_and_bonus() {
    let original = selection("The respondent is Jane Doe");
    let raw = r#"{"type":"document-root","children":[{"type":"paragraph","children":[{"type":"text","text":"Jane Doe is named as respondent"}]}]}"#;

    let recovered = RepairCascade::new().recover(raw, &original);
    assert_eq!(recovered.strategy, RepairStrategy::Direct);
    assert!(recovered.failures.is_empty());

    let fragment = into_fragment(recovered.value).unwrap();
    let changes = detect_changes(&original, &fragment);
    assert!(changes.contains(&TEXT_CHANGED.to_string()));

    let with_verb = confidence(&fragment, &original.plain_text(), "rephrase this clause", recovered.strategy);
    let without_verb = confidence(&fragment, &original.plain_text(), "shorten this clause", recovered.strategy);
    assert!((with_verb - without_verb - 0.1).abs() < 1e-9);
}

#[test]
fn missing_commas_are_repaired() {
    let raw = "{\"type\":\"doc\",\"content\":[{\"type\":\"paragraph\",\"content\":[{\"type\":\"text\",\"text\":\"A\"}]}{\"type\":\"paragraph\",\"content\":[{\"type\":\"text\",\"text\":\"B\"}]}]}";
    let recovered = RepairCascade::new().recover(raw, &selection("x"));

    assert_eq!(recovered.strategy, RepairStrategy::SyntaxFix);
    let fragment = into_fragment(recovered.value).unwrap();
    assert_eq!(fragment.children().len(), 2);
    assert_eq!(fragment.plain_text(), "AB");
}
