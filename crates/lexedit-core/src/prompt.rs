//! Prompt builder
//!
//! Turns an [`EditRequest`] into a single instruction string. The output
//! contract is stated several times over because models drift from it; the
//! repair cascade remains the real correctness backstop.

use crate::types::EditRequest;
use lexedit_document::{StructuredNode, ROOT_TYPE};
use std::fmt::Write;

const ROLE: &str = "You are an editing engine for legal documents. You receive one fragment of a \
structured rich-text document and an instruction from the drafting lawyer, and you return the \
edited fragment in the same structured format.";

const RULES: &[&str] = &[
    "Keep the legal meaning and the enforceability of the text intact.",
    "Write in a formal, precise legal register.",
    "Never add parties, dates, amounts or other facts that are not in the fragment or its context.",
    "Return strictly valid JSON and nothing else.",
    "Do not wrap the JSON in markdown, code fences or explanations.",
    "Return the complete fragment; never stop part way through.",
];

/// Build the instruction string for one edit
#[must_use]
pub fn build_prompt(request: &EditRequest) -> String {
    let root_open = root_open();
    let fragment = serde_json::to_string_pretty(&request.fragment)
        .unwrap_or_else(|_| request.fragment.plain_text());

    let mut prompt = String::with_capacity(fragment.len() + 2048);

    // writes into a String cannot fail
    prompt.push_str(ROLE);
    prompt.push_str("\n\nRULES:\n");
    for (i, rule) in RULES.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {rule}", i + 1);
    }
    let _ = writeln!(
        prompt,
        "{}. The response must start with {root_open} and end with ]}}.",
        RULES.len() + 1
    );

    if let Some(category) = request.category {
        let _ = writeln!(prompt, "\nDOCUMENT TYPE: {}", category.as_str().to_uppercase());
    }
    if let Some(context) = request.context.as_deref() {
        let _ = writeln!(prompt, "\nSURROUNDING TEXT:\n{context}");
    }

    let _ = writeln!(prompt, "\nINSTRUCTION:\n{}", request.command);
    let _ = writeln!(prompt, "\nFRAGMENT:\n{fragment}");

    let _ = writeln!(
        prompt,
        "\nOUTPUT FORMAT:\nReply with one JSON object of exactly this shape: {root_open} ...block nodes... ]}}\n\
         Each block node has a \"type\" and its own \"children\"; text nodes are {{\"type\": \"text\", \"text\": \"...\"}}.\n\
         Example:\n{}\n\
         Start your reply with {root_open} and write nothing before or after the JSON.",
        worked_example()
    );

    prompt
}

fn root_open() -> String {
    format!("{{\"type\": \"{ROOT_TYPE}\", \"children\": [")
}

fn worked_example() -> String {
    let example = StructuredNode::root(vec![StructuredNode::paragraph(
        "The Contractor shall deliver the Services on or before the Completion Date.",
    )]);
    serde_json::to_string(&example).unwrap_or_default()
}
