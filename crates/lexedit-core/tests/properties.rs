//! Property tests over whole edits

use lexedit_document::DocumentHandle;
use lexedit_repair::LOST_CONTENT_WARNING;
use lexedit_test_utils::{legal_paragraph_doc, session_with, test_config, ScriptedBackend};
use proptest::prelude::*;
use std::sync::Arc;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn reply() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just(r#"{"type":"document-root","children":[]}"#.to_string()),
        Just(r#"[{"type":"paragraph","children":[]}]"#.to_string()),
        "[a-zA-Z ]{0,40}".prop_map(|t| format!(
            r#"{{"type":"doc","content":[{{"type":"paragraph","content":[{{"type":"text","text":"{t}"}}]}}]}}"#
        )),
        "[a-zA-Z ,.]{0,60}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_no_silent_content_loss(original in "[a-zA-Z]{1,10}( [a-zA-Z]{1,10}){0,5}", raw in reply()) {
        let rt = runtime();
        let backend = Arc::new(ScriptedBackend::new().with_reply(raw));
        let mut session = session_with(legal_paragraph_doc(&original), test_config(&["m"]), backend, None);

        let response = rt.block_on(session.process_command("rewrite")).unwrap();

        let text = session.document().plain_text();
        prop_assert!(
            !text.trim().is_empty() || response.warnings.iter().any(|w| w == LOST_CONTENT_WARNING),
            "empty result without warning: {:?}", response
        );
    }

    #[test]
    fn prop_undo_restores_text(original in "[a-zA-Z]{1,10}( [a-zA-Z]{1,10}){0,5}", raw in reply()) {
        let rt = runtime();
        let backend = Arc::new(ScriptedBackend::new().with_reply(raw));
        let mut session = session_with(legal_paragraph_doc(&original), test_config(&["m"]), backend, None);
        let before = session.document().plain_text();

        rt.block_on(session.process_command("rewrite")).unwrap();
        session.undo().unwrap();

        prop_assert_eq!(session.document().plain_text(), before);
    }
}
