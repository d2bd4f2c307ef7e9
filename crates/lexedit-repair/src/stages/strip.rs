//! Stage 2: strip markdown and extract the greedy brace span

use super::{greedy_span, parse, strip_markdown};
use crate::cascade::{RepairStage, RepairStrategy};
use crate::error::RepairError;
use serde_json::Value;

/// Remove code fences and prose around the outermost brace span
#[derive(Debug, Clone, Copy, Default)]
pub struct StripAndExtract;

impl RepairStage for StripAndExtract {
    fn strategy(&self) -> RepairStrategy {
        RepairStrategy::StripAndExtract
    }

    fn attempt(&self, raw: &str) -> Result<Value, RepairError> {
        let stripped = strip_markdown(raw);
        let span = greedy_span(&stripped)
            .ok_or_else(|| RepairError::no_candidate(self.strategy(), "no bracketed span"))?;
        parse(self.strategy(), span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_from_fenced_block() {
        let raw = "Here you go:\n```json\n{\"type\":\"doc\",\"content\":[]}\n```\nLet me know!";
        let value = StripAndExtract.attempt(raw).unwrap();
        assert_eq!(value, json!({"type": "doc", "content": []}));
    }

    #[test]
    fn plain_prose_has_no_candidate() {
        let err = StripAndExtract.attempt("I rewrote the clause for you.").unwrap_err();
        assert!(matches!(err, RepairError::NoCandidate { .. }));
    }
}
