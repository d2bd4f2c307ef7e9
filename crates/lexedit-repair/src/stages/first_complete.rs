//! Stage 5: first complete top-level object or array

use super::{parse, strip_markdown};
use crate::cascade::{RepairStage, RepairStrategy};
use crate::error::RepairError;
use crate::scanner::{balanced_span, tokenize, TokenKind};
use serde_json::Value;

/// Parse only the first balanced `{...}`, then the first balanced `[...]`
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstComplete;

impl RepairStage for FirstComplete {
    fn strategy(&self) -> RepairStrategy {
        RepairStrategy::FirstComplete
    }

    fn attempt(&self, raw: &str) -> Result<Value, RepairError> {
        let stripped = strip_markdown(raw);
        let tokens = tokenize(&stripped);
        let mut last_err = None;

        for opener in ['{', '['] {
            let Some(idx) = tokens.iter().position(|t| t.kind == TokenKind::Open(opener)) else {
                continue;
            };
            let Some((start, end)) = balanced_span(&tokens, idx) else {
                continue;
            };
            match parse(self.strategy(), &stripped[start..end]) {
                Ok(value) => return Ok(value),
                Err(e) => last_err = Some(e),
            }
        }

        Err(last_err
            .unwrap_or_else(|| RepairError::no_candidate(self.strategy(), "no balanced value")))
    }
}
