//! Stage 4: repair output cut off at the model's length ceiling
//!
//! First the candidate is truncated to its last fully balanced prefix. When
//! no such prefix exists the missing closers are appended instead, after
//! closing an unterminated string and completing a dangling `:`. If that still
//! does not parse the candidate is cut back to the previous comma and closed
//! again, a bounded number of times.

use super::{from_first_opener, parse, strip_markdown};
use crate::cascade::{RepairStage, RepairStrategy};
use crate::error::RepairError;
use crate::scanner::{closer_for, last_balanced_end, open_stack, tokenize, TokenKind};
use serde_json::Value;

/// Upper bound on comma cut-backs per attempt
const MAX_CUTBACKS: usize = 16;

/// Recover a truncated structure
#[derive(Debug, Clone, Copy, Default)]
pub struct TruncationRepair;

impl RepairStage for TruncationRepair {
    fn strategy(&self) -> RepairStrategy {
        RepairStrategy::TruncationRepair
    }

    fn attempt(&self, raw: &str) -> Result<Value, RepairError> {
        let stripped = strip_markdown(raw);
        let candidate = from_first_opener(&stripped)
            .ok_or_else(|| RepairError::no_candidate(self.strategy(), "no opening bracket"))?;

        if let Some(end) = last_balanced_end(&tokenize(candidate)) {
            if end < candidate.len() {
                let prefix = candidate[..end].trim_end().trim_end_matches(',');
                if let Ok(value) = parse(self.strategy(), prefix) {
                    tracing::debug!(kept = end, dropped = candidate.len() - end, "kept balanced prefix");
                    return Ok(value);
                }
            }
        }

        let mut body = candidate.to_string();
        let mut last_err = None;
        for _ in 0..=MAX_CUTBACKS {
            match parse(self.strategy(), &close_open(&body)) {
                Ok(value) => return Ok(value),
                Err(e) => last_err = Some(e),
            }

            let tokens = tokenize(&body);
            let Some(comma) = tokens.iter().rev().find(|t| t.kind == TokenKind::Comma) else {
                break;
            };
            body.truncate(comma.start);
        }

        Err(last_err
            .unwrap_or_else(|| RepairError::no_candidate(self.strategy(), "nothing to close")))
    }
}

/// Close whatever `body` left open
pub(crate) fn close_open(body: &str) -> String {
    let mut out = body.trim_end().to_string();

    if let Some(last) = tokenize(&out).last() {
        if last.kind == (TokenKind::Str { closed: false }) {
            let trailing = out.chars().rev().take_while(|&c| c == '\\').count();
            if trailing % 2 == 1 {
                out.pop();
            }
            out.push('"');
        }
    }

    let tokens = tokenize(&out);
    match tokens.last() {
        Some(t) if t.kind == TokenKind::Comma => {
            out.truncate(t.start);
            out.truncate(out.trim_end().len());
        }
        Some(t) if t.kind == TokenKind::Colon => out.push_str("null"),
        _ => {}
    }

    for open in open_stack(&tokenize(&out)).into_iter().rev() {
        out.push(closer_for(open));
    }
    out
}
