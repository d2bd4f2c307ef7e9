//! Stage 1: parse the raw text as-is

use super::parse;
use crate::cascade::{RepairStage, RepairStrategy};
use crate::error::RepairError;
use serde_json::Value;

/// Parse the raw response without touching it
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectParse;

impl RepairStage for DirectParse {
    fn strategy(&self) -> RepairStrategy {
        RepairStrategy::Direct
    }

    fn attempt(&self, raw: &str) -> Result<Value, RepairError> {
        parse(self.strategy(), raw.trim())
    }
}
