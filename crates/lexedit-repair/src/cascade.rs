//! Repair cascade
//!
//! An ordered list of [`RepairStage`]s tried in sequence. A stage's output is
//! accepted only once it normalizes into a structurally valid fragment; the
//! first accepted output wins and later stages are never invoked. When every
//! structural stage fails, [`RepairCascade::recover`] falls back to a
//! synthesized fragment so that the caller always receives something it can
//! apply.
//!
//! # Example
//!
//! ```rust,ignore
//! use lexedit_repair::{RepairCascade, RepairStrategy};
//!
//! let cascade = RepairCascade::new();
//! let recovered = cascade.recover("```json\n{\"type\":\"doc\",\"content\":[]}\n```", &original);
//! assert_eq!(recovered.strategy, RepairStrategy::StripAndExtract);
//! ```

use crate::error::{CascadeExhausted, RepairError};
use crate::fallback::{generic_fragment, text_fallback, usable_text};
use crate::normalize::normalize;
use crate::stages::{DirectParse, FirstComplete, StripAndExtract, SyntaxFix, TruncationRepair};
use crate::validate::check_structure;
use lexedit_document::StructuredNode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a fragment was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStrategy {
    /// Raw text parsed as-is
    Direct,
    /// Markdown stripped and outer span extracted
    StripAndExtract,
    /// Textual syntax fixes applied
    SyntaxFix,
    /// Truncated output closed or cut back
    TruncationRepair,
    /// First balanced object or array
    FirstComplete,
    /// Plain-text rewrite wrapped into the original structure
    TextOnly,
    /// Neutral completion message
    Generic,
    /// Canned error fragment
    ErrorFragment,
}

impl RepairStrategy {
    /// Stable snake_case name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::StripAndExtract => "strip_and_extract",
            Self::SyntaxFix => "syntax_fix",
            Self::TruncationRepair => "truncation_repair",
            Self::FirstComplete => "first_complete",
            Self::TextOnly => "text_only",
            Self::Generic => "generic",
            Self::ErrorFragment => "error_fragment",
        }
    }

    /// True when the fragment was built by the pipeline rather than the model
    #[inline]
    #[must_use]
    pub fn is_synthesized(&self) -> bool {
        matches!(self, Self::TextOnly | Self::Generic | Self::ErrorFragment)
    }
}

impl std::fmt::Display for RepairStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structural recovery strategy
///
/// Implementations must be pure: same input, same output, no side effects.
pub trait RepairStage: Send + Sync {
    /// Strategy recorded when this stage wins
    fn strategy(&self) -> RepairStrategy;

    /// Try to recover a value from `raw`
    fn attempt(&self, raw: &str) -> Result<Value, RepairError>;
}

/// Normalized fragment and how it was obtained
#[derive(Debug, Clone, PartialEq)]
pub struct Recovered {
    /// Normalized fragment value
    pub value: Value,
    /// Winning strategy
    pub strategy: RepairStrategy,
    /// Failures of the stages tried before the winner
    pub failures: Vec<RepairError>,
}

impl Recovered {
    /// Wrap a synthesized fragment
    #[must_use]
    pub fn synthesized(
        fragment: &StructuredNode,
        strategy: RepairStrategy,
        failures: Vec<RepairError>,
    ) -> Self {
        Self {
            value: fragment.to_value(),
            strategy,
            failures,
        }
    }
}

/// Ordered repair stages
pub struct RepairCascade {
    stages: Vec<Box<dyn RepairStage>>,
}

impl Default for RepairCascade {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RepairCascade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepairCascade")
            .field("stages", &self.strategies())
            .finish()
    }
}

impl RepairCascade {
    /// Cascade with the five built-in structural stages
    #[must_use]
    pub fn new() -> Self {
        Self::with_stages(vec![
            Box::new(DirectParse),
            Box::new(StripAndExtract),
            Box::new(SyntaxFix),
            Box::new(TruncationRepair),
            Box::new(FirstComplete),
        ])
    }

    /// Cascade with custom stages, tried in the given order
    #[inline]
    #[must_use]
    pub fn with_stages(stages: Vec<Box<dyn RepairStage>>) -> Self {
        Self { stages }
    }

    /// Strategies in cascade order
    #[must_use]
    pub fn strategies(&self) -> Vec<RepairStrategy> {
        self.stages.iter().map(|s| s.strategy()).collect()
    }

    /// Run the structural stages only
    pub fn repair(&self, raw: &str) -> Result<Recovered, CascadeExhausted> {
        let mut failures = Vec::new();

        for stage in &self.stages {
            let strategy = stage.strategy();
            let outcome = stage.attempt(raw).and_then(|value| {
                let value = normalize(value);
                let errors = check_structure(&value);
                if errors.is_empty() {
                    Ok(value)
                } else {
                    Err(RepairError::Invalid {
                        stage: strategy,
                        errors,
                    })
                }
            });

            match outcome {
                Ok(value) => {
                    tracing::info!(%strategy, failed = failures.len(), "recovered fragment");
                    metrics::counter!("lexedit_repair_stage_total", "stage" => strategy.as_str())
                        .increment(1);
                    return Ok(Recovered {
                        value,
                        strategy,
                        failures,
                    });
                }
                Err(e) => {
                    tracing::warn!(%strategy, error = %e, "repair stage failed");
                    failures.push(e);
                }
            }
        }

        Err(CascadeExhausted { failures })
    }

    /// Run the structural stages, then fall back to a synthesized fragment
    ///
    /// Never fails: the worst outcome is the generic completion fragment.
    #[must_use]
    pub fn recover(&self, raw: &str, original: &StructuredNode) -> Recovered {
        match self.repair(raw) {
            Ok(recovered) => recovered,
            Err(exhausted) => self.fallback(raw, original, exhausted.failures),
        }
    }

    /// Build a fragment from a plain-text response
    #[must_use]
    pub fn fallback(
        &self,
        text: &str,
        original: &StructuredNode,
        failures: Vec<RepairError>,
    ) -> Recovered {
        let (fragment, strategy) = match usable_text(text) {
            Some(rewrite) => (text_fallback(original, &rewrite), RepairStrategy::TextOnly),
            None => (generic_fragment(), RepairStrategy::Generic),
        };
        tracing::info!(%strategy, "synthesized fragment from plain text");
        metrics::counter!("lexedit_repair_stage_total", "stage" => strategy.as_str()).increment(1);
        Recovered::synthesized(&fragment, strategy, failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting {
        strategy: RepairStrategy,
        calls: Arc<AtomicUsize>,
        result: Option<Value>,
    }

    impl RepairStage for Counting {
        fn strategy(&self) -> RepairStrategy {
            self.strategy
        }

        fn attempt(&self, _raw: &str) -> Result<Value, RepairError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .clone()
                .ok_or_else(|| RepairError::no_candidate(self.strategy, "scripted failure"))
        }
    }

    fn counting(strategy: RepairStrategy, result: Option<Value>) -> (Box<dyn RepairStage>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let stage = Counting {
            strategy,
            calls: Arc::clone(&calls),
            result,
        };
        (Box::new(stage), calls)
    }

    #[test]
    fn later_stages_not_invoked_after_success() {
        let (first, first_calls) = counting(RepairStrategy::Direct, None);
        let (second, second_calls) =
            counting(RepairStrategy::StripAndExtract, Some(json!([{"type": "paragraph"}])));
        let (third, third_calls) = counting(RepairStrategy::SyntaxFix, Some(json!({})));

        let cascade = RepairCascade::with_stages(vec![first, second, third]);
        let recovered = cascade.repair("anything").unwrap();

        assert_eq!(recovered.strategy, RepairStrategy::StripAndExtract);
        assert_eq!(recovered.failures.len(), 1);
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
        assert_eq!(third_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn invalid_structure_counts_as_failure() {
        let (bad, _) = counting(RepairStrategy::Direct, Some(json!({"type": "document-root", "children": [42]})));
        let (good, _) = counting(RepairStrategy::SyntaxFix, Some(json!({"children": []})));

        let recovered = RepairCascade::with_stages(vec![bad, good])
            .repair("x")
            .unwrap();
        assert_eq!(recovered.strategy, RepairStrategy::SyntaxFix);
        assert!(matches!(recovered.failures[0], RepairError::Invalid { .. }));
    }

    #[test]
    fn exhausted_when_every_stage_fails() {
        let err = RepairCascade::new().repair("no structure at all").unwrap_err();
        assert_eq!(err.failures.len(), 5);
    }

    #[test]
    fn default_order() {
        assert_eq!(
            RepairCascade::new().strategies(),
            vec![
                RepairStrategy::Direct,
                RepairStrategy::StripAndExtract,
                RepairStrategy::SyntaxFix,
                RepairStrategy::TruncationRepair,
                RepairStrategy::FirstComplete,
            ]
        );
    }

    #[test]
    fn strategy_names() {
        assert_eq!(RepairStrategy::TruncationRepair.to_string(), "truncation_repair");
        assert_eq!(
            serde_json::to_value(RepairStrategy::ErrorFragment).unwrap(),
            json!("error_fragment")
        );
        assert!(RepairStrategy::TextOnly.is_synthesized());
        assert!(!RepairStrategy::FirstComplete.is_synthesized());
    }
}
