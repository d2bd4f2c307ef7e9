//! Structural repair stages
//!
//! Each stage is a pure `text -> Value` function over the raw model output.
//! Stages do not normalize or validate; the cascade does that for every
//! value a stage returns.

use crate::cascade::RepairStrategy;
use crate::error::RepairError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

mod direct;
mod first_complete;
mod strip;
mod syntax_fix;
mod truncation;

pub use direct::DirectParse;
pub use first_complete::FirstComplete;
pub use strip::StripAndExtract;
pub use syntax_fix::SyntaxFix;
pub use truncation::TruncationRepair;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[A-Za-z0-9_-]*").expect("fence regex"));

static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n(?:[ \t]*\n)+").expect("blank line regex"));

/// Remove code fences and collapse runs of blank lines
pub(crate) fn strip_markdown(raw: &str) -> String {
    let unfenced = CODE_FENCE.replace_all(raw, "");
    BLANK_LINES.replace_all(&unfenced, "\n").trim().to_string()
}

/// Greedy span from the first opener to the last matching closer kind
///
/// Whichever of `{` and `[` appears first decides the kind.
pub(crate) fn greedy_span(text: &str) -> Option<&str> {
    let (open, close) = match (text.find('{'), text.find('[')) {
        (Some(b), Some(a)) if a < b => ('[', ']'),
        (Some(_), _) => ('{', '}'),
        (None, Some(_)) => ('[', ']'),
        (None, None) => return None,
    };
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Text from the first opener to the end
pub(crate) fn from_first_opener(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    Some(text[start..].trim_end())
}

/// Parse `text` as JSON, tagging failures with `stage`
pub(crate) fn parse(stage: RepairStrategy, text: &str) -> Result<Value, RepairError> {
    serde_json::from_str(text).map_err(|e| RepairError::parse(stage, &e))
}
