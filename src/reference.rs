//! Parses raw parameter values into literals or cross-step references.
//!
//! A value is a reference iff it is a JSON string containing a `.` whose
//! prefix before the first dot is an identifier (`[A-Za-z][A-Za-z0-9_-]*`).
//! Everything after the first dot is the output name, verbatim: `a.b.c`
//! points at output `b.c` of step `a`.

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

static STEP_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("valid identifier regex"));

/// Strings that look like `<segment>.<rest>` with identifier-ish characters.
static REFERENCE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]*\.\S*$").expect("valid shape regex"));

/// A pointer at one output of another step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReference {
    pub source_step_id: String,
    pub output_name: String,
}

impl fmt::Display for StepReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.source_step_id, self.output_name)
    }
}

/// A parameter's raw value after parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue<'a> {
    Literal(&'a Value),
    Reference(StepReference),
}

impl ParameterValue<'_> {
    pub fn as_reference(&self) -> Option<&StepReference> {
        match self {
            ParameterValue::Reference(reference) => Some(reference),
            ParameterValue::Literal(_) => None,
        }
    }
}

/// Parses a raw value. Never fails; anything that is not a reference is a literal.
pub fn parse_value(raw: &Value) -> ParameterValue<'_> {
    match raw.as_str().and_then(parse_reference) {
        Some(reference) => ParameterValue::Reference(reference),
        None => ParameterValue::Literal(raw),
    }
}

/// Parses a string as a reference, `None` for literals.
pub fn parse_reference(raw: &str) -> Option<StepReference> {
    let (step, output) = raw.split_once('.')?;
    if !STEP_IDENTIFIER.is_match(step) {
        return None;
    }
    Some(StepReference {
        source_step_id: step.to_string(),
        output_name: output.to_string(),
    })
}

/// Returns the string when a value looks like a reference but cannot be one.
///
/// Covers prefixes that break the identifier rule (`1step.out`, `.out`) and
/// references with an empty output name (`step.`). Numbers and dotted
/// version strings such as `1.2.3` stay literals.
pub fn malformed_reference(raw: &Value) -> Option<&str> {
    let text = raw.as_str()?;
    if let Some(reference) = parse_reference(text) {
        return reference.output_name.is_empty().then_some(text);
    }
    if !REFERENCE_SHAPE.is_match(text) || text.parse::<f64>().is_ok() {
        return None;
    }
    let prefix = text.split('.').next().unwrap_or_default();
    if !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(text)
}
