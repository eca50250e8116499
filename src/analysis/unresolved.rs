use crate::catalog::Catalog;
use crate::graph::{Bindings, StepDefinition, StepGraph};
use crate::reference::{malformed_reference, parse_reference, parse_value};
use ahash::AHashMap;
use itertools::Itertools;
use serde::Serialize;
use std::fmt;

const REFERENCE_FORMAT_HINT: &str =
    "Use the form '<stepId>.<outputName>', where the step id starts with a letter";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UnresolvedReason {
    MissingStep,
    MissingOutput,
    InvalidFormat,
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedReason::MissingStep => write!(f, "referenced step does not exist"),
            UnresolvedReason::MissingOutput => write!(f, "referenced output does not exist"),
            UnresolvedReason::InvalidFormat => write!(f, "invalid reference format"),
        }
    }
}

/// A parameter whose reference cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedReference {
    pub step_id: String,
    pub parameter_name: String,
    pub raw_value: String,
    #[serde(rename = "referencedAction")]
    pub referenced_step: Option<String>,
    pub referenced_output: Option<String>,
    pub reason: UnresolvedReason,
    pub suggestions: Vec<String>,
}

/// Flags references to missing steps, missing outputs, and malformed reference strings.
///
/// Every bound value of every step is checked, including bindings for
/// parameters the schema does not declare. References into a step whose
/// type is unknown are left alone since its outputs cannot be known.
pub fn find_unresolved(
    graph: &StepGraph,
    catalog: &Catalog,
    bindings: &Bindings,
    max_distance: usize,
) -> Vec<UnresolvedReference> {
    let steps_by_id: AHashMap<&str, &StepDefinition> =
        graph.unique_steps().map(|s| (s.id.as_str(), s)).collect();
    // Graph order keeps spelling suggestions stable when candidates tie.
    let step_ids: Vec<&str> = graph.unique_steps().map(|s| s.id.as_str()).collect();
    let mut unresolved = Vec::new();

    for step in graph.unique_steps() {
        for (parameter, raw) in bindings.bound_values(step) {
            if let Some(text) = malformed_reference(raw) {
                let partial = parse_reference(text);
                unresolved.push(UnresolvedReference {
                    step_id: step.id.clone(),
                    parameter_name: parameter.to_string(),
                    raw_value: text.to_string(),
                    referenced_step: partial.as_ref().map(|r| r.source_step_id.clone()),
                    referenced_output: None,
                    reason: UnresolvedReason::InvalidFormat,
                    suggestions: vec![REFERENCE_FORMAT_HINT.to_string()],
                });
                continue;
            }

            let Some(reference) = parse_value(raw).as_reference().cloned() else {
                continue;
            };
            let raw_value = reference.to_string();

            let Some(&source) = steps_by_id.get(reference.source_step_id.as_str()) else {
                let mut suggestions = Vec::new();
                if let Some(closest) =
                    closest_match(&reference.source_step_id, step_ids.iter().copied(), max_distance)
                {
                    suggestions.push(format!("Did you mean '{}'?", closest));
                }
                suggestions.push(format!(
                    "Check the spelling of '{}' or add a step with that id",
                    reference.source_step_id
                ));
                unresolved.push(UnresolvedReference {
                    step_id: step.id.clone(),
                    parameter_name: parameter.to_string(),
                    raw_value,
                    referenced_step: Some(reference.source_step_id),
                    referenced_output: Some(reference.output_name),
                    reason: UnresolvedReason::MissingStep,
                    suggestions,
                });
                continue;
            };

            let Some(schema) = catalog.get(&source.step_type) else {
                continue;
            };
            if schema.output(&reference.output_name).is_some() {
                continue;
            }

            let mut suggestions = Vec::new();
            if let Some(closest) =
                closest_match(&reference.output_name, schema.output_names(), max_distance)
            {
                suggestions.push(format!("Did you mean '{}'?", closest));
            }
            if schema.outputs.is_empty() {
                suggestions.push(format!("Step '{}' declares no outputs", source.id));
            } else {
                suggestions.push(format!(
                    "Available outputs of '{}': {}",
                    source.id,
                    schema.output_names().join(", ")
                ));
            }
            unresolved.push(UnresolvedReference {
                step_id: step.id.clone(),
                parameter_name: parameter.to_string(),
                raw_value,
                referenced_step: Some(reference.source_step_id),
                referenced_output: Some(reference.output_name),
                reason: UnresolvedReason::MissingOutput,
                suggestions,
            });
        }
    }

    unresolved
}

/// Closest candidate by edit distance, if it is close enough to be a likely typo.
///
/// Longer names tolerate up to a third of their length in edits.
pub fn closest_match<'a, I>(target: &str, candidates: I, max_distance: usize) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let allowed = max_distance.max(target.chars().count() / 3);
    candidates
        .into_iter()
        .map(|candidate| (levenshtein(target, candidate), candidate))
        .filter(|(distance, candidate)| *candidate != target && *distance <= allowed)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}

/// Case-insensitive Levenshtein distance.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}
