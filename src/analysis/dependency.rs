use crate::catalog::Catalog;
use crate::graph::{Bindings, StepDefinition, StepGraph};
use crate::reference::{StepReference, parse_value};
use crate::types::{ValueType, are_compatible, can_convert, suggest_transformation};
use ahash::AHashMap;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::trace;

/// Resolved dependency records keyed by step id, in graph order.
pub type DependencyMap = IndexMap<String, DependencyRecord>;

/// Everything known about how one step consumes and produces data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyRecord {
    pub step_id: String,
    pub step_type: String,
    /// Steps this one reads from, deduplicated, in first-reference order.
    pub depends_on: Vec<String>,
    /// Every declared output as `stepId.outputName`.
    pub provides: Vec<String>,
    pub parameter_dependencies: Vec<ParameterDependency>,
    /// Only outputs with at least one consumer.
    pub output_dependents: Vec<OutputDependents>,
}

/// A schema parameter bound to a resolved reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDependency {
    pub parameter_name: String,
    pub parameter_type: ValueType,
    pub required: bool,
    pub source_step_id: String,
    pub source_output: String,
    pub source_type: ValueType,
    pub compatible: bool,
    pub conversion_needed: bool,
    pub suggestion: Option<String>,
}

/// Consumers of one output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputDependents {
    pub output_name: String,
    pub output_type: ValueType,
    pub consumers: Vec<OutputConsumer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConsumer {
    pub step_id: String,
    pub parameter_name: String,
    pub types_match: bool,
}

impl DependencyRecord {
    pub fn depends_on(&self, step_id: &str) -> bool {
        self.depends_on.iter().any(|d| d == step_id)
    }
}

/// Builds the dependency map for a graph.
///
/// References whose source step or output cannot be found add no edge; they
/// are reported by the unresolved reference detector instead. Steps with an
/// unknown type get an empty record.
pub fn build(graph: &StepGraph, catalog: &Catalog, bindings: &Bindings) -> DependencyMap {
    let steps_by_id: AHashMap<&str, &StepDefinition> =
        graph.unique_steps().map(|s| (s.id.as_str(), s)).collect();

    let mut map = DependencyMap::new();
    let mut consumers: AHashMap<(String, String), Vec<OutputConsumer>> = AHashMap::new();

    for step in graph.unique_steps() {
        let mut record = DependencyRecord {
            step_id: step.id.clone(),
            step_type: step.step_type.clone(),
            ..Default::default()
        };

        let Some(schema) = catalog.get(&step.step_type) else {
            trace!(step = %step.id, step_type = %step.step_type, "skipping step with unknown type");
            map.insert(step.id.clone(), record);
            continue;
        };

        record.provides = schema
            .outputs
            .iter()
            .map(|o| format!("{}.{}", step.id, o.name))
            .collect();

        for param in &schema.parameters {
            let Some(raw) = bindings.resolve(step, &param.name) else {
                continue;
            };
            let Some(reference) = parse_value(raw).as_reference().cloned() else {
                continue;
            };
            let Some(source_type) = resolve_output_type(&steps_by_id, catalog, &reference) else {
                continue;
            };

            let compatible = are_compatible(source_type, &param.value_type);
            let convertible = !compatible && can_convert(source_type, &param.value_type);
            trace!(
                step = %step.id,
                parameter = %param.name,
                source = %reference,
                compatible,
                "resolved parameter dependency"
            );

            consumers
                .entry((reference.source_step_id.clone(), reference.output_name.clone()))
                .or_default()
                .push(OutputConsumer {
                    step_id: step.id.clone(),
                    parameter_name: param.name.clone(),
                    types_match: compatible,
                });

            if reference.source_step_id != step.id && !record.depends_on(&reference.source_step_id)
            {
                record.depends_on.push(reference.source_step_id.clone());
            }

            record.parameter_dependencies.push(ParameterDependency {
                parameter_name: param.name.clone(),
                parameter_type: param.value_type.clone(),
                required: param.required,
                suggestion: if convertible {
                    suggest_transformation(source_type, &param.value_type)
                } else {
                    None
                },
                source_step_id: reference.source_step_id,
                source_output: reference.output_name,
                source_type: source_type.clone(),
                compatible,
                conversion_needed: convertible,
            });
        }

        map.insert(step.id.clone(), record);
    }

    for record in map.values_mut() {
        let Some(schema) = steps_by_id
            .get(record.step_id.as_str())
            .and_then(|s| catalog.get(&s.step_type))
        else {
            continue;
        };
        for output in &schema.outputs {
            if let Some(list) = consumers.remove(&(record.step_id.clone(), output.name.clone())) {
                record.output_dependents.push(OutputDependents {
                    output_name: output.name.clone(),
                    output_type: output.value_type.clone(),
                    consumers: list,
                });
            }
        }
    }

    map
}

/// Looks up the declared type of the output a reference points at.
fn resolve_output_type<'a>(
    steps_by_id: &AHashMap<&str, &StepDefinition>,
    catalog: &'a Catalog,
    reference: &StepReference,
) -> Option<&'a ValueType> {
    let source = steps_by_id.get(reference.source_step_id.as_str())?;
    let schema = catalog.get(&source.step_type)?;
    schema
        .output(&reference.output_name)
        .map(|output| &output.value_type)
}
