use crate::catalog::Catalog;
use crate::graph::{Bindings, StepGraph};
use crate::types::ValueType;
use serde::Serialize;

/// A required schema parameter with nothing bound to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingParameter {
    pub step_id: String,
    pub parameter_name: String,
    pub parameter_type: ValueType,
}

/// A step whose type tag has no catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnknownStepType {
    pub step_id: String,
    pub step_type: String,
}

pub fn find_missing_parameters(
    graph: &StepGraph,
    catalog: &Catalog,
    bindings: &Bindings,
) -> Vec<MissingParameter> {
    graph
        .unique_steps()
        .filter_map(|step| catalog.get(&step.step_type).map(|schema| (step, schema)))
        .flat_map(|(step, schema)| {
            schema
                .parameters
                .iter()
                .filter(|p| p.required)
                .filter(move |p| bindings.resolve(step, &p.name).is_none_or(|v| v.is_null()))
                .map(move |p| MissingParameter {
                    step_id: step.id.clone(),
                    parameter_name: p.name.clone(),
                    parameter_type: p.value_type.clone(),
                })
        })
        .collect()
}

pub fn find_unknown_step_types(graph: &StepGraph, catalog: &Catalog) -> Vec<UnknownStepType> {
    graph
        .unique_steps()
        .filter(|step| !catalog.contains(&step.step_type))
        .map(|step| UnknownStepType {
            step_id: step.id.clone(),
            step_type: step.step_type.clone(),
        })
        .collect()
}
