use super::dependency::{DependencyMap, ParameterDependency};
use crate::types::{
    ConversionComplexity, ConversionLoss, ValueType, conversion_complexity, conversion_loss,
    is_auto_fixable, suggest_transformation,
};
use serde::Serialize;

/// A resolved reference as a directed edge `source.output -> target.parameter`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub source_step_id: String,
    pub source_output: String,
    pub source_type: ValueType,
    pub target_step_id: String,
    pub target_parameter: String,
    pub target_type: ValueType,
    pub compatible: bool,
    /// Presentation weight in `0.0..=1.0`.
    pub strength: f64,
}

/// An edge whose producer and consumer types differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCompatibilityIssue {
    pub source_step_id: String,
    pub source_field: String,
    pub target_step_id: String,
    pub target_field: String,
    pub source_type: ValueType,
    pub target_type: ValueType,
    pub can_convert: bool,
    pub complexity: ConversionComplexity,
    pub auto_fix_available: bool,
    pub suggestion: Option<String>,
}

/// Materializes every parameter dependency as a connection, in graph order.
pub fn build_connections(map: &DependencyMap) -> Vec<Connection> {
    map.values()
        .flat_map(|record| {
            record.parameter_dependencies.iter().map(move |dep| Connection {
                id: format!(
                    "{}.{}->{}.{}",
                    dep.source_step_id, dep.source_output, record.step_id, dep.parameter_name
                ),
                source_step_id: dep.source_step_id.clone(),
                source_output: dep.source_output.clone(),
                source_type: dep.source_type.clone(),
                target_step_id: record.step_id.clone(),
                target_parameter: dep.parameter_name.clone(),
                target_type: dep.parameter_type.clone(),
                compatible: dep.compatible,
                strength: connection_strength(dep),
            })
        })
        .collect()
}

/// One issue per incompatible parameter dependency.
pub fn find_type_issues(map: &DependencyMap) -> Vec<TypeCompatibilityIssue> {
    map.values()
        .flat_map(|record| {
            record
                .parameter_dependencies
                .iter()
                .filter(|dep| !dep.compatible)
                .map(move |dep| TypeCompatibilityIssue {
                    source_step_id: dep.source_step_id.clone(),
                    source_field: dep.source_output.clone(),
                    target_step_id: record.step_id.clone(),
                    target_field: dep.parameter_name.clone(),
                    source_type: dep.source_type.clone(),
                    target_type: dep.parameter_type.clone(),
                    can_convert: dep.conversion_needed,
                    complexity: conversion_complexity(&dep.source_type, &dep.parameter_type),
                    auto_fix_available: is_auto_fixable(&dep.source_type, &dep.parameter_type),
                    suggestion: suggest_transformation(&dep.source_type, &dep.parameter_type),
                })
        })
        .collect()
}

/// Scores how cleanly data flows across a dependency.
///
/// Optional parameters are weighted down slightly so required wiring stands out.
pub fn connection_strength(dep: &ParameterDependency) -> f64 {
    let base = if dep.compatible {
        1.0
    } else {
        match conversion_loss(&dep.source_type, &dep.parameter_type) {
            None => 0.0,
            Some(loss) => match (
                conversion_complexity(&dep.source_type, &dep.parameter_type),
                loss,
            ) {
                (ConversionComplexity::Simple, ConversionLoss::Lossless) => 0.8,
                (ConversionComplexity::Simple, ConversionLoss::Lossy) => 0.6,
                (ConversionComplexity::Moderate, _) => 0.4,
                (ConversionComplexity::Complex, _) => 0.25,
            },
        }
    };
    if dep.required { base } else { base * 0.9 }
}
