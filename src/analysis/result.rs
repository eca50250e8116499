use super::connections::{Connection, TypeCompatibilityIssue};
use super::cycles::{CircularDependency, CycleSeverity};
use super::dependency::DependencyMap;
use super::params::{MissingParameter, UnknownStepType};
use super::unresolved::UnresolvedReference;
use crate::visual::VisualGraph;
use serde::Serialize;

/// Everything one `analyze` call found. A fresh snapshot per call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    #[serde(rename = "dependencies")]
    pub dependency_map: DependencyMap,
    pub connections: Vec<Connection>,
    pub circular_dependencies: Vec<CircularDependency>,
    pub unresolved_references: Vec<UnresolvedReference>,
    #[serde(rename = "typeCompatibilityIssues")]
    pub type_issues: Vec<TypeCompatibilityIssue>,
    #[serde(rename = "orphanedActions")]
    pub orphaned_steps: Vec<String>,
    pub missing_parameters: Vec<MissingParameter>,
    pub unknown_step_types: Vec<UnknownStepType>,
    pub execution_order: Vec<String>,
    /// Whether the graph's declared order hint equals `execution_order`;
    /// `None` when no hint was declared.
    pub hint_matches_order: Option<bool>,
    pub visualization: VisualGraph,
}

/// Finding counts for a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub steps: usize,
    pub connections: usize,
    pub cycle_warnings: usize,
    pub cycle_errors: usize,
    pub unresolved_references: usize,
    pub type_issues: usize,
    pub unconvertible_type_issues: usize,
    pub orphaned_steps: usize,
    pub missing_parameters: usize,
    pub unknown_step_types: usize,
    pub clusters: usize,
}

impl AnalysisReport {
    /// True when nothing blocks execution. Orphans and convertible type
    /// mismatches do not block; every other finding does.
    pub fn is_executable(&self) -> bool {
        self.circular_dependencies.is_empty()
            && self.unresolved_references.is_empty()
            && self.missing_parameters.is_empty()
            && self.unknown_step_types.is_empty()
            && self.type_issues.iter().all(|issue| issue.can_convert)
    }

    pub fn has_findings(&self) -> bool {
        !(self.circular_dependencies.is_empty()
            && self.unresolved_references.is_empty()
            && self.type_issues.is_empty()
            && self.orphaned_steps.is_empty()
            && self.missing_parameters.is_empty()
            && self.unknown_step_types.is_empty())
    }

    pub fn summary(&self) -> AnalysisSummary {
        let cycle_count = |severity| {
            self.circular_dependencies
                .iter()
                .filter(|c| c.severity == severity)
                .count()
        };
        AnalysisSummary {
            steps: self.dependency_map.len(),
            connections: self.connections.len(),
            cycle_warnings: cycle_count(CycleSeverity::Warning),
            cycle_errors: cycle_count(CycleSeverity::Error),
            unresolved_references: self.unresolved_references.len(),
            type_issues: self.type_issues.len(),
            unconvertible_type_issues: self.type_issues.iter().filter(|i| !i.can_convert).count(),
            orphaned_steps: self.orphaned_steps.len(),
            missing_parameters: self.missing_parameters.len(),
            unknown_step_types: self.unknown_step_types.len(),
            clusters: self.visualization.clusters.len(),
        }
    }

    /// Serializes the report as pretty JSON for UIs and tooling.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
