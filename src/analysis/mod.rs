//! The data-flow and dependency analysis engine.
//!
//! [`analyze`] builds the dependency map once and hands it to every detector.
//! All detectors are pure functions and are also exported individually.

pub mod connections;
pub mod cycles;
pub mod dependency;
pub mod order;
pub mod orphans;
pub mod params;
pub mod result;
pub mod unresolved;

pub use connections::{Connection, TypeCompatibilityIssue, build_connections, find_type_issues};
pub use cycles::{CircularDependency, CycleSeverity, detect, detect_with_threshold};
pub use dependency::{
    DependencyMap, DependencyRecord, OutputConsumer, OutputDependents, ParameterDependency, build,
};
pub use order::execution_order;
pub use orphans::find_orphans;
pub use params::{MissingParameter, UnknownStepType, find_missing_parameters, find_unknown_step_types};
pub use result::{AnalysisReport, AnalysisSummary};
pub use unresolved::{UnresolvedReason, UnresolvedReference, find_unresolved};

use crate::catalog::Catalog;
use crate::error::LoadError;
use crate::graph::{Bindings, StepGraph};
use crate::visual::build_visual_graph;
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::debug;

/// Tunables for an analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Cycles with at most this many steps are warnings, longer ones errors.
    pub warning_cycle_max_len: usize,
    /// Treat dependency-free steps as roots when the graph declares none.
    pub infer_roots: bool,
    /// Edit distance under which a missing name gets a "did you mean" hint.
    pub max_spelling_distance: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            warning_cycle_max_len: cycles::DEFAULT_WARNING_CYCLE_LEN,
            infer_roots: true,
            max_spelling_distance: 2,
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        serde_json::from_str(json).map_err(|source| LoadError::Json {
            what: "analysis config",
            source,
        })
    }

    pub fn from_file(path: &str) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }
}

/// Runs the full analysis. Holds only configuration, so one analyzer can
/// serve any number of concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

pub struct AnalyzerBuilder {
    config: AnalysisConfig,
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }
    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }
    pub fn with_warning_cycle_max_len(mut self, len: usize) -> Self {
        self.config.warning_cycle_max_len = len;
        self
    }
    pub fn with_root_inference(mut self, enabled: bool) -> Self {
        self.config.infer_roots = enabled;
        self
    }
    pub fn with_max_spelling_distance(mut self, distance: usize) -> Self {
        self.config.max_spelling_distance = distance;
        self
    }
    pub fn build(self) -> Analyzer {
        Analyzer {
            config: self.config,
        }
    }
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyzes a step graph against a catalog and its parameter bindings.
    ///
    /// Never fails: every structural problem is returned as a finding so a
    /// caller can report all of them in one pass. Inputs are only borrowed.
    pub fn analyze(
        &self,
        graph: &StepGraph,
        catalog: &Catalog,
        bindings: &Bindings,
    ) -> AnalysisReport {
        debug!(
            steps = graph.steps.len(),
            step_types = catalog.len(),
            "starting dependency analysis"
        );

        let dependency_map = dependency::build(graph, catalog, bindings);
        let connections = build_connections(&dependency_map);
        let type_issues = find_type_issues(&dependency_map);
        let circular_dependencies =
            detect_with_threshold(&dependency_map, self.config.warning_cycle_max_len);
        let orphaned_steps = find_orphans(graph, &dependency_map, self.config.infer_roots);
        let unresolved_references =
            find_unresolved(graph, catalog, bindings, self.config.max_spelling_distance);
        let missing_parameters = find_missing_parameters(graph, catalog, bindings);
        let unknown_step_types = find_unknown_step_types(graph, catalog);
        let execution_order = execution_order(graph, &dependency_map);
        let hint_matches_order = order::hint_matches(graph, &execution_order);
        let visualization = build_visual_graph(graph, catalog, &connections);

        debug!(
            connections = connections.len(),
            cycles = circular_dependencies.len(),
            unresolved = unresolved_references.len(),
            type_issues = type_issues.len(),
            orphans = orphaned_steps.len(),
            "dependency analysis finished"
        );

        AnalysisReport {
            dependency_map,
            connections,
            circular_dependencies,
            unresolved_references,
            type_issues,
            orphaned_steps,
            missing_parameters,
            unknown_step_types,
            execution_order,
            hint_matches_order,
            visualization,
        }
    }
}

/// Analyzes with the default configuration.
pub fn analyze(graph: &StepGraph, catalog: &Catalog, bindings: &Bindings) -> AnalysisReport {
    Analyzer::default().analyze(graph, catalog, bindings)
}
