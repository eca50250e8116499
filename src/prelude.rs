//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the kensa crate.
//! Import this module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use kensa::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let graph = StepGraph::from_file("path/to/graph.json")?;
//! let catalog = Catalog::from_file("path/to/catalog.json")?;
//! let bindings = Bindings::from_file("path/to/bindings.json")?;
//!
//! let report = analyze(&graph, &catalog, &bindings);
//! println!("{}", ReportFormatter::format(&report));
//! # Ok(())
//! # }
//! ```

// Analysis entry points and results
pub use crate::analysis::{
    AnalysisConfig, AnalysisReport, AnalysisSummary, Analyzer, CircularDependency, Connection,
    CycleSeverity, DependencyMap, DependencyRecord, MissingParameter, TypeCompatibilityIssue,
    UnknownStepType, UnresolvedReason, UnresolvedReference, analyze,
};

// Inputs
pub use crate::catalog::{Catalog, OutputSchema, ParameterSchema, StepSchema};
pub use crate::graph::{
    Bindings, GraphMetadata, IntoStepGraph, ParameterDefinition, StepDefinition, StepGraph,
};

// References and types
pub use crate::reference::{ParameterValue, StepReference, parse_value};
pub use crate::types::{ConversionComplexity, ConversionLoss, ValueType};

// Presentation
pub use crate::report::ReportFormatter;
pub use crate::visual::VisualGraph;

// Error types
pub use crate::error::{GraphConversionError, LoadError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
