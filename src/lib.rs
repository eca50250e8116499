//! # Kensa - Step Graph Dependency Analysis
//!
//! **Kensa** answers one question about a workflow assembled from abstract
//! steps: *is this graph executable?* Each step is configured with
//! parameters whose values are either literals or references to another
//! step's output (`"fetchPrice.amountOut"`). Given the graph, a catalog of
//! step schemas, and the parameter bindings, Kensa produces a verified plan:
//! resolved dependencies, detected cycles, type compatibility across every
//! reference, unreachable steps, a deterministic execution order, and a
//! presentation graph for UIs.
//!
//! ## Core Workflow
//!
//! 1.  **Load Your Data**: Parse your workflow format into your own Rust structs.
//! 2.  **Convert to Kensa's Model**: Implement [`graph::IntoStepGraph`] to translate them into a [`graph::StepGraph`].
//! 3.  **Describe Step Types**: Fill a [`catalog::Catalog`] with the parameter and output schemas of each step type.
//! 4.  **Analyze**: Call [`analysis::analyze`] (or configure an [`analysis::Analyzer`]) and branch on the findings in the returned [`analysis::AnalysisReport`].
//!
//! Analysis never fails and never mutates its inputs. Structural problems are
//! data in the report, so all of them can be shown in one pass.
//!
//! ## Quick Start
//!
//! ```rust
//! use kensa::prelude::*;
//! use serde_json::json;
//!
//! let catalog = Catalog::new()
//!     .with_step_type("quote", StepSchema::new().with_output("amountOut", "Decimal"))
//!     .with_step_type("swap", StepSchema::new().with_parameter("amount", "Decimal", true));
//!
//! let graph = StepGraph::new(vec![
//!     StepDefinition::new("step1", "quote"),
//!     StepDefinition::new("step2", "swap"),
//! ]);
//! let bindings = Bindings::new().bind("step2", "amount", json!("step1.amountOut"));
//!
//! let report = analyze(&graph, &catalog, &bindings);
//!
//! assert!(report.is_executable());
//! assert_eq!(report.connections.len(), 1);
//! assert_eq!(report.execution_order, vec!["step1", "step2"]);
//! println!("{}", ReportFormatter::format(&report));
//! ```

pub mod analysis;
pub mod catalog;
pub mod error;
pub mod graph;
#[cfg(feature = "logging")]
pub mod logging;
pub mod prelude;
pub mod reference;
pub mod report;
pub mod types;
pub mod visual;
