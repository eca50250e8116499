use super::definition::StepGraph;
use crate::error::GraphConversionError;

/// A trait for custom workflow formats that can be converted into a Kensa `StepGraph`.
///
/// This is the extension point for feeding the analyzer from any editor or
/// configuration format. Implement it on your own structs to translate them
/// into the canonical graph before calling [`crate::analysis::analyze`].
///
/// # Example
///
/// ```rust,no_run
/// use kensa::prelude::*;
/// use kensa::error::GraphConversionError;
///
/// // 1. Define your custom structs for parsing your format.
/// struct MyTask { name: String, kind: String }
/// struct MyPipeline { tasks: Vec<MyTask> }
///
/// // 2. Implement `IntoStepGraph` for your top-level struct.
/// impl IntoStepGraph for MyPipeline {
///     fn into_step_graph(self) -> std::result::Result<StepGraph, GraphConversionError> {
///         let steps = self
///             .tasks
///             .into_iter()
///             .map(|task| StepDefinition::new(&task.name, &task.kind))
///             .collect();
///         Ok(StepGraph::new(steps))
///     }
/// }
/// ```
pub trait IntoStepGraph {
    /// Consumes the object and converts it into an analyzable step graph.
    fn into_step_graph(self) -> Result<StepGraph, GraphConversionError>;
}

impl IntoStepGraph for StepGraph {
    fn into_step_graph(self) -> Result<StepGraph, GraphConversionError> {
        Ok(self)
    }
}
