use crate::error::LoadError;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::fs;

/// The complete step graph handed to the analyzer.
/// This is the target structure for any custom data model conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepGraph {
    pub steps: Vec<StepDefinition>,
    /// Declared execution order; a hint only, never trusted.
    #[serde(default)]
    pub execution_order: Vec<String>,
    #[serde(default)]
    pub root_steps: Vec<String>,
    #[serde(default)]
    pub metadata: GraphMetadata,
}

/// Summary counts carried alongside a graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetadata {
    #[serde(default)]
    pub step_count: usize,
    #[serde(default)]
    pub connection_count: usize,
}

/// A single unit of configured work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDefinition {
    pub id: String,
    pub step_type: String,
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
    /// Declared successors. May disagree with the parameter references.
    #[serde(default)]
    pub next_steps: Vec<String>,
    /// Layout data for the editor, opaque to analysis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<serde_json::Value>,
}

/// A parameter bound on a step: name, declared type tag and raw value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDefinition {
    pub name: String,
    #[serde(rename = "type", default)]
    pub value_type: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl StepGraph {
    pub fn new(steps: Vec<StepDefinition>) -> Self {
        let step_count = steps.len();
        Self {
            steps,
            execution_order: Vec::new(),
            root_steps: Vec::new(),
            metadata: GraphMetadata {
                step_count,
                connection_count: 0,
            },
        }
    }

    pub fn with_roots<I, S>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.root_steps = roots.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_execution_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.execution_order = order.into_iter().map(Into::into).collect();
        self
    }

    pub fn step(&self, id: &str) -> Option<&StepDefinition> {
        self.steps.iter().find(|s| s.id == id)
    }

    pub fn step_ids(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.id.as_str())
    }

    /// Steps in declaration order, keeping only the first step for each id.
    ///
    /// Duplicate ids are a structural error reported elsewhere; analysis
    /// simply ignores the later copies.
    pub fn unique_steps(&self) -> impl Iterator<Item = &StepDefinition> {
        let mut seen = AHashSet::new();
        self.steps.iter().filter(move |step| {
            let step: &StepDefinition = *step;
            seen.insert(step.id.as_str())
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        serde_json::from_str(json).map_err(|source| LoadError::Json {
            what: "step graph",
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

impl StepDefinition {
    pub fn new(id: &str, step_type: &str) -> Self {
        Self {
            id: id.to_string(),
            step_type: step_type.to_string(),
            parameters: Vec::new(),
            next_steps: Vec::new(),
            position: None,
        }
    }

    pub fn with_parameter(mut self, name: &str, value_type: &str, value: serde_json::Value) -> Self {
        self.parameters.push(ParameterDefinition {
            name: name.to_string(),
            value_type: value_type.to_string(),
            value,
        });
        self
    }

    pub fn with_next(mut self, next: &str) -> Self {
        self.next_steps.push(next.to_string());
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterDefinition> {
        self.parameters.iter().find(|p| p.name == name)
    }
}
