use super::StepDefinition;
use crate::error::LoadError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;

/// Raw parameter values keyed by step id, then parameter name.
///
/// Insertion order is preserved so every analysis walks the same sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bindings {
    steps: IndexMap<String, IndexMap<String, Value>>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, step_id: &str, parameter: &str, value: Value) -> Self {
        self.insert(step_id, parameter, value);
        self
    }

    pub fn insert(&mut self, step_id: &str, parameter: &str, value: Value) {
        self.steps
            .entry(step_id.to_string())
            .or_default()
            .insert(parameter.to_string(), value);
    }

    pub fn get(&self, step_id: &str, parameter: &str) -> Option<&Value> {
        self.steps.get(step_id).and_then(|params| params.get(parameter))
    }

    pub fn for_step(&self, step_id: &str) -> Option<&IndexMap<String, Value>> {
        self.steps.get(step_id)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The value bound to `parameter`, falling back to the step's own definition.
    pub fn resolve<'a>(&'a self, step: &'a StepDefinition, parameter: &str) -> Option<&'a Value> {
        self.get(&step.id, parameter)
            .or_else(|| step.parameter(parameter).map(|p| &p.value))
    }

    /// Every `(name, value)` bound for a step: declared parameters first
    /// (overridden by bindings), then binding-only names in binding order.
    pub fn bound_values<'a>(&'a self, step: &'a StepDefinition) -> Vec<(&'a str, &'a Value)> {
        let overrides = self.for_step(&step.id);
        let mut values: Vec<(&str, &Value)> = step
            .parameters
            .iter()
            .map(|p| {
                let value = overrides
                    .and_then(|o| o.get(&p.name))
                    .unwrap_or(&p.value);
                (p.name.as_str(), value)
            })
            .collect();

        if let Some(overrides) = overrides {
            for (name, value) in overrides {
                if step.parameter(name).is_none() {
                    values.push((name.as_str(), value));
                }
            }
        }
        values
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        serde_json::from_str(json).map_err(|source| LoadError::Json {
            what: "bindings",
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
