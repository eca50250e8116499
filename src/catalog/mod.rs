use crate::error::LoadError;
use crate::types::ValueType;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;

/// Declared input slot of a step type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default)]
    pub required: bool,
}

/// Declared output of a step type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
}

/// Schema of one step type: ordered parameters and ordered outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSchema {
    #[serde(default)]
    pub parameters: Vec<ParameterSchema>,
    #[serde(default)]
    pub outputs: Vec<OutputSchema>,
}

impl StepSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameter(mut self, name: &str, value_type: &str, required: bool) -> Self {
        self.parameters.push(ParameterSchema {
            name: name.to_string(),
            value_type: ValueType::parse(value_type),
            required,
        });
        self
    }

    pub fn with_output(mut self, name: &str, value_type: &str) -> Self {
        self.outputs.push(OutputSchema {
            name: name.to_string(),
            value_type: ValueType::parse(value_type),
        });
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterSchema> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn output(&self, name: &str) -> Option<&OutputSchema> {
        self.outputs.iter().find(|o| o.name == name)
    }

    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.outputs.iter().map(|o| o.name.as_str())
    }
}

/// Read-only registry mapping step-type tags to their schemas.
///
/// The catalog is supplied on every analysis call and never cached.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: AHashMap<String, StepSchema>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step_type(mut self, step_type: &str, schema: StepSchema) -> Self {
        self.insert(step_type, schema);
        self
    }

    pub fn insert(&mut self, step_type: &str, schema: StepSchema) {
        self.entries.insert(step_type.to_string(), schema);
    }

    pub fn get(&self, step_type: &str) -> Option<&StepSchema> {
        self.entries.get(step_type)
    }

    pub fn contains(&self, step_type: &str) -> bool {
        self.entries.contains_key(step_type)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StepSchema)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Parses a catalog from a JSON object keyed by step type.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        serde_json::from_str(json).map_err(|source| LoadError::Json {
            what: "catalog",
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

impl FromIterator<(String, StepSchema)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, StepSchema)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
