use thiserror::Error;

/// Errors that can occur while loading graphs, catalogs or bindings from JSON.
///
/// Analysis itself never fails; these only come from the loader helpers.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {what} JSON: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Conversion(#[from] GraphConversionError),
}

/// Errors that can occur when converting a custom user format into a Kensa `StepGraph`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphConversionError {
    #[error("Invalid custom data: {0}")]
    ValidationError(String),

    #[error("Step '{step_id}' is missing required field '{field}'")]
    MissingField { step_id: String, field: String },
}
