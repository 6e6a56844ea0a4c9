use thiserror::Error;

/// Failures surfaced by the configuration store and its collaborators.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid option path `{0}`")]
    InvalidPath(String),
    #[error("configuration must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("storage unavailable: {0}")]
    Storage(String),
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

pub(crate) fn kind_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
