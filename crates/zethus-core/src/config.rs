//! Configuration document and its typed views.
//!
//! The document is kept as a JSON object so that keys this crate does not
//! know about (added by newer panels or by an embedding page) survive every
//! merge and round-trip through storage untouched.

use crate::constants::{DEFAULT_PATH_ALPHA, DEFAULT_PATH_COLOR, DEFAULT_ROS_ENDPOINT};
use crate::error::{kind_name, ConfigError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub const KEY_VISUALIZATIONS: &str = "visualizations";
pub const KEY_ROS: &str = "ros";
pub const KEY_ENDPOINT: &str = "endpoint";
pub const KEY_GLOBAL_OPTIONS: &str = "globalOptions";

/// Full serializable application state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration(Map<String, Value>);

impl Configuration {
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(m) => Ok(Self(m)),
            other => Err(ConfigError::NotAnObject(kind_name(&other))),
        }
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(s)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Raw visualization entries, in display order.
    pub fn visualizations(&self) -> &[Value] {
        match self.0.get(KEY_VISUALIZATIONS) {
            Some(Value::Array(a)) => a,
            _ => &[],
        }
    }

    /// Entry whose `key` equals `key`.
    pub fn visualization(&self, key: &str) -> Option<&Value> {
        self.visualizations().iter().find(|v| entry_key(v) == Some(key))
    }

    pub fn ros_endpoint(&self) -> Option<&str> {
        self.0
            .get(KEY_ROS)
            .and_then(|r| r.get(KEY_ENDPOINT))
            .and_then(Value::as_str)
    }

    pub fn ros(&self) -> Value {
        self.0
            .get(KEY_ROS)
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }

    pub fn global_options(&self) -> Value {
        self.0
            .get(KEY_GLOBAL_OPTIONS)
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }
}

impl TryFrom<Value> for Configuration {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

/// The `key` of a raw visualization entry.
#[inline]
pub fn entry_key(entry: &Value) -> Option<&str> {
    entry.get("key").and_then(Value::as_str)
}

/// An entry is shown unless its `visible` flag is literally `false`.
#[inline]
pub fn is_visible(entry: &Value) -> bool {
    !matches!(entry.get("visible"), Some(Value::Bool(false)))
}

/// Typed view of one visualization layer. Fields this crate does not model
/// are carried in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualizationEntry {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(rename = "type", default)]
    pub viz_type: String,
    #[serde(default)]
    pub options: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VisualizationEntry {
    pub fn new(viz_type: impl Into<String>) -> Self {
        Self {
            viz_type: viz_type.into(),
            ..Default::default()
        }
    }

    pub fn with_option(mut self, name: &str, value: Value) -> Self {
        self.options.insert(name.to_string(), value);
        self
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        Ok(Self::deserialize(value)?)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Defaults the visualization library applies to path layers.
pub fn default_path_options() -> Map<String, Value> {
    object(json!({ "color": DEFAULT_PATH_COLOR, "alpha": DEFAULT_PATH_ALPHA }))
}

/// Process-wide starting configuration. Every call returns a fresh copy.
pub fn default_configuration() -> Configuration {
    Configuration(object(json!({
        "panels": {
            "sidebar": { "display": true },
            "header": { "display": true },
            "info": { "display": false }
        },
        "ros": { "endpoint": DEFAULT_ROS_ENDPOINT },
        "infoTabs": [],
        "visualizations": [],
        "globalOptions": {
            "display": true,
            "backgroundColor": { "display": true, "value": "#000000" },
            "fixedFrame": { "display": true, "value": "world" },
            "grid": {
                "display": true,
                "size": 30,
                "divisions": 30,
                "color": "#222222",
                "centerlineColor": "#000000"
            },
            "axes": { "display": true, "size": 1 }
        },
        "tools": { "mode": "controls" }
    })))
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(m) => m,
        _ => Map::new(),
    }
}
