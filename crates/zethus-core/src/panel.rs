//! Option editor panels.
//!
//! A panel is a pure projection: it turns the (possibly partial) options of
//! one visualization into a list of pre-filled controls, and turns a control
//! change into a one-field patch. It keeps no state of its own.

use crate::config::default_path_options;
use crate::constants::PATH_ALPHA_STEP;
use serde_json::{Map, Number, Value};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldKind {
    Color,
    Number { step: f64 },
}

impl FieldKind {
    /// HTML `type` attribute of the input rendering this field.
    pub fn input_type(&self) -> &'static str {
        match self {
            FieldKind::Color => "color",
            FieldKind::Number { .. } => "number",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OptionField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

/// One rendered control: the field plus the value it is pre-filled with.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldView {
    pub field: OptionField,
    pub value: Value,
}

impl FieldView {
    /// Value as the string an `<input>` element holds.
    pub fn input_value(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

pub trait OptionsPanel {
    fn fields(&self) -> &'static [OptionField];
    fn defaults(&self) -> Map<String, Value>;

    /// Controls pre-filled with `{...defaults, ...current}`.
    fn render(&self, current: &Map<String, Value>) -> Vec<FieldView> {
        let mut merged = self.defaults();
        for (k, v) in current {
            merged.insert(k.clone(), v.clone());
        }
        self.fields()
            .iter()
            .map(|f| FieldView {
                field: *f,
                value: merged.get(f.name).cloned().unwrap_or(Value::Null),
            })
            .collect()
    }

    /// Patch `{field: value}` for a raw input change, or `None` when the
    /// field is not one of this panel's.
    ///
    /// Numeric text that parses is relayed as a number; anything else is
    /// relayed verbatim, with no range checks.
    fn change(&self, field: &str, raw: &str) -> Option<Map<String, Value>> {
        let f = self.fields().iter().find(|f| f.name == field)?;
        let value = match f.kind {
            FieldKind::Number { .. } => raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(raw.to_string())),
            FieldKind::Color => Value::String(raw.to_string()),
        };
        let mut patch = Map::new();
        patch.insert(f.name.to_string(), value);
        Some(patch)
    }
}

const PATH_FIELDS: &[OptionField] = &[
    OptionField {
        name: "color",
        label: "Color",
        kind: FieldKind::Color,
    },
    OptionField {
        name: "alpha",
        label: "Alpha",
        kind: FieldKind::Number {
            step: PATH_ALPHA_STEP,
        },
    },
];

/// Color and alpha of a path layer.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathOptionsPanel;

impl OptionsPanel for PathOptionsPanel {
    fn fields(&self) -> &'static [OptionField] {
        PATH_FIELDS
    }

    fn defaults(&self) -> Map<String, Value> {
        default_path_options()
    }
}

/// Panel editing visualizations of `viz_type`, if there is one.
pub fn panel_for(viz_type: &str) -> Option<&'static dyn OptionsPanel> {
    match viz_type {
        "Path" | "nav_msgs/Path" => Some(&PathOptionsPanel),
        _ => None,
    }
}
