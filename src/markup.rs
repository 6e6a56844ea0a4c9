//! HTML for the sidebar, built from the configuration alone.
//!
//! Controls carry `data-*` attributes instead of per-element listeners so a
//! single delegated handler on the sidebar can route every event:
//! buttons have `data-action` and `data-id` (the visualization key), option
//! inputs have `data-viz` (the key) and `data-id` (the option field).

use crate::constants::{ACTION_ADD_PATH, ACTION_REMOVE, ACTION_TOGGLE, ROS_ENDPOINT_ID};
use serde_json::{Map, Value};
use std::fmt::Write;
use zethus_core::{entry_key, is_visible, panel_for, Configuration, FieldKind, OptionsPanel};

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub fn sidebar(config: &Configuration) -> String {
    let mut html = String::new();
    let endpoint = config.ros_endpoint().unwrap_or_default();
    let _ = write!(
        html,
        r#"<div class="option-row"><label for="{ROS_ENDPOINT_ID}">ROS endpoint</label><input type="text" id="{ROS_ENDPOINT_ID}" value="{}"></div>"#,
        escape(endpoint)
    );
    html.push_str(r#"<ul class="visualizations">"#);
    for entry in config.visualizations() {
        html.push_str(&visualization_row(entry));
    }
    html.push_str("</ul>");
    let _ = write!(
        html,
        r#"<button type="button" data-action="{ACTION_ADD_PATH}">Add path</button>"#
    );
    html
}

fn visualization_row(entry: &Value) -> String {
    let Some(key) = entry_key(entry) else {
        return String::new();
    };
    let key = escape(key);
    let viz_type = entry.get("type").and_then(Value::as_str).unwrap_or_default();
    let name = entry
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(viz_type);
    let visible = is_visible(entry);

    let mut html = String::new();
    let _ = write!(
        html,
        r#"<li class="visualization" data-visible="{}"><div class="viz-header"><span>{}</span><button type="button" data-action="{ACTION_TOGGLE}" data-id="{key}">{}</button><button type="button" data-action="{ACTION_REMOVE}" data-id="{key}">Remove</button></div>"#,
        if visible { "1" } else { "0" },
        escape(name),
        if visible { "Hide" } else { "Show" },
    );
    if let Some(panel) = panel_for(viz_type) {
        let options = entry
            .get("options")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        html.push_str(&option_rows(&key, panel, &options));
    }
    html.push_str("</li>");
    html
}

fn option_rows(key: &str, panel: &dyn OptionsPanel, options: &Map<String, Value>) -> String {
    let mut html = String::new();
    for view in panel.render(options) {
        let step = match view.field.kind {
            FieldKind::Number { step } => format!(r#" step="{step}""#),
            FieldKind::Color => String::new(),
        };
        let _ = write!(
            html,
            r#"<div class="option-row"><label>{label}</label><input type="{ty}" name="{name}" data-viz="{key}" data-id="{name}"{step} value="{value}"></div>"#,
            label = escape(view.field.label),
            ty = view.field.kind.input_type(),
            name = view.field.name,
            value = escape(&view.input_value()),
        );
    }
    html
}
