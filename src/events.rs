use crate::app::App;
use crate::constants::{
    ACTION_ADD_PATH, ACTION_REMOVE, ACTION_TOGGLE, ERROR_RESET_ID, PATH_VIZ_TYPE, ROS_ENDPOINT_ID,
    SIDEBAR_ID,
};
use crate::dom;
use serde_json::{json, Map, Value};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;
use zethus_core::{panel_for, SetConfigRequest, SET_CONFIG_EVENT};

/// Delegated click and change handling for everything inside the sidebar.
pub fn wire_sidebar(app: &Rc<App>) -> anyhow::Result<()> {
    let sidebar = app
        .document()
        .get_element_by_id(SIDEBAR_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{SIDEBAR_ID}"))?;

    let app_click = app.clone();
    dom::add_event_listener(&sidebar, "click", move |ev| {
        let Some(action) = dom::target_data(&ev, "action") else {
            return;
        };
        let target = dom::target_data(&ev, "id");
        app_click.run(|store| {
            match (action.as_str(), target.as_deref()) {
                (ACTION_ADD_PATH, _) => {
                    let mut viz = Map::new();
                    viz.insert("type".to_string(), json!(PATH_VIZ_TYPE));
                    viz.insert("options".to_string(), Value::Object(Map::new()));
                    let key = store.add_visualization(viz);
                    log::info!("[ui] added path {key}");
                }
                (ACTION_REMOVE, Some(id)) => store.remove_visualization(id),
                (ACTION_TOGGLE, Some(id)) => store.toggle_visibility(id),
                (other, id) => anyhow::bail!("unhandled action {other:?} for {id:?}"),
            }
            Ok(())
        });
    })?;

    let app_change = app.clone();
    dom::add_event_listener(&sidebar, "change", move |ev| {
        let Some(value) = dom::target_input_value(&ev) else {
            return;
        };
        let is_endpoint = ev
            .target()
            .and_then(|t| t.dyn_into::<web::Element>().ok())
            .map(|el| el.id() == ROS_ENDPOINT_ID)
            .unwrap_or(false);
        if is_endpoint {
            app_change.run(|store| {
                store.update_ros_endpoint(&value);
                Ok(())
            });
            return;
        }
        let (Some(key), Some(field)) = (dom::target_data(&ev, "viz"), dom::target_data(&ev, "id")) else {
            return;
        };
        app_change.run(|store| {
            let viz_type = store
                .configuration()
                .visualization(&key)
                .and_then(|v| v.get("type"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let panel = panel_for(&viz_type)
                .ok_or_else(|| anyhow::anyhow!("no option panel for {viz_type:?}"))?;
            let patch = panel
                .change(&field, &value)
                .ok_or_else(|| anyhow::anyhow!("{viz_type} has no option {field:?}"))?;
            store.update_viz_option_fields(&key, &patch);
            Ok(())
        });
    })?;
    Ok(())
}

/// Outside code pushes updates with a `SetConfig` event on the document,
/// carrying `{config, replaceOnExisting}` either as `detail` or as
/// properties set on the event itself.
pub fn wire_set_config(app: &Rc<App>) -> anyhow::Result<()> {
    let app_set = app.clone();
    dom::add_event_listener(app.document(), SET_CONFIG_EVENT, move |ev| {
        let detail = ev
            .dyn_ref::<web::CustomEvent>()
            .map(|c| c.detail())
            .filter(|d| !d.is_null() && !d.is_undefined());
        let source: &wasm_bindgen::JsValue = match &detail {
            Some(d) => d,
            None => ev.as_ref(),
        };
        app_set.run(|store| {
            let request: SetConfigRequest = serde_json::from_value(dom::to_json_value(source)?)?;
            store.apply(request)?;
            Ok(())
        });
    })
}

/// Persist on teardown. `pagehide` covers browsers that skip `beforeunload`.
pub fn wire_teardown(app: &Rc<App>) -> anyhow::Result<()> {
    for event in ["beforeunload", "pagehide"] {
        let app_unload = app.clone();
        dom::add_event_listener(app.window(), event, move |_| app_unload.persist())?;
    }
    Ok(())
}

pub fn wire_error_reset(app: &Rc<App>) {
    let app_reset = app.clone();
    dom::add_click_listener(app.document(), ERROR_RESET_ID, move || app_reset.reset_reload());
}
