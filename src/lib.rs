#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use constants::HOST_CONFIG_PROPERTY;
use web_sys as web;
use zethus_core::Configuration;

mod app;
mod constants;
mod dom;
mod events;
mod frame;
mod markup;
mod overlay;
mod query;
mod storage;

thread_local! {
    static APP: RefCell<Option<Rc<app::App>>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("zethus-web starting");

    if let Err(e) = init() {
        log::error!("init error: {:?}", e);
        if let Some(document) = dom::window_document() {
            overlay::show_error(&document, &format!("{e:#}"));
        }
    }
    Ok(())
}

fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let provided = host_configuration(&window);

    let app = app::App::new(window, document, provided)?;
    events::wire_sidebar(&app)?;
    events::wire_set_config(&app)?;
    events::wire_teardown(&app)?;
    events::wire_error_reset(&app);
    overlay::hide(app.document());
    app.render();

    APP.with(|slot| *slot.borrow_mut() = Some(app));
    Ok(())
}

/// Configuration the host page assigned to `window.zethusConfiguration`
/// before loading the module.
fn host_configuration(window: &web::Window) -> Option<Configuration> {
    let raw = js_sys::Reflect::get(window, &JsValue::from_str(HOST_CONFIG_PROPERTY)).ok()?;
    if raw.is_undefined() || raw.is_null() {
        return None;
    }
    match dom::to_json_value(&raw).map(Configuration::from_value) {
        Ok(Ok(c)) => Some(c),
        Ok(Err(e)) => {
            log::warn!("ignoring window.{HOST_CONFIG_PROPERTY}: {e}");
            None
        }
        Err(e) => {
            log::warn!("ignoring window.{HOST_CONFIG_PROPERTY}: {e:#}");
            None
        }
    }
}

fn with_app<T>(f: impl FnOnce(&app::App) -> T) -> Result<T, JsValue> {
    APP.with(|slot| {
        slot.borrow()
            .as_ref()
            .map(|app| f(app))
            .ok_or_else(|| JsValue::from_str("zethus is not running"))
    })
}

/// Snapshot of the live configuration.
#[wasm_bindgen(js_name = getConfiguration)]
pub fn get_configuration() -> Result<JsValue, JsValue> {
    let config = with_app(|app| app.configuration())?;
    dom::from_json_value(&config.into_value()).map_err(|e| JsValue::from_str(&format!("{e:#}")))
}

/// Set one value inside `globalOptions` by dot/bracket path.
#[wasm_bindgen(js_name = updateGlobalOptions)]
pub fn update_global_options(path: String, option: JsValue) -> Result<(), JsValue> {
    let option = dom::to_json_value(&option).map_err(|e| JsValue::from_str(&format!("{e:#}")))?;
    with_app(|app| {
        app.run(|store| {
            store.update_global_options(&path, option)?;
            Ok(())
        })
    })
}

/// Reset to the built-in defaults and reload the page.
#[wasm_bindgen(js_name = resetReload)]
pub fn reset_reload() -> Result<(), JsValue> {
    with_app(|app| app.reset_reload())
}
