use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// Attach `handler` for `event` on any target, keeping the closure alive for
/// the lifetime of the page.
pub fn add_event_listener(
    target: &web::EventTarget,
    event: &str,
    handler: impl FnMut(web::Event) + 'static,
) -> anyhow::Result<()> {
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(|e| anyhow::anyhow!("listen {event}: {:?}", e))?;
    closure.forget();
    Ok(())
}

/// `data-<name>` of the element an event was fired on.
pub fn target_data(ev: &web::Event, name: &str) -> Option<String> {
    ev.target()
        .and_then(|t| t.dyn_into::<web::HtmlElement>().ok())
        .and_then(|el| el.dataset().get(name))
}

/// Current value of the `<input>` an event was fired on.
pub fn target_input_value(ev: &web::Event) -> Option<String> {
    ev.target()
        .and_then(|t| t.dyn_into::<web::HtmlInputElement>().ok())
        .map(|input| input.value())
}

/// Decoded `(name, value)` pairs of the page's query string.
pub fn query_pairs(window: &web::Window) -> anyhow::Result<Vec<(String, String)>> {
    let search = window
        .location()
        .search()
        .map_err(|e| anyhow::anyhow!("location.search: {:?}", e))?;
    let params = web::UrlSearchParams::new_with_str(&search)
        .map_err(|e| anyhow::anyhow!("URLSearchParams: {:?}", e))?;
    let mut pairs = Vec::new();
    for entry in js_sys::try_iter(&params)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .into_iter()
        .flatten()
    {
        let entry = entry.map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let pair: js_sys::Array = entry.unchecked_into();
        if let (Some(k), Some(v)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
            pairs.push((k, v));
        }
    }
    Ok(pairs)
}

/// Convert between JS values and `serde_json` through the JSON codec.
pub fn to_json_value(value: &wasm_bindgen::JsValue) -> anyhow::Result<serde_json::Value> {
    if value.is_undefined() {
        return Ok(serde_json::Value::Null);
    }
    let text = js_sys::JSON::stringify(value)
        .map_err(|e| anyhow::anyhow!("JSON.stringify: {:?}", e))?
        .as_string()
        .unwrap_or_else(|| "null".to_string());
    Ok(serde_json::from_str(&text)?)
}

pub fn from_json_value(value: &serde_json::Value) -> anyhow::Result<wasm_bindgen::JsValue> {
    js_sys::JSON::parse(&serde_json::to_string(value)?).map_err(|e| anyhow::anyhow!("JSON.parse: {:?}", e))
}
