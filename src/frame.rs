use crate::dom;
use serde_json::json;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;
use zethus_core::{update_config_event_name, ConfigMessage, ConfigNotifier, MessageKind};

/// Delivers store messages to the embedding page as a `CustomEvent` on the
/// parent document, named after the session.
pub struct ParentFrameNotifier {
    window: web::Window,
}

impl ParentFrameNotifier {
    pub fn new(window: web::Window) -> Self {
        Self { window }
    }

    fn parent_document(&self) -> Option<web::Document> {
        let parent = self.window.parent().ok().flatten()?;
        // Cross-origin parents throw on `document`; treat that as "not embedded".
        let doc = js_sys::Reflect::get(&parent, &JsValue::from_str("document")).ok()?;
        doc.dyn_into::<web::Document>().ok()
    }

    fn dispatch(&self, message: &ConfigMessage) -> anyhow::Result<()> {
        let Some(document) = self.parent_document() else {
            return Ok(());
        };
        let detail = match message.kind {
            MessageKind::UpdateConfig => json!({ "config": message.payload }),
        };
        let init = web::CustomEventInit::new();
        init.set_detail(&dom::from_json_value(&detail)?);
        let event = web::CustomEvent::new_with_event_init_dict(
            &update_config_event_name(&message.session),
            &init,
        )
        .map_err(|e| anyhow::anyhow!("CustomEvent: {:?}", e))?;
        document
            .dispatch_event(&event)
            .map_err(|e| anyhow::anyhow!("dispatch: {:?}", e))?;
        Ok(())
    }
}

impl ConfigNotifier for ParentFrameNotifier {
    fn notify(&self, message: ConfigMessage) {
        if let Err(e) = self.dispatch(&message) {
            log::warn!("[frame] notification for session {} dropped: {:?}", message.session, e);
        }
    }
}
