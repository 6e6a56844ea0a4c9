use crate::constants::{ERROR_MESSAGE_ID, ERROR_OVERLAY_ID};
use web_sys as web;

#[inline]
pub fn show_error(document: &web::Document, message: &str) {
    if let Some(el) = document.get_element_by_id(ERROR_MESSAGE_ID) {
        el.set_text_content(Some(message));
    }
    if let Some(el) = document.get_element_by_id(ERROR_OVERLAY_ID) {
        let _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(ERROR_OVERLAY_ID) {
        let _ = el.set_attribute("style", "display:none");
    }
}
