//! DOM element bindings.
//!
//! Every element the page logic touches is resolved once at startup; a
//! missing one fails initialisation with `missing element <selector>`.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement};

// ── Helpers ──

fn doc() -> Document {
    gloo_utils::document()
}

pub fn window() -> web_sys::Window {
    gloo_utils::window()
}

pub fn by_id(id: &str) -> Option<Element> {
    doc().get_element_by_id(id)
}

pub fn query(selector: &str) -> Option<Element> {
    doc().query_selector(selector).ok()?
}

pub fn query_all(selector: &str) -> Vec<Element> {
    let Ok(nl) = doc().query_selector_all(selector) else {
        return Vec::new();
    };
    let mut v = Vec::new();
    for i in 0..nl.length() {
        if let Some(el) = nl.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            v.push(el);
        }
    }
    v
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn toggle_class(el: &Element, cls: &str) {
    let _ = el.class_list().toggle(cls);
}

/// `classList.replace`: only swaps when `from` is present.
pub fn replace_class(el: &Element, from: &str, to: &str) {
    let _ = el.class_list().replace(from, to);
}

pub fn set_display(el: &Element, visible: bool) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let value = if visible { "block" } else { "none" };
        let _ = html.style().set_property("display", value);
    }
}

/// Enable or disable every `<button>` on the page, including ones added
/// after startup.
pub fn set_all_buttons_disabled(disabled: bool) {
    for el in query_all("button") {
        if let Ok(button) = el.dyn_into::<HtmlButtonElement>() {
            button.set_disabled(disabled);
        }
    }
}

// ── Elements struct ──

/// DOM references used by the counter page.
#[derive(Clone)]
pub struct Elements {
    // Counter buttons
    pub plus: Element,
    pub minus: Element,
    pub reset: Element,

    // Face
    pub show: Element,
    pub left_eye: Element,
    pub right_eye: Element,
    pub dot: Element,
    pub mouth: Element,
    pub tongue: Element,
    pub left_eye_btn: Element,
    pub right_eye_btn: Element,
    pub dot_btn: Element,

    // Session
    pub sign_in: Vec<Element>,
    pub after_sign_in: Vec<Element>,
    pub sign_in_btn: Element,
    pub sign_out_btn: Element,
    pub create_account_btn: Option<Element>,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_query {
    ($selector:expr) => {
        query($selector).ok_or_else(|| JsValue::from_str(&format!("missing element {}", $selector)))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after the document is parsed.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            plus: get_el!("plus"),
            minus: get_el!("minus"),
            reset: get_el!("a"),

            show: get_el!("show"),
            left_eye: get_el!("left"),
            right_eye: get_el!("right"),
            dot: get_query!(".dot"),
            mouth: get_query!(".mouth"),
            tongue: get_query!(".tongue"),
            left_eye_btn: get_el!("c"),
            right_eye_btn: get_el!("b"),
            dot_btn: get_el!("d"),

            sign_in: query_all(".sign-in"),
            after_sign_in: query_all(".after-sign-in"),
            sign_in_btn: get_query!(".sign-in .btn"),
            sign_out_btn: get_query!(".sign-out .btn"),
            create_account_btn: query(".create-account .btn"),
        })
    }
}
