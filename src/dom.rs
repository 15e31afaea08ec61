use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, EventTarget, HtmlElement, Window};

/// All elements matching `selector`, in document order. An invalid selector
/// yields an empty list.
pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = document.query_selector_all(selector) else {
        log::warn!("invalid selector {selector}");
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn query_one(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

pub fn html_by_id(document: &Document, id: &str) -> Option<HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

pub fn set_style(element: &Element, property: &str, value: &str) {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property(property, value);
    }
}

pub fn set_class(element: &Element, class: &str, present: bool) {
    let _ = element.class_list().toggle_with_force(class, present);
}

pub fn scroll_y(window: &Window) -> f64 {
    window.page_y_offset().unwrap_or(0.0)
}

/// Rendered height of `#nav`, or 0 when the page has no nav bar.
pub fn nav_height(document: &Document) -> f64 {
    html_by_id(document, "nav")
        .map(|nav| nav.offset_height() as f64)
        .unwrap_or(0.0)
}

/// Binds `handler` to `event` on `target` for the lifetime of the page.
pub fn listen<E, F>(target: &EventTarget, event: &str, handler: F)
where
    E: FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    if target
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .is_err()
    {
        log::warn!("failed to bind {event} listener");
    }
    callback.forget();
}

/// Formats a number the way a JS template literal would for the values the
/// effects produce: integral values without a fraction and no negative zero.
pub fn css_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}
