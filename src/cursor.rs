use web_sys::Document;

use crate::dom;

pub const CLICKABLE_SELECTOR: &str = "a, button, .service-card";

pub fn install(document: &Document) {
    for element in dom::query_all(document, CLICKABLE_SELECTOR) {
        dom::set_style(&element, "cursor", "pointer");
    }
}
