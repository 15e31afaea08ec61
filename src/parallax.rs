use web_sys::{Document, Event, Window};

use crate::dom;

pub fn speed(index: usize) -> f64 {
    0.1 + index as f64 * 0.05
}

pub fn transform(scroll_y: f64, index: usize) -> String {
    format!(
        "translateY({}px) rotate({}deg)",
        dom::css_number(scroll_y * speed(index)),
        dom::css_number(scroll_y * 0.02)
    )
}

pub fn install(window: &Window, document: &Document) {
    let cubes = dom::query_all(document, ".floating-cube");
    if cubes.is_empty() {
        return;
    }

    let scroll_source = window.clone();
    dom::listen(window, "scroll", move |_: Event| {
        let scroll_y = dom::scroll_y(&scroll_source);
        for (index, cube) in cubes.iter().enumerate() {
            dom::set_style(cube, "transform", &transform(scroll_y, index));
        }
    });
}
