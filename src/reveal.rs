//! One-way fade-ins for content blocks and section headers.

use web_sys::{Document, Element};

use crate::dom;
use crate::observer::{self, WatchMode, WatchOptions};

pub const REVEAL_SELECTOR: &str =
    ".service-card, .info-card, .skill-chip, .highlight-card, .about-content p, .pricing-banner";
pub const HEADER_SELECTOR: &str = ".section-header, .section-tag";

pub const REVEAL_WATCH: WatchOptions =
    WatchOptions::new(0.1, WatchMode::Repeating).with_root_margin("0px 0px -50px 0px");
pub const HEADER_WATCH: WatchOptions = WatchOptions::new(0.2, WatchMode::Repeating);

/// Inline styles written to a section header, in application order.
pub type StyleSet = &'static [(&'static str, &'static str)];

pub const HEADER_HIDDEN: StyleSet = &[
    ("opacity", "0"),
    ("transform", "translateY(20px)"),
    ("transition", "opacity 0.6s ease, transform 0.6s ease"),
];
pub const HEADER_SHOWN: StyleSet = &[("opacity", "1"), ("transform", "translateY(0)")];

fn apply_styles(element: &Element, styles: StyleSet) {
    for (property, value) in styles {
        dom::set_style(element, property, value);
    }
}

pub fn install_reveal(document: &Document) {
    let elements = dom::query_all(document, REVEAL_SELECTOR);
    for element in &elements {
        dom::set_class(element, "reveal", true);
    }
    log::debug!("reveal watching {} elements", elements.len());

    observer::watch(&elements, REVEAL_WATCH, |element| {
        dom::set_class(element, "active", true);
    });
}

pub fn install_section_headers(document: &Document) {
    let headers = dom::query_all(document, HEADER_SELECTOR);
    for header in &headers {
        apply_styles(header, HEADER_HIDDEN);
    }

    observer::watch(&headers, HEADER_WATCH, |header| {
        apply_styles(header, HEADER_SHOWN);
    });
}
