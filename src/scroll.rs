//! Anchor navigation and the scroll-driven state of the nav bar.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, MouseEvent, ScrollBehavior, ScrollToOptions, Window};

use crate::config::{ACTIVE_SECTION_LOOKAHEAD, NAV_SCROLLED_THRESHOLD};
use crate::dom;

/// The fragment an in-page anchor points at, if clicking it should scroll.
/// A bare `#` or an empty href keeps the browser default.
pub fn fragment_target(href: &str) -> Option<&str> {
    if href.len() > 1 && href.starts_with('#') {
        Some(href)
    } else {
        None
    }
}

/// Document offset to scroll to so the fixed nav bar does not cover the target.
pub fn scroll_destination(target_viewport_top: f64, scroll_y: f64, nav_height: f64) -> f64 {
    target_viewport_top + scroll_y - nav_height
}

pub fn nav_is_scrolled(scroll_y: f64) -> bool {
    scroll_y > NAV_SCROLLED_THRESHOLD
}

#[derive(Clone, Debug, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    fn contains(&self, position: f64) -> bool {
        position >= self.top && position < self.top + self.height
    }
}

/// Id of the section under the probe line; the last containing section wins.
pub fn active_section(scroll_y: f64, nav_height: f64, sections: &[SectionBounds]) -> Option<&str> {
    let probe = scroll_y + nav_height + ACTIVE_SECTION_LOOKAHEAD;
    sections
        .iter()
        .rev()
        .find(|section| section.contains(probe))
        .map(|section| section.id.as_str())
}

/// Whether each link (by href) should carry the `active` marker. Only the
/// first link pointing at the active section is marked.
pub fn link_marks(active: Option<&str>, hrefs: &[String]) -> Vec<bool> {
    let mut marks = vec![false; hrefs.len()];
    if let Some(id) = active.filter(|id| !id.is_empty()) {
        if let Some(first) = hrefs.iter().position(|href| href.strip_prefix('#') == Some(id)) {
            marks[first] = true;
        }
    }
    marks
}

pub fn install_smooth_scroll(window: &Window, document: &Document) {
    let anchors = dom::query_all(document, "a[href^=\"#\"]");
    log::debug!("smooth scroll on {} anchors", anchors.len());

    for anchor in anchors {
        let window = window.clone();
        let document = document.clone();
        let element = anchor.clone();
        dom::listen(&element, "click", move |e: MouseEvent| {
            let Some(href) = anchor.get_attribute("href") else {
                return;
            };
            let Some(fragment) = fragment_target(&href) else {
                return;
            };
            e.prevent_default();

            let Some(target) = dom::query_one(&document, fragment) else {
                log::debug!("no element for {fragment}");
                return;
            };
            let top = scroll_destination(
                target.get_bounding_client_rect().top(),
                dom::scroll_y(&window),
                dom::nav_height(&document),
            );
            let options = ScrollToOptions::new();
            options.set_top(top);
            options.set_behavior(ScrollBehavior::Smooth);
            window.scroll_to_with_scroll_to_options(&options);
        });
    }
}

pub struct NavElements {
    pub nav: Option<Element>,
    pub sections: Vec<HtmlElement>,
    pub links: Vec<Element>,
}

impl NavElements {
    pub fn find(document: &Document) -> Self {
        Self {
            nav: document.get_element_by_id("nav"),
            sections: dom::query_all(document, ".section")
                .into_iter()
                .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
                .collect(),
            links: dom::query_all(document, ".nav-link"),
        }
    }

    fn section_bounds(&self) -> Vec<SectionBounds> {
        self.sections
            .iter()
            .map(|section| SectionBounds {
                id: section.id(),
                top: section.offset_top() as f64,
                height: section.offset_height() as f64,
            })
            .collect()
    }

    pub fn update_active_link(&self, window: &Window, document: &Document) {
        let bounds = self.section_bounds();
        let active = active_section(dom::scroll_y(window), dom::nav_height(document), &bounds);
        let hrefs: Vec<String> = self
            .links
            .iter()
            .map(|link| link.get_attribute("href").unwrap_or_default())
            .collect();
        for (link, marked) in self.links.iter().zip(link_marks(active, &hrefs)) {
            dom::set_class(link, "active", marked);
        }
    }

    pub fn update_background(&self, window: &Window) {
        if let Some(nav) = &self.nav {
            dom::set_class(nav, "scrolled", nav_is_scrolled(dom::scroll_y(window)));
        }
    }
}
