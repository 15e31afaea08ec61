use std::rc::Rc;

use log::{info, Level};
use web_sys::{window, Document, Event, Window};

mod config;
mod counter;
mod cube;
mod cursor;
mod dom;
mod menu;
mod observer;
mod parallax;
mod reveal;
mod scroll;
mod contact {
    pub mod form;
    pub mod page;
    pub mod relay;
    pub mod status;
    #[cfg(test)]
    mod tests;
}

use scroll::NavElements;

/// Scroll-bound units and one-off page decoration, run once the DOM is parsed.
fn init(window: &Window, document: &Document) {
    let nav = Rc::new(NavElements::find(document));

    {
        let nav = nav.clone();
        let scroll_window = window.clone();
        let scroll_document = document.clone();
        dom::listen(window, "scroll", move |_: Event| {
            nav.update_active_link(&scroll_window, &scroll_document);
            nav.update_background(&scroll_window);
        });
    }
    {
        let nav = nav.clone();
        let resize_window = window.clone();
        let resize_document = document.clone();
        dom::listen(window, "resize", move |_: Event| {
            nav.update_active_link(&resize_window, &resize_document);
        });
    }

    reveal::install_reveal(document);
    counter::install(document);
    cube::install(document);
    parallax::install(window, document);
    reveal::install_section_headers(document);
    cursor::install(document);

    nav.update_active_link(window, document);
    nav.update_background(window);
    info!("page interactions ready");
}

fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(Level::Info).expect("error initializing log");

    let Some(window) = window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    menu::install(&document);
    scroll::install_smooth_scroll(&window, &document);
    contact::page::install(&document);

    if document.ready_state() == "loading" {
        let ready_window = window.clone();
        let ready_document = document.clone();
        dom::listen(&document, "DOMContentLoaded", move |_: Event| {
            init(&ready_window, &ready_document);
        });
    } else {
        init(&window, &document);
    }
}
