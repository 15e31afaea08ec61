use std::cell::Cell;
use std::rc::Rc;

use web_sys::{Document, Element, HtmlElement, KeyboardEvent, MouseEvent};

use crate::dom;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MenuState {
    pub open: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuEvent {
    Toggle,
    LinkClicked,
    Escape,
}

/// Everything on the page that mirrors the menu state. Derived from a single
/// bool so the button, panel and aria attributes can never disagree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuReflection {
    pub active: bool,
    pub aria_expanded: &'static str,
    pub aria_hidden: &'static str,
    pub body_overflow: &'static str,
}

impl MenuReflection {
    pub fn of(open: bool) -> Self {
        if open {
            Self {
                active: true,
                aria_expanded: "true",
                aria_hidden: "false",
                body_overflow: "hidden",
            }
        } else {
            Self {
                active: false,
                aria_expanded: "false",
                aria_hidden: "true",
                body_overflow: "",
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuEffect {
    Reflect(MenuReflection),
    FocusToggle,
}

pub fn reduce(state: MenuState, event: MenuEvent) -> (MenuState, Vec<MenuEffect>) {
    match event {
        MenuEvent::Toggle => {
            let open = !state.open;
            (MenuState { open }, vec![MenuEffect::Reflect(MenuReflection::of(open))])
        }
        MenuEvent::LinkClicked => (
            MenuState { open: false },
            vec![MenuEffect::Reflect(MenuReflection::of(false))],
        ),
        MenuEvent::Escape if state.open => (
            MenuState { open: false },
            vec![
                MenuEffect::Reflect(MenuReflection::of(false)),
                MenuEffect::FocusToggle,
            ],
        ),
        MenuEvent::Escape => (state, Vec::new()),
    }
}

pub struct MenuElements {
    pub toggle: HtmlElement,
    pub panel: Element,
    pub links: Vec<Element>,
    pub body: Option<HtmlElement>,
}

impl MenuElements {
    pub fn find(document: &Document) -> Option<Self> {
        Some(Self {
            toggle: dom::html_by_id(document, "mobileMenuBtn")?,
            panel: document.get_element_by_id("navMenu")?,
            links: dom::query_all(document, ".nav-link"),
            body: document.body(),
        })
    }

    fn apply(&self, effect: MenuEffect) {
        match effect {
            MenuEffect::Reflect(reflection) => {
                dom::set_class(&self.toggle, "active", reflection.active);
                dom::set_class(&self.panel, "active", reflection.active);
                let _ = self
                    .toggle
                    .set_attribute("aria-expanded", reflection.aria_expanded);
                let _ = self.panel.set_attribute("aria-hidden", reflection.aria_hidden);
                if let Some(body) = &self.body {
                    let _ = body.style().set_property("overflow", reflection.body_overflow);
                }
            }
            MenuEffect::FocusToggle => {
                let _ = self.toggle.focus();
            }
        }
    }
}

pub fn install(document: &Document) {
    let Some(elements) = MenuElements::find(document) else {
        log::debug!("no mobile menu on page");
        return;
    };
    let elements = Rc::new(elements);
    let state = Rc::new(Cell::new(MenuState::default()));

    let dispatch = {
        let elements = elements.clone();
        move |event: MenuEvent| {
            let (next, effects) = reduce(state.get(), event);
            state.set(next);
            for effect in effects {
                elements.apply(effect);
            }
        }
    };
    let dispatch = Rc::new(dispatch);

    {
        let dispatch = dispatch.clone();
        dom::listen(&elements.toggle, "click", move |_: MouseEvent| {
            dispatch(MenuEvent::Toggle)
        });
    }

    for link in &elements.links {
        let dispatch = dispatch.clone();
        dom::listen(link, "click", move |_: MouseEvent| {
            dispatch(MenuEvent::LinkClicked)
        });
    }

    dom::listen(document, "keydown", move |e: KeyboardEvent| {
        if e.key() == "Escape" {
            dispatch(MenuEvent::Escape);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(events: &[MenuEvent]) -> (MenuState, Vec<MenuEffect>) {
        let mut state = MenuState::default();
        let mut all = Vec::new();
        for event in events {
            let (next, effects) = reduce(state, *event);
            state = next;
            all.extend(effects);
        }
        (state, all)
    }

    #[test]
    fn toggle_opens_and_locks_scroll() {
        let (state, effects) = run(&[MenuEvent::Toggle]);
        assert!(state.open);
        assert_eq!(
            effects,
            vec![MenuEffect::Reflect(MenuReflection {
                active: true,
                aria_expanded: "true",
                aria_hidden: "false",
                body_overflow: "hidden",
            })]
        );
    }

    #[test]
    fn open_then_close_restores_initial_reflection() {
        let (state, effects) = run(&[MenuEvent::Toggle, MenuEvent::Toggle]);
        assert_eq!(state, MenuState::default());
        assert_eq!(
            effects.last(),
            Some(&MenuEffect::Reflect(MenuReflection::of(false)))
        );
        assert_eq!(MenuReflection::of(false).aria_expanded, "false");
        assert_eq!(MenuReflection::of(false).aria_hidden, "true");
        assert_eq!(MenuReflection::of(false).body_overflow, "");
    }

    #[test]
    fn escape_closes_and_returns_focus() {
        let (state, effects) = run(&[MenuEvent::Toggle, MenuEvent::Escape]);
        assert!(!state.open);
        assert_eq!(
            &effects[1..],
            &[
                MenuEffect::Reflect(MenuReflection::of(false)),
                MenuEffect::FocusToggle
            ]
        );
    }

    #[test]
    fn repeated_escape_when_closed_does_nothing() {
        let (state, effects) = run(&[MenuEvent::Escape, MenuEvent::Escape, MenuEvent::Escape]);
        assert_eq!(state, MenuState::default());
        assert!(effects.is_empty());
    }

    #[test]
    fn link_click_forces_closed_even_when_closed() {
        let (state, effects) = run(&[MenuEvent::LinkClicked]);
        assert!(!state.open);
        assert_eq!(effects, vec![MenuEffect::Reflect(MenuReflection::of(false))]);

        let (state, _) = run(&[MenuEvent::Toggle, MenuEvent::LinkClicked]);
        assert!(!state.open);
    }
}
