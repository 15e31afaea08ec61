use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

/// Whether a watched element stays registered after it first becomes visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchMode {
    /// Keeps observing; the callback fires on every entry into view.
    Repeating,
    /// Unobserves the element right after the first callback.
    OneShot,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WatchOptions {
    pub threshold: f64,
    pub root_margin: &'static str,
    pub mode: WatchMode,
}

impl WatchOptions {
    pub const fn new(threshold: f64, mode: WatchMode) -> Self {
        Self {
            threshold,
            root_margin: "0px",
            mode,
        }
    }

    pub const fn with_root_margin(mut self, root_margin: &'static str) -> Self {
        self.root_margin = root_margin;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntersectionAction {
    Ignore,
    Notify,
    NotifyAndDetach,
}

pub fn decide(mode: WatchMode, is_intersecting: bool) -> IntersectionAction {
    match (is_intersecting, mode) {
        (false, _) => IntersectionAction::Ignore,
        (true, WatchMode::Repeating) => IntersectionAction::Notify,
        (true, WatchMode::OneShot) => IntersectionAction::NotifyAndDetach,
    }
}

/// Observes `elements` and calls `on_visible` as they enter the viewport.
/// The callback closure is leaked so the observer outlives this call.
pub fn watch<F>(elements: &[Element], options: WatchOptions, mut on_visible: F) -> Option<IntersectionObserver>
where
    F: FnMut(&Element) + 'static,
{
    if elements.is_empty() {
        return None;
    }

    let mode = options.mode;
    let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            let target = entry.target();
            match decide(mode, entry.is_intersecting()) {
                IntersectionAction::Ignore => {}
                IntersectionAction::Notify => on_visible(&target),
                IntersectionAction::NotifyAndDetach => {
                    on_visible(&target);
                    observer.unobserve(&target);
                }
            }
        }
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(options.root_margin);

    let observer = match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
        Ok(observer) => observer,
        Err(err) => {
            log::warn!("IntersectionObserver unavailable: {err:?}");
            return None;
        }
    };
    callback.forget();

    for element in elements {
        observer.observe(element);
    }
    Some(observer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn leaving_the_viewport_is_ignored() {
        assert_eq!(decide(WatchMode::Repeating, false), IntersectionAction::Ignore);
        assert_eq!(decide(WatchMode::OneShot, false), IntersectionAction::Ignore);
    }

    #[test]
    fn only_one_shot_watchers_detach() {
        assert_eq!(decide(WatchMode::Repeating, true), IntersectionAction::Notify);
        assert_eq!(
            decide(WatchMode::OneShot, true),
            IntersectionAction::NotifyAndDetach
        );
    }

    #[test]
    fn root_margin_defaults_to_zero() {
        let options = WatchOptions::new(0.5, WatchMode::OneShot);
        assert_eq!(options.root_margin, "0px");
        let options = options.with_root_margin("0px 0px -50px 0px");
        assert_eq!(options.root_margin, "0px 0px -50px 0px");
        assert_eq!(options.threshold, 0.5);
    }
}
