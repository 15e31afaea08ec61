use std::cell::Cell;
use std::rc::Rc;

use web_sys::{Document, Element, MouseEvent};

use crate::dom;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CubeEvent {
    Enter,
    Leave,
    /// Pointer position and the element's bounding box, in client coordinates.
    Move { x: f64, y: f64, rect: Rect },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CubeEffect {
    PlayState(&'static str),
    Transform(String),
}

pub fn tilt_transform(x: f64, y: f64, rect: Rect) -> String {
    let center_x = rect.left + rect.width / 2.0;
    let center_y = rect.top + rect.height / 2.0;
    let rotate_x = (y - center_y) / 10.0;
    let rotate_y = (x - center_x) / 10.0;
    format!(
        "rotateX({}deg) rotateY({}deg)",
        dom::css_number(-rotate_x),
        dom::css_number(rotate_y)
    )
}

/// Applies a pointer event to the hover flag. Moves are ignored unless the
/// cube is hovered.
pub fn reduce(hovered: bool, event: CubeEvent) -> (bool, Option<CubeEffect>) {
    match event {
        CubeEvent::Enter => (true, Some(CubeEffect::PlayState("paused"))),
        CubeEvent::Leave => (false, Some(CubeEffect::PlayState("running"))),
        CubeEvent::Move { .. } if !hovered => (false, None),
        CubeEvent::Move { x, y, rect } => (true, Some(CubeEffect::Transform(tilt_transform(x, y, rect)))),
    }
}

fn apply(cube: &Element, effect: CubeEffect) {
    match effect {
        CubeEffect::PlayState(state) => dom::set_style(cube, "animation-play-state", state),
        CubeEffect::Transform(transform) => dom::set_style(cube, "transform", &transform),
    }
}

pub fn install(document: &Document) {
    let Some(cube) = dom::query_one(document, ".rubiks-cube-3d") else {
        log::debug!("no interactive cube on page");
        return;
    };
    let hovered = Rc::new(Cell::new(false));

    let dispatch = {
        let cube = cube.clone();
        Rc::new(move |event: CubeEvent| {
            let (next, effect) = reduce(hovered.get(), event);
            hovered.set(next);
            if let Some(effect) = effect {
                apply(&cube, effect);
            }
        })
    };

    {
        let dispatch = dispatch.clone();
        dom::listen(&cube, "mouseenter", move |_: MouseEvent| dispatch(CubeEvent::Enter));
    }
    {
        let dispatch = dispatch.clone();
        dom::listen(&cube, "mouseleave", move |_: MouseEvent| dispatch(CubeEvent::Leave));
    }
    let target = cube.clone();
    dom::listen(&cube, "mousemove", move |e: MouseEvent| {
        let bounds = target.get_bounding_client_rect();
        dispatch(CubeEvent::Move {
            x: e.client_x() as f64,
            y: e.client_y() as f64,
            rect: Rect {
                left: bounds.left(),
                top: bounds.top(),
                width: bounds.width(),
                height: bounds.height(),
            },
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RECT: Rect = Rect { left: 100.0, top: 100.0, width: 200.0, height: 200.0 };

    #[test]
    fn hover_pauses_and_leave_resumes() {
        assert_eq!(
            reduce(false, CubeEvent::Enter),
            (true, Some(CubeEffect::PlayState("paused")))
        );
        assert_eq!(
            reduce(true, CubeEvent::Leave),
            (false, Some(CubeEffect::PlayState("running")))
        );
    }

    #[test]
    fn moves_without_hover_are_ignored() {
        let event = CubeEvent::Move { x: 0.0, y: 0.0, rect: RECT };
        assert_eq!(reduce(false, event), (false, None));
    }

    #[test]
    fn tilt_follows_pointer_offset() {
        // center is (200, 200)
        let event = CubeEvent::Move { x: 250.0, y: 150.0, rect: RECT };
        assert_eq!(
            reduce(true, event),
            (
                true,
                Some(CubeEffect::Transform("rotateX(5deg) rotateY(5deg)".to_string()))
            )
        );
        assert_eq!(
            tilt_transform(200.0, 225.0, RECT),
            "rotateX(-2.5deg) rotateY(0deg)"
        );
    }
}
