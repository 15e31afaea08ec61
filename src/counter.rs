use std::cell::RefCell;
use std::rc::Rc;

use gloo_render::{request_animation_frame, AnimationFrame};
use web_sys::{Document, Element};

use crate::config::{COUNTER_DURATION_MS, COUNTER_FRAME_MS};
use crate::dom;
use crate::observer::{self, WatchMode, WatchOptions};

pub const COUNTER_WATCH: WatchOptions = WatchOptions::new(0.5, WatchMode::OneShot);

/// Reads a `data-count` value with `parseInt` rules: leading whitespace, an
/// optional sign, then as many digits as are present.
pub fn parse_target(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let digits_end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(rest.len(), |(i, _)| i);
    let value: i64 = rest[..digits_end].parse().ok()?;
    Some(sign * value)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Frame {
    /// Show this value and schedule another frame.
    Continue(i64),
    /// Show the exact target; the run is over.
    Done(i64),
}

impl Frame {
    pub fn value(self) -> i64 {
        match self {
            Frame::Continue(value) | Frame::Done(value) => value,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CounterAnimation {
    target: i64,
    increment: f64,
    current: f64,
}

impl CounterAnimation {
    pub fn new(target: i64) -> Self {
        Self {
            target,
            increment: target as f64 / (COUNTER_DURATION_MS / COUNTER_FRAME_MS),
            current: 0.0,
        }
    }

    pub fn step(&mut self) -> Frame {
        if self.increment <= 0.0 {
            return Frame::Done(self.target);
        }
        self.current += self.increment;
        if self.current < self.target as f64 {
            Frame::Continue(self.current.floor() as i64)
        } else {
            Frame::Done(self.target)
        }
    }
}

type FrameSlot = Rc<RefCell<Option<AnimationFrame>>>;

/// Renders one step and, while the count is still climbing, books the next
/// animation frame in `slot`.
fn run_frame(element: Element, mut animation: CounterAnimation, slot: FrameSlot) {
    let frame = animation.step();
    element.set_text_content(Some(&frame.value().to_string()));
    if let Frame::Continue(_) = frame {
        let next_slot = slot.clone();
        let handle = request_animation_frame(move |_| {
            next_slot.borrow_mut().take();
            run_frame(element, animation, next_slot);
        });
        *slot.borrow_mut() = Some(handle);
    }
}

pub fn install(document: &Document) {
    let counters = dom::query_all(document, "[data-count]");
    log::debug!("{} counters on page", counters.len());

    observer::watch(&counters, COUNTER_WATCH, |counter| {
        let raw = counter.get_attribute("data-count").unwrap_or_default();
        let Some(target) = parse_target(&raw) else {
            log::warn!("ignoring counter with data-count={raw:?}");
            return;
        };
        run_frame(counter.clone(), CounterAnimation::new(target), Rc::new(RefCell::new(None)));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn drive(target: i64) -> Vec<Frame> {
        let mut animation = CounterAnimation::new(target);
        let mut frames = vec![animation.step()];
        while let Some(Frame::Continue(_)) = frames.last() {
            frames.push(animation.step());
            assert!(frames.len() < 1_000, "counter never finished");
        }
        frames
    }

    #[test]
    fn hundred_counts_up_and_lands_exactly() {
        let frames = drive(100);
        assert_eq!(frames.last(), Some(&Frame::Done(100)));
        assert!(frames.len() >= 125 && frames.len() <= 126);
        let shown: Vec<i64> = frames.iter().map(|f| f.value()).collect();
        assert!(shown.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(shown[0], 0);
    }

    #[test]
    fn zero_target_renders_without_scheduling() {
        assert_eq!(drive(0), vec![Frame::Done(0)]);
    }

    #[test]
    fn negative_target_finishes_immediately() {
        assert_eq!(drive(-40), vec![Frame::Done(-40)]);
    }

    #[test]
    fn small_target_still_terminates() {
        let frames = drive(1);
        assert_eq!(frames.last(), Some(&Frame::Done(1)));
        assert!(frames[..frames.len() - 1].iter().all(|f| *f == Frame::Continue(0)));
    }

    #[test]
    fn parses_like_parse_int() {
        assert_eq!(parse_target("250"), Some(250));
        assert_eq!(parse_target("  42+"), Some(42));
        assert_eq!(parse_target("-7"), Some(-7));
        assert_eq!(parse_target("1500 clients"), Some(1500));
        assert_eq!(parse_target("abc"), None);
        assert_eq!(parse_target(""), None);
    }
}
