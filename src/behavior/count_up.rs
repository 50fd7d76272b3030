use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, HtmlElement};

const STEPS: f64 = 100.0;

#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Show(String),
    /// Carries the untouched original text, so rounding never shows at rest.
    Finished(String),
}

/// Count-up state for one heading such as `"250+"`.
#[derive(Clone, Debug, PartialEq)]
pub struct CountUp {
    original: String,
    suffix: &'static str,
    target: f64,
    increment: f64,
    current: f64,
}

/// Leading integer of `text`, the way browsers parse `parseInt`: optional
/// whitespace and sign, then at least one digit. Trailing junk is ignored.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (sign, rest) = match text.as_bytes().first() {
        Some(b'-') => (-1, &text[1..]),
        Some(b'+') => (1, &text[1..]),
        _ => (1, text),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    rest[..digits_len].parse::<i64>().ok().map(|n| sign * n)
}

impl CountUp {
    pub fn parse(text: &str) -> Option<Self> {
        let target = leading_integer(&text.replacen('+', "", 1))? as f64;
        Some(Self {
            original: text.to_string(),
            suffix: if text.contains('+') { "+" } else { "" },
            target,
            increment: target / STEPS,
            current: 0.0,
        })
    }

    pub fn next_frame(&mut self) -> Frame {
        if self.current < self.target {
            self.current += self.increment;
            Frame::Show(format!("{}{}", self.current.ceil() as i64, self.suffix))
        } else {
            Frame::Finished(self.original.clone())
        }
    }
}

/// Stops a running count-up at its next frame.
#[derive(Clone, Default)]
pub struct CountUpHandle {
    cancelled: Rc<Cell<bool>>,
}

impl CountUpHandle {
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Animate `heading` from 0 to its displayed number, one step per frame.
/// Headings without a number are left alone and yield `None`.
pub fn animate(heading: HtmlElement) -> Option<CountUpHandle> {
    let mut count = CountUp::parse(&heading.inner_text())?;
    let window = window()?;

    let handle = CountUpHandle::default();
    let frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

    let next = frame.clone();
    let stop = handle.clone();
    let win = window.clone();
    *frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if stop.is_cancelled() {
            debug!("Count-up cancelled");
            let _ = next.borrow_mut().take();
            return;
        }
        match count.next_frame() {
            Frame::Show(text) => {
                heading.set_inner_text(&text);
                if let Some(callback) = next.borrow().as_ref() {
                    let _ = win.request_animation_frame(callback.as_ref().unchecked_ref());
                }
            }
            Frame::Finished(text) => {
                heading.set_inner_text(&text);
                let _ = next.borrow_mut().take();
            }
        }
    }) as Box<dyn FnMut()>));

    if let Some(callback) = frame.borrow().as_ref() {
        window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .ok()?;
    }

    Some(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(count: &mut CountUp) -> (Vec<String>, String) {
        let mut shown = Vec::new();
        for _ in 0..1_000 {
            match count.next_frame() {
                Frame::Show(text) => shown.push(text),
                Frame::Finished(text) => return (shown, text),
            }
        }
        panic!("count-up never finished");
    }

    #[test]
    fn plus_suffix_is_restored_exactly() {
        let mut count = CountUp::parse("250+").unwrap();
        let (shown, last) = run_to_end(&mut count);
        assert_eq!(last, "250+");
        assert_eq!(shown.first().map(String::as_str), Some("3+"));
        assert!(shown.iter().all(|s| s.ends_with('+')));
        assert!(shown.len() >= 100 && shown.len() <= 101);
    }

    #[test]
    fn plain_numbers_have_no_suffix() {
        let mut count = CountUp::parse("12").unwrap();
        let (shown, last) = run_to_end(&mut count);
        assert_eq!(last, "12");
        assert_eq!(shown[0], "1");
        assert!(shown.iter().all(|s| !s.contains('+')));
    }

    #[test]
    fn non_numeric_text_is_left_alone() {
        assert_eq!(CountUp::parse("nonsense"), None);
        assert_eq!(CountUp::parse(""), None);
        assert_eq!(CountUp::parse("+"), None);
    }

    #[test]
    fn zero_finishes_immediately() {
        let mut count = CountUp::parse("0").unwrap();
        assert_eq!(count.next_frame(), Frame::Finished("0".into()));
    }

    #[test]
    fn parses_like_parse_int() {
        assert_eq!(leading_integer("  42 members"), Some(42));
        assert_eq!(leading_integer("1,200"), Some(1));
        assert_eq!(leading_integer("-7"), Some(-7));
        assert_eq!(leading_integer("abc12"), None);
    }

    #[test]
    fn comma_grouped_text_is_restored_verbatim() {
        let mut count = CountUp::parse("1,200+").unwrap();
        let (_, last) = run_to_end(&mut count);
        assert_eq!(last, "1,200+");
    }

    #[test]
    fn cancelling_a_clone_stops_the_shared_loop() {
        let handle = CountUpHandle::default();
        let loop_side = handle.clone();
        assert!(!loop_side.is_cancelled());
        handle.cancel();
        assert!(loop_side.is_cancelled());
    }
}
