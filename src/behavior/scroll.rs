use log::{debug, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, HtmlElement, Window};
use yew::Callback;

use crate::config::{BACK_TO_TOP_OFFSET, SCROLLED_OFFSET, SECTION_PROBE_OFFSET};
use crate::error::PageError;

/// Raw numbers read from the document on one scroll tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollSample {
    pub scroll_y: f64,
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SectionBounds {
    pub id: Option<String>,
    pub top: f64,
    pub height: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrollState {
    pub scrolled: bool,
    pub progress: f64,
    pub active_section: Option<String>,
    pub back_to_top_visible: bool,
}

/// Percentage of the scrollable range covered so far. A page that does not
/// scroll reports 0 instead of NaN.
pub fn scroll_progress(scroll_top: f64, scroll_height: f64, client_height: f64) -> f64 {
    let range = scroll_height - client_height;
    if range <= 0.0 {
        return 0.0;
    }
    scroll_top / range * 100.0
}

/// First section containing the probe line, if any.
pub fn section_at(sections: &[SectionBounds], scroll_y: f64) -> Option<&SectionBounds> {
    let probe = scroll_y + SECTION_PROBE_OFFSET;
    sections
        .iter()
        .find(|s| probe >= s.top && probe < s.top + s.height)
}

impl ScrollState {
    /// When no section is under the probe line the previous highlight stays.
    pub fn compute(
        sample: &ScrollSample,
        sections: &[SectionBounds],
        previous_active: Option<String>,
    ) -> Self {
        let active_section = match section_at(sections, sample.scroll_y) {
            Some(section) => section.id.clone(),
            None => previous_active,
        };

        Self {
            scrolled: sample.scroll_y > SCROLLED_OFFSET,
            progress: scroll_progress(sample.scroll_top, sample.scroll_height, sample.client_height),
            active_section,
            back_to_top_visible: sample.scroll_y > BACK_TO_TOP_OFFSET,
        }
    }

    /// Whether a nav link with this href should carry the `active` class.
    pub fn is_active_href(&self, href: &str) -> bool {
        match (&self.active_section, href.strip_prefix('#')) {
            (Some(id), Some(target)) => id == target,
            _ => false,
        }
    }
}

impl ScrollSample {
    fn read(window: &Window, document: &Document) -> Self {
        let root = document.document_element();
        let body_top = document.body().map(|b| b.scroll_top()).unwrap_or(0);
        let root_top = root.as_ref().map(|r| r.scroll_top()).unwrap_or(0);
        // Quirks mode scrolls the body, standards mode the root element.
        let scroll_top = if body_top != 0 { body_top } else { root_top };

        Self {
            scroll_y: window.scroll_y().unwrap_or(0.0),
            scroll_top: scroll_top as f64,
            scroll_height: root.as_ref().map(|r| r.scroll_height()).unwrap_or(0) as f64,
            client_height: root.as_ref().map(|r| r.client_height()).unwrap_or(0) as f64,
        }
    }
}

fn read_sections(document: &Document) -> Vec<SectionBounds> {
    let Ok(nodes) = document.query_selector_all("section") else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .map(|section| SectionBounds {
            id: section.get_attribute("id"),
            top: section.offset_top() as f64,
            height: section.offset_height() as f64,
        })
        .collect()
}

/// Owns the window scroll listener. Dropping it detaches the listener.
pub struct ScrollReactor {
    window: Window,
    listener: Closure<dyn FnMut()>,
}

impl ScrollReactor {
    pub fn init(on_tick: Callback<ScrollState>) -> Result<Self, PageError> {
        let window = window().ok_or(PageError::MissingElement("window"))?;
        let document = window.document().ok_or(PageError::MissingElement("document"))?;

        let window_clone = window.clone();
        let mut last_active: Option<String> = None;
        let listener = Closure::wrap(Box::new(move || {
            let sample = ScrollSample::read(&window_clone, &document);
            let sections = read_sections(&document);
            let state = ScrollState::compute(&sample, &sections, last_active.take());
            last_active = state.active_section.clone();
            on_tick.emit(state);
        }) as Box<dyn FnMut()>);

        window.add_event_listener_with_callback("scroll", listener.as_ref().unchecked_ref())?;

        // Initial tick so a reload mid-page highlights the right link
        listener
            .as_ref()
            .unchecked_ref::<web_sys::js_sys::Function>()
            .call0(&JsValue::NULL)?;

        info!("Scroll reactor attached");
        Ok(Self { window, listener })
    }
}

impl Drop for ScrollReactor {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("scroll", self.listener.as_ref().unchecked_ref());
        debug!("Scroll reactor detached");
    }
}
