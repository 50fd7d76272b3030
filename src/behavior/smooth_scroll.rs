use log::{debug, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, MouseEvent, ScrollBehavior, ScrollToOptions};

use crate::config::{HEADER_OFFSET, JOIN_MODAL_ID};
use crate::error::PageError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorAction<'a> {
    /// The bare `#` placeholder link.
    Ignore,
    /// Handled by the membership modal.
    OpenModal,
    ScrollTo(&'a str),
}

/// `None` for anything that is not an in-page anchor.
pub fn classify(href: &str) -> Option<AnchorAction<'_>> {
    let id = href.strip_prefix('#')?;
    if id.is_empty() {
        Some(AnchorAction::Ignore)
    } else if id.starts_with(JOIN_MODAL_ID) {
        Some(AnchorAction::OpenModal)
    } else {
        Some(AnchorAction::ScrollTo(id))
    }
}

/// Document offset to scroll to so the target sits below the fixed header.
pub fn scroll_target_top(rect_top: f64, page_offset: f64) -> f64 {
    rect_top + page_offset - HEADER_OFFSET
}

fn smooth_scroll_to(top: f64) {
    if let Some(window) = window() {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        window.scroll_to_with_scroll_to_options(&options);
    }
}

/// Returns false when the target section does not exist.
pub fn scroll_to_section(document: &Document, id: &str) -> bool {
    let Some(target) = document.get_element_by_id(id) else {
        debug!("No section #{} to scroll to", id);
        return false;
    };
    let page_offset = window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0);
    let top = scroll_target_top(target.get_bounding_client_rect().top(), page_offset);
    smooth_scroll_to(top);
    true
}

pub fn scroll_to_top() {
    smooth_scroll_to(0.0);
}

/// Delegated click handler for every `a[href^="#"]` on the page.
pub struct SmoothScroll {
    document: Document,
    listener: Closure<dyn FnMut(MouseEvent)>,
}

impl SmoothScroll {
    pub fn init() -> Result<Self, PageError> {
        let document = window()
            .and_then(|w| w.document())
            .ok_or(PageError::MissingElement("document"))?;

        let doc = document.clone();
        let listener = Closure::wrap(Box::new(move |e: MouseEvent| {
            let Some(anchor) = e
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("a[href^='#']").ok().flatten())
            else {
                return;
            };
            let Some(href) = anchor.get_attribute("href") else {
                return;
            };
            if let Some(AnchorAction::ScrollTo(id)) = classify(&href) {
                e.prevent_default();
                scroll_to_section(&doc, id);
            }
        }) as Box<dyn FnMut(MouseEvent)>);

        document.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())?;
        info!("Smooth scrolling enabled for in-page links");
        Ok(Self { document, listener })
    }
}

impl Drop for SmoothScroll {
    fn drop(&mut self) {
        let _ = self
            .document
            .remove_event_listener_with_callback("click", self.listener.as_ref().unchecked_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_in_page_anchors() {
        assert_eq!(classify("#events"), Some(AnchorAction::ScrollTo("events")));
        assert_eq!(classify("#"), Some(AnchorAction::Ignore));
        assert_eq!(classify("#join-modal"), Some(AnchorAction::OpenModal));
        assert_eq!(classify("#join-modal-footer"), Some(AnchorAction::OpenModal));
    }

    #[test]
    fn external_links_are_not_touched() {
        assert_eq!(classify("https://example.com/#events"), None);
        assert_eq!(classify("/coaches"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn target_sits_below_the_header() {
        assert_eq!(scroll_target_top(500.0, 1000.0), 1420.0);
        assert_eq!(scroll_target_top(0.0, 0.0), -80.0);
    }
}
