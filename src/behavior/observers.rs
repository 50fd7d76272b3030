use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::js_sys::Array;
use web_sys::{
    window, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MutationObserver, MutationObserverInit, MutationRecord, Node,
};

use super::count_up::{self, CountUpHandle};
use crate::error::PageError;

pub const LAZY_CLASS: &str = "lazy-img";
pub const REVEAL_CLASS: &str = "reveal";
pub const VISIBLE_CLASS: &str = "visible";

const REVEAL_THRESHOLD: f64 = 0.1;
const STATS_THRESHOLD: f64 = 0.5;

type IntersectCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;
type MutationCallback = Closure<dyn FnMut(Array, MutationObserver)>;

/// What the observers read from and write to an element.
pub trait Watchable: Clone {
    fn has_class(&self, class: &str) -> bool;
    /// Matching elements below this one, in document order.
    fn descendants_with_class(&self, class: &str) -> Vec<Self>;
    fn read_attr(&self, name: &str) -> Option<String>;
    fn write_attr(&self, name: &str, value: &str);
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
}

impl Watchable for Element {
    fn has_class(&self, class: &str) -> bool {
        self.class_list().contains(class)
    }

    fn descendants_with_class(&self, class: &str) -> Vec<Element> {
        let Ok(nodes) = self.query_selector_all(&format!(".{}", class)) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn read_attr(&self, name: &str) -> Option<String> {
        self.get_attribute(name)
    }

    fn write_attr(&self, name: &str, value: &str) {
        let _ = self.set_attribute(name, value);
    }

    fn add_class(&self, class: &str) {
        let _ = self.class_list().add_1(class);
    }

    fn remove_class(&self, class: &str) {
        let _ = self.class_list().remove_1(class);
    }
}

/// `root` itself when it carries `class` (freshly inserted cards usually
/// do), followed by every matching descendant.
pub fn targets<N: Watchable>(root: &N, class: &str) -> Vec<N> {
    let mut found = Vec::new();
    if root.has_class(class) {
        found.push(root.clone());
    }
    found.extend(root.descendants_with_class(class));
    found
}

pub fn load_lazy_image<N: Watchable>(img: &N) {
    if let Some(src) = img.read_attr("data-src") {
        img.write_attr("src", &src);
    }
    img.remove_class(LAZY_CLASS);
}

pub fn reveal<N: Watchable>(element: &N) {
    element.add_class(VISIBLE_CLASS);
}

/// Each entry that is now intersecting is unobserved first, then handed to
/// `on_visible`, so no element is handled twice.
fn fire_once<T>(
    entries: impl IntoIterator<Item = (bool, T)>,
    mut unobserve: impl FnMut(&T),
    mut on_visible: impl FnMut(T),
) {
    for (intersecting, target) in entries {
        if intersecting {
            unobserve(&target);
            on_visible(target);
        }
    }
}

fn one_shot_observer(
    threshold: Option<f64>,
    mut on_visible: impl FnMut(Element) + 'static,
) -> Result<(IntersectionObserver, IntersectCallback), PageError> {
    let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
        let entries = entries.iter().map(|entry| {
            let entry: IntersectionObserverEntry = entry.unchecked_into();
            (entry.is_intersecting(), entry.target())
        });
        fire_once(entries, |target| observer.unobserve(target), &mut on_visible);
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let observer = match threshold {
        Some(threshold) => {
            let options = IntersectionObserverInit::new();
            options.set_threshold(&JsValue::from_f64(threshold));
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?
        }
        None => IntersectionObserver::new(callback.as_ref().unchecked_ref())?,
    };
    Ok((observer, callback))
}

fn observe_matching(observer: &IntersectionObserver, root: &Element, class: &str) {
    for element in targets(root, class) {
        observer.observe(&element);
    }
}

/// Count-ups still in flight, cancelled together on teardown.
#[derive(Clone, Default)]
struct RunningCounters(Rc<RefCell<Vec<CountUpHandle>>>);

impl RunningCounters {
    fn track(&self, handle: CountUpHandle) {
        self.0.borrow_mut().push(handle);
    }

    fn cancel_all(&self) {
        for handle in self.0.borrow_mut().drain(..) {
            handle.cancel();
        }
    }
}

/// Lazy images, reveal animations and the hero stats counter.
pub struct VisibilityObservers {
    lazy: IntersectionObserver,
    reveal: IntersectionObserver,
    stats: IntersectionObserver,
    mutations: MutationObserver,
    counters: RunningCounters,
    _callbacks: (IntersectCallback, IntersectCallback, IntersectCallback, MutationCallback),
}

impl VisibilityObservers {
    pub fn init() -> Result<Self, PageError> {
        let (lazy, lazy_cb) = one_shot_observer(None, |img| load_lazy_image(&img))?;
        let (reveal_observer, reveal_cb) =
            one_shot_observer(Some(REVEAL_THRESHOLD), |element| reveal(&element))?;

        let counters = RunningCounters::default();
        let running = counters.clone();
        let (stats, stats_cb) = one_shot_observer(Some(STATS_THRESHOLD), move |block| {
            let Ok(headings) = block.query_selector_all("h3") else {
                return;
            };
            for node in (0..headings.length()).filter_map(|i| headings.item(i)) {
                if let Some(handle) = node.dyn_into::<HtmlElement>().ok().and_then(count_up::animate) {
                    running.track(handle);
                }
            }
            debug!("Stats counter started");
        })?;

        let lazy_for_mutations = lazy.clone();
        let reveal_for_mutations = reveal_observer.clone();
        let mutation_cb = Closure::wrap(Box::new(move |records: Array, _: MutationObserver| {
            for record in records.iter() {
                let record: MutationRecord = record.unchecked_into();
                let added = record.added_nodes();
                for node in (0..added.length()).filter_map(|i| added.item(i)) {
                    if node.node_type() != Node::ELEMENT_NODE {
                        continue;
                    }
                    if let Ok(element) = node.dyn_into::<Element>() {
                        observe_matching(&lazy_for_mutations, &element, LAZY_CLASS);
                        observe_matching(&reveal_for_mutations, &element, REVEAL_CLASS);
                    }
                }
            }
        }) as Box<dyn FnMut(Array, MutationObserver)>);
        let mutations = MutationObserver::new(mutation_cb.as_ref().unchecked_ref())?;

        info!("Visibility observers ready");
        Ok(Self {
            lazy,
            reveal: reveal_observer,
            stats,
            mutations,
            counters,
            _callbacks: (lazy_cb, reveal_cb, stats_cb, mutation_cb),
        })
    }

    /// Register every lazy image and reveal target under `root`.
    pub fn scan(&self, root: &Element) {
        observe_matching(&self.lazy, root, LAZY_CLASS);
        observe_matching(&self.reveal, root, REVEAL_CLASS);
    }

    pub fn scan_document(&self) {
        if let Some(root) = window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        {
            self.scan(&root);
        }
    }

    pub fn observe_stats(&self, block: &Element) {
        self.stats.observe(block);
    }

    /// Rescan `container` whenever children are inserted anywhere below it.
    pub fn watch(&self, container: &Element) -> Result<(), PageError> {
        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(true);
        self.mutations.observe_with_options(container, &options)?;
        Ok(())
    }
}

impl Drop for VisibilityObservers {
    fn drop(&mut self) {
        self.lazy.disconnect();
        self.reveal.disconnect();
        self.stats.disconnect();
        self.mutations.disconnect();
        self.counters.cancel_all();
        debug!("Visibility observers disconnected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    /// Minimal element tree standing in for the DOM.
    #[derive(Clone)]
    struct FakeNode(Rc<FakeInner>);

    struct FakeInner {
        name: &'static str,
        classes: RefCell<Vec<String>>,
        attrs: RefCell<BTreeMap<String, String>>,
        children: Vec<FakeNode>,
    }

    fn node(name: &'static str, classes: &[&str], children: Vec<FakeNode>) -> FakeNode {
        FakeNode(Rc::new(FakeInner {
            name,
            classes: RefCell::new(classes.iter().map(|c| c.to_string()).collect()),
            attrs: RefCell::new(BTreeMap::new()),
            children,
        }))
    }

    impl FakeNode {
        fn with_attr(self, name: &str, value: &str) -> Self {
            self.write_attr(name, value);
            self
        }

        fn classes(&self) -> Vec<String> {
            self.0.classes.borrow().clone()
        }
    }

    impl Watchable for FakeNode {
        fn has_class(&self, class: &str) -> bool {
            self.0.classes.borrow().iter().any(|c| c == class)
        }

        fn descendants_with_class(&self, class: &str) -> Vec<Self> {
            let mut found = Vec::new();
            for child in &self.0.children {
                if child.has_class(class) {
                    found.push(child.clone());
                }
                found.extend(child.descendants_with_class(class));
            }
            found
        }

        fn read_attr(&self, name: &str) -> Option<String> {
            self.0.attrs.borrow().get(name).cloned()
        }

        fn write_attr(&self, name: &str, value: &str) {
            self.0.attrs.borrow_mut().insert(name.to_string(), value.to_string());
        }

        fn add_class(&self, class: &str) {
            if !self.has_class(class) {
                self.0.classes.borrow_mut().push(class.to_string());
            }
        }

        fn remove_class(&self, class: &str) {
            self.0.classes.borrow_mut().retain(|c| c != class);
        }
    }

    fn names(nodes: &[FakeNode]) -> Vec<&'static str> {
        nodes.iter().map(|n| n.0.name).collect()
    }

    fn event_card(name: &'static str) -> FakeNode {
        node(
            name,
            &["event-card", "reveal"],
            vec![node("img", &["event-image", "lazy-img"], vec![]).with_attr("data-src", "a.jpg")],
        )
    }

    #[test]
    fn inserted_card_is_its_own_reveal_target() {
        let card = event_card("card");
        assert_eq!(names(&targets(&card, REVEAL_CLASS)), vec!["card"]);
        assert_eq!(names(&targets(&card, LAZY_CLASS)), vec!["img"]);
    }

    #[test]
    fn rescan_of_a_wrapper_finds_nested_cards_in_order() {
        let grid = node("grid", &["events-grid"], vec![event_card("first"), event_card("second")]);
        assert_eq!(names(&targets(&grid, REVEAL_CLASS)), vec!["first", "second"]);
        assert_eq!(targets(&grid, LAZY_CLASS).len(), 2);
        assert!(targets(&node("plain", &[], vec![]), REVEAL_CLASS).is_empty());
    }

    #[test]
    fn lazy_image_swaps_source_and_drops_marker() {
        let img = node("img", &["coach-image", "lazy-img"], vec![]).with_attr("data-src", "coach.jpg");
        load_lazy_image(&img);
        assert_eq!(img.read_attr("src").as_deref(), Some("coach.jpg"));
        assert_eq!(img.classes(), vec!["coach-image"]);
    }

    #[test]
    fn lazy_image_without_data_src_only_loses_marker() {
        let img = node("img", &["lazy-img"], vec![]);
        load_lazy_image(&img);
        assert_eq!(img.read_attr("src"), None);
        assert!(!img.has_class(LAZY_CLASS));
    }

    #[test]
    fn reveal_marks_visible_once() {
        let card = event_card("card");
        reveal(&card);
        reveal(&card);
        assert_eq!(card.classes(), vec!["event-card", "reveal", "visible"]);
    }

    #[test]
    fn visible_entries_are_unobserved_before_handling() {
        let log = RefCell::new(Vec::new());
        fire_once(
            vec![(false, 1), (true, 2), (true, 3)],
            |t| log.borrow_mut().push(format!("unobserve {}", t)),
            |t| log.borrow_mut().push(format!("visible {}", t)),
        );
        assert_eq!(
            log.into_inner(),
            vec!["unobserve 2", "visible 2", "unobserve 3", "visible 3"]
        );
    }

    #[test]
    fn teardown_cancels_every_running_counter() {
        let counters = RunningCounters::default();
        let handles: Vec<_> = (0..3).map(|_| CountUpHandle::default()).collect();
        for handle in &handles {
            counters.track(handle.clone());
        }

        counters.cancel_all();

        assert!(handles.iter().all(CountUpHandle::is_cancelled));
        assert!(counters.0.borrow().is_empty());
    }
}
