use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, HtmlElement, KeyboardEvent, Node, Window};
use yew::prelude::*;

use crate::behavior::debounce::Debouncer;
use crate::behavior::scroll::ScrollState;
use crate::config::{
    DESKTOP_BREAKPOINT, FOCUS_DELAY_MS, MOBILE_BREAKPOINT, OUTSIDE_CLICK_ARM_MS, RESIZE_DEBOUNCE_MS,
};
use crate::error::PageError;
use crate::theme::{Theme, ThemeToggle};

const LINKS: [(&str, &str); 5] = [
    ("#home", "Home"),
    ("#events", "Events"),
    ("#coaches", "Coaches"),
    ("#testimonials", "Testimonials"),
    ("#contact", "Contact"),
];

pub fn is_mobile(width: i32) -> bool {
    width <= DESKTOP_BREAKPOINT
}

/// Narrow phones close the menu as soon as a link is picked.
pub fn closes_on_link(width: i32) -> bool {
    width <= MOBILE_BREAKPOINT
}

fn viewport_width() -> i32 {
    window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|w| w.as_f64())
        .map(|w| w as i32)
        .unwrap_or(DESKTOP_BREAKPOINT + 1)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuPhase {
    Closed,
    /// Displayed but not yet styled open; lasts one layout flush.
    Opening,
    Open,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MenuModel {
    pub phase: MenuPhase,
    pub width: i32,
    pub menu_visible: bool,
    /// Desktop close waits for the transition before hiding the menu.
    pub hide_pending: bool,
    pub scroll_locked: bool,
}

pub enum MenuAction {
    Toggle,
    Close,
    OpeningSettled,
    TransitionEnded,
    /// A menu link was picked at this viewport width.
    LinkSelected(i32),
    Resized(i32),
}

impl MenuModel {
    pub fn new(width: i32) -> Self {
        Self {
            phase: MenuPhase::Closed,
            width,
            menu_visible: !is_mobile(width),
            hide_pending: false,
            scroll_locked: false,
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.phase != MenuPhase::Closed
    }

    pub fn aria_expanded(&self) -> &'static str {
        if self.is_expanded() {
            "true"
        } else {
            "false"
        }
    }

    pub fn icon_class(&self) -> &'static str {
        if self.is_expanded() {
            "fas fa-times"
        } else {
            "fas fa-bars"
        }
    }

    fn closed(&self) -> Self {
        let mobile = is_mobile(self.width);
        Self {
            phase: MenuPhase::Closed,
            hide_pending: !mobile,
            scroll_locked: false,
            ..self.clone()
        }
    }
}

impl Reducible for MenuModel {
    type Action = MenuAction;

    fn reduce(self: Rc<Self>, action: MenuAction) -> Rc<Self> {
        match action {
            MenuAction::Toggle if self.phase == MenuPhase::Closed => Rc::new(Self {
                phase: MenuPhase::Opening,
                menu_visible: true,
                hide_pending: false,
                scroll_locked: is_mobile(self.width),
                ..(*self).clone()
            }),
            MenuAction::Toggle | MenuAction::Close => {
                if self.phase == MenuPhase::Closed {
                    return self;
                }
                Rc::new(self.closed())
            }
            MenuAction::OpeningSettled if self.phase == MenuPhase::Opening => Rc::new(Self {
                phase: MenuPhase::Open,
                ..(*self).clone()
            }),
            MenuAction::OpeningSettled => self,
            MenuAction::TransitionEnded => {
                if !self.hide_pending {
                    return self;
                }
                Rc::new(Self {
                    hide_pending: false,
                    menu_visible: self.phase != MenuPhase::Closed,
                    ..(*self).clone()
                })
            }
            MenuAction::LinkSelected(width)
                if closes_on_link(width) && self.phase != MenuPhase::Closed =>
            {
                Rc::new(self.closed())
            }
            MenuAction::LinkSelected(_) => self,
            MenuAction::Resized(width) => {
                let was_mobile = is_mobile(self.width);
                let now_mobile = is_mobile(width);
                let mut next = Self {
                    width,
                    ..(*self).clone()
                };
                if was_mobile != now_mobile {
                    next.phase = MenuPhase::Closed;
                    next.hide_pending = false;
                    next.menu_visible = !now_mobile;
                    next.scroll_locked = false;
                }
                if !now_mobile {
                    next.scroll_locked = false;
                }
                Rc::new(next)
            }
        }
    }
}

/// Outside-click and Escape listeners, alive only while the menu is expanded.
struct MenuDismissal {
    document: Document,
    on_click: Rc<Closure<dyn FnMut(MouseEvent)>>,
    on_key: Closure<dyn FnMut(KeyboardEvent)>,
    _arm: Timeout,
}

impl MenuDismissal {
    fn init(menu: Element, toggle: HtmlElement, close: Callback<bool>) -> Result<Self, PageError> {
        let document = window()
            .and_then(|w| w.document())
            .ok_or(PageError::MissingElement("document"))?;

        let toggle_node: Node = toggle.clone().into();
        let close_on_click = close.clone();
        let on_click = Rc::new(Closure::wrap(Box::new(move |e: MouseEvent| {
            let target = e.target().and_then(|t| t.dyn_into::<Node>().ok());
            let target = target.as_ref();
            if !menu.contains(target) && !toggle_node.contains(target) {
                debug!("Click outside menu, closing");
                close_on_click.emit(false);
            }
        }) as Box<dyn FnMut(MouseEvent)>));

        let on_key = Closure::wrap(Box::new(move |e: KeyboardEvent| {
            if e.key() == "Escape" {
                close.emit(true);
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);
        document.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())?;

        // Armed late so the click that opened the menu cannot close it.
        let arm_document = document.clone();
        let arm_click = on_click.clone();
        let arm = Timeout::new(OUTSIDE_CLICK_ARM_MS, move || {
            let _ = arm_document
                .add_event_listener_with_callback("click", (*arm_click).as_ref().unchecked_ref());
        });

        Ok(Self {
            document,
            on_click,
            on_key,
            _arm: arm,
        })
    }
}

impl Drop for MenuDismissal {
    fn drop(&mut self) {
        let _ = self
            .document
            .remove_event_listener_with_callback("click", (*self.on_click).as_ref().unchecked_ref());
        let _ = self
            .document
            .remove_event_listener_with_callback("keydown", self.on_key.as_ref().unchecked_ref());
    }
}

/// Debounced window resize feeding the menu reducer.
struct ResizeWatcher {
    window: Window,
    listener: Closure<dyn FnMut()>,
}

impl ResizeWatcher {
    fn init(on_resize: Callback<i32>) -> Result<Self, PageError> {
        let window = window().ok_or(PageError::MissingElement("window"))?;
        let body = window
            .document()
            .and_then(|d| d.body())
            .ok_or(PageError::MissingElement("body"))?;

        let mut debouncer = Debouncer::new(RESIZE_DEBOUNCE_MS);
        let listener = Closure::wrap(Box::new(move || {
            // Suppress CSS transitions while the layout is being dragged around.
            let _ = body.class_list().add_1("resize-animation-stopper");
            let body = body.clone();
            let on_resize = on_resize.clone();
            debouncer.call(move || {
                let _ = body.class_list().remove_1("resize-animation-stopper");
                on_resize.emit(viewport_width());
            });
        }) as Box<dyn FnMut()>);

        window.add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())?;
        Ok(Self { window, listener })
    }
}

impl Drop for ResizeWatcher {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.listener.as_ref().unchecked_ref());
    }
}

#[derive(Properties, PartialEq)]
pub struct NavProps {
    pub scroll: ScrollState,
    pub theme: Theme,
}

#[function_component(Nav)]
pub fn nav(props: &NavProps) -> Html {
    let menu = use_reducer_eq(|| MenuModel::new(viewport_width()));
    let links_ref = use_node_ref();
    let toggle_ref = use_node_ref();

    let focus_toggle = {
        let toggle_ref = toggle_ref.clone();
        move || {
            if let Some(toggle) = toggle_ref.cast::<HtmlElement>() {
                let _ = toggle.focus();
            }
        }
    };

    // Closing on a phone hands focus back to the toggle.
    let close = {
        let menu = menu.dispatcher();
        let focus_toggle = focus_toggle.clone();
        Callback::from(move |refocus: bool| {
            menu.dispatch(MenuAction::Close);
            if refocus || is_mobile(viewport_width()) {
                focus_toggle();
            }
        })
    };

    {
        let menu = menu.dispatcher();
        use_effect_with_deps(
            move |_| {
                info!("Initializing navigation");
                let watcher = ResizeWatcher::init(Callback::from(move |width| {
                    menu.dispatch(MenuAction::Resized(width))
                }))
                .map_err(|e| warn!("Resize handling disabled: {}", e))
                .ok();
                move || drop(watcher)
            },
            (),
        );
    }

    {
        let dispatcher = menu.dispatcher();
        let links_ref = links_ref.clone();
        use_effect_with_deps(
            move |phase| {
                if *phase == MenuPhase::Opening {
                    if let Some(links) = links_ref.cast::<HtmlElement>() {
                        // Reading the height forces a layout so the open transition runs.
                        let _ = links.offset_height();
                        Timeout::new(FOCUS_DELAY_MS, move || {
                            if let Some(first) = links
                                .query_selector("a")
                                .ok()
                                .flatten()
                                .and_then(|a| a.dyn_into::<HtmlElement>().ok())
                            {
                                let _ = first.focus();
                            }
                        })
                        .forget();
                    }
                    dispatcher.dispatch(MenuAction::OpeningSettled);
                }
                || ()
            },
            menu.phase,
        );
    }

    {
        let links_ref = links_ref.clone();
        let toggle_ref = toggle_ref.clone();
        let close = close.clone();
        use_effect_with_deps(
            move |expanded| {
                let dismissal = if *expanded {
                    match (links_ref.cast::<Element>(), toggle_ref.cast::<HtmlElement>()) {
                        (Some(links), Some(toggle)) => MenuDismissal::init(links, toggle, close)
                            .map_err(|e| warn!("Menu dismissal disabled: {}", e))
                            .ok(),
                        _ => {
                            warn!("{}", PageError::MissingElement("nav links or menu toggle"));
                            None
                        }
                    }
                } else {
                    None
                };
                move || drop(dismissal)
            },
            menu.is_expanded(),
        );
    }

    use_effect_with_deps(
        |locked| {
            if let Some(body) = window().and_then(|w| w.document()).and_then(|d| d.body()) {
                let _ = body.class_list().toggle_with_force("menu-open", *locked);
                let _ = body
                    .style()
                    .set_property("overflow", if *locked { "hidden" } else { "" });
            }
            || ()
        },
        menu.scroll_locked,
    );

    let on_toggle = {
        let menu = menu.clone();
        let close = close.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            if menu.is_expanded() {
                close.emit(false);
            } else {
                menu.dispatch(MenuAction::Toggle);
            }
        })
    };

    let on_link = {
        let menu = menu.clone();
        let focus_toggle = focus_toggle.clone();
        Callback::from(move |_: MouseEvent| {
            let width = viewport_width();
            if menu.is_expanded() && closes_on_link(width) {
                focus_toggle();
            }
            menu.dispatch(MenuAction::LinkSelected(width));
        })
    };

    let on_transition_end = {
        let menu = menu.dispatcher();
        Callback::from(move |_: TransitionEvent| menu.dispatch(MenuAction::TransitionEnded))
    };

    let links = LINKS
        .iter()
        .map(|(href, label)| {
            let active = props.scroll.is_active_href(href);
            html! {
                <li key={*href}>
                    <a href={*href} class={classes!(active.then_some("active"))} onclick={on_link.clone()}>
                        {*label}
                    </a>
                </li>
            }
        })
        .collect::<Html>();

    let logo_style = if props.scroll.scrolled {
        "transform: scale(0.95)"
    } else {
        "transform: scale(1)"
    };
    let menu_style = if menu.menu_visible { "display: flex" } else { "display: none" };

    html! {
        <nav id="navbar" class={classes!("navbar", props.scroll.scrolled.then_some("scrolled"))}>
            <div class="container nav-container">
                <a href="#home" class="logo" style={logo_style}>
                    <i class="fas fa-running"></i>
                    <span>{"Peak Athletics"}</span>
                </a>
                <ul
                    id="nav-links"
                    ref={links_ref}
                    class={classes!("nav-links", (menu.phase == MenuPhase::Open).then_some("active"))}
                    style={menu_style}
                    ontransitionend={on_transition_end}
                >
                    {links}
                    <li><a href="#join-modal" class="btn btn-primary" onclick={on_link}>{"Join Now"}</a></li>
                </ul>
                <div class="nav-actions">
                    <ThemeToggle initial={props.theme} />
                    <button
                        id="menu-toggle"
                        ref={toggle_ref}
                        class={classes!("menu-toggle", menu.is_expanded().then_some("active"))}
                        aria-label="Toggle navigation menu"
                        aria-expanded={menu.aria_expanded()}
                        aria-controls="nav-links"
                        onclick={on_toggle}
                    >
                        <i class={menu.icon_class()}></i>
                    </button>
                </div>
            </div>
        </nav>
    }
}
