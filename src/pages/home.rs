use log::{info, warn};
use web_sys::{window, Element};
use yew::prelude::*;

use crate::behavior::observers::VisibilityObservers;
use crate::behavior::scroll::{ScrollReactor, ScrollState};
use crate::behavior::smooth_scroll::SmoothScroll;
use crate::components::coaches::CoachesSection;
use crate::components::events::EventsSection;
use crate::components::membership_modal::{MembershipModal, ModalTriggers};
use crate::components::nav::Nav;
use crate::components::scroll_widgets::{BackToTop, ProgressBar};
use crate::components::testimonials::Testimonials;
use crate::error::PageError;
use crate::theme::Theme;

const HERO_STATS: [(&str, &str); 4] = [
    ("500+", "Active Members"),
    ("25", "Expert Coaches"),
    ("40+", "Weekly Classes"),
    ("12", "Years Running"),
];

const WATCHED_GRIDS: [&str; 2] = ["events-grid", "coaches-grid"];

fn start_observers(stats: Option<Element>) -> Option<VisibilityObservers> {
    let observers = VisibilityObservers::init()
        .map_err(|e| warn!("Visibility observers disabled: {}", e))
        .ok()?;
    observers.scan_document();

    match stats {
        Some(stats) => observers.observe_stats(&stats),
        None => warn!("{}", PageError::MissingElement("hero stats")),
    }

    let document = window().and_then(|w| w.document());
    for id in WATCHED_GRIDS {
        match document.as_ref().and_then(|d| d.get_element_by_id(id)) {
            Some(grid) => {
                if let Err(e) = observers.watch(&grid) {
                    warn!("Not watching #{}: {}", id, e);
                }
            }
            None => warn!("{}", PageError::MissingElement(id)),
        }
    }
    Some(observers)
}

#[derive(Properties, PartialEq)]
pub struct HomeProps {
    pub theme: Theme,
}

#[function_component(Home)]
pub fn home(props: &HomeProps) -> Html {
    let scroll = use_state_eq(ScrollState::default);
    let modal_open = use_state(|| false);
    let stats_ref = use_node_ref();

    // Galleries are already in the DOM when this runs, so the first scan sees
    // their cards; later re-renders are picked up by the mutation watcher.
    {
        let scroll = scroll.clone();
        let modal_open = modal_open.clone();
        let stats_ref = stats_ref.clone();
        use_effect_with_deps(
            move |_| {
                info!("Wiring page behavior");
                let reactor = ScrollReactor::init(Callback::from(move |state| scroll.set(state)))
                    .map_err(|e| warn!("Scroll effects disabled: {}", e))
                    .ok();
                let smooth = SmoothScroll::init()
                    .map_err(|e| warn!("Smooth scrolling disabled: {}", e))
                    .ok();
                let triggers = ModalTriggers::init(Callback::from(move |_: ()| modal_open.set(true)))
                    .map_err(|e| warn!("Join buttons disabled: {}", e))
                    .ok();
                let observers = start_observers(stats_ref.cast::<Element>());

                move || {
                    drop(observers);
                    drop(triggers);
                    drop(smooth);
                    drop(reactor);
                }
            },
            (),
        );
    }

    let close_modal = {
        let modal_open = modal_open.clone();
        Callback::from(move |_: ()| modal_open.set(false))
    };

    html! {
        <>
            <ProgressBar percent={scroll.progress} />
            <Nav scroll={(*scroll).clone()} theme={props.theme} />

            <section id="home" class="hero">
                <div class="container hero-content">
                    <h1 class="reveal">{"Train Harder. Play Together."}</h1>
                    <p class="reveal">
                        {"Leagues, classes and coaching for every level, all under one roof."}
                    </p>
                    <div class="hero-buttons reveal">
                        <a href="#join-modal" class="btn btn-primary">{"Join the Club"}</a>
                        <a href="#events" class="btn btn-outline">{"See Events"}</a>
                    </div>
                    <div class="hero-stats" ref={stats_ref}>
                        { for HERO_STATS.iter().map(|(value, label)| html! {
                            <div class="stat">
                                <h3>{*value}</h3>
                                <p>{*label}</p>
                            </div>
                        }) }
                    </div>
                </div>
            </section>

            <EventsSection />
            <CoachesSection />
            <Testimonials />

            <section id="contact" class="cta">
                <div class="container reveal">
                    <h2>{"Ready to get moving?"}</h2>
                    <p>{"Your first week is on us. Sign up and pick any class you like."}</p>
                    <button class="btn btn-primary open-modal-btn">{"Become a Member"}</button>
                </div>
            </section>

            <footer class="footer">
                <div class="container">
                    <p>{"© Peak Athletics Club. All rights reserved."}</p>
                </div>
            </footer>

            <BackToTop visible={scroll.back_to_top_visible} />
            <MembershipModal open={*modal_open} on_close={close_modal} />
        </>
    }
}
