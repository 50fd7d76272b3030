use log::{error, info};
use web_sys::Element;
use yew::prelude::*;

use crate::gallery::{self, categories, grid_content, EventEntry, Filter, GridContent};

#[derive(Properties, PartialEq)]
struct EventCardProps {
    event: EventEntry,
}

#[function_component(EventCard)]
fn event_card(props: &EventCardProps) -> Html {
    let event = &props.event;
    html! {
        <div class="event-card reveal">
            <img class="event-image lazy-img" data-src={event.image.clone()} alt={event.alt.clone()} />
            <div class="event-body">
                <span class="event-category">{&event.category}</span>
                <h3>{&event.title}</h3>
                <div class="event-meta">
                    <i class="far fa-calendar"></i>
                    <span>{&event.date}</span>
                </div>
                <div class="event-meta">
                    <i class="fas fa-map-marker-alt"></i>
                    <span>{&event.location}</span>
                </div>
                <a href="#" class="btn">{"Learn More"}</a>
            </div>
        </div>
    }
}

fn no_events() -> Html {
    html! {
        <div class="no-events">
            <i class="fas fa-calendar-times"></i>
            <h3>{"No events found"}</h3>
            <p>{"There are no events in this category. Please try another filter."}</p>
        </div>
    }
}

#[function_component(EventsSection)]
pub fn events_section() -> Html {
    let events = use_memo(
        |_| {
            info!("Initializing events section");
            gallery::load_events().map_err(|e| {
                error!("Error loading events: {}", e);
                e
            })
        },
        (),
    );
    let filter = use_state(Filter::default);

    // Buttons are told apart by their data-filter attribute alone.
    let on_filter = {
        let filter = filter.clone();
        Callback::from(move |e: MouseEvent| {
            let Some(slug) = e
                .target_dyn_into::<Element>()
                .and_then(|el| el.closest("[data-filter]").ok().flatten())
                .and_then(|button| button.get_attribute("data-filter"))
            else {
                return;
            };
            filter.set(Filter::from_slug(&slug));
        })
    };

    let body = match events.as_ref() {
        Err(_) => html! {
            <div id="events-grid" class="events-grid">
                <p class="load-error">{"Could not load events. Please try again later."}</p>
            </div>
        },
        Ok(events) => {
            let filter_bar = if events.is_empty() {
                error!("No events data available for filtering");
                html! {}
            } else {
                categories(events)
                    .into_iter()
                    .map(|category| {
                        let active = category.slug == filter.slug();
                        html! {
                            <button
                                key={category.slug.clone()}
                                class={classes!("filter-btn", active.then_some("active"))}
                                data-filter={category.slug.clone()}
                                aria-label={format!("Filter events by {}", category.label)}
                                onclick={on_filter.clone()}
                            >
                                {&category.label}
                            </button>
                        }
                    })
                    .collect::<Html>()
            };

            let grid = match grid_content(events, &filter) {
                GridContent::Empty => no_events(),
                GridContent::Cards(cards) => cards
                    .into_iter()
                    .map(|event| html! { <EventCard key={event.title.clone()} event={event.clone()} /> })
                    .collect::<Html>(),
            };

            html! {
                <>
                    <div id="event-filters" class="event-filters">{filter_bar}</div>
                    <div id="events-grid" class="events-grid">{grid}</div>
                </>
            }
        }
    };

    html! {
        <section id="events" class="events">
            <div class="container">
                <h2 class="section-title reveal">{"Upcoming Events"}</h2>
                {body}
            </div>
        </section>
    }
}
