use log::{error, info};
use yew::prelude::*;

use crate::gallery::{self, CoachEntry};

fn coach_card(coach: &CoachEntry) -> Html {
    let twitter = coach.social.twitter.clone().unwrap_or_else(|| "#".to_string());
    let linkedin = coach.social.linkedin.clone().unwrap_or_else(|| "#".to_string());

    html! {
        <div class="coach-card reveal" key={coach.name.clone()}>
            <div class="coach-photo">
                <img class="coach-image lazy-img" data-src={coach.image.clone()} alt={coach.name.clone()} />
                <div class="coach-overlay">
                    <h3>{&coach.name}</h3>
                    <p>{&coach.specialty}</p>
                </div>
            </div>
            <div class="coach-info">
                <p class="coach-title">{&coach.title}</p>
                <p>{&coach.description}</p>
                <div class="coach-social">
                    <a href={twitter} target="_blank" aria-label="Twitter"><i class="fab fa-twitter"></i></a>
                    <a href={linkedin} target="_blank" aria-label="LinkedIn"><i class="fab fa-linkedin-in"></i></a>
                </div>
            </div>
        </div>
    }
}

#[function_component(CoachesSection)]
pub fn coaches_section() -> Html {
    let coaches = use_memo(
        |_| {
            info!("Initializing coaches section");
            gallery::load_coaches().map_err(|e| {
                error!("Error loading coaches: {}", e);
                e
            })
        },
        (),
    );

    let grid = match coaches.as_ref() {
        Ok(coaches) => coaches.iter().map(coach_card).collect::<Html>(),
        Err(_) => html! {
            <p class="load-error">{"Could not load coaches. Please try again later."}</p>
        },
    };

    html! {
        <section id="coaches" class="coaches">
            <div class="container">
                <h2 class="section-title reveal">{"Meet Our Coaches"}</h2>
                <div id="coaches-grid" class="coaches-grid">{grid}</div>
            </div>
        </section>
    }
}
