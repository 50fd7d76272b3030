use std::collections::BTreeMap;

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;
use web_sys::window;
use yew::prelude::*;

use crate::config::MOBILE_BREAKPOINT;
use crate::error::PageError;

const SLIDER_SELECTOR: &str = ".testimonial-slider";

#[wasm_bindgen]
extern "C" {
    /// Global from the Swiper script tag.
    type Swiper;

    #[wasm_bindgen(constructor, catch)]
    fn new(selector: &str, config: &JsValue) -> Result<Swiper, JsValue>;

    #[wasm_bindgen(method)]
    fn destroy(this: &Swiper, delete_instance: bool, clean_styles: bool);
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub el: &'static str,
    pub clickable: bool,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    pub next_el: &'static str,
    pub prev_el: &'static str,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    pub slides_per_view: u32,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SwiperConfig {
    #[serde(rename = "loop")]
    pub looped: bool,
    pub slides_per_view: u32,
    pub space_between: u32,
    pub lazy: bool,
    pub pagination: Pagination,
    pub navigation: Navigation,
    pub breakpoints: BTreeMap<String, Breakpoint>,
}

impl Default for SwiperConfig {
    fn default() -> Self {
        let mut breakpoints = BTreeMap::new();
        breakpoints.insert(MOBILE_BREAKPOINT.to_string(), Breakpoint { slides_per_view: 2 });
        Self {
            looped: true,
            slides_per_view: 1,
            space_between: 30,
            lazy: true,
            pagination: Pagination {
                el: ".swiper-pagination",
                clickable: true,
            },
            navigation: Navigation {
                next_el: ".swiper-button-next",
                prev_el: ".swiper-button-prev",
            },
            breakpoints,
        }
    }
}

/// A live Swiper instance, destroyed on drop.
pub struct Carousel {
    swiper: Swiper,
}

impl Carousel {
    pub fn init() -> Result<Self, PageError> {
        let document = window()
            .and_then(|w| w.document())
            .ok_or(PageError::MissingElement("document"))?;
        if document.query_selector(SLIDER_SELECTOR)?.is_none() {
            return Err(PageError::MissingElement("testimonial slider"));
        }

        let config = SwiperConfig::default()
            .serialize(&Serializer::json_compatible())
            .map_err(|e| PageError::Js(e.to_string()))?;
        let swiper = Swiper::new(SLIDER_SELECTOR, &config)?;
        info!("Testimonial carousel started");
        Ok(Self { swiper })
    }
}

impl Drop for Carousel {
    fn drop(&mut self) {
        self.swiper.destroy(true, true);
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Testimonial {
    pub quote: String,
    pub author: String,
    pub role: String,
}

pub fn load_testimonials() -> Result<Vec<Testimonial>, PageError> {
    serde_json::from_str(include_str!("../../data/testimonials.json"))
        .map_err(|source| PageError::Data { what: "testimonials", source })
}

#[function_component(Testimonials)]
pub fn testimonials() -> Html {
    let entries = use_memo(
        |_| {
            load_testimonials().unwrap_or_else(|e| {
                error!("{}", e);
                Vec::new()
            })
        },
        (),
    );

    use_effect_with_deps(
        |_| {
            let carousel = Carousel::init()
                .map_err(|e| warn!("Carousel not started: {}", e))
                .ok();
            move || drop(carousel)
        },
        (),
    );

    html! {
        <section id="testimonials" class="testimonials">
            <div class="container">
                <h2 class="section-title reveal">{"What Our Members Say"}</h2>
                <div class="testimonial-slider swiper">
                    <div class="swiper-wrapper">
                        { for entries.iter().map(|t| html! {
                            <div class="swiper-slide" key={t.author.clone()}>
                                <div class="testimonial-card">
                                    <p class="testimonial-quote">{&t.quote}</p>
                                    <h4>{&t.author}</h4>
                                    <span>{&t.role}</span>
                                </div>
                            </div>
                        }) }
                    </div>
                    <div class="swiper-pagination"></div>
                    <div class="swiper-button-prev"></div>
                    <div class="swiper-button-next"></div>
                </div>
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn carousel_config_matches_library_options() {
        let config = serde_json::to_value(SwiperConfig::default()).unwrap();
        assert_eq!(
            config,
            json!({
                "loop": true,
                "slidesPerView": 1,
                "spaceBetween": 30,
                "lazy": true,
                "pagination": { "el": ".swiper-pagination", "clickable": true },
                "navigation": {
                    "nextEl": ".swiper-button-next",
                    "prevEl": ".swiper-button-prev"
                },
                "breakpoints": { "768": { "slidesPerView": 2 } }
            })
        );
    }

    #[test]
    fn bundled_testimonials_decode() {
        let entries = load_testimonials().unwrap();
        assert!(entries.iter().all(|t| !t.quote.is_empty() && !t.author.is_empty()));
    }
}
