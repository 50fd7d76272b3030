use log::info;
use yew::prelude::*;

mod config;
mod error;
mod gallery;
mod membership;
mod theme;
mod behavior {
    pub mod count_up;
    pub mod debounce;
    pub mod observers;
    pub mod scroll;
    pub mod smooth_scroll;
}
mod components {
    pub mod coaches;
    pub mod events;
    pub mod membership_modal;
    pub mod nav;
    pub mod scroll_widgets;
    pub mod testimonials;
}
mod pages {
    pub mod home;
}

use pages::home::Home;
use theme::Theme;

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub theme: Theme,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    html! {
        <Home theme={props.theme} />
    }
}

fn main() {
    console_error_panic_hook::set_once();

    // Only fails if a logger is already installed.
    let _ = console_log::init_with_level(config::log_level());

    // Applied before the first render so the page never flashes the wrong theme.
    let theme = Theme::load();
    theme.apply();
    if theme.is_dark() {
        info!("Restored dark theme");
    }

    info!("Starting club site");
    yew::Renderer::<App>::with_props(AppProps { theme }).render();
}
