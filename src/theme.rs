use log::{info, warn};
use web_sys::{window, HtmlInputElement};
use yew::prelude::*;

use crate::config::THEME_STORAGE_KEY;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Anything other than `"dark"` falls back to light.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn from_checked(checked: bool) -> Self {
        if checked {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn load() -> Self {
        let stored = window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|storage| storage.get_item(THEME_STORAGE_KEY).ok())
            .flatten();
        Theme::from_stored(stored.as_deref())
    }

    pub fn store(self) {
        if let Some(window) = window() {
            if let Ok(Some(storage)) = window.local_storage() {
                if storage.set_item(THEME_STORAGE_KEY, self.as_str()).is_err() {
                    warn!("Could not persist theme preference");
                }
            }
        }
    }

    pub fn apply(self) {
        if let Some(body) = window().and_then(|w| w.document()).and_then(|d| d.body()) {
            let _ = body.class_list().toggle_with_force("dark-mode", self.is_dark());
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct ThemeToggleProps {
    /// Preference read at startup.
    pub initial: Theme,
}

#[function_component(ThemeToggle)]
pub fn theme_toggle(props: &ThemeToggleProps) -> Html {
    let theme = use_state(|| props.initial);

    let onchange = {
        let theme = theme.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let next = Theme::from_checked(input.checked());
            next.apply();
            next.store();
            info!("Theme switched to {}", next.as_str());
            theme.set(next);
        })
    };

    html! {
        <label class="theme-switch" for="theme-toggle">
            <input
                type="checkbox"
                id="theme-toggle"
                checked={theme.is_dark()}
                {onchange}
            />
            <span class="slider round"></span>
        </label>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_unknown_preference_is_light() {
        assert_eq!(Theme::from_stored(None), Theme::Light);
        assert_eq!(Theme::from_stored(Some("light")), Theme::Light);
        assert_eq!(Theme::from_stored(Some("DARK")), Theme::Light);
        assert_eq!(Theme::from_stored(Some("")), Theme::Light);
    }

    #[test]
    fn dark_preference_survives_storage_round() {
        let stored = Theme::from_checked(true).as_str();
        assert_eq!(stored, "dark");
        assert_eq!(Theme::from_stored(Some(stored)), Theme::Dark);
    }

    #[test]
    fn unchecked_toggle_means_light() {
        assert_eq!(Theme::from_checked(false), Theme::Light);
        assert!(!Theme::default().is_dark());
    }
}
