use log::Level;

/// Widths at or below this use the collapsible mobile menu.
pub const DESKTOP_BREAKPOINT: i32 = 992;
/// Narrow phones. Clicking a nav link here also closes the menu.
pub const MOBILE_BREAKPOINT: i32 = 768;

pub const SCROLLED_OFFSET: f64 = 50.0;
pub const BACK_TO_TOP_OFFSET: f64 = 300.0;
pub const SECTION_PROBE_OFFSET: f64 = 100.0;
pub const HEADER_OFFSET: f64 = 80.0;

pub const RESIZE_DEBOUNCE_MS: u32 = 100;
pub const FOCUS_DELAY_MS: u32 = 50;
pub const OUTSIDE_CLICK_ARM_MS: u32 = 10;

pub const THEME_STORAGE_KEY: &str = "theme";
pub const JOIN_MODAL_ID: &str = "join-modal";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Chatty while running locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}
