//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - [`style`]: Theming and colors
//! - screen layout, the editor and preview panes, and modal overlays

pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod status;

pub use overlays::{menu_rect, picker_rect};
pub use render::{
    ScreenLayout, editor_text_area, gutter_width, line_number_width, preview_text_area, render,
    screen_layout,
};

#[cfg(test)]
mod tests;
