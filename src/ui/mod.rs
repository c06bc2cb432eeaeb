//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`render()`]: The full dashboard frame
//! - [`dashboard_layout`]: Where each region sits, shared with mouse hit-testing
//! - [`style`]: Theming and colors

pub mod style;

mod overlays;
mod pagination;
mod render;
mod status;

pub use pagination::{PageButton, pagination_buttons, pagination_hit_regions};
pub use render::{DashboardLayout, dashboard_layout, render};
pub use status::retry_button_rect;

/// Height of the bordered search field.
pub const SEARCH_BAR_HEIGHT: u16 = 3;
/// Rows used by one result card, including its spacer.
pub const CARD_HEIGHT: u16 = 4;
