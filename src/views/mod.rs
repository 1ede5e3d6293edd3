pub mod controls;
pub mod image_viewer;
pub mod metadata_panel;

pub use controls::{navigation_bar, tool_bar};
pub use image_viewer::{image_panel, viewport_scroll_id};
pub use metadata_panel::metadata_panel;
