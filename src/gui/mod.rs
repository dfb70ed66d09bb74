pub mod grid_view;
pub mod log_panel;
pub mod selection_view;
pub mod toolbar;
