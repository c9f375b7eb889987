pub mod dashboard;
pub mod menu;
pub mod progress_bar;
pub mod status;
pub mod typing_area;
