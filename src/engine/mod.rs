pub mod layout;
pub mod width;
pub mod wrap;

pub use layout::{LayoutConfig, LayoutResult, SessionLayout, Viewport, compute_layout};
