pub mod input;
pub mod metrics;
pub mod result;
pub mod state;
