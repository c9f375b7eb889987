// Library target for integration tests and criterion benchmarks.
// The binary entry point is main.rs; this file re-declares the module tree so
// that tests can reach the engine and driver via `keysmash::*`.
// Some items are only used by the binary, so suppress dead_code warnings.
#![allow(dead_code)]

pub mod app;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod session;
pub mod ui;

// Private: only the binary drives these
mod event;
mod logging;
