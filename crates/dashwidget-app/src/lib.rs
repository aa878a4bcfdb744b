//! Dashwidget Application
//!
//! Shells around the core dashboard: a command line tool on native
//! platforms and a `wasm-bindgen` binding for the browser.

pub mod render;

#[cfg(feature = "native")]
pub mod cli;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{run_wasm, WasmDashboard};
