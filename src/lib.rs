//! Portfolio website: a project grid and per-project pages rendered from a
//! JSON data file, served locally, plus the gallery lightbox.

pub mod constants;
pub mod lightbox;
pub mod loader;
pub mod model;
pub mod render;

#[cfg(not(target_arch = "wasm32"))]
pub mod assets;
#[cfg(not(target_arch = "wasm32"))]
pub mod server;
#[cfg(not(target_arch = "wasm32"))]
pub mod settings;

#[cfg(target_arch = "wasm32")]
mod web;
