//! Browser bindings for the Murasaki pointer follower.
//!
//! This crate only adapts the DOM to the engine in `murasaki-cursor-core`:
//! it registers the document listeners, drives the `requestAnimationFrame`
//! chain and writes the overlay's inline style. All smoothing and state
//! logic lives in the core crate.

mod cursor;
mod scroll;
mod sink;
mod target;

use wasm_bindgen::prelude::*;

pub use cursor::CursorOverlay;
pub use scroll::ScrollSync;
pub use sink::StyleSink;
pub use target::DomTarget;

/// Installs the panic hook and routes `tracing`/`log` output to the console.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        tracing::debug!("console logger already installed");
    }
}
