//! Client side of the DeepTrace case network view: the force-directed graph,
//! its filters, and the glue that keeps it in step with partial page swaps.

use log::{Level, error, info};
use wasm_bindgen::prelude::*;

// Modules
mod bridge;
mod components;
mod config;
mod error;
mod view;
mod widgets;

pub use config::BridgeConfig;
pub use error::BridgeError;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Entry point run when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() {
	init_logging();
	let config = BridgeConfig::from_document();
	if let Err(err) = bridge::install(config) {
		error!("navigation bridge not installed: {err}");
	}
	if let Err(err) = widgets::install() {
		error!("page widgets not installed: {err}");
	}
}
