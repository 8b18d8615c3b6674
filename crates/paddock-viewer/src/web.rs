//! WASM entry point

use paddock_core::{Viewer, ViewerConfig};
use wasm_bindgen::prelude::*;

use crate::{app, select_initial_model, BUNDLED_CONFIG};

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::WARN)
            .build(),
    );

    let mut config = ViewerConfig::parse(BUNDLED_CONFIG).unwrap_or_else(|err| {
        tracing::warn!(%err, "Bundled configuration invalid, using defaults");
        ViewerConfig::default()
    });
    select_initial_model(&mut config, model_parameter().as_deref());

    match Viewer::new(config) {
        // Assets are served from the page root
        Ok(viewer) => app::run(viewer, String::new()),
        Err(err) => tracing::error!(%err, "Cannot start viewer"),
    }
}

/// `model` query parameter of the page URL
fn model_parameter() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    web_sys::UrlSearchParams::new_with_str(&search)
        .ok()?
        .get("model")
}
