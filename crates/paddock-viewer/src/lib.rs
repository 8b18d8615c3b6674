//! Paddock Viewer - interactive vehicle model viewer
//!
//! Shared app setup for the native binary and the WASM build.

pub mod app;

#[cfg(target_arch = "wasm32")]
mod web;

use paddock_core::ViewerConfig;

/// Catalog and tuning bundled into the WASM build
pub const BUNDLED_CONFIG: &str = include_str!("../../../paddock.toml");

/// Apply a `?model=N` selection, ignoring indices outside the catalog
pub fn select_initial_model(config: &mut ViewerConfig, requested: Option<&str>) {
    let Some(raw) = requested else {
        return;
    };
    match raw.trim().parse::<usize>() {
        Ok(index) if index < config.models.len() => config.initial_model = index,
        _ => tracing::warn!(requested = raw, "Ignoring invalid model selection"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paddock_core::ModelConfig;

    #[test]
    fn test_bundled_config_is_valid() {
        let config = ViewerConfig::parse(BUNDLED_CONFIG).unwrap();
        assert!(!config.models.is_empty());
    }

    #[test]
    fn test_select_initial_model() {
        let mut config = ViewerConfig::default();
        config.models.push(ModelConfig::new("Ferrari", "models/ferrari.glb"));

        select_initial_model(&mut config, Some("1"));
        assert_eq!(config.initial_model, 1);

        select_initial_model(&mut config, Some("7"));
        select_initial_model(&mut config, Some("-1"));
        select_initial_model(&mut config, None);
        assert_eq!(config.initial_model, 1);
    }
}
