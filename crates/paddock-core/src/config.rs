//! Viewer configuration: model catalog, environment and tuning constants

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::animator::Axis;
use crate::bounds::CANONICAL_SIZE;
use crate::error::ConfigError;
use crate::framing::FRAMING_DISTANCE;

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Display name shown in the model menu
    pub name: String,
    /// Scene-graph asset locator (asset path or URL)
    pub source: String,
}

impl ModelConfig {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Catalog index shown first
    #[serde(default)]
    pub initial_model: usize,
    #[serde(default = "default_models")]
    pub models: Vec<ModelConfig>,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default)]
    pub framing: FramingConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub orbit: OrbitConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            initial_model: 0,
            models: default_models(),
            environment: EnvironmentConfig::default(),
            normalize: NormalizeConfig::default(),
            framing: FramingConfig::default(),
            animation: AnimationConfig::default(),
            orbit: OrbitConfig::default(),
        }
    }
}

fn default_models() -> Vec<ModelConfig> {
    vec![ModelConfig::new("Alpine", "models/F1-2025 Alpine A525.glb")]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Specular cubemap locator
    #[serde(default = "default_environment_map")]
    pub map: String,
    /// Diffuse irradiance cubemap locator (defaults to `map`)
    #[serde(default)]
    pub irradiance: Option<String>,
    #[serde(default = "default_environment_intensity")]
    pub intensity: f32,
}

impl EnvironmentConfig {
    pub fn irradiance_locator(&self) -> &str {
        self.irradiance.as_deref().unwrap_or(&self.map)
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            map: default_environment_map(),
            irradiance: None,
            intensity: default_environment_intensity(),
        }
    }
}

fn default_environment_map() -> String {
    "environment/studio_specular.ktx2".to_string()
}

fn default_environment_intensity() -> f32 {
    900.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizeConfig {
    /// Largest dimension after normalization, in world units
    #[serde(default = "default_canonical_size")]
    pub canonical_size: f32,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            canonical_size: default_canonical_size(),
        }
    }
}

fn default_canonical_size() -> f32 {
    CANONICAL_SIZE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramingConfig {
    #[serde(default = "default_distance")]
    pub distance: f32,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            distance: default_distance(),
        }
    }
}

fn default_distance() -> f32 {
    FRAMING_DISTANCE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Translation per scroll event
    #[serde(default = "default_step_size")]
    pub step_size: f32,
    /// Wheel rotation per scroll event, in radians
    #[serde(default = "default_rotation_speed")]
    pub rotation_speed: f32,
    #[serde(default)]
    pub translation_axis: Axis,
    #[serde(default = "default_spin_axis")]
    pub spin_axis: Axis,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            step_size: default_step_size(),
            rotation_speed: default_rotation_speed(),
            translation_axis: Axis::Z,
            spin_axis: default_spin_axis(),
        }
    }
}

fn default_step_size() -> f32 {
    0.1
}

fn default_rotation_speed() -> f32 {
    0.2
}

fn default_spin_axis() -> Axis {
    Axis::X
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitConfig {
    /// Fraction of pending orbit motion applied per frame
    #[serde(default = "default_damping")]
    pub damping: f32,
    /// Radians per dragged pixel
    #[serde(default = "default_rotate_speed")]
    pub rotate_speed: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            rotate_speed: default_rotate_speed(),
        }
    }
}

fn default_damping() -> f32 {
    0.05
}

fn default_rotate_speed() -> f32 {
    0.005
}

impl ViewerConfig {
    /// Parse TOML, or JSON when the content is an object
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = if content.trim_start().starts_with('{') {
            serde_json::from_str(content)?
        } else {
            toml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!(
                path = %path.display(),
                "Configuration file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = if path.extension().is_some_and(|ext| ext == "json") {
            let config: ViewerConfig = serde_json::from_str(&content)?;
            config.validate()?;
            config
        } else {
            Self::parse(&content)?
        };
        tracing::info!(
            path = %path.display(),
            models = config.models.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.models.is_empty() {
            return Err(ConfigError::Invalid("model catalog is empty".to_string()));
        }
        if self.initial_model >= self.models.len() {
            return Err(ConfigError::Invalid(format!(
                "initial_model {} is outside the catalog (size {})",
                self.initial_model,
                self.models.len()
            )));
        }
        if let Some(model) = self.models.iter().find(|m| m.source.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "model '{}' has no source",
                model.name
            )));
        }
        let positive = [
            ("normalize.canonical_size", self.normalize.canonical_size),
            ("framing.distance", self.framing.distance),
            ("animation.step_size", self.animation.step_size),
            ("orbit.damping", self.orbit.damping),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        let finite = [
            ("animation.rotation_speed", self.animation.rotation_speed),
            ("orbit.rotate_speed", self.orbit.rotate_speed),
        ];
        if let Some((name, value)) = finite.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "{name} must be finite, got {value}"
            )));
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.models.len(), 1);
        assert_eq!(config.models[0].name, "Alpine");
        assert_eq!(config.normalize.canonical_size, 4.0);
        assert_eq!(config.framing.distance, 8.0);
        assert_eq!(config.animation.spin_axis, Axis::X);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml_catalog() {
        let config = ViewerConfig::parse(
            r#"
            initial_model = 1

            [[models]]
            name = "Alpine"
            source = "models/alpine.glb"

            [[models]]
            name = "Ferrari"
            source = "https://cdn.example.com/ferrari.glb"

            [animation]
            step_size = 0.25
            translation_axis = "x"
            "#,
        )
        .unwrap();

        assert_eq!(config.models.len(), 2);
        assert_eq!(config.initial_model, 1);
        assert_eq!(config.animation.step_size, 0.25);
        assert_eq!(config.animation.translation_axis, Axis::X);
        assert_eq!(config.animation.rotation_speed, 0.2);
        assert_eq!(config.environment.irradiance_locator(), config.environment.map);
    }

    #[test]
    fn test_parse_json_catalog() {
        let config = ViewerConfig::parse(
            r#"{ "models": [{ "name": "McLaren", "source": "models/mcl.glb" }] }"#,
        )
        .unwrap();
        assert_eq!(config.models[0].name, "McLaren");
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(matches!(
            ViewerConfig::parse("models = []"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ViewerConfig::parse("initial_model = 3"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ViewerConfig::parse("[normalize]\ncanonical_size = 0.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ViewerConfig::parse("[animation]\nrotation_speed = nan"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ViewerConfig::parse("[orbit]\nrotate_speed = inf"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ViewerConfig::parse("[[models]]\nname = \"x\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ViewerConfig::load(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("paddock.toml");

        let mut config = ViewerConfig::default();
        config.models.push(ModelConfig::new("Williams", "models/williams.glb"));
        config.save(&path).unwrap();

        let loaded = ViewerConfig::load(&path).unwrap();
        assert_eq!(loaded.models, config.models);
    }
}
