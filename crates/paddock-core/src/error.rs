//! Error types shared across the viewer core

use thiserror::Error;

use crate::asset::AssetKind;
use crate::coordinator::AssetTicket;

/// Errors raised while loading or validating the viewer configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// A scene-graph or environment-map load that did not produce a usable asset
#[derive(Error, Debug, Clone, PartialEq)]
#[error("failed to load {kind} from {locator}: {reason}")]
pub struct LoadFailure {
    pub kind: AssetKind,
    pub locator: String,
    pub reason: String,
}

/// Misuse of the load coordinator by a loader
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorError {
    #[error("ticket {0:?} was never registered in the current cycle")]
    UnknownTicket(AssetTicket),
    #[error("ticket {0:?} has already been resolved or rejected")]
    AlreadySettled(AssetTicket),
}

/// Rejected model switch
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchError {
    #[error("model index {requested} is outside the catalog (size {catalog_len})")]
    OutOfRange { requested: usize, catalog_len: usize },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportError {
    #[error("render surface must be non-zero, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
}
