//! Asset requests and the payloads loaders hand back to the viewer

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::coordinator::{AssetTicket, Generation};
use crate::scene::SceneGraph;

/// What a load request fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    SceneGraph,
    EnvironmentMap,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::SceneGraph => write!(f, "scene graph"),
            AssetKind::EnvironmentMap => write!(f, "environment map"),
        }
    }
}

/// Lifecycle of a single request. Leaves `Pending` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetStatus {
    #[default]
    Pending,
    Loaded,
    Failed,
}

/// One outstanding load, owned by the coordinator until it settles
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRequest {
    pub ticket: AssetTicket,
    pub kind: AssetKind,
    /// Locator the loader resolves (asset path or URL)
    pub locator: String,
    pub status: AssetStatus,
}

impl AssetRequest {
    pub fn is_settled(&self) -> bool {
        self.status != AssetStatus::Pending
    }
}

/// What a loader delivers on success
#[derive(Debug, Clone)]
pub enum AssetPayload {
    /// Snapshot of the spawned scene hierarchy
    SceneGraph(SceneGraph),
    /// The environment map is resident; the host keeps the GPU handles
    EnvironmentMap,
}

impl AssetPayload {
    pub fn kind(&self) -> AssetKind {
        match self {
            AssetPayload::SceneGraph(_) => AssetKind::SceneGraph,
            AssetPayload::EnvironmentMap => AssetKind::EnvironmentMap,
        }
    }
}

/// Requests opened by one load cycle, for the host to start loading
#[derive(Debug, Clone, PartialEq)]
pub struct LoadPlan {
    pub generation: Generation,
    /// Catalog entry the cycle loads
    pub model_index: usize,
    pub requests: Vec<AssetRequest>,
}

impl LoadPlan {
    pub fn request(&self, kind: AssetKind) -> Option<&AssetRequest> {
        self.requests.iter().find(|r| r.kind == kind)
    }
}
