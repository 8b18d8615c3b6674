//! Paddock Core - Asset orchestration and interaction state for the viewer
//!
//! Everything here runs without a display loop:
//! - Load coordination with generation-numbered cycles
//! - Bounding-box normalization and camera framing
//! - Part classification by node name, with orientation locks
//! - Scroll-driven animation and damped orbit controls
//! - Model switching and the per-frame tick, tied together by [`Viewer`]
//!
//! Hosts snapshot whatever they spawned into a [`SceneGraph`], hand it to
//! the viewer, and write the returned [`NodeWrite`]s back every frame.

pub mod animator;
pub mod asset;
pub mod bounds;
pub mod classify;
pub mod config;
pub mod coordinator;
pub mod environment;
pub mod error;
pub mod framing;
pub mod orbit;
pub mod render;
pub mod scene;
pub mod switch;
pub mod viewer;
pub mod viewport;

pub use animator::{Axis, InteractionAnimator, ScrollInput, ScrollStep};
pub use asset::{AssetKind, AssetPayload, AssetRequest, AssetStatus, LoadPlan};
pub use bounds::{normalize, Bounds, Normalization, CANONICAL_SIZE};
pub use classify::{classify, Classification, PartNode, PartRole};
pub use config::{ModelConfig, ViewerConfig};
pub use coordinator::{AssetTicket, Generation, LoadCoordinator, Resolution};
pub use environment::{Environment, GradientLighting};
pub use error::{ConfigError, CoordinatorError, LoadFailure, SwitchError, ViewportError};
pub use framing::{frame_asset, CameraPose, FRAMING_DISTANCE};
pub use orbit::OrbitControls;
pub use render::{FrameInput, FrameOutcome, NodeWrite, RenderLoop};
pub use scene::{NodeId, NodeTransform, SceneGraph, SceneNode};
pub use switch::{ModelSwitch, SwitchOutcome, SwitchState};
pub use viewer::{ActiveAsset, Viewer, ViewerEvent};
pub use viewport::Viewport;
