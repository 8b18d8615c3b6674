//! Per-frame tick inputs and outputs

use bevy_math::Vec2;

use crate::animator::ScrollInput;
use crate::framing::CameraPose;
use crate::scene::{NodeId, NodeTransform, SceneGraph};

/// Everything the host gathered since the previous tick
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub scroll: Vec<ScrollInput>,
    /// Pointer drag in pixels, fed to the orbit controls
    pub orbit_drag: Vec2,
}

/// Local transform the host must apply to a node of the active asset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeWrite {
    pub node: NodeId,
    /// Host key recorded on the node when the graph was snapshotted
    pub key: Option<u64>,
    pub transform: NodeTransform,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub frame: u64,
    pub camera: CameraPose,
    pub writes: Vec<NodeWrite>,
    /// Orientation-locked nodes re-pinned this tick
    pub pinned: usize,
}

/// Gate for the continuous tick. Stays closed until the first load cycle
/// completes, then never closes again.
#[derive(Debug, Clone, Default)]
pub struct RenderLoop {
    running: bool,
    frame: u64,
}

impl RenderLoop {
    /// Returns `true` on the call that opened the gate
    pub fn start(&mut self) -> bool {
        let opened = !self.running;
        self.running = true;
        opened
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Count one drawn frame
    pub fn advance(&mut self) -> Option<u64> {
        if !self.running {
            return None;
        }
        self.frame += 1;
        Some(self.frame)
    }
}

/// Reset the local rotation of every locked node to identity
pub fn pin_locked(graph: &mut SceneGraph, locked: &[NodeId]) -> usize {
    for &node in locked {
        graph.node_mut(node).transform.rotation = bevy_math::Quat::IDENTITY;
    }
    locked.len()
}
