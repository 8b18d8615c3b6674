//! Semantic part classification by node name

use bevy_math::Quat;

use crate::scene::{NodeId, SceneGraph};

/// Substrings marking a spinning wheel (matched case-insensitively)
pub const WHEEL_TOKENS: &[&str] = &["wheel", "tekerlek", "tire"];

/// Substrings marking the car body, whose orientation stays pinned
pub const BODY_TOKENS: &[&str] = &["body", "baked"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartRole {
    Wheel,
    Body { locked: bool },
    Other,
}

/// Classified mesh-bearing node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartNode {
    pub node: NodeId,
    pub role: PartRole,
}

impl PartNode {
    pub fn is_orientation_locked(&self) -> bool {
        matches!(self.role, PartRole::Body { locked: true })
    }
}

/// Role for a node name. Wheel tokens win over body tokens.
pub fn role_for_name(name: &str) -> PartRole {
    let lower = name.to_lowercase();
    if WHEEL_TOKENS.iter().any(|token| lower.contains(token)) {
        PartRole::Wheel
    } else if BODY_TOKENS.iter().any(|token| lower.contains(token)) {
        PartRole::Body { locked: true }
    } else {
        PartRole::Other
    }
}

/// Roles assigned once per load
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    parts: Vec<PartNode>,
    wheels: Vec<NodeId>,
    locked: Vec<NodeId>,
}

impl Classification {
    pub fn parts(&self) -> &[PartNode] {
        &self.parts
    }

    pub fn wheels(&self) -> &[NodeId] {
        &self.wheels
    }

    /// Nodes whose local rotation is re-pinned to identity every frame
    pub fn locked(&self) -> &[NodeId] {
        &self.locked
    }

    pub fn role_of(&self, node: NodeId) -> Option<PartRole> {
        self.parts.iter().find(|p| p.node == node).map(|p| p.role)
    }

    /// No node matched a wheel or body token
    pub fn is_ambiguous(&self) -> bool {
        self.parts.iter().all(|p| p.role == PartRole::Other)
    }
}

/// Tag every mesh-bearing node and zero the rotation of locked ones.
pub fn classify(graph: &mut SceneGraph) -> Classification {
    let mut classification = Classification::default();

    let meshes: Vec<(NodeId, PartRole)> = graph
        .iter()
        .filter(|(_, node)| node.has_mesh())
        .map(|(id, node)| (id, role_for_name(&node.name)))
        .collect();

    for (node, role) in meshes {
        let part = PartNode { node, role };
        match role {
            PartRole::Wheel => classification.wheels.push(node),
            PartRole::Body { locked: true } => {
                graph.node_mut(node).transform.rotation = Quat::IDENTITY;
                classification.locked.push(node);
            }
            PartRole::Body { locked: false } | PartRole::Other => {}
        }
        classification.parts.push(part);
    }

    if classification.is_ambiguous() {
        tracing::warn!(
            meshes = classification.parts.len(),
            "No wheel or body parts recognised; scroll will only translate the asset"
        );
    } else {
        tracing::info!(
            wheels = classification.wheels.len(),
            locked = classification.locked.len(),
            other = classification.parts.len() - classification.wheels.len() - classification.locked.len(),
            "Classified asset parts"
        );
    }

    classification
}
