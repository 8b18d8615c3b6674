//! Owned snapshot of a loaded scene hierarchy
//!
//! Hosts build a [`SceneGraph`] from whatever they spawned (the Bevy
//! plugin walks the entity hierarchy) and tag each node with an opaque
//! `key` so transforms computed here can be written back.

use bevy_math::{Mat4, Quat, Vec3};

use crate::bounds::Bounds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Local translation, rotation and scale of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl NodeTransform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub transform: NodeTransform,
    /// Local-space bounds of geometry attached directly to this node
    pub mesh_bounds: Option<Bounds>,
    /// Host handle used to write transforms back
    pub key: Option<u64>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    pub fn has_mesh(&self) -> bool {
        self.mesh_bounds.is_some()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Tree of nodes rooted at `NodeId(0)`
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![SceneNode {
                name: root_name.into(),
                transform: NodeTransform::IDENTITY,
                mesh_bounds: None,
                key: None,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: NodeTransform,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode {
            name: name.into(),
            transform,
            mesh_bounds: None,
            key: None,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn set_mesh_bounds(&mut self, id: NodeId, bounds: Bounds) {
        self.nodes[id.0].mesh_bounds = Some(bounds);
    }

    pub fn set_key(&mut self, id: NodeId, key: u64) {
        self.nodes[id.0].key = Some(key);
    }

    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut SceneNode {
        &mut self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn find_by_key(&self, key: u64) -> Option<NodeId> {
        self.iter().find(|(_, n)| n.key == Some(key)).map(|(id, _)| id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.iter().find(|(_, n)| n.name == name).map(|(id, _)| id)
    }

    /// Composed transform from node-local space to world space
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = self.nodes[id.0].transform.matrix();
        let mut current = self.nodes[id.0].parent;
        while let Some(parent) = current {
            matrix = self.nodes[parent.0].transform.matrix() * matrix;
            current = self.nodes[parent.0].parent;
        }
        matrix
    }

    /// World-space bounds over every mesh-bearing node
    pub fn world_bounds(&self) -> Option<Bounds> {
        let mut result: Option<Bounds> = None;
        let mut stack = vec![(self.root(), Mat4::IDENTITY)];
        while let Some((id, parent_matrix)) = stack.pop() {
            let node = &self.nodes[id.0];
            let matrix = parent_matrix * node.transform.matrix();
            if let Some(local) = node.mesh_bounds {
                let world = local.transformed(&matrix);
                result = Some(match result {
                    Some(acc) => acc.union(&world),
                    None => world,
                });
            }
            stack.extend(node.children.iter().map(|&child| (child, matrix)));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_matrix_composes_parents() {
        let mut graph = SceneGraph::new("root");
        graph.node_mut(graph.root()).transform = NodeTransform::IDENTITY.with_scale(Vec3::splat(2.0));
        let arm = graph.add_child(graph.root(), "arm", NodeTransform::from_translation(Vec3::X));
        let hand = graph.add_child(arm, "hand", NodeTransform::from_translation(Vec3::Y));

        let p = graph.world_matrix(hand).transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(2.0, 2.0, 0.0)).length() < 1e-6);
        assert_eq!(graph.node(hand).parent(), Some(arm));
        assert_eq!(graph.node(arm).children(), &[hand]);
    }

    #[test]
    fn test_world_bounds_skips_meshless_nodes() {
        let mut graph = SceneGraph::new("root");
        assert!(graph.world_bounds().is_none());

        let a = graph.add_child(graph.root(), "a", NodeTransform::from_translation(Vec3::new(5.0, 0.0, 0.0)));
        graph.set_mesh_bounds(a, Bounds::new(Vec3::splat(-1.0), Vec3::splat(1.0)));
        graph.add_child(graph.root(), "empty", NodeTransform::from_translation(Vec3::splat(100.0)));

        let bounds = graph.world_bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(4.0, -1.0, -1.0));
        assert_eq!(bounds.max, Vec3::new(6.0, 1.0, 1.0));
    }

    #[test]
    fn test_find_by_key() {
        let mut graph = SceneGraph::new("root");
        let child = graph.add_child(graph.root(), "child", NodeTransform::default());
        graph.set_key(child, 42);
        assert_eq!(graph.find_by_key(42), Some(child));
        assert_eq!(graph.find_by_key(7), None);
        assert_eq!(graph.find_by_name("child"), Some(child));
    }
}
