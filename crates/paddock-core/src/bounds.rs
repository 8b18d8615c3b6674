//! Axis-aligned bounds and normalization into the canonical viewing frame

use bevy_math::{Mat4, Vec3};

use crate::scene::SceneGraph;

/// Largest dimension of a normalized asset, in world units
pub const CANONICAL_SIZE: f32 = 4.0;

/// Tolerance used by the normalization guarantees
pub const NORMALIZE_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    /// Bounds spanning two corners, in any order
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn max_dimension(&self) -> f32 {
        self.size().max_element()
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn translated(&self, offset: Vec3) -> Bounds {
        Bounds {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Axis-aligned bounds of this box after an affine transform
    pub fn transformed(&self, matrix: &Mat4) -> Bounds {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];
        let first = matrix.transform_point3(corners[0]);
        let (min, max) = corners[1..]
            .iter()
            .map(|c| matrix.transform_point3(*c))
            .fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Bounds { min, max }
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

/// Result of fitting an asset into the canonical frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    /// Uniform factor applied to the root scale
    pub scale: f32,
    /// Translation added to the root after scaling
    pub offset: Vec3,
    /// Bounds after normalization
    pub bounds: Bounds,
}

/// Scale the graph so its largest dimension equals `canonical_size`, then
/// move it so the box is centred on the origin in X/Z and rests on Y = 0.
///
/// Bounds are recomputed after scaling because the centre moves under the
/// root's existing rotation and translation. Returns `None` when the graph
/// has no geometry; such graphs are left untouched.
pub fn normalize(graph: &mut SceneGraph, canonical_size: f32) -> Option<Normalization> {
    let Some(initial) = graph.world_bounds().filter(Bounds::is_finite) else {
        tracing::warn!(root = %graph.node(graph.root()).name, "Asset has no renderable geometry");
        return None;
    };

    let max_dimension = initial.max_dimension();
    let scale = if max_dimension > f32::EPSILON {
        canonical_size / max_dimension
    } else {
        tracing::warn!(max_dimension, "Degenerate asset bounds, skipping rescale");
        1.0
    };

    let root = graph.root();
    graph.node_mut(root).transform.scale *= scale;

    let scaled = graph.world_bounds().unwrap_or(initial);
    let center = scaled.center();
    let offset = Vec3::new(-center.x, -scaled.min.y, -center.z);
    graph.node_mut(root).transform.translation += offset;

    let bounds = scaled.translated(offset);
    tracing::debug!(
        scale,
        size = ?bounds.size(),
        "Normalized asset into canonical frame"
    );

    Some(Normalization {
        scale,
        offset,
        bounds,
    })
}
