//! Damped orbit controls around a look-at target (Y up)

use bevy_math::{Vec2, Vec3};
use std::f32::consts::PI;

use crate::framing::CameraPose;

/// Keeps the polar angle away from the poles so `look_at` stays defined
const POLAR_MARGIN: f32 = 0.01;

/// Pending motion below this is dropped
const REST_THRESHOLD: f32 = 1e-5;

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pose: CameraPose,
    radius: f32,
    azimuth: f32,
    polar: f32,
    pending: Vec2,
    damping: f32,
    rotate_speed: f32,
}

impl OrbitControls {
    pub fn new(pose: CameraPose, damping: f32, rotate_speed: f32) -> Self {
        let mut controls = Self {
            pose,
            radius: 0.0,
            azimuth: 0.0,
            polar: 0.0,
            pending: Vec2::ZERO,
            damping: damping.clamp(f32::EPSILON, 1.0),
            rotate_speed,
        };
        controls.set_pose(pose);
        controls
    }

    /// Jump to a pose and cancel any motion still easing out
    pub fn set_pose(&mut self, pose: CameraPose) {
        let offset = pose.position - pose.target;
        self.radius = offset.length();
        self.azimuth = offset.x.atan2(offset.z);
        self.polar = if self.radius > 0.0 {
            (offset.y / self.radius).clamp(-1.0, 1.0).acos()
        } else {
            PI / 2.0
        };
        self.pending = Vec2::ZERO;
        self.pose = pose;
    }

    /// Queue a drag in screen pixels
    pub fn rotate(&mut self, drag: Vec2) {
        self.pending -= drag * self.rotate_speed;
    }

    pub fn is_moving(&self) -> bool {
        self.pending != Vec2::ZERO
    }

    /// Apply one frame of damped motion and return the resulting pose
    pub fn update(&mut self) -> CameraPose {
        if !self.is_moving() {
            return self.pose;
        }

        let step = self.pending * self.damping;
        self.azimuth += step.x;
        self.polar = (self.polar + step.y).clamp(POLAR_MARGIN, PI - POLAR_MARGIN);
        self.pending -= step;
        if self.pending.length() < REST_THRESHOLD {
            self.pending = Vec2::ZERO;
        }

        let sin_polar = self.polar.sin();
        let offset = Vec3::new(
            self.radius * sin_polar * self.azimuth.sin(),
            self.radius * self.polar.cos(),
            self.radius * sin_polar * self.azimuth.cos(),
        );
        self.pose.position = self.pose.target + offset;
        self.pose
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_at_rest_is_exact() {
        let pose = CameraPose::new(Vec3::new(12.0, 2.0, 4.0), Vec3::new(0.0, 1.0, 0.0));
        let mut controls = OrbitControls::new(pose, 0.05, 0.005);
        assert_eq!(controls.update(), pose);
        assert_eq!(controls.update(), pose);
    }

    #[test]
    fn test_drag_eases_out_and_keeps_radius() {
        let pose = CameraPose::RESET;
        let radius = (pose.position - pose.target).length();
        let mut controls = OrbitControls::new(pose, 0.05, 0.005);

        controls.rotate(Vec2::new(100.0, 0.0));
        let first = controls.update();
        let second = controls.update();

        assert_ne!(first.position, pose.position);
        assert_ne!(second.position, first.position);
        assert!(((first.position - first.target).length() - radius).abs() < 1e-4);
        assert_eq!(first.target, pose.target);

        for _ in 0..2000 {
            controls.update();
        }
        assert!(!controls.is_moving());
    }

    #[test]
    fn test_polar_is_clamped() {
        let mut controls = OrbitControls::new(CameraPose::RESET, 1.0, 1.0);
        controls.rotate(Vec2::new(0.0, 100.0));
        let pose = controls.update();
        assert!(pose.position.x.is_finite());
        assert!(pose.position.y > pose.target.y);
    }
}
