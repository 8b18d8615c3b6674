//! Scroll-driven translation and wheel spin

use bevy_math::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::config::AnimationConfig;

/// Principal axis in the asset's local frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    #[default]
    Z,
}

impl Axis {
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// One pointer-wheel event. Positive `delta` means scrolling down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollInput {
    pub delta: f32,
    /// Seconds on the host clock
    pub timestamp: f64,
}

impl ScrollInput {
    pub fn new(delta: f32, timestamp: f64) -> Self {
        Self { delta, timestamp }
    }
}

/// Increment produced by one accepted scroll event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollStep {
    pub direction: f32,
    pub translation_offset: f32,
    pub wheel_spin: f32,
}

/// Converts scroll events into a cumulative translation offset and wheel
/// spin. Every event moves by a fixed step regardless of its magnitude or
/// timing.
#[derive(Debug, Clone)]
pub struct InteractionAnimator {
    settings: AnimationConfig,
    translation_offset: f32,
    wheel_spin: f32,
    last_event_at: Option<f64>,
    // Inter-event time is recorded for a future velocity model; stepping
    // ignores it.
    last_interval: Option<f64>,
}

impl InteractionAnimator {
    pub fn new(settings: AnimationConfig) -> Self {
        Self {
            settings,
            translation_offset: 0.0,
            wheel_spin: 0.0,
            last_event_at: None,
            last_interval: None,
        }
    }

    pub fn settings(&self) -> &AnimationConfig {
        &self.settings
    }

    pub fn translation_offset(&self) -> f32 {
        self.translation_offset
    }

    /// Cumulative wheel rotation in radians, wrapped to (-TAU, TAU)
    pub fn wheel_spin(&self) -> f32 {
        self.wheel_spin
    }

    pub fn last_interval(&self) -> Option<f64> {
        self.last_interval
    }

    /// Accumulate one event. Zero or non-finite deltas only update timing.
    pub fn on_scroll(&mut self, input: ScrollInput) -> Option<ScrollStep> {
        if let Some(previous) = self.last_event_at {
            self.last_interval = Some((input.timestamp - previous).max(0.0));
        }
        self.last_event_at = Some(input.timestamp);

        if !input.delta.is_finite() || input.delta == 0.0 {
            return None;
        }

        let direction = input.delta.signum();
        self.translation_offset += direction * self.settings.step_size;
        self.wheel_spin = (self.wheel_spin + direction * self.settings.rotation_speed) % TAU;

        Some(ScrollStep {
            direction,
            translation_offset: self.translation_offset,
            wheel_spin: self.wheel_spin,
        })
    }

    /// Back to rest; timing history is kept
    pub fn reset(&mut self) {
        self.translation_offset = 0.0;
        self.wheel_spin = 0.0;
    }

    /// Root translation for a given rest position. The offset is added to the
    /// normalized rest position rather than replacing it, so the asset stays
    /// grounded and centred on the other axes.
    pub fn root_translation(&self, rest: Vec3) -> Vec3 {
        let mut translation = rest;
        translation[self.settings.translation_axis.index()] += self.translation_offset;
        translation
    }

    /// Wheel rotation for a given rest rotation
    pub fn wheel_rotation(&self, rest: Quat) -> Quat {
        rest * Quat::from_axis_angle(self.settings.spin_axis.unit(), self.wheel_spin)
    }
}
