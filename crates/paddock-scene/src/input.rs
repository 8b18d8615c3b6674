//! Pointer, keyboard and window input routing

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use bevy_egui::EguiContexts;
use paddock_core::ScrollInput;

use crate::controls::ViewerCommand;
use crate::sync::FrameInputBuffer;
use crate::{ViewerSet, ViewerState};

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (collect_pointer, keyboard_bindings, track_resize).in_set(ViewerSet::Input),
        );
    }
}

/// Scroll and orbit drag, only while the surface has focus and the pointer
/// is over it rather than over the UI
fn collect_pointer(
    mut buffer: ResMut<FrameInputBuffer>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    time: Res<Time>,
    mut contexts: EguiContexts,
) {
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area())
        .unwrap_or(false);
    let surface_active = windows
        .single()
        .map(|window| window.focused && window.cursor_position().is_some())
        .unwrap_or(false);
    let routed = surface_active && !egui_wants_pointer;

    let now = time.elapsed_secs_f64();
    for scroll in mouse_wheel.read() {
        if routed {
            // Wheel y is positive when scrolling up; the viewer expects down
            buffer.0.scroll.push(ScrollInput::new(-scroll.y, now));
        }
    }

    let motion: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    if routed && mouse_button.pressed(MouseButton::Left) {
        buffer.0.orbit_drag += motion;
    }
}

fn keyboard_bindings(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<ViewerState>,
    mut contexts: EguiContexts,
    mut commands: MessageWriter<ViewerCommand>,
) {
    let egui_wants_keyboard = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_keyboard_input())
        .unwrap_or(false);
    if egui_wants_keyboard {
        return;
    }

    if keys.just_pressed(KeyCode::ArrowRight) {
        commands.write(ViewerCommand::NextModel);
    }
    if keys.just_pressed(KeyCode::ArrowLeft) {
        commands.write(ViewerCommand::PreviousModel);
    }
    if keys.just_pressed(KeyCode::KeyR) {
        commands.write(ViewerCommand::ResetView);
    }
    if keys.just_pressed(KeyCode::KeyW) {
        commands.write(ViewerCommand::ToggleWireframe);
    }
    if keys.just_pressed(KeyCode::Space) {
        commands.write(ViewerCommand::ResetModel);
    }

    let catalog_len = state.0.catalog().len();
    for (index, key) in DIGIT_KEYS.iter().enumerate().take(catalog_len) {
        if keys.just_pressed(*key) {
            commands.write(ViewerCommand::SwitchTo(index));
        }
    }
}

const DIGIT_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

fn track_resize(mut state: ResMut<ViewerState>, mut resized: MessageReader<WindowResized>) {
    for event in resized.read() {
        let (width, height) = (event.width.round() as u32, event.height.round() as u32);
        match state.0.resize(width, height) {
            Ok(aspect) => tracing::debug!(width, height, aspect, "Render surface resized"),
            Err(err) => tracing::debug!(%err, "Ignoring resize"),
        }
    }
}
