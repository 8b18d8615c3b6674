//! Per-frame tick and viewer event forwarding

use bevy::prelude::*;
use paddock_core::{FrameInput, ViewerEvent};

use crate::lighting::MainCamera;
use crate::loading::AssetRoot;
use crate::{ViewerSet, ViewerState};

/// Viewer event re-broadcast to the ECS
#[derive(Message, Debug, Clone)]
pub struct ViewerMessage(pub ViewerEvent);

/// Input gathered since the last tick
#[derive(Resource, Default)]
pub struct FrameInputBuffer(pub FrameInput);

pub struct SyncPlugin;

impl Plugin for SyncPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ViewerMessage>()
            .init_resource::<FrameInputBuffer>()
            .add_systems(
                Update,
                (run_frame, forward_events).chain().in_set(ViewerSet::Tick),
            )
            .add_systems(Update, apply_asset_visibility.in_set(ViewerSet::React));
    }
}

fn run_frame(
    mut state: ResMut<ViewerState>,
    mut buffer: ResMut<FrameInputBuffer>,
    mut transforms: Query<&mut Transform, Without<MainCamera>>,
    mut camera: Query<&mut Transform, With<MainCamera>>,
) {
    let input = std::mem::take(&mut buffer.0);
    let Some(outcome) = state.0.frame(input) else {
        return;
    };

    for write in &outcome.writes {
        let Some(key) = write.key else {
            continue;
        };
        if let Ok(mut transform) = transforms.get_mut(Entity::from_bits(key)) {
            transform.translation = write.transform.translation;
            transform.rotation = write.transform.rotation;
            transform.scale = write.transform.scale;
        }
    }

    if let Ok(mut transform) = camera.single_mut() {
        *transform = Transform::from_translation(outcome.camera.position)
            .looking_at(outcome.camera.target, Vec3::Y);
    }
}

fn forward_events(mut state: ResMut<ViewerState>, mut messages: MessageWriter<ViewerMessage>) {
    while let Some(event) = state.0.poll_event() {
        messages.write(ViewerMessage(event));
    }
}

fn apply_asset_visibility(
    mut commands: Commands,
    mut messages: MessageReader<ViewerMessage>,
    mut roots: Query<(Entity, &AssetRoot, &mut Visibility)>,
) {
    for ViewerMessage(event) in messages.read() {
        let (generation, visibility) = match event {
            ViewerEvent::AssetAttached { generation, .. }
            | ViewerEvent::AssetRestored { generation, .. } => (*generation, Some(Visibility::Visible)),
            ViewerEvent::AssetDetached { generation, .. } => (*generation, Some(Visibility::Hidden)),
            ViewerEvent::AssetDiscarded { generation, .. } => (*generation, None),
            _ => continue,
        };

        for (entity, root, mut current) in roots.iter_mut() {
            if root.ticket.generation != generation {
                continue;
            }
            match visibility {
                Some(next) => *current = next,
                None => {
                    tracing::debug!(generation = generation.0, "Despawning discarded model");
                    commands.entity(entity).despawn();
                }
            }
        }
    }
}
