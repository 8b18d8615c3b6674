//! Camera, lights, ground plane and environment lighting

use bevy::prelude::*;
use paddock_core::{CameraPose, GradientLighting, ViewerEvent};

use crate::loading::EnvironmentAssets;
use crate::sync::ViewerMessage;
use crate::{ViewerSet, ViewerState};

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Light standing in for the ground half of the fallback gradient
#[derive(Component)]
pub struct FallbackGroundLight;

pub struct LightingPlugin;

impl Plugin for LightingPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb_u8(0xcc, 0xcc, 0xcc)))
            .add_systems(Startup, setup_scene)
            .add_systems(Update, apply_environment.in_set(ViewerSet::React));

        #[cfg(not(target_arch = "wasm32"))]
        app.add_plugins(bevy::pbr::wireframe::WireframePlugin::default())
            .add_systems(Update, apply_wireframe.in_set(ViewerSet::React));
    }
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let pose = CameraPose::RESET;
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(pose.position).looking_at(pose.target, Vec3::Y),
        MainCamera,
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 400.0,
        ..default()
    });

    // Key light with shadows
    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(5.0, 10.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Fill light
    commands.spawn((
        DirectionalLight {
            illuminance: 2500.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(-10.0, 5.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(10.0, 10.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(0x44, 0x44, 0x44),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::default(),
    ));
}

fn apply_environment(
    mut commands: Commands,
    mut messages: MessageReader<ViewerMessage>,
    state: Res<ViewerState>,
    environment: Res<EnvironmentAssets>,
    camera: Query<Entity, With<MainCamera>>,
) {
    for ViewerMessage(event) in messages.read() {
        match event {
            ViewerEvent::EnvironmentApplied { locator } => {
                let (Some(specular), Some(diffuse)) =
                    (environment.specular.clone(), environment.diffuse.clone())
                else {
                    continue;
                };
                let Ok(camera) = camera.single() else {
                    continue;
                };
                tracing::info!(%locator, "Applying environment map");
                commands.entity(camera).insert(EnvironmentMapLight {
                    diffuse_map: diffuse,
                    specular_map: specular,
                    intensity: state.0.config().environment.intensity,
                    ..default()
                });
            }
            ViewerEvent::FallbackLighting(lighting) => {
                spawn_gradient(&mut commands, lighting);
            }
            _ => {}
        }
    }
}

/// Approximate a sky/ground gradient: sky-tinted ambient plus an upward
/// light tinted with the ground colour
fn spawn_gradient(commands: &mut Commands, lighting: &GradientLighting) {
    let [sr, sg, sb] = lighting.sky_rgb();
    let [gr, gg, gb] = lighting.ground_rgb();
    tracing::warn!("Environment map unavailable, using gradient lighting");

    commands.insert_resource(AmbientLight {
        color: Color::srgb_u8(sr, sg, sb),
        brightness: 400.0 * lighting.intensity,
        ..default()
    });
    commands.spawn((
        DirectionalLight {
            color: Color::srgb_u8(gr, gg, gb),
            illuminance: 1000.0 * lighting.intensity,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(0.0, -1.0, 0.0).looking_at(Vec3::ZERO, Vec3::Z),
        FallbackGroundLight,
    ));
}

#[cfg(not(target_arch = "wasm32"))]
fn apply_wireframe(
    mut messages: MessageReader<ViewerMessage>,
    mut config: ResMut<bevy::pbr::wireframe::WireframeConfig>,
) {
    for ViewerMessage(event) in messages.read() {
        if let ViewerEvent::WireframeChanged(enabled) = event {
            config.global = *enabled;
        }
    }
}
