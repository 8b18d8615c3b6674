//! Asset loading through the AssetServer and scene snapshots for the core

use bevy::asset::LoadState;
use bevy::ecs::system::SystemParam;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use bevy::camera::primitives::MeshAabb;
use bevy::scene::{SceneInstance, SceneSpawner};
use std::collections::HashMap;

use paddock_core::{
    AssetKind, AssetPayload, AssetTicket, Bounds, CoordinatorError, LoadPlan, NodeId,
    NodeTransform, Resolution, SceneGraph, Viewer,
};

use crate::{ViewerSet, ViewerState};

/// Root entity of a spawned model, tagged with the request that loaded it
#[derive(Component, Debug, Clone, Copy)]
pub struct AssetRoot {
    pub ticket: AssetTicket,
}

struct PendingScene {
    locator: String,
    handle: Handle<Gltf>,
    /// Spawned but hidden, waiting for the scene instance to be ready
    root: Option<Entity>,
}

/// Scene-graph requests that have not been handed to the viewer yet
#[derive(Resource, Default)]
pub struct PendingScenes {
    scenes: HashMap<AssetTicket, PendingScene>,
}

impl PendingScenes {
    pub fn in_flight(&self) -> usize {
        self.scenes.len()
    }
}

/// Environment map images and the request waiting on them
#[derive(Resource, Default)]
pub struct EnvironmentAssets {
    pending: Option<AssetTicket>,
    pub specular: Option<Handle<Image>>,
    pub diffuse: Option<Handle<Image>>,
}

impl EnvironmentAssets {
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }
}

pub struct LoadingPlugin;

impl Plugin for LoadingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingScenes>()
            .init_resource::<EnvironmentAssets>()
            .add_systems(Startup, start_viewer)
            .add_systems(
                Update,
                (poll_scene_loads, poll_environment).in_set(ViewerSet::Apply),
            );
    }
}

/// Start loading every request of a freshly opened cycle
pub fn issue_plan(
    plan: &LoadPlan,
    viewer: &Viewer,
    asset_server: &AssetServer,
    pending: &mut PendingScenes,
    environment: &mut EnvironmentAssets,
) {
    for request in &plan.requests {
        match request.kind {
            AssetKind::SceneGraph => {
                tracing::info!(
                    generation = request.ticket.generation.0,
                    locator = %request.locator,
                    "Loading model"
                );
                let handle = asset_server.load::<Gltf>(request.locator.clone());
                pending.scenes.insert(
                    request.ticket,
                    PendingScene {
                        locator: request.locator.clone(),
                        handle,
                        root: None,
                    },
                );
            }
            AssetKind::EnvironmentMap => {
                let settings = &viewer.config().environment;
                tracing::info!(map = %settings.map, "Loading environment map");
                environment.specular = Some(asset_server.load(settings.map.clone()));
                environment.diffuse =
                    Some(asset_server.load(settings.irradiance_locator().to_string()));
                environment.pending = Some(request.ticket);
            }
        }
    }
}

fn start_viewer(
    mut state: ResMut<ViewerState>,
    mut pending: ResMut<PendingScenes>,
    mut environment: ResMut<EnvironmentAssets>,
    asset_server: Res<AssetServer>,
) {
    if let Some(plan) = state.0.start() {
        issue_plan(&plan, &state.0, &asset_server, &mut pending, &mut environment);
    }
}

enum SceneStep {
    Wait,
    Spawn(Handle<Scene>),
    Snapshot(Entity),
    Fail(String),
}

fn poll_scene_loads(
    mut commands: Commands,
    mut state: ResMut<ViewerState>,
    mut pending: ResMut<PendingScenes>,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
    scene_spawner: Res<SceneSpawner>,
    instances: Query<&SceneInstance>,
    hierarchy: SceneHierarchy,
) {
    let current = state.0.generation();
    let tickets: Vec<AssetTicket> = pending.scenes.keys().copied().collect();

    for ticket in tickets {
        if ticket.generation != current {
            if let Some(scene) = pending.scenes.remove(&ticket) {
                tracing::debug!(locator = %scene.locator, "Dropping superseded model load");
                if let Some(root) = scene.root {
                    commands.entity(root).despawn();
                }
            }
            continue;
        }
        let Some(scene) = pending.scenes.get_mut(&ticket) else {
            continue;
        };

        let step = match scene.root {
            None => match asset_server.get_load_state(scene.handle.id()) {
                Some(LoadState::Loaded) => gltf_assets
                    .get(&scene.handle)
                    .and_then(|gltf| {
                        gltf.default_scene
                            .clone()
                            .or_else(|| gltf.scenes.first().cloned())
                    })
                    .map_or_else(
                        || SceneStep::Fail("glTF file contains no scenes".to_string()),
                        SceneStep::Spawn,
                    ),
                Some(LoadState::Failed(err)) => SceneStep::Fail(err.to_string()),
                _ => SceneStep::Wait,
            },
            Some(root) => match instances.get(root) {
                Ok(instance) if scene_spawner.instance_is_ready(**instance) => {
                    SceneStep::Snapshot(root)
                }
                _ => SceneStep::Wait,
            },
        };

        match step {
            SceneStep::Wait => {}
            SceneStep::Spawn(scene_handle) => {
                // Hidden until the viewer attaches it
                let root = commands
                    .spawn((
                        SceneRoot(scene_handle),
                        Transform::default(),
                        Visibility::Hidden,
                        AssetRoot { ticket },
                        Name::new(scene.locator.clone()),
                    ))
                    .id();
                scene.root = Some(root);
            }
            SceneStep::Fail(reason) => {
                pending.scenes.remove(&ticket);
                log_settle(state.0.reject(ticket, reason));
            }
            SceneStep::Snapshot(root) => {
                let graph = hierarchy.snapshot(root, &scene.locator);
                pending.scenes.remove(&ticket);
                tracing::debug!(nodes = graph.len(), "Snapshotted model hierarchy");
                let settled = state.0.resolve(ticket, AssetPayload::SceneGraph(graph));
                if !matches!(settled, Ok(Resolution::Accepted)) {
                    commands.entity(root).despawn();
                }
                log_settle(settled);
            }
        }
    }
}

fn poll_environment(
    mut state: ResMut<ViewerState>,
    mut environment: ResMut<EnvironmentAssets>,
    asset_server: Res<AssetServer>,
) {
    let Some(ticket) = environment.pending else {
        return;
    };

    let mut loaded = true;
    let mut failure = None;
    for handle in environment.specular.iter().chain(environment.diffuse.iter()) {
        match asset_server.get_load_state(handle.id()) {
            Some(LoadState::Loaded) => {}
            Some(LoadState::Failed(err)) => failure = Some(err.to_string()),
            _ => loaded = false,
        }
    }

    let settled = match failure {
        Some(reason) => state.0.reject(ticket, reason),
        None if loaded => state.0.resolve(ticket, AssetPayload::EnvironmentMap),
        None => return,
    };
    environment.pending = None;
    log_settle(settled);
}

fn log_settle(settled: Result<Resolution, CoordinatorError>) {
    match settled {
        Ok(Resolution::Accepted) => {}
        Ok(Resolution::Stale) => tracing::debug!("Ignored completion from a superseded load"),
        Err(err) => tracing::warn!(%err, "Load completion rejected by the viewer"),
    }
}

/// Read access to a spawned hierarchy for snapshotting
#[derive(SystemParam)]
pub struct SceneHierarchy<'w, 's> {
    children: Query<'w, 's, &'static Children>,
    nodes: Query<
        'w,
        's,
        (
            &'static Transform,
            Option<&'static Name>,
            Option<&'static Mesh3d>,
        ),
    >,
    meshes: Res<'w, Assets<Mesh>>,
}

impl SceneHierarchy<'_, '_> {
    /// Copy the hierarchy under `root` into a scene graph keyed by entity.
    ///
    /// Childless mesh entities are glTF primitives; their bounds are folded
    /// into the owning node so node names drive classification.
    pub fn snapshot(&self, root: Entity, name: &str) -> SceneGraph {
        let mut graph = SceneGraph::new(name);
        let root_id = graph.root();
        graph.set_key(root_id, root.to_bits());
        if let Ok((transform, _, _)) = self.nodes.get(root) {
            graph.node_mut(root_id).transform = node_transform(transform);
        }
        self.visit(&mut graph, root_id, root);
        graph
    }

    fn visit(&self, graph: &mut SceneGraph, node: NodeId, entity: Entity) {
        let Ok(children) = self.children.get(entity) else {
            return;
        };
        for child in children.iter() {
            let Ok((transform, name, mesh)) = self.nodes.get(child) else {
                continue;
            };
            let local = node_transform(transform);

            if let Some(mesh) = mesh.filter(|_| self.children.get(child).is_err()) {
                if let Some(bounds) = self.mesh_bounds(mesh) {
                    merge_bounds(graph, node, bounds.transformed(&local.matrix()));
                }
                continue;
            }

            let name = name.map(|n| n.as_str().to_string()).unwrap_or_default();
            let id = graph.add_child(node, name, local);
            graph.set_key(id, child.to_bits());
            if let Some(bounds) = mesh.and_then(|m| self.mesh_bounds(m)) {
                merge_bounds(graph, id, bounds);
            }
            self.visit(graph, id, child);
        }
    }

    fn mesh_bounds(&self, mesh: &Mesh3d) -> Option<Bounds> {
        let aabb = self.meshes.get(&mesh.0)?.compute_aabb()?;
        Some(Bounds::from_center_half_extents(
            Vec3::from(aabb.center),
            Vec3::from(aabb.half_extents),
        ))
    }
}

fn merge_bounds(graph: &mut SceneGraph, id: NodeId, bounds: Bounds) {
    let node = graph.node_mut(id);
    node.mesh_bounds = Some(match node.mesh_bounds {
        Some(existing) => existing.union(&bounds),
        None => bounds,
    });
}

pub(crate) fn node_transform(transform: &Transform) -> NodeTransform {
    NodeTransform {
        translation: transform.translation,
        rotation: transform.rotation,
        scale: transform.scale,
    }
}
