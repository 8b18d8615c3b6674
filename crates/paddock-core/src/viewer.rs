//! Viewer controller
//!
//! [`Viewer`] owns the whole interaction state: the catalog, the load
//! coordinator, the model switch, the animator, the orbit camera and the
//! active asset. Hosts call its named operations and drain
//! [`ViewerEvent`]s; nothing else mutates viewer state.
//!
//! A switch detaches the active asset before the next cycle is opened. The
//! detached asset is parked: a successful load discards it, a failed
//! scene-graph load puts it back so the previous model stays on screen.

use bevy_math::{Quat, Vec2};
use std::collections::VecDeque;

use crate::animator::{InteractionAnimator, ScrollInput, ScrollStep};
use crate::asset::{AssetKind, AssetPayload, LoadPlan};
use crate::bounds::{normalize, Bounds, Normalization};
use crate::classify::{classify, Classification};
use crate::config::{ModelConfig, ViewerConfig};
use crate::coordinator::{
    AssetTicket, CoordinatorEvent, CycleReport, Generation, LoadCoordinator, Resolution,
};
use crate::environment::{Environment, GradientLighting};
use crate::error::{ConfigError, CoordinatorError, LoadFailure, ViewportError};
use crate::framing::{self, CameraPose};
use crate::orbit::OrbitControls;
use crate::render::{pin_locked, FrameInput, FrameOutcome, NodeWrite, RenderLoop};
use crate::scene::{NodeId, NodeTransform, SceneGraph};
use crate::switch::{ModelSwitch, SwitchOutcome, SwitchState, Transition};
use crate::viewport::Viewport;

/// Notifications for the host, drained with [`Viewer::poll_event`]
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    CycleStarted {
        generation: Generation,
        index: usize,
    },
    AssetAttached {
        generation: Generation,
        index: usize,
        wheels: usize,
        locked: usize,
    },
    /// Hidden and no longer animated; may still be restored
    AssetDetached {
        generation: Generation,
        index: usize,
    },
    AssetRestored {
        generation: Generation,
        index: usize,
    },
    /// Dropped for good; the host may free its resources
    AssetDiscarded {
        generation: Generation,
        index: usize,
    },
    AssetFailed(LoadFailure),
    EnvironmentApplied {
        locator: String,
    },
    FallbackLighting(GradientLighting),
    WireframeChanged(bool),
    RenderStarted,
}

/// A normalized, classified asset attached to the visible scene
#[derive(Debug, Clone)]
pub struct ActiveAsset {
    pub generation: Generation,
    pub index: usize,
    pub name: String,
    graph: SceneGraph,
    normalization: Option<Normalization>,
    classification: Classification,
    root_rest: NodeTransform,
    wheel_rest: Vec<(NodeId, Quat)>,
}

impl ActiveAsset {
    fn prepare(
        generation: Generation,
        index: usize,
        name: String,
        mut graph: SceneGraph,
        canonical_size: f32,
    ) -> Self {
        // Locks change the displayed extent, so they apply before measuring
        let classification = classify(&mut graph);
        let normalization = normalize(&mut graph, canonical_size);
        let root_rest = graph.node(graph.root()).transform;
        let wheel_rest = classification
            .wheels()
            .iter()
            .map(|&id| (id, graph.node(id).transform.rotation))
            .collect();
        Self {
            generation,
            index,
            name,
            graph,
            normalization,
            classification,
            root_rest,
            wheel_rest,
        }
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn normalization(&self) -> Option<&Normalization> {
        self.normalization.as_ref()
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn wheels(&self) -> &[NodeId] {
        self.classification.wheels()
    }

    /// Host key of the asset's root node
    pub fn root_key(&self) -> Option<u64> {
        self.graph.node(self.graph.root()).key
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.normalization
            .map(|n| n.bounds)
            .or_else(|| self.graph.world_bounds())
    }

    /// Apply animator state and locks to the graph, returning the writes
    fn tick(&mut self, animator: &InteractionAnimator) -> (Vec<NodeWrite>, usize) {
        let root = self.graph.root();
        self.graph.node_mut(root).transform.translation =
            animator.root_translation(self.root_rest.translation);
        for &(wheel, rest) in &self.wheel_rest {
            self.graph.node_mut(wheel).transform.rotation = animator.wheel_rotation(rest);
        }
        let pinned = pin_locked(&mut self.graph, self.classification.locked());

        let touched = std::iter::once(root)
            .chain(self.wheel_rest.iter().map(|&(id, _)| id))
            .chain(self.classification.locked().iter().copied());
        let writes = touched
            .map(|node| {
                let scene_node = self.graph.node(node);
                NodeWrite {
                    node,
                    key: scene_node.key,
                    transform: scene_node.transform,
                }
            })
            .collect();
        (writes, pinned)
    }
}

pub struct Viewer {
    config: ViewerConfig,
    coordinator: LoadCoordinator<AssetPayload>,
    switch: ModelSwitch,
    animator: InteractionAnimator,
    orbit: OrbitControls,
    active: Option<ActiveAsset>,
    parked: Option<ActiveAsset>,
    environment: Environment,
    wireframe: bool,
    render: RenderLoop,
    viewport: Viewport,
    events: VecDeque<ViewerEvent>,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let orbit = OrbitControls::new(
            framing::reset_view(),
            config.orbit.damping,
            config.orbit.rotate_speed,
        );
        Ok(Self {
            coordinator: LoadCoordinator::new(),
            switch: ModelSwitch::new(config.models.len(), config.initial_model),
            animator: InteractionAnimator::new(config.animation.clone()),
            orbit,
            active: None,
            parked: None,
            environment: Environment::Pending,
            wireframe: false,
            render: RenderLoop::default(),
            viewport: Viewport::default(),
            events: VecDeque::new(),
            config,
        })
    }

    /// Issue the first cycle: the initial model plus the environment map
    pub fn start(&mut self) -> Option<LoadPlan> {
        match self.switch.state() {
            SwitchState::Idle(index) => Some(self.begin_load(index)),
            _ => None,
        }
    }

    pub fn switch_to(&mut self, index: usize) -> SwitchOutcome {
        match self.switch.request(index) {
            Ok(Transition::Begin(index)) => SwitchOutcome::Started(self.begin_load(index)),
            Ok(Transition::Unchanged) => {
                tracing::debug!(index, "Model already selected");
                SwitchOutcome::Unchanged
            }
            Err(err) => {
                tracing::debug!(%err, "Ignoring model switch");
                SwitchOutcome::Rejected(err)
            }
        }
    }

    pub fn next_model(&mut self) -> SwitchOutcome {
        self.switch_to(self.switch.next_index())
    }

    pub fn previous_model(&mut self) -> SwitchOutcome {
        self.switch_to(self.switch.previous_index())
    }

    pub fn reset_view(&mut self) -> CameraPose {
        let pose = framing::reset_view();
        self.orbit.set_pose(pose);
        pose
    }

    pub fn toggle_wireframe(&mut self) -> bool {
        self.wireframe = !self.wireframe;
        self.events
            .push_back(ViewerEvent::WireframeChanged(self.wireframe));
        self.wireframe
    }

    /// Return the asset to its normalized rest pose
    pub fn reset_model(&mut self) {
        self.animator.reset();
    }

    /// Feed one scroll event. Ignored until rendering started or while no
    /// asset is attached.
    pub fn on_scroll(&mut self, input: ScrollInput) -> Option<ScrollStep> {
        if !self.render.is_running() || self.active.is_none() {
            return None;
        }
        self.animator.on_scroll(input)
    }

    pub fn resolve(
        &mut self,
        ticket: AssetTicket,
        payload: AssetPayload,
    ) -> Result<Resolution, CoordinatorError> {
        let resolution = self.coordinator.resolve(ticket, payload)?;
        self.drain_coordinator();
        Ok(resolution)
    }

    pub fn reject(
        &mut self,
        ticket: AssetTicket,
        reason: impl Into<String>,
    ) -> Result<Resolution, CoordinatorError> {
        let resolution = self.coordinator.reject(ticket, reason)?;
        self.drain_coordinator();
        Ok(resolution)
    }

    /// One tick: animate, re-pin locked parts, advance the orbit camera.
    /// Returns `None` until the first load cycle completed.
    pub fn frame(&mut self, input: FrameInput) -> Option<FrameOutcome> {
        if !self.render.is_running() {
            return None;
        }
        for scroll in input.scroll {
            self.on_scroll(scroll);
        }
        if input.orbit_drag != Vec2::ZERO {
            self.orbit.rotate(input.orbit_drag);
        }
        let camera = self.orbit.update();
        let (writes, pinned) = match self.active.as_mut() {
            Some(asset) => asset.tick(&self.animator),
            None => (Vec::new(), 0),
        };
        let frame = self.render.advance()?;
        Some(FrameOutcome {
            frame,
            camera,
            writes,
            pinned,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<f32, ViewportError> {
        self.viewport.resize(width, height)
    }

    pub fn poll_event(&mut self) -> Option<ViewerEvent> {
        self.events.pop_front()
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &[ModelConfig] {
        &self.config.models
    }

    pub fn state(&self) -> SwitchState {
        self.switch.state()
    }

    /// Index of the model currently displayed
    pub fn current_model_index(&self) -> Option<usize> {
        self.switch.current()
    }

    pub fn generation(&self) -> Generation {
        self.coordinator.generation()
    }

    pub fn active(&self) -> Option<&ActiveAsset> {
        self.active.as_ref()
    }

    pub fn wheel_nodes(&self) -> &[NodeId] {
        self.active
            .as_ref()
            .map(ActiveAsset::wheels)
            .unwrap_or_default()
    }

    pub fn camera(&self) -> CameraPose {
        self.orbit.pose()
    }

    pub fn translation_offset(&self) -> f32 {
        self.animator.translation_offset()
    }

    pub fn wheel_spin(&self) -> f32 {
        self.animator.wheel_spin()
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    pub fn is_rendering(&self) -> bool {
        self.render.is_running()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn begin_load(&mut self, index: usize) -> LoadPlan {
        if let Some(asset) = self.active.take() {
            self.events.push_back(ViewerEvent::AssetDetached {
                generation: asset.generation,
                index: asset.index,
            });
            if let Some(previous) = self.parked.replace(asset) {
                self.discard(previous);
            }
        }
        self.animator.reset();

        // A scene already accepted for the abandoned cycle is never attached
        if let SwitchState::Loading(abandoned) = self.switch.state() {
            self.events.push_back(ViewerEvent::AssetDiscarded {
                generation: self.coordinator.generation(),
                index: abandoned,
            });
        }

        let generation = self.coordinator.begin_cycle();
        self.switch.begin(index, generation);

        let model = &self.config.models[index];
        let mut requests = vec![self
            .coordinator
            .register(AssetKind::SceneGraph, model.source.clone())];
        // An environment load abandoned with a superseded cycle is reissued
        if !self.environment.is_settled() {
            requests.push(
                self.coordinator
                    .register(AssetKind::EnvironmentMap, self.config.environment.map.clone()),
            );
        }

        tracing::info!(
            generation = generation.0,
            index,
            model = %model.name,
            requests = requests.len(),
            "Starting load cycle"
        );
        self.events
            .push_back(ViewerEvent::CycleStarted { generation, index });

        LoadPlan {
            generation,
            model_index: index,
            requests,
        }
    }

    fn drain_coordinator(&mut self) {
        while let Some(event) = self.coordinator.poll_event() {
            match event {
                CoordinatorEvent::AssetFailed { failure, .. } => {
                    tracing::warn!(%failure, "Asset load failed");
                    self.events.push_back(ViewerEvent::AssetFailed(failure));
                }
                CoordinatorEvent::Ready(report) => self.on_cycle_ready(report),
            }
        }
    }

    fn on_cycle_ready(&mut self, mut report: CycleReport<AssetPayload>) {
        let generation = report.generation;

        if let Some(settled) = report.take(AssetKind::EnvironmentMap) {
            match settled.outcome {
                Ok(_) => {
                    self.environment = Environment::Map {
                        locator: settled.request.locator.clone(),
                    };
                    self.events.push_back(ViewerEvent::EnvironmentApplied {
                        locator: settled.request.locator,
                    });
                }
                Err(failure) => {
                    let lighting = GradientLighting::default();
                    tracing::warn!(%failure, "Using fallback gradient lighting");
                    self.environment = Environment::Fallback(lighting);
                    self.events
                        .push_back(ViewerEvent::FallbackLighting(lighting));
                }
            }
        }

        let graph = match report.take(AssetKind::SceneGraph).map(|s| s.outcome) {
            Some(Ok(AssetPayload::SceneGraph(graph))) => Some(graph),
            Some(Ok(other)) => {
                tracing::warn!(kind = %other.kind(), "Scene request resolved with the wrong payload");
                None
            }
            Some(Err(_)) | None => None,
        };

        match graph {
            Some(graph) => self.attach(generation, graph),
            None => self.restore(generation),
        }

        if self.render.start() {
            tracing::info!(generation = generation.0, "Render loop started");
            self.events.push_back(ViewerEvent::RenderStarted);
        }
    }

    fn attach(&mut self, generation: Generation, graph: SceneGraph) {
        let Some(index) = self.switch.complete(generation, true) else {
            return;
        };
        let name = self.config.models[index].name.clone();
        let asset = ActiveAsset::prepare(
            generation,
            index,
            name,
            graph,
            self.config.normalize.canonical_size,
        );

        let size = asset.bounds().map_or(bevy_math::Vec3::ZERO, |b| b.size());
        self.orbit
            .set_pose(framing::frame_asset(size, self.config.framing.distance));
        self.animator.reset();

        if let Some(previous) = self.parked.take() {
            self.discard(previous);
        }

        tracing::info!(
            generation = generation.0,
            index,
            model = %asset.name,
            wheels = asset.wheels().len(),
            "Attached asset"
        );
        self.events.push_back(ViewerEvent::AssetAttached {
            generation,
            index,
            wheels: asset.wheels().len(),
            locked: asset.classification().locked().len(),
        });
        self.active = Some(asset);
    }

    fn restore(&mut self, generation: Generation) {
        if self.switch.complete(generation, false).is_none() {
            return;
        }
        if let Some(asset) = self.parked.take() {
            tracing::info!(index = asset.index, "Restoring previous asset");
            self.events.push_back(ViewerEvent::AssetRestored {
                generation: asset.generation,
                index: asset.index,
            });
            self.active = Some(asset);
        }
    }

    fn discard(&mut self, asset: ActiveAsset) {
        self.events.push_back(ViewerEvent::AssetDiscarded {
            generation: asset.generation,
            index: asset.index,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::Axis;
    use crate::config::AnimationConfig;
    use bevy_math::Vec3;

    fn config() -> ViewerConfig {
        ViewerConfig {
            models: vec![
                ModelConfig::new("Alpine", "models/alpine.glb"),
                ModelConfig::new("Ferrari", "models/ferrari.glb"),
                ModelConfig::new("Williams", "models/williams.glb"),
            ],
            animation: AnimationConfig {
                step_size: 0.5,
                rotation_speed: 0.25,
                translation_axis: Axis::Z,
                spin_axis: Axis::X,
            },
            ..ViewerConfig::default()
        }
    }

    /// Car whose body spans 4 x 2 x 8 around the origin, tilted on load
    fn car(wheel_prefix: &str) -> SceneGraph {
        let mut graph = SceneGraph::new("car");
        graph.set_key(graph.root(), 1);
        let body = graph.add_child(
            graph.root(),
            "Body_Baked",
            NodeTransform::IDENTITY.with_rotation(Quat::from_rotation_y(0.3)),
        );
        graph.set_mesh_bounds(body, Bounds::new(Vec3::new(-2.0, -1.0, -4.0), Vec3::new(2.0, 1.0, 4.0)));
        graph.set_key(body, 2);
        for (i, z) in [-3.0, 3.0].into_iter().enumerate() {
            let wheel = graph.add_child(
                graph.root(),
                format!("{wheel_prefix}_{i}"),
                NodeTransform::from_translation(Vec3::new(2.0, -0.5, z)),
            );
            graph.set_mesh_bounds(wheel, Bounds::new(Vec3::splat(-0.5), Vec3::splat(0.5)));
            graph.set_key(wheel, 10 + i as u64);
        }
        graph
    }

    fn ticket(plan: &LoadPlan, kind: AssetKind) -> AssetTicket {
        plan.request(kind).unwrap().ticket
    }

    fn events(viewer: &mut Viewer) -> Vec<ViewerEvent> {
        std::iter::from_fn(|| viewer.poll_event()).collect()
    }

    fn loaded_viewer() -> Viewer {
        let mut viewer = Viewer::new(config()).unwrap();
        let plan = viewer.start().unwrap();
        viewer
            .resolve(ticket(&plan, AssetKind::EnvironmentMap), AssetPayload::EnvironmentMap)
            .unwrap();
        viewer
            .resolve(ticket(&plan, AssetKind::SceneGraph), AssetPayload::SceneGraph(car("wheel")))
            .unwrap();
        events(&mut viewer);
        viewer
    }

    #[test]
    fn test_initial_load_normalizes_and_frames() {
        let mut viewer = Viewer::new(config()).unwrap();
        let plan = viewer.start().unwrap();
        assert_eq!(plan.requests.len(), 2);
        assert!(viewer.start().is_none());
        assert!(viewer.frame(FrameInput::default()).is_none());

        viewer
            .resolve(ticket(&plan, AssetKind::SceneGraph), AssetPayload::SceneGraph(car("wheel")))
            .unwrap();
        assert!(!viewer.is_rendering());
        viewer
            .resolve(ticket(&plan, AssetKind::EnvironmentMap), AssetPayload::EnvironmentMap)
            .unwrap();
        assert!(viewer.is_rendering());

        let asset = viewer.active().unwrap();
        let bounds = asset.graph().world_bounds().unwrap();
        let reported = asset.bounds().unwrap();
        assert!((reported.size() - bounds.size()).length() < 1e-4);
        assert!((bounds.max_dimension() - 4.0).abs() < 1e-4);
        assert!(bounds.min.y.abs() < 1e-4);
        assert!(bounds.center().x.abs() < 1e-4 && bounds.center().z.abs() < 1e-4);

        let size = bounds.size();
        let camera = viewer.camera();
        assert!((camera.target.y - size.y).abs() < 1e-5);
        assert!((camera.position - Vec3::new(12.0, size.y + 1.0, 4.0)).length() < 1e-4);

        assert_eq!(viewer.state(), SwitchState::Ready(0));
        assert_eq!(viewer.current_model_index(), Some(0));
        assert_eq!(viewer.wheel_nodes().len(), 2);
        assert!(matches!(viewer.environment(), Environment::Map { .. }));

        let events = events(&mut viewer);
        assert!(events.contains(&ViewerEvent::RenderStarted));
        assert!(events
            .iter()
            .any(|e| matches!(e, ViewerEvent::AssetAttached { index: 0, wheels: 2, locked: 1, .. })));
    }

    #[test]
    fn test_environment_failure_uses_fallback() {
        let mut viewer = Viewer::new(config()).unwrap();
        let plan = viewer.start().unwrap();
        viewer
            .reject(ticket(&plan, AssetKind::EnvironmentMap), "404")
            .unwrap();
        viewer
            .resolve(ticket(&plan, AssetKind::SceneGraph), AssetPayload::SceneGraph(car("wheel")))
            .unwrap();

        assert!(viewer.is_rendering());
        assert!(viewer.active().is_some());
        assert_eq!(
            viewer.environment(),
            &Environment::Fallback(GradientLighting::DEFAULT)
        );
        let events = events(&mut viewer);
        assert!(events
            .iter()
            .any(|e| matches!(e, ViewerEvent::AssetFailed(f) if f.kind == AssetKind::EnvironmentMap)));
        assert!(events.contains(&ViewerEvent::FallbackLighting(GradientLighting::DEFAULT)));
    }

    #[test]
    fn test_all_failed_still_starts_rendering() {
        let mut viewer = Viewer::new(config()).unwrap();
        let plan = viewer.start().unwrap();
        viewer.reject(ticket(&plan, AssetKind::SceneGraph), "parse").unwrap();
        viewer.reject(ticket(&plan, AssetKind::EnvironmentMap), "net").unwrap();

        assert!(viewer.is_rendering());
        assert!(viewer.active().is_none());
        assert_eq!(viewer.state(), SwitchState::Failed(0));
        assert_eq!(viewer.current_model_index(), None);
        let outcome = viewer.frame(FrameInput::default()).unwrap();
        assert!(outcome.writes.is_empty());
    }

    #[test]
    fn test_ten_scrolls_accumulate() {
        let mut viewer = loaded_viewer();
        let scroll = (0..10).map(|i| ScrollInput::new(1.0, i as f64 * 0.016)).collect();
        let outcome = viewer
            .frame(FrameInput {
                scroll,
                ..FrameInput::default()
            })
            .unwrap();

        assert_eq!(viewer.translation_offset(), 5.0);
        assert!((viewer.wheel_spin() - 2.5).abs() < 1e-5);

        let asset = viewer.active().unwrap();
        for &wheel in asset.wheels() {
            let write = outcome.writes.iter().find(|w| w.node == wheel).unwrap();
            let (axis, angle) = write.transform.rotation.to_axis_angle();
            assert!((angle - 2.5).abs() < 1e-4);
            assert!((axis - Vec3::X).length() < 1e-4);
        }
        let root = outcome.writes.iter().find(|w| w.key == Some(1)).unwrap();
        let rest = asset.normalization().unwrap().offset;
        assert!((root.transform.translation.z - (rest.z + 5.0)).abs() < 1e-4);
    }

    #[test]
    fn test_locked_body_stays_pinned() {
        let mut viewer = loaded_viewer();
        for _ in 0..3 {
            let outcome = viewer
                .frame(FrameInput {
                    scroll: vec![ScrollInput::new(-1.0, 0.0)],
                    orbit_drag: Vec2::new(5.0, 0.0),
                })
                .unwrap();
            assert_eq!(outcome.pinned, 1);
            let body = outcome.writes.iter().find(|w| w.key == Some(2)).unwrap();
            assert_eq!(body.transform.rotation, Quat::IDENTITY);
        }
    }

    #[test]
    fn test_stale_load_never_attached() {
        let mut viewer = Viewer::new(config()).unwrap();
        let first = viewer.start().unwrap();

        let second = viewer.switch_to(1).plan().cloned().unwrap();
        assert!(second.generation > first.generation);
        assert_eq!(second.requests.len(), 2);

        let stale = viewer
            .resolve(ticket(&first, AssetKind::SceneGraph), AssetPayload::SceneGraph(car("wheel")))
            .unwrap();
        assert_eq!(stale, Resolution::Stale);
        assert!(viewer.active().is_none());
        assert_eq!(viewer.state(), SwitchState::Loading(1));

        viewer
            .resolve(ticket(&second, AssetKind::EnvironmentMap), AssetPayload::EnvironmentMap)
            .unwrap();
        viewer
            .resolve(ticket(&second, AssetKind::SceneGraph), AssetPayload::SceneGraph(car("Tire")))
            .unwrap();

        let asset = viewer.active().unwrap();
        assert_eq!(asset.index, 1);
        assert_eq!(asset.generation, second.generation);
        assert_eq!(viewer.current_model_index(), Some(1));
        for &wheel in viewer.wheel_nodes() {
            assert!(asset.graph().node(wheel).name.starts_with("Tire"));
        }
    }

    #[test]
    fn test_switch_replaces_wheels_and_discards_previous() {
        let mut viewer = loaded_viewer();
        viewer.on_scroll(ScrollInput::new(1.0, 0.0));

        let plan = viewer.next_model().plan().cloned().unwrap();
        assert_eq!(plan.model_index, 1);
        assert_eq!(plan.requests.len(), 1);
        assert!(viewer.active().is_none());
        assert!(viewer.wheel_nodes().is_empty());
        assert_eq!(viewer.translation_offset(), 0.0);

        viewer
            .resolve(ticket(&plan, AssetKind::SceneGraph), AssetPayload::SceneGraph(car("tekerlek")))
            .unwrap();
        let events = events(&mut viewer);
        assert!(events
            .iter()
            .any(|e| matches!(e, ViewerEvent::AssetDetached { index: 0, .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, ViewerEvent::AssetDiscarded { index: 0, .. })));

        let asset = viewer.active().unwrap();
        assert_eq!(viewer.wheel_nodes().len(), 2);
        for &wheel in viewer.wheel_nodes() {
            assert!(asset.graph().node(wheel).name.starts_with("tekerlek"));
        }
    }

    #[test]
    fn test_scene_failure_restores_previous_asset() {
        let mut viewer = loaded_viewer();
        let plan = viewer.switch_to(2).plan().cloned().unwrap();
        viewer
            .reject(ticket(&plan, AssetKind::SceneGraph), "connection reset")
            .unwrap();

        assert_eq!(viewer.state(), SwitchState::Failed(2));
        assert_eq!(viewer.current_model_index(), Some(0));
        assert_eq!(viewer.active().unwrap().index, 0);

        let events = events(&mut viewer);
        assert!(events
            .iter()
            .any(|e| matches!(e, ViewerEvent::AssetFailed(f) if f.kind == AssetKind::SceneGraph)));
        assert!(events
            .iter()
            .any(|e| matches!(e, ViewerEvent::AssetRestored { index: 0, .. })));

        // Retrying the failed entry opens a new cycle
        assert!(viewer.switch_to(2).plan().is_some());
    }

    #[test]
    fn test_out_of_range_and_same_index_ignored() {
        let mut viewer = loaded_viewer();
        let generation = viewer.generation();

        assert!(matches!(viewer.switch_to(3), SwitchOutcome::Rejected(_)));
        assert!(matches!(viewer.switch_to(usize::MAX), SwitchOutcome::Rejected(_)));
        assert_eq!(viewer.switch_to(0), SwitchOutcome::Unchanged);

        assert_eq!(viewer.generation(), generation);
        assert_eq!(viewer.state(), SwitchState::Ready(0));
        assert!(viewer.active().is_some());
        assert!(events(&mut viewer).is_empty());
    }

    #[test]
    fn test_displayed_model_unchanged_after_failed_switch() {
        let mut viewer = loaded_viewer();
        let plan = viewer.switch_to(1).plan().cloned().unwrap();
        viewer.reject(ticket(&plan, AssetKind::SceneGraph), "404").unwrap();
        assert_eq!(viewer.state(), SwitchState::Failed(1));
        events(&mut viewer);

        let generation = viewer.generation();
        assert_eq!(viewer.switch_to(0), SwitchOutcome::Unchanged);
        assert_eq!(viewer.generation(), generation);
        assert_eq!(viewer.active().unwrap().index, 0);
        assert!(events(&mut viewer).is_empty());
    }

    #[test]
    fn test_locked_body_measured_after_pinning() {
        let mut viewer = loaded_viewer();
        let outcome = viewer.frame(FrameInput::default()).unwrap();
        assert_eq!(outcome.pinned, 1);

        let asset = viewer.active().unwrap();
        let displayed = asset.graph().world_bounds().unwrap();
        assert!((displayed.max_dimension() - 4.0).abs() < 1e-4);
        assert!(displayed.min.y.abs() < 1e-4);
        let reported = asset.bounds().unwrap();
        assert!((reported.max - displayed.max).length() < 1e-4);
        assert!((reported.min - displayed.min).length() < 1e-4);
    }

    #[test]
    fn test_superseded_accepted_scene_is_discarded() {
        let mut viewer = Viewer::new(config()).unwrap();
        let first = viewer.start().unwrap();
        let accepted = viewer
            .resolve(ticket(&first, AssetKind::SceneGraph), AssetPayload::SceneGraph(car("wheel")))
            .unwrap();
        assert_eq!(accepted, Resolution::Accepted);
        events(&mut viewer);

        viewer.switch_to(1);
        let events = events(&mut viewer);
        assert!(events.contains(&ViewerEvent::AssetDiscarded {
            generation: first.generation,
            index: 0,
        }));
        assert!(viewer.active().is_none());
    }

    #[test]
    fn test_reset_view_is_idempotent() {
        let mut viewer = loaded_viewer();
        viewer.frame(FrameInput {
            orbit_drag: Vec2::new(40.0, 10.0),
            ..FrameInput::default()
        });
        let once = viewer.reset_view();
        let twice = viewer.reset_view();
        assert_eq!(once, twice);
        assert_eq!(viewer.camera(), CameraPose::RESET);
        let outcome = viewer.frame(FrameInput::default()).unwrap();
        assert_eq!(outcome.camera, CameraPose::RESET);
    }

    #[test]
    fn test_reset_model_and_wireframe() {
        let mut viewer = loaded_viewer();
        viewer.on_scroll(ScrollInput::new(1.0, 0.0));
        viewer.reset_model();
        assert_eq!(viewer.translation_offset(), 0.0);

        assert!(viewer.toggle_wireframe());
        assert!(!viewer.toggle_wireframe());
        assert_eq!(
            events(&mut viewer),
            vec![
                ViewerEvent::WireframeChanged(true),
                ViewerEvent::WireframeChanged(false)
            ]
        );
    }

    #[test]
    fn test_scroll_before_render_is_dropped() {
        let mut viewer = Viewer::new(config()).unwrap();
        viewer.start();
        assert!(viewer.on_scroll(ScrollInput::new(1.0, 0.0)).is_none());
        assert_eq!(viewer.translation_offset(), 0.0);
    }

    #[test]
    fn test_ambiguous_asset_still_attaches() {
        let mut viewer = Viewer::new(config()).unwrap();
        let plan = viewer.start().unwrap();
        let mut graph = SceneGraph::new("blob");
        let cube = graph.add_child(graph.root(), "Cube", NodeTransform::IDENTITY);
        graph.set_mesh_bounds(cube, Bounds::new(Vec3::splat(-1.0), Vec3::splat(1.0)));
        viewer
            .resolve(ticket(&plan, AssetKind::SceneGraph), AssetPayload::SceneGraph(graph))
            .unwrap();
        viewer
            .resolve(ticket(&plan, AssetKind::EnvironmentMap), AssetPayload::EnvironmentMap)
            .unwrap();

        assert!(viewer.active().unwrap().classification().is_ambiguous());
        assert!(viewer.wheel_nodes().is_empty());
    }

    #[test]
    fn test_resize() {
        let mut viewer = Viewer::new(config()).unwrap();
        assert_eq!(viewer.resize(1000, 500), Ok(2.0));
        assert!(viewer.resize(0, 500).is_err());
        assert_eq!(viewer.viewport().width(), 1000);
    }
}
