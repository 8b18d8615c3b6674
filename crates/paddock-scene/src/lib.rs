//! Paddock Scene - Bevy front end for the viewer core
//!
//! The [`Viewer`](paddock_core::Viewer) owns all interaction state. This
//! crate loads assets through the `AssetServer`, snapshots spawned glTF
//! hierarchies for the core, writes the transforms it computes back to
//! entities, and provides lighting, input routing and the egui panel.

pub mod controls;
pub mod input;
pub mod lighting;
pub mod loading;
pub mod sync;
pub mod ui;

use bevy::prelude::*;
use paddock_core::Viewer;

/// The single viewer instance driven by the app
#[derive(Resource)]
pub struct ViewerState(pub Viewer);

/// Per-frame ordering of the viewer systems
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewerSet {
    /// Gather input and UI commands
    Input,
    /// Run viewer operations and settle finished loads
    Apply,
    /// Tick the viewer and write results to the world
    Tick,
    /// React to viewer events
    React,
}

/// Plugin wiring the viewer into the app. Expects [`ViewerState`] to be
/// inserted before it is added.
pub struct PaddockScenePlugin;

impl Plugin for PaddockScenePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (ViewerSet::Input, ViewerSet::Apply, ViewerSet::Tick, ViewerSet::React).chain(),
        )
        .add_plugins(lighting::LightingPlugin)
        .add_plugins(controls::ControlsPlugin)
        .add_plugins(loading::LoadingPlugin)
        .add_plugins(input::InputPlugin)
        .add_plugins(sync::SyncPlugin)
        .add_plugins(ui::UiPlugin);
    }
}

pub use controls::ViewerCommand;
pub use lighting::MainCamera;
pub use sync::ViewerMessage;
