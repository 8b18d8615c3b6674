//! Bevy application setup

use bevy::asset::AssetMetaCheck;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bevy_picking::DefaultPickingPlugins;
use paddock_core::Viewer;
use paddock_scene::{PaddockScenePlugin, ViewerState};

/// Build and run the viewer app. Logging must already be installed.
pub fn run(viewer: Viewer, asset_root: String) {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Paddock".to_string(),
                        canvas: Some("#paddock-canvas".to_string()),
                        fit_canvas_to_parent: true,
                        prevent_default_event_handling: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    file_path: asset_root,
                    // Static hosts serve no .meta files
                    meta_check: AssetMetaCheck::Never,
                    ..default()
                })
                .disable::<LogPlugin>(),
        )
        // Picking must be present before EguiPlugin so it can detect it
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(EguiPlugin::default())
        .insert_resource(ViewerState(viewer))
        .add_plugins(PaddockScenePlugin)
        .run();
}
