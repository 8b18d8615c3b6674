//! Selection callback surface: the viewer operations UI controls may call

use bevy::prelude::*;
use paddock_core::SwitchOutcome;

use crate::loading::{issue_plan, EnvironmentAssets, PendingScenes};
use crate::{ViewerSet, ViewerState};

/// Requests from buttons and key bindings
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    SwitchTo(usize),
    NextModel,
    PreviousModel,
    ResetView,
    ToggleWireframe,
    ResetModel,
}

pub struct ControlsPlugin;

impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ViewerCommand>()
            .add_systems(Update, apply_commands.in_set(ViewerSet::Apply));
    }
}

fn apply_commands(
    mut commands: MessageReader<ViewerCommand>,
    mut state: ResMut<ViewerState>,
    mut pending: ResMut<PendingScenes>,
    mut environment: ResMut<EnvironmentAssets>,
    asset_server: Res<AssetServer>,
) {
    for command in commands.read() {
        let viewer = &mut state.0;
        let outcome = match *command {
            ViewerCommand::SwitchTo(index) => viewer.switch_to(index),
            ViewerCommand::NextModel => viewer.next_model(),
            ViewerCommand::PreviousModel => viewer.previous_model(),
            ViewerCommand::ResetView => {
                viewer.reset_view();
                continue;
            }
            ViewerCommand::ToggleWireframe => {
                viewer.toggle_wireframe();
                continue;
            }
            ViewerCommand::ResetModel => {
                viewer.reset_model();
                continue;
            }
        };

        if let SwitchOutcome::Started(plan) = outcome {
            issue_plan(&plan, viewer, &asset_server, &mut pending, &mut environment);
        }
    }
}
