//! Model menu and notices using bevy_egui

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use paddock_core::{Environment, SwitchState, ViewerEvent};
use std::collections::VecDeque;

use crate::controls::ViewerCommand;
use crate::loading::{EnvironmentAssets, PendingScenes};
use crate::sync::ViewerMessage;
use crate::{ViewerSet, ViewerState};

const MAX_NOTICES: usize = 4;

/// User-visible messages about failed loads
#[derive(Resource, Default)]
pub struct Notices {
    entries: VecDeque<String>,
}

impl Notices {
    pub fn push(&mut self, message: String) {
        if self.entries.len() == MAX_NOTICES {
            self.entries.pop_front();
        }
        self.entries.push_back(message);
    }
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Notices>()
            .add_systems(Update, collect_notices.in_set(ViewerSet::React))
            // bevy_egui 0.38 runs UI in its own pass for correct input handling
            .add_systems(EguiPrimaryContextPass, ui_system);
    }
}

fn collect_notices(mut messages: MessageReader<ViewerMessage>, mut notices: ResMut<Notices>) {
    for ViewerMessage(event) in messages.read() {
        match event {
            ViewerEvent::AssetFailed(failure) => {
                notices.push(format!("Could not load {}: {}", failure.locator, failure.reason));
            }
            ViewerEvent::FallbackLighting(_) => {
                notices.push("Environment map unavailable, using basic lighting".to_string());
            }
            _ => {}
        }
    }
}

fn ui_system(
    mut contexts: EguiContexts,
    state: Res<ViewerState>,
    pending: Res<PendingScenes>,
    environment: Res<EnvironmentAssets>,
    mut notices: ResMut<Notices>,
    mut commands: MessageWriter<ViewerCommand>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };
    let viewer = &state.0;

    egui::SidePanel::left("models")
        .resizable(false)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Paddock");
            ui.separator();

            let current = viewer.current_model_index();
            let loading = match viewer.state() {
                SwitchState::Loading(index) => Some(index),
                _ => None,
            };
            for (index, model) in viewer.catalog().iter().enumerate() {
                let mut label = model.name.clone();
                if loading == Some(index) {
                    label.push_str(" (loading)");
                }
                if ui.selectable_label(current == Some(index), label).clicked() {
                    commands.write(ViewerCommand::SwitchTo(index));
                }
            }

            ui.horizontal(|ui| {
                if ui.button("◀ Prev").clicked() {
                    commands.write(ViewerCommand::PreviousModel);
                }
                if ui.button("Next ▶").clicked() {
                    commands.write(ViewerCommand::NextModel);
                }
            });

            ui.separator();
            if ui.button("Reset view").clicked() {
                commands.write(ViewerCommand::ResetView);
            }
            if ui.button("Reset model").clicked() {
                commands.write(ViewerCommand::ResetModel);
            }
            let mut wireframe = viewer.wireframe();
            if ui.checkbox(&mut wireframe, "Wireframe").changed() {
                commands.write(ViewerCommand::ToggleWireframe);
            }

            ui.separator();
            if pending.in_flight() > 0 || environment.is_loading() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading…");
                });
            }
            if let Some(asset) = viewer.active() {
                ui.label(format!("Wheels: {}", asset.wheels().len()));
            }
            let lighting = match viewer.environment() {
                Environment::Pending => "pending",
                Environment::Map { .. } => "environment map",
                Environment::Fallback(_) => "fallback gradient",
            };
            ui.label(egui::RichText::new(format!("Lighting: {lighting}")).small());
            ui.label(
                egui::RichText::new("Scroll to drive · drag to orbit")
                    .small()
                    .color(egui::Color32::GRAY),
            );

            if !notices.entries.is_empty() {
                ui.separator();
                for notice in &notices.entries {
                    ui.colored_label(egui::Color32::from_rgb(220, 80, 60), notice);
                }
                if ui.small_button("Dismiss").clicked() {
                    notices.entries.clear();
                }
            }
        });
}
