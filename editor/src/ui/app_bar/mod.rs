mod file_menu;
mod view_menu;

use bevy::{app::AppExit, prelude::*};
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};

use crate::fence::{ColliderOverlayEnabled, Fence};
use crate::ground::GroundGridEnabled;
use crate::selection::EditorSelection;
use crate::ui::asset_browser::AssetBrowserUiState;
use crate::ui::fence_builder::FenceBuilderUiState;
use crate::ui::inspector::InspectorUiState;

pub(super) fn plugin(app: &mut App) {
    // Render panels in the egui pass schedule so the pass state is initialized.
    app.add_systems(EguiPrimaryContextPass, render);
}

fn render(
    mut contexts: EguiContexts,
    mut commands: Commands,
    exit: MessageWriter<AppExit>,
    fences: Query<Entity, With<Fence>>,
    mut selection: ResMut<EditorSelection>,
    mut builder_ui: ResMut<FenceBuilderUiState>,
    views: (
        ResMut<InspectorUiState>,
        ResMut<AssetBrowserUiState>,
        ResMut<GroundGridEnabled>,
        ResMut<ColliderOverlayEnabled>,
    ),
) {
    let ctx = contexts.ctx_mut().expect("to get primary egui context");

    let mut new_scene = false;
    egui::TopBottomPanel::top("top_app_bar")
        .resizable(false)
        .exact_height(32.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                egui::MenuBar::new().ui(ui, |ui| {
                    new_scene = file_menu::render(ui, exit);
                    ui.menu_button("Tools", |ui| {
                        if ui.button("Fence Builder").clicked() {
                            builder_ui.visible = true;
                            ui.close();
                        }
                    });
                    view_menu::render(ui, views);

                    // Fill the rest of the bar so it visually spans the full width.
                    ui.add_space(ui.available_width());
                });
            });

            // Prevent the panel from collapsing to minimal height in some layouts.
            ui.allocate_rect(ui.available_rect_before_wrap(), egui::Sense::hover());
        });

    if new_scene {
        let count = fences.iter().count();
        for fence in &fences {
            commands.entity(fence).despawn();
        }
        selection.clear();
        info!("cleared {count} fence(s)");
    }
}
