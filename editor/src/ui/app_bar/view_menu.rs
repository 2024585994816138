use bevy::ecs::system::ResMut;
use bevy_egui::egui::Ui;

use crate::fence::ColliderOverlayEnabled;
use crate::ground::GroundGridEnabled;
use crate::ui::asset_browser::AssetBrowserUiState;
use crate::ui::inspector::InspectorUiState;

pub(super) fn render(
    ui: &mut Ui,
    (mut inspector_ui, mut asset_browser_ui, mut grid_enabled, mut overlay_enabled): (
        ResMut<InspectorUiState>,
        ResMut<AssetBrowserUiState>,
        ResMut<GroundGridEnabled>,
        ResMut<ColliderOverlayEnabled>,
    ),
) {
    ui.menu_button("View", |ui| {
        if ui.button("Inspector").clicked() {
            inspector_ui.visible = !inspector_ui.visible;
            ui.close();
        }

        if ui.button("Asset Browser").clicked() {
            asset_browser_ui.visible = !asset_browser_ui.visible;
            ui.close();
        }

        ui.separator();

        if ui.checkbox(&mut grid_enabled.0, "Grid").clicked() {
            ui.close();
        }
        if ui.checkbox(&mut overlay_enabled.0, "Colliders").clicked() {
            ui.close();
        }
    });
}
