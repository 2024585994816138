//! Fence builder window: pick a style and pylon count, then drop a new fence
//! around a center point.
//!
//! Opened from `Tools > Fence Builder`. The window can be docked to the left
//! edge or float; a floating builder closes itself once the new fence has been
//! handed over to the inspector.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};
use fence_core::{StyleCatalog, StyleSelection};

use crate::config::EditorRuntimeConfig;
use crate::fence::{FocusInspector, SpawnFence};
use crate::selection::EditorSelection;
use crate::styles::FenceStyles;

const DEFAULT_PYLON_COUNT: usize = 4;

#[derive(Resource, Debug, Clone)]
pub struct FenceBuilderUiState {
    pub visible: bool,
    pub docked: bool,
    pub pylon_count: usize,
    pub center: Vec3,
    pub style: StyleSelection,
    /// Shown under the Add Fence button until the next successful add.
    pub last_error: Option<String>,
}

impl Default for FenceBuilderUiState {
    fn default() -> Self {
        Self {
            visible: true,
            docked: false,
            pylon_count: DEFAULT_PYLON_COUNT,
            center: Vec3::ZERO,
            style: StyleSelection::Named("green_energy".into()),
            last_error: None,
        }
    }
}

impl FenceBuilderUiState {
    /// Points the custom style at a scene asset (used by the asset browser).
    pub fn use_custom_scene(&mut self, path: impl Into<String>) {
        self.style = StyleSelection::Custom {
            scene_path: Some(path.into()),
        };
        self.visible = true;
    }

    /// Turns the panel state into a spawn request.
    pub fn request(
        &self,
        catalog: &StyleCatalog,
        config: &EditorRuntimeConfig,
    ) -> fence_core::Result<SpawnFence> {
        let style = catalog.resolve(&self.style)?;
        Ok(SpawnFence {
            style,
            center: self.center,
            pylon_count: config.clamp_pylon_count(self.pylon_count),
        })
    }
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<FenceBuilderUiState>();
    app.add_systems(Update, close_when_focused);
    app.add_systems(EguiPrimaryContextPass, render);
}

/// A floating builder gets out of the way once the inspector takes over.
fn close_when_focused(
    mut focus: MessageReader<FocusInspector>,
    mut ui_state: ResMut<FenceBuilderUiState>,
) {
    if focus.read().count() > 0 && !ui_state.docked {
        ui_state.visible = false;
    }
}

fn vec3_field(ui: &mut egui::Ui, label: &str, value: &mut Vec3) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::DragValue::new(&mut value.x).speed(0.1).prefix("x: "));
        ui.add(egui::DragValue::new(&mut value.y).speed(0.1).prefix("y: "));
        ui.add(egui::DragValue::new(&mut value.z).speed(0.1).prefix("z: "));
    });
}

fn style_picker(ui: &mut egui::Ui, catalog: &StyleCatalog, style: &mut StyleSelection) {
    let selected_text = style.label(catalog).to_string();
    egui::ComboBox::from_label("Fence style")
        .selected_text(selected_text)
        .show_ui(ui, |ui| {
            for template in catalog.iter() {
                ui.selectable_value(
                    style,
                    StyleSelection::Named(template.key.clone()),
                    template.label.as_str(),
                );
            }
            let is_custom = matches!(style, StyleSelection::Custom { .. });
            if ui
                .selectable_label(is_custom, fence_core::CUSTOM_STYLE_LABEL)
                .clicked()
                && !is_custom
            {
                *style = StyleSelection::Custom { scene_path: None };
            }
        });

    // A custom style needs a pylon scene of its own.
    if let StyleSelection::Custom { scene_path } = style {
        let path = scene_path.get_or_insert_with(String::new);
        ui.horizontal(|ui| {
            ui.label("Custom pylon scene:");
            ui.text_edit_singleline(path);
        });
        ui.small("Path relative to the asset root, or pick a .glb/.gltf in the Asset Browser.");
    }
}

fn contents(
    ui: &mut egui::Ui,
    ui_state: &mut FenceBuilderUiState,
    config: &EditorRuntimeConfig,
    catalog: &StyleCatalog,
    captured: Option<Vec3>,
    spawn: &mut MessageWriter<SpawnFence>,
) {
    ui.add_space(8.0);

    ui_state.pylon_count = config.clamp_pylon_count(ui_state.pylon_count);
    ui.add(
        egui::Slider::new(
            &mut ui_state.pylon_count,
            config.min_pylons..=config.max_pylons,
        )
        .text("Number of pylons"),
    );

    ui.add_space(5.0);
    vec3_field(ui, "Fence center:", &mut ui_state.center);

    ui.add_space(5.0);
    ui.vertical_centered(|ui| {
        let capture = ui.add_enabled(
            captured.is_some(),
            egui::Button::new("Capture position of selected object"),
        );
        if capture.clicked()
            && let Some(position) = captured
        {
            ui_state.center = position;
        }
    });

    ui.add_space(10.0);
    style_picker(ui, catalog, &mut ui_state.style);

    ui.add_space(20.0);
    ui.vertical_centered(|ui| {
        let add = ui.add_sized([96.0, 34.0], egui::Button::new("Add Fence"));
        if add.clicked() {
            match ui_state.request(catalog, config) {
                Ok(request) => {
                    ui_state.last_error = None;
                    spawn.write(request);
                }
                Err(err) => {
                    error!("cannot add fence: {err}");
                    ui_state.last_error = Some(err.to_string());
                }
            }
        }
    });

    if let Some(err) = &ui_state.last_error {
        ui.add_space(6.0);
        ui.colored_label(egui::Color32::RED, err);
    }

    ui.add_space(10.0);
    ui.separator();
    ui.checkbox(&mut ui_state.docked, "Dock to the left");
}

fn render(
    mut contexts: EguiContexts,
    mut ui_state: ResMut<FenceBuilderUiState>,
    config: Res<EditorRuntimeConfig>,
    styles: Res<FenceStyles>,
    selection: Res<EditorSelection>,
    transforms: Query<&GlobalTransform>,
    mut spawn: MessageWriter<SpawnFence>,
) {
    if !ui_state.visible {
        return;
    }

    let ctx = contexts.ctx_mut().expect("to get primary egui context");

    let captured = selection
        .primary()
        .and_then(|entity| transforms.get(entity).ok())
        .map(GlobalTransform::translation);

    let ui_state = ui_state.as_mut();
    if ui_state.docked {
        egui::SidePanel::left("fence_builder_panel")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.heading("Fence Builder");
                contents(ui, ui_state, &config, &styles.0, captured, &mut spawn);
            });
    } else {
        let mut open = true;
        egui::Window::new("Fence Builder")
            .open(&mut open)
            .resizable(false)
            .default_width(320.0)
            .show(ctx, |ui| {
                contents(ui, ui_state, &config, &styles.0, captured, &mut spawn);
            });
        if !open {
            ui_state.visible = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fence_core::FenceError;

    #[test]
    fn request_clamps_count_and_resolves_style() {
        let config = EditorRuntimeConfig::default();
        let catalog = StyleCatalog::builtin();
        let state = FenceBuilderUiState {
            pylon_count: 500,
            center: Vec3::new(1.0, 2.0, 3.0),
            style: StyleSelection::Named("tech_fence".into()),
            ..default()
        };

        let request = state.request(&catalog, &config).unwrap();
        assert_eq!(request.pylon_count, config.max_pylons);
        assert_eq!(request.center, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(request.style.key, "tech_fence");
    }

    #[test]
    fn custom_style_without_scene_is_refused() {
        let config = EditorRuntimeConfig::default();
        let catalog = StyleCatalog::builtin();
        let state = FenceBuilderUiState {
            style: StyleSelection::Custom { scene_path: None },
            ..default()
        };
        assert!(matches!(
            state.request(&catalog, &config),
            Err(FenceError::UnresolvedTemplate { .. })
        ));
    }

    #[test]
    fn asset_browser_pick_switches_to_custom() {
        let mut state = FenceBuilderUiState {
            visible: false,
            ..default()
        };
        state.use_custom_scene("posts/pylon.glb");
        assert!(state.visible);
        assert_eq!(
            state.style,
            StyleSelection::Custom {
                scene_path: Some("posts/pylon.glb".into())
            }
        );
    }

    #[test]
    fn floating_builder_closes_on_focus() {
        let mut app = App::new();
        app.add_message::<FocusInspector>();
        app.init_resource::<FenceBuilderUiState>();
        app.add_systems(Update, close_when_focused);

        let fence = app.world_mut().spawn_empty().id();
        app.world_mut().write_message(FocusInspector { fence });
        app.update();
        assert!(!app.world().resource::<FenceBuilderUiState>().visible);

        app.world_mut().resource_mut::<FenceBuilderUiState>().visible = true;
        app.world_mut().resource_mut::<FenceBuilderUiState>().docked = true;
        app.world_mut().write_message(FocusInspector { fence });
        app.update();
        assert!(app.world().resource::<FenceBuilderUiState>().visible);
    }
}
