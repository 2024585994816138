use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};
use fence_core::{BeamWidths, MIN_CLOSED_POINTS};

use crate::fence::{
    AppendPylon, Beam, Fence, FocusInspector, Pylon, RegenerateFence, RemovePylon, WallCollider,
    fence_path, owning_fence,
};
use crate::selection::EditorSelection;

#[derive(Resource, Debug, Default)]
pub struct InspectorUiState {
    pub visible: bool,
    /// Fence the inspector was last focused on, kept while the selection is empty.
    pub focused: Option<Entity>,
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<InspectorUiState>();
    app.add_systems(Update, take_focus);
    app.add_systems(EguiPrimaryContextPass, render);
}

fn take_focus(mut focus: MessageReader<FocusInspector>, mut ui_state: ResMut<InspectorUiState>) {
    if let Some(request) = focus.read().last() {
        ui_state.visible = true;
        ui_state.focused = Some(request.fence);
    }
}

/// What the inspector asked for this frame.
#[derive(Default)]
struct InspectorActions {
    append: bool,
    regenerate: bool,
    remove: Option<Entity>,
    select: Option<Entity>,
}

/// Editable copy of a fence's settings. Written back only when it differs so an
/// idle inspector doesn't trigger beam rebuilds.
#[derive(Clone, Copy, PartialEq)]
struct FenceSettings {
    close_loop: bool,
    width_multiplier: f32,
    widths: BeamWidths,
}

impl FenceSettings {
    fn read(fence: &Fence, beam: &Beam) -> Self {
        Self {
            close_loop: fence.close_loop,
            width_multiplier: fence.width_multiplier,
            widths: beam.widths,
        }
    }
}

fn fence_settings(ui: &mut egui::Ui, settings: &mut FenceSettings, pylon_count: usize) {
    ui.checkbox(&mut settings.close_loop, "Connect last pylon to first");
    if settings.close_loop && pylon_count < MIN_CLOSED_POINTS {
        ui.small(format!(
            "Stays open until the fence has {MIN_CLOSED_POINTS} pylons."
        ));
    }

    egui::Grid::new("fence_settings")
        .num_columns(2)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            ui.label("Wall width multiplier");
            ui.add(
                egui::DragValue::new(&mut settings.width_multiplier)
                    .speed(0.05)
                    .range(0.0..=100.0),
            );
            ui.end_row();

            ui.label("Beam start width");
            ui.add(
                egui::DragValue::new(&mut settings.widths.start)
                    .speed(0.01)
                    .range(0.0..=10.0),
            );
            ui.end_row();
            ui.label("Beam end width");
            ui.add(
                egui::DragValue::new(&mut settings.widths.end)
                    .speed(0.01)
                    .range(0.0..=10.0),
            );
            ui.end_row();
        });
}

fn pylon_rows(
    ui: &mut egui::Ui,
    fence: &Fence,
    pylons: &mut Query<&mut Transform, (With<Pylon>, Without<Fence>)>,
    selection: &EditorSelection,
    actions: &mut InspectorActions,
) {
    egui::ScrollArea::vertical()
        .max_height(320.0)
        .auto_shrink([false, true])
        .show(ui, |ui| {
            for (index, &pylon) in fence.pylons.iter().enumerate() {
                let Ok(mut transform) = pylons.get_mut(pylon) else {
                    continue;
                };
                ui.horizontal(|ui| {
                    let label = format!("Pylon {}", index + 1);
                    if ui
                        .selectable_label(selection.contains(pylon), label)
                        .clicked()
                    {
                        actions.select = Some(pylon);
                    }

                    let mut position = transform.translation;
                    ui.add(egui::DragValue::new(&mut position.x).speed(0.1).prefix("x: "));
                    ui.add(egui::DragValue::new(&mut position.y).speed(0.1).prefix("y: "));
                    ui.add(egui::DragValue::new(&mut position.z).speed(0.1).prefix("z: "));
                    if position != transform.translation {
                        transform.translation = position;
                    }

                    if ui.small_button("✕").on_hover_text("Remove pylon").clicked() {
                        actions.remove = Some(pylon);
                    }
                });
            }
        });
}

fn render(
    mut contexts: EguiContexts,
    mut ui_state: ResMut<InspectorUiState>,
    mut selection: ResMut<EditorSelection>,
    mut fences: Query<(&mut Fence, &mut Beam, Option<&Children>)>,
    mut pylons: Query<&mut Transform, (With<Pylon>, Without<Fence>)>,
    walls: Query<(), With<WallCollider>>,
    is_fence: Query<(), With<Fence>>,
    parents: Query<&ChildOf, With<Pylon>>,
    mut writers: (
        MessageWriter<AppendPylon>,
        MessageWriter<RemovePylon>,
        MessageWriter<RegenerateFence>,
    ),
) {
    if !ui_state.visible {
        return;
    }

    let ctx = contexts.ctx_mut().expect("to get primary egui context");

    let target = selection
        .primary()
        .and_then(|entity| owning_fence(entity, &is_fence, &parents))
        .or(ui_state.focused.filter(|&fence| is_fence.contains(fence)));
    ui_state.focused = target;

    let mut actions = InspectorActions::default();
    let mut open = true;

    egui::SidePanel::right("fence_inspector")
        .resizable(true)
        .default_width(340.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Inspector");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("✕").clicked() {
                        open = false;
                    }
                });
            });
            ui.separator();

            let Some(entity) = target else {
                ui.label("Select a fence or one of its pylons.");
                return;
            };
            let Ok((mut fence, mut beam, children)) = fences.get_mut(entity) else {
                return;
            };

            ui.label(format!("{} ({entity})", fence.style));
            let wall_count = children
                .into_iter()
                .flatten()
                .filter(|child| walls.contains(**child))
                .count();
            let segments = fence_path(&fence, |pylon| {
                pylons.get(pylon).ok().map(|transform| transform.translation)
            })
            .segment_count();
            ui.small(format!(
                "{} pylons, {segments} segments, {wall_count} walls built",
                fence.pylons.len()
            ));

            ui.add_space(8.0);
            ui.heading("Pylons");
            if ui.button("Add pylon").clicked() {
                actions.append = true;
            }
            pylon_rows(ui, &fence, &mut pylons, &selection, &mut actions);

            ui.add_space(8.0);
            ui.heading("Beam & walls");
            let current = FenceSettings::read(&fence, &beam);
            let mut edited = current;
            fence_settings(ui, &mut edited, fence.pylons.len());
            if edited != current {
                fence.close_loop = edited.close_loop;
                fence.width_multiplier = edited.width_multiplier;
                if edited.widths != current.widths {
                    beam.widths = edited.widths;
                }
            }

            ui.add_space(12.0);
            ui.vertical_centered(|ui| {
                if ui
                    .add_sized([140.0, 30.0], egui::Button::new("Generate fence"))
                    .clicked()
                {
                    actions.regenerate = true;
                }
            });
        });

    if !open {
        ui_state.visible = false;
    }

    let Some(fence) = target else {
        return;
    };
    let (append, remove, regenerate) = &mut writers;
    if actions.append {
        append.write(AppendPylon { fence });
    }
    if let Some(pylon) = actions.remove {
        remove.write(RemovePylon { fence, pylon });
    }
    if actions.regenerate {
        regenerate.write(RegenerateFence { fence });
    }
    if let Some(pylon) = actions.select {
        selection.select_only(pylon);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_request_opens_inspector_on_fence() {
        let mut app = App::new();
        app.add_message::<FocusInspector>();
        app.init_resource::<InspectorUiState>();
        app.add_systems(Update, take_focus);

        let fence = app.world_mut().spawn_empty().id();
        app.world_mut().write_message(FocusInspector { fence });
        app.update();

        let state = app.world().resource::<InspectorUiState>();
        assert!(state.visible);
        assert_eq!(state.focused, Some(fence));
    }

    #[test]
    fn settings_copy_tracks_fence_and_beam() {
        let fence = Fence {
            style: "tech_fence".into(),
            pylons: Vec::new(),
            close_loop: true,
            width_multiplier: 4.0,
            pylon_template: crate::fence::test_support::mesh_template(),
        };
        let beam = Beam {
            points: Vec::new(),
            closed: false,
            widths: BeamWidths::uniform(0.3),
            material: Handle::default(),
        };

        let settings = FenceSettings::read(&fence, &beam);
        assert!(settings.close_loop);
        assert_eq!(settings.width_multiplier, 4.0);
        assert_eq!(settings.widths, BeamWidths::uniform(0.3));
    }
}
