use bevy::{app::AppExit, ecs::message::MessageWriter};
use bevy_egui::egui::Ui;

/// Returns true when "New" was picked; the caller clears the scene.
pub(super) fn render(ui: &mut Ui, mut exit: MessageWriter<AppExit>) -> bool {
    let mut new_scene = false;
    ui.menu_button("File", |ui| {
        if ui.button("New").clicked() {
            new_scene = true;
            ui.close();
        }

        ui.separator();

        if ui.button("Quit").clicked() {
            ui.close();
            exit.write(AppExit::Success);
        }
    });
    new_scene
}
