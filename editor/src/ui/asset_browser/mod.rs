use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};
use fence_core::StyleSelection;

use crate::config::EditorRuntimeConfig;
use crate::ui::fence_builder::FenceBuilderUiState;

/// File extensions a custom pylon can be loaded from.
const SCENE_EXTENSIONS: [&str; 2] = ["glb", "gltf"];

fn is_scene_file(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SCENE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Scene files under `asset_root`, as sorted asset paths relative to it.
fn list_scene_files(asset_root: &str) -> Result<Vec<String>, String> {
    fn walk_dir(
        dir: &std::path::Path,
        base: &std::path::Path,
        out: &mut Vec<String>,
    ) -> std::io::Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                walk_dir(&path, base, out)?;
            } else if path.is_file() && is_scene_file(&path) {
                // Asset paths always use forward slashes.
                let rel = path.strip_prefix(base).unwrap_or(&path);
                out.push(rel.to_string_lossy().replace('\\', "/"));
            }
        }
        Ok(())
    }

    let base = std::path::PathBuf::from(asset_root);
    if !base.exists() {
        return Err(format!("Asset root does not exist: {asset_root}"));
    }
    if !base.is_dir() {
        return Err(format!("Asset root is not a directory: {asset_root}"));
    }

    let mut files = Vec::new();
    walk_dir(&base, &base, &mut files).map_err(|e| format!("Failed to read assets: {e}"))?;
    files.sort();
    Ok(files)
}

#[derive(Resource)]
pub struct AssetBrowserUiState {
    pub visible: bool,
}

impl Default for AssetBrowserUiState {
    fn default() -> Self {
        Self { visible: true }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<AssetBrowserUiState>();
    app.add_systems(EguiPrimaryContextPass, render);
}

fn render(
    mut contexts: EguiContexts,
    ui_state: Res<AssetBrowserUiState>,
    config: Res<EditorRuntimeConfig>,
    mut builder: ResMut<FenceBuilderUiState>,
) {
    if !ui_state.visible {
        return;
    }

    let ctx = contexts.ctx_mut().expect("to get primary egui context");

    egui::TopBottomPanel::bottom("bottom_asset_browser")
        .resizable(true)
        .default_height(180.0)
        .min_height(64.0)
        .max_height(480.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Asset Browser");
                ui.small("click a scene to use it as a custom pylon");
            });
            ui.separator();

            let asset_root = config.asset_root();
            ui.horizontal(|ui| {
                ui.label("Asset root:");
                ui.monospace(&asset_root);
            });
            ui.add_space(6.0);

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match list_scene_files(&asset_root) {
                    Ok(files) => {
                        ui.label(format!("{} scene(s)", files.len()));
                        ui.add_space(6.0);

                        for name in files {
                            let picked = matches!(
                                &builder.style,
                                StyleSelection::Custom { scene_path: Some(p) } if *p == name
                            );
                            if ui.selectable_label(picked, &name).clicked() {
                                info!("using {name} as custom pylon");
                                builder.use_custom_scene(name);
                            }
                        }
                    }
                    Err(err) => {
                        ui.colored_label(egui::Color32::RED, err);
                        ui.add_space(6.0);
                        ui.label("Set EDITOR_ASSET_PATH to a valid directory.");
                    }
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_only_scenes_sorted_and_relative() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("pylons/tall")).unwrap();
        std::fs::write(root.join("pylons/tall/b.glb"), b"").unwrap();
        std::fs::write(root.join("a.GLTF"), b"").unwrap();
        std::fs::write(root.join("styles.toml"), b"").unwrap();
        std::fs::write(root.join("pylons/readme.txt"), b"").unwrap();

        let files = list_scene_files(&root.to_string_lossy()).unwrap();
        assert_eq!(files, vec!["a.GLTF", "pylons/tall/b.glb"]);
    }

    #[test]
    fn missing_root_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = list_scene_files(&missing.to_string_lossy()).unwrap_err();
        assert!(err.contains("does not exist"));
    }

    #[test]
    fn file_as_root_is_reported() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = list_scene_files(&file.path().to_string_lossy()).unwrap_err();
        assert!(err.contains("not a directory"));
    }
}
