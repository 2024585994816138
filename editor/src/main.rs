mod camera;
mod config;
mod fence;
mod ground;
mod selection;
mod styles;
mod ui;

use bevy::asset::AssetPlugin;
use bevy::color::palettes::css::ALICE_BLUE;
use bevy::prelude::*;

use crate::config::EditorRuntimeConfig;

fn main() {
    // To make `.env` work reliably, load it from the editor crate directory.
    let editor_crate_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let dotenv_path = editor_crate_dir.join(".env");
    let _ = dotenvy::from_path(dotenv_path);

    let config = EditorRuntimeConfig::from_env();

    let default_plugins = DefaultPlugins.build().set(AssetPlugin {
        file_path: config.asset_root(),
        ..default()
    });

    let mut app = App::new();
    app.insert_resource(config);
    app.add_plugins((
        default_plugins,
        MeshPickingPlugin,
        config::plugin,
        styles::plugin,
        selection::plugin,
        fence::plugin,
        ground::plugin,
        camera::plugin,
        ui::plugin,
    ));
    app.insert_resource(AmbientLight {
        color: ALICE_BLUE.into(),
        brightness: 2_000.,
        ..AmbientLight::default()
    });
    app.run();
}
