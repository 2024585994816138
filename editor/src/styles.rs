use bevy::prelude::*;
use fence_core::{FenceError, StyleCatalog};

use crate::config::EditorRuntimeConfig;

/// The style lookup table the builder panel offers.
#[derive(Resource, Debug, Clone, Default)]
pub struct FenceStyles(pub StyleCatalog);

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<FenceStyles>();
    app.add_systems(PreStartup, load_catalog);
}

#[derive(Debug, thiserror::Error)]
enum CatalogLoadError {
    #[error("failed to read: {0}")]
    Read(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] FenceError),
}

fn read_catalog(path: &std::path::Path) -> Result<StyleCatalog, CatalogLoadError> {
    let source = std::fs::read_to_string(path)?;
    Ok(StyleCatalog::from_toml_str(&source)?)
}

/// Built-in styles plus the configured catalog file, if any. A broken file is
/// reported and the built-ins are used on their own.
fn load_catalog(config: Res<EditorRuntimeConfig>, mut styles: ResMut<FenceStyles>) {
    let Some(path) = config.style_catalog_path() else {
        return;
    };

    match read_catalog(&path) {
        Ok(catalog) => {
            info!(
                "loaded {} fence style(s) from {}",
                catalog.len(),
                path.display()
            );
            styles.0 = catalog;
        }
        Err(err) => {
            error!("style catalog {}: {err}", path.display());
        }
    }
}
