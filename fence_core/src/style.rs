//! Visual presets for new fences.
//!
//! The catalog always carries the three built-in styles. More can be added by
//! loading a TOML file with `[[style]]` tables:
//!
//! ```toml
//! [[style]]
//! key = "red_laser"
//! label = "Red Laser"
//! width_multiplier = 2.0
//!
//! [style.pylon]
//! kind = "scene"
//! path = "fences/red_laser.glb"
//!
//! [style.beam]
//! color = [1.0, 0.1, 0.1, 1.0]
//! start_width = 0.2
//! end_width = 0.2
//! ```

use serde::Deserialize;

use crate::{BeamWidths, FenceError, Result};

pub const CUSTOM_STYLE_LABEL: &str = "Custom";

/// Key of the style a custom fence borrows its beam settings from.
const CUSTOM_BASE_STYLE: &str = "green_energy";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PylonShape {
    Cylinder,
    Cuboid,
    Capsule,
}

/// What gets spawned for each pylon.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PylonAsset {
    /// glTF scene path relative to the asset root, e.g. "fences/post.glb".
    Scene { path: String },
    /// Built-in primitive, used by the stock styles so they work without assets.
    Primitive {
        shape: PylonShape,
        /// Linear RGBA.
        color: [f32; 4],
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BeamStyle {
    /// Linear RGBA; also used as the emissive tint.
    pub color: [f32; 4],
    pub start_width: f32,
    pub end_width: f32,
}

impl BeamStyle {
    pub fn widths(&self) -> BeamWidths {
        BeamWidths {
            start: self.start_width,
            end: self.end_width,
        }
    }
}

fn default_width_multiplier() -> f32 {
    1.0
}

fn default_close_loop() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StyleTemplate {
    pub key: String,
    pub label: String,
    pub pylon: PylonAsset,
    pub beam: BeamStyle,
    #[serde(default = "default_width_multiplier")]
    pub width_multiplier: f32,
    /// Whether new fences of this style start as a closed loop.
    #[serde(default = "default_close_loop")]
    pub close_loop: bool,
}

/// The designer's pick in the builder panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleSelection {
    Named(String),
    Custom { scene_path: Option<String> },
}

impl StyleSelection {
    pub fn label<'a>(&'a self, catalog: &'a StyleCatalog) -> &'a str {
        match self {
            StyleSelection::Named(key) => catalog
                .get(key)
                .map(|style| style.label.as_str())
                .unwrap_or(key.as_str()),
            StyleSelection::Custom { .. } => CUSTOM_STYLE_LABEL,
        }
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    style: Vec<StyleTemplate>,
}

/// Ordered lookup table of style key to template.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleCatalog {
    styles: Vec<StyleTemplate>,
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StyleCatalog {
    pub fn builtin() -> Self {
        Self {
            styles: vec![
                StyleTemplate {
                    key: "green_energy".into(),
                    label: "Green Energy".into(),
                    pylon: PylonAsset::Primitive {
                        shape: PylonShape::Cylinder,
                        color: [0.1, 0.35, 0.15, 1.0],
                    },
                    beam: BeamStyle {
                        color: [0.2, 1.0, 0.35, 1.0],
                        start_width: 0.25,
                        end_width: 0.25,
                    },
                    width_multiplier: 2.0,
                    close_loop: true,
                },
                StyleTemplate {
                    key: "tech_fence".into(),
                    label: "Tech Fence".into(),
                    pylon: PylonAsset::Primitive {
                        shape: PylonShape::Cuboid,
                        color: [0.3, 0.32, 0.36, 1.0],
                    },
                    beam: BeamStyle {
                        color: [0.3, 0.7, 1.0, 1.0],
                        start_width: 0.1,
                        end_width: 0.1,
                    },
                    width_multiplier: 4.0,
                    close_loop: true,
                },
                StyleTemplate {
                    key: "yellow_purple_sparks".into(),
                    label: "Yellow Purple Sparks".into(),
                    pylon: PylonAsset::Primitive {
                        shape: PylonShape::Capsule,
                        color: [0.45, 0.15, 0.6, 1.0],
                    },
                    beam: BeamStyle {
                        color: [1.0, 0.85, 0.1, 1.0],
                        start_width: 0.35,
                        end_width: 0.15,
                    },
                    width_multiplier: 1.5,
                    close_loop: true,
                },
            ],
        }
    }

    /// Built-in styles followed by every style in `source`.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let mut catalog = Self::builtin();
        catalog.extend_from_toml_str(source)?;
        Ok(catalog)
    }

    pub fn extend_from_toml_str(&mut self, source: &str) -> Result<usize> {
        let file: CatalogFile = toml::from_str(source)?;
        let added = file.style.len();
        for style in file.style {
            self.insert(style)?;
        }
        log::debug!("loaded {added} fence style(s) from catalog");
        Ok(added)
    }

    pub fn insert(&mut self, style: StyleTemplate) -> Result<()> {
        if self.get(&style.key).is_some() {
            return Err(FenceError::DuplicateStyle(style.key));
        }
        self.styles.push(style);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&StyleTemplate> {
        self.styles.iter().find(|style| style.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleTemplate> {
        self.styles.iter()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Turns a selection into a concrete template.
    ///
    /// A custom selection keeps the beam and wall settings of the green
    /// energy style and swaps in the supplied scene for the pylons.
    pub fn resolve(&self, selection: &StyleSelection) -> Result<StyleTemplate> {
        match selection {
            StyleSelection::Named(key) => self
                .get(key)
                .cloned()
                .ok_or_else(|| FenceError::UnknownStyle(key.clone())),
            StyleSelection::Custom { scene_path } => {
                let path = scene_path
                    .as_deref()
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .ok_or_else(|| FenceError::UnresolvedTemplate {
                        style: CUSTOM_STYLE_LABEL.to_string(),
                    })?;

                let base = self
                    .get(CUSTOM_BASE_STYLE)
                    .or_else(|| self.styles.first())
                    .ok_or_else(|| FenceError::UnknownStyle(CUSTOM_BASE_STYLE.to_string()))?;

                Ok(StyleTemplate {
                    key: "custom".into(),
                    label: CUSTOM_STYLE_LABEL.into(),
                    pylon: PylonAsset::Scene {
                        path: path.to_string(),
                    },
                    ..base.clone()
                })
            }
        }
    }
}
