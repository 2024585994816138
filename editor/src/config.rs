use bevy::prelude::*;
use core::str::FromStr;
use fence_core::{DEFAULT_COLLIDER_HEIGHT, DEFAULT_RADIUS, YawMode};

/// Runtime configuration for the fence editor.
///
/// Initialized once at startup and stored as a Bevy `Resource`, so all
/// systems (UI included) read a single source of truth.
///
/// Environment variables:
/// - `EDITOR_ASSET_PATH`     (optional; when unset Bevy defaults to `assets`)
/// - `FENCE_STYLE_CATALOG`   (optional; TOML file of extra styles, relative to the asset root)
/// - `FENCE_MIN_PYLONS`      (default: `2`)
/// - `FENCE_MAX_PYLONS`      (default: `40`)
/// - `FENCE_RADIUS`          (default: `10`)
/// - `FENCE_COLLIDER_HEIGHT` (default: `4`)
/// - `FENCE_YAW_MODE`        (`atan2` or `legacy`, default: `atan2`)
#[derive(Resource, Clone, Debug)]
pub struct EditorRuntimeConfig {
    /// Optional asset root override. If set, Bevy will load assets relative to this directory.
    pub asset_path: Option<String>,
    pub style_catalog: Option<String>,
    pub min_pylons: usize,
    pub max_pylons: usize,
    /// Radius of the circle new pylons are spread on.
    pub radius: f32,
    pub collider_height: f32,
    pub yaw_mode: YawMode,
    /// Values that were set but could not be used. Reported once logging is up.
    pub warnings: Vec<String>,
}

const MIN_PYLONS: usize = 2;
const MAX_PYLONS: usize = 40;

impl Default for EditorRuntimeConfig {
    fn default() -> Self {
        Self {
            asset_path: None,
            style_catalog: None,
            min_pylons: MIN_PYLONS,
            max_pylons: MAX_PYLONS,
            radius: DEFAULT_RADIUS,
            collider_height: DEFAULT_COLLIDER_HEIGHT,
            yaw_mode: YawMode::default(),
            warnings: Vec::new(),
        }
    }
}

impl EditorRuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());
        let mut config = Self {
            asset_path: non_empty("EDITOR_ASSET_PATH"),
            style_catalog: non_empty("FENCE_STYLE_CATALOG"),
            ..Self::default()
        };

        let mut warnings = Vec::new();
        config.min_pylons = parse_or(&non_empty, "FENCE_MIN_PYLONS", MIN_PYLONS, &mut warnings);
        config.max_pylons = parse_or(&non_empty, "FENCE_MAX_PYLONS", MAX_PYLONS, &mut warnings);
        config.radius = positive_or(&non_empty, "FENCE_RADIUS", DEFAULT_RADIUS, &mut warnings);
        config.collider_height = positive_or(
            &non_empty,
            "FENCE_COLLIDER_HEIGHT",
            DEFAULT_COLLIDER_HEIGHT,
            &mut warnings,
        );
        config.yaw_mode = parse_or(&non_empty, "FENCE_YAW_MODE", YawMode::default(), &mut warnings);

        // Fewer than two pylons is not a fence.
        if config.min_pylons < MIN_PYLONS {
            warnings.push(format!(
                "FENCE_MIN_PYLONS={} is below {MIN_PYLONS}, using {MIN_PYLONS}",
                config.min_pylons
            ));
            config.min_pylons = MIN_PYLONS;
        }
        if config.max_pylons < config.min_pylons {
            warnings.push(format!(
                "FENCE_MAX_PYLONS={} is below the minimum, using {}",
                config.max_pylons, config.min_pylons
            ));
            config.max_pylons = config.min_pylons;
        }

        config.warnings = warnings;
        config
    }

    pub fn clamp_pylon_count(&self, count: usize) -> usize {
        count.clamp(self.min_pylons, self.max_pylons)
    }

    /// Returns the asset root directory Bevy should use for `AssetPlugin.file_path`.
    ///
    /// If `EDITOR_ASSET_PATH` is relative, it is resolved against the editor crate
    /// directory (`CARGO_MANIFEST_DIR`) so it works even when you run from the
    /// workspace root (`cargo run -p editor`).
    pub fn asset_root(&self) -> String {
        let raw = self
            .asset_path
            .clone()
            .unwrap_or_else(|| "assets".to_string());

        let raw_path = std::path::PathBuf::from(&raw);
        if raw_path.is_absolute() {
            return raw;
        }

        let crate_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        crate_dir.join(raw_path).to_string_lossy().to_string()
    }

    /// Full path of the style catalog file, if one is configured.
    pub fn style_catalog_path(&self) -> Option<std::path::PathBuf> {
        let catalog = std::path::PathBuf::from(self.style_catalog.as_ref()?);
        if catalog.is_absolute() {
            Some(catalog)
        } else {
            Some(std::path::PathBuf::from(self.asset_root()).join(catalog))
        }
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
    warnings: &mut Vec<String>,
) -> T
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(err) => {
            warnings.push(format!("ignoring {key}={raw:?}: {err}"));
            default
        }
    }
}

/// Like [`parse_or`], but only finite values above zero are taken.
fn positive_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: f32,
    warnings: &mut Vec<String>,
) -> f32 {
    let value = parse_or(lookup, key, default, warnings);
    if value.is_finite() && value > 0.0 {
        value
    } else {
        warnings.push(format!("{key}={value} must be a positive number, using {default}"));
        default
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, report);
}

fn report(config: Res<EditorRuntimeConfig>) {
    for warning in &config.warnings {
        warn!("{warning}");
    }
    info!(
        "fence editor: pylons {}..={}, radius {}, wall height {}, yaw {}",
        config.min_pylons,
        config.max_pylons,
        config.radius,
        config.collider_height,
        config.yaw_mode.label()
    );
}
