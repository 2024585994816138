use core::str::FromStr;

use bevy_math::{Quat, Vec3};

use crate::{BeamWidths, FenceError, FencePath, Segment};

/// Height of every wall volume, in world units.
pub const DEFAULT_COLLIDER_HEIGHT: f32 = 4.0;

/// How the wall yaw is derived from the horizontal delta of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YawMode {
    /// Two-argument arctangent, correct in every quadrant.
    #[default]
    Atan2,
    /// `atan(dx / dz)`, as older fences were authored. Walls along negative
    /// Z face the wrong way and `dz == 0` produces ±90° or NaN.
    Legacy,
}

impl YawMode {
    pub fn label(self) -> &'static str {
        match self {
            YawMode::Atan2 => "atan2",
            YawMode::Legacy => "legacy",
        }
    }
}

impl FromStr for YawMode {
    type Err = FenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atan2" => Ok(YawMode::Atan2),
            "legacy" | "atan" => Ok(YawMode::Legacy),
            other => Err(FenceError::InvalidYawMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderSettings {
    /// Scales the average beam width into the wall thickness.
    pub width_multiplier: f32,
    pub height: f32,
    pub yaw_mode: YawMode,
}

impl Default for ColliderSettings {
    fn default() -> Self {
        Self {
            width_multiplier: 1.0,
            height: DEFAULT_COLLIDER_HEIGHT,
            yaw_mode: YawMode::default(),
        }
    }
}

/// An invisible box blocking movement through one segment.
///
/// `size` is `(width, height, length)`: the length runs along the local Z axis
/// and only yaw is ever applied, so walls stay upright even when the two
/// endpoints differ in height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderVolume {
    pub center: Vec3,
    pub size: Vec3,
    pub yaw_degrees: f32,
}

impl ColliderVolume {
    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn length(&self) -> f32 {
        self.size.z
    }

    pub fn half_extents(&self) -> Vec3 {
        self.size * 0.5
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw_degrees.to_radians())
    }
}

/// Wraps an angle into `(-180, 180]`.
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

pub fn yaw_degrees(start: Vec3, end: Vec3, mode: YawMode) -> f32 {
    let dx = end.x - start.x;
    let dz = end.z - start.z;

    match mode {
        YawMode::Atan2 => normalize_degrees(dx.atan2(dz).to_degrees()),
        YawMode::Legacy => {
            let degrees = (dx / dz).atan().to_degrees();
            // Unreachable for a single-argument arctangent, kept so legacy
            // output stays bit-for-bit what older fences were built with.
            if degrees > 180.0 {
                degrees - 360.0
            } else {
                degrees
            }
        }
    }
}

pub fn synthesize(
    segment: Segment,
    beam: BeamWidths,
    settings: &ColliderSettings,
) -> ColliderVolume {
    let width = beam.average() * settings.width_multiplier;

    ColliderVolume {
        center: segment.midpoint(),
        size: Vec3::new(width, settings.height, segment.length()),
        yaw_degrees: yaw_degrees(segment.start, segment.end, settings.yaw_mode),
    }
}

/// One volume per segment, in segment order. Empty for paths under two points.
pub fn synthesize_path(
    path: &FencePath,
    beam: BeamWidths,
    settings: &ColliderSettings,
) -> Vec<ColliderVolume> {
    path.segments()
        .map(|segment| synthesize(segment, beam, settings))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn beam() -> BeamWidths {
        BeamWidths {
            start: 0.2,
            end: 0.4,
        }
    }

    #[test]
    fn center_is_midpoint_and_length_is_distance() {
        let settings = ColliderSettings::default();
        let cases = [
            (Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)),
            (Vec3::new(-3.0, 1.0, 2.0), Vec3::new(4.0, -2.0, 9.5)),
            (Vec3::new(1.0, 0.0, 1.0), Vec3::new(1.0, 5.0, 1.0)),
        ];

        for (a, b) in cases {
            let volume = synthesize(Segment::new(a, b), beam(), &settings);
            assert!(volume.center.abs_diff_eq((a + b) / 2.0, EPS));
            assert!((volume.length() - a.distance(b)).abs() < EPS);
        }
    }

    #[test]
    fn width_scales_average_beam_width() {
        let settings = ColliderSettings {
            width_multiplier: 5.0,
            ..default_settings()
        };
        let volume = synthesize(Segment::new(Vec3::ZERO, Vec3::Z), beam(), &settings);
        assert!((volume.width() - 1.5).abs() < EPS);
        assert_eq!(volume.height(), DEFAULT_COLLIDER_HEIGHT);
    }

    fn default_settings() -> ColliderSettings {
        ColliderSettings::default()
    }

    #[test]
    fn atan2_yaw_covers_all_quadrants() {
        let yaw = |x: f32, z: f32| yaw_degrees(Vec3::ZERO, Vec3::new(x, 0.0, z), YawMode::Atan2);

        assert!((yaw(0.0, 1.0) - 0.0).abs() < EPS);
        assert!((yaw(1.0, 0.0) - 90.0).abs() < EPS);
        assert!((yaw(1.0, -1.0) - 135.0).abs() < EPS);
        assert!((yaw(0.0, -1.0) - 180.0).abs() < EPS);
        assert!((yaw(-1.0, -1.0) + 135.0).abs() < EPS);
        assert!((yaw(-1.0, 0.0) + 90.0).abs() < EPS);
    }

    #[test]
    fn atan2_yaw_aligns_length_axis_with_segment() {
        let a = Vec3::new(2.0, 0.0, -1.0);
        let b = Vec3::new(-4.0, 0.0, -7.0);
        let volume = synthesize(Segment::new(a, b), beam(), &default_settings());

        let along = volume.rotation() * Vec3::Z;
        let expected = (b - a).normalize();
        assert!(along.abs_diff_eq(expected, EPS));
    }

    #[test]
    fn legacy_yaw_loses_quadrant_for_negative_dz() {
        let forward = yaw_degrees(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0), YawMode::Legacy);
        let backward = yaw_degrees(Vec3::ZERO, Vec3::new(-1.0, 0.0, -1.0), YawMode::Legacy);
        assert!((forward - 45.0).abs() < EPS);
        assert!((backward - 45.0).abs() < EPS);
    }

    #[test]
    fn legacy_yaw_with_zero_dz() {
        let sideways = yaw_degrees(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), YawMode::Legacy);
        assert!((sideways - 90.0).abs() < EPS);

        let coincident = yaw_degrees(Vec3::ONE, Vec3::ONE, YawMode::Legacy);
        assert!(coincident.is_nan());
    }

    #[test]
    fn normalize_wraps_into_half_open_range() {
        assert!((normalize_degrees(190.0) + 170.0).abs() < EPS);
        assert!((normalize_degrees(-180.0) - 180.0).abs() < EPS);
        assert!((normalize_degrees(540.0) - 180.0).abs() < EPS);
        assert!((normalize_degrees(-45.0) + 45.0).abs() < EPS);
    }

    #[test]
    fn yaw_mode_parses_from_config_strings() {
        assert_eq!("atan2".parse::<YawMode>().unwrap(), YawMode::Atan2);
        assert_eq!(" Legacy ".parse::<YawMode>().unwrap(), YawMode::Legacy);
        assert!(matches!(
            "spin".parse::<YawMode>(),
            Err(FenceError::InvalidYawMode(_))
        ));
    }

    #[test]
    fn no_volumes_for_short_paths() {
        let settings = default_settings();
        assert!(synthesize_path(&FencePath::default(), beam(), &settings).is_empty());
        let single = FencePath::new(vec![Vec3::ONE], true);
        assert!(synthesize_path(&single, beam(), &settings).is_empty());
    }

    #[test]
    fn regenerating_identical_path_is_idempotent() {
        let path = FencePath::new(
            vec![
                Vec3::ZERO,
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 10.0),
            ],
            true,
        );
        let settings = default_settings();
        let first = synthesize_path(&path, beam(), &settings);
        let second = synthesize_path(&path, beam(), &settings);
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert!((first[2].length() - 200f32.sqrt()).abs() < EPS);
    }
}
