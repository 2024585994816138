use core::f32::consts::TAU;

use bevy_math::Vec3;

/// Radius used when pylons are first spread around a new fence.
pub const DEFAULT_RADIUS: f32 = 10.0;

/// Offset of pylon `index` (1-based) out of `count` on a horizontal circle.
///
/// Numbering starts at the first added pylon, so pylon 1 sits one step past
/// angle zero and pylon `count` lands on `+Z`.
pub fn radial_offset(index: usize, count: usize, radius: f32) -> Vec3 {
    if count == 0 {
        return Vec3::ZERO;
    }
    let angle = TAU / count as f32 * index as f32;
    Vec3::new(angle.sin(), 0.0, angle.cos()) * radius
}

pub fn radial_positions(count: usize, radius: f32) -> Vec<Vec3> {
    (1..=count)
        .map(|index| radial_offset(index, count, radius))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn every_point_sits_on_the_circle() {
        for count in 2..=40 {
            for point in radial_positions(count, 7.5) {
                assert!((point.length() - 7.5).abs() < EPS);
                assert_eq!(point.y, 0.0);
            }
        }
    }

    #[test]
    fn points_are_evenly_spaced() {
        let count = 7;
        let points = radial_positions(count, 10.0);
        let step = TAU / count as f32;
        for pair in points.windows(2) {
            let angle = pair[0].angle_between(pair[1]);
            assert!((angle - step).abs() < EPS);
        }
    }

    #[test]
    fn four_pylons_start_a_quarter_turn_in() {
        let points = radial_positions(4, 10.0);
        let expected = [
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -10.0),
            Vec3::new(-10.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 10.0),
        ];
        assert_eq!(points.len(), 4);
        for (point, expected) in points.iter().zip(expected) {
            assert!(point.abs_diff_eq(expected, EPS), "{point} != {expected}");
        }
    }

    #[test]
    fn zero_count_yields_nothing() {
        assert!(radial_positions(0, 10.0).is_empty());
        assert_eq!(radial_offset(1, 0, 10.0), Vec3::ZERO);
    }
}
