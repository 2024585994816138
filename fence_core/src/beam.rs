use bevy_math::Vec3;

use crate::FencePath;

/// Start and end width of the rendered beam, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamWidths {
    pub start: f32,
    pub end: f32,
}

impl BeamWidths {
    pub fn uniform(width: f32) -> Self {
        Self {
            start: width,
            end: width,
        }
    }

    pub fn average(&self) -> f32 {
        (self.start + self.end) * 0.5
    }

    /// Width at `t` in `[0, 1]` along the whole beam.
    pub fn at(&self, t: f32) -> f32 {
        self.start + (self.end - self.start) * t.clamp(0.0, 1.0)
    }
}

impl Default for BeamWidths {
    fn default() -> Self {
        Self::uniform(0.2)
    }
}

/// One straight piece of the rendered beam.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamSpan {
    pub start: Vec3,
    pub end: Vec3,
    pub width: f32,
}

impl BeamSpan {
    pub fn midpoint(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    pub fn direction(&self) -> Vec3 {
        (self.end - self.start).normalize_or_zero()
    }
}

/// Splits the path into beam spans, tapering the width along total length
/// the way a line renderer's width curve does. Each span takes the width at
/// its own midpoint. Zero-length spans are dropped.
pub fn beam_spans(path: &FencePath, widths: BeamWidths) -> Vec<BeamSpan> {
    let total: f32 = path.segments().map(|s| s.length()).sum();
    if total <= f32::EPSILON {
        return Vec::new();
    }

    let mut travelled = 0.0;
    let mut spans = Vec::with_capacity(path.segment_count());
    for segment in path.segments() {
        let length = segment.length();
        let t = (travelled + length * 0.5) / total;
        travelled += length;

        if length <= f32::EPSILON {
            continue;
        }

        spans.push(BeamSpan {
            start: segment.start,
            end: segment.end,
            width: widths.at(t),
        });
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_beam_keeps_width() {
        let path = FencePath::new(vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 0.0, 1.0)], true);
        let spans = beam_spans(&path, BeamWidths::uniform(0.3));
        assert_eq!(spans.len(), 3);
        assert!(spans.iter().all(|s| (s.width - 0.3).abs() < 1e-6));
    }

    #[test]
    fn width_tapers_along_length() {
        let path = FencePath::new(
            vec![Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 0.0)],
            false,
        );
        let spans = beam_spans(
            &path,
            BeamWidths {
                start: 0.0,
                end: 1.0,
            },
        );
        assert!((spans[0].width - 0.25).abs() < 1e-6);
        assert!((spans[1].width - 0.75).abs() < 1e-6);
    }

    #[test]
    fn coincident_points_produce_no_spans() {
        let path = FencePath::new(vec![Vec3::ONE, Vec3::ONE, Vec3::ONE], true);
        assert!(beam_spans(&path, BeamWidths::default()).is_empty());
    }

    #[test]
    fn zero_length_span_is_skipped_but_others_remain() {
        let path = FencePath::new(vec![Vec3::ZERO, Vec3::ZERO, Vec3::Z], false);
        let spans = beam_spans(&path, BeamWidths::default());
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].direction(), Vec3::Z);
    }
}
