use bevy_math::Vec3;

/// Fewest points a path needs before the closing segment is drawn.
/// A two point "loop" would just retrace its only segment.
pub const MIN_CLOSED_POINTS: usize = 3;

/// One adjacent pair of points along a fence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec3,
    pub end: Vec3,
}

impl Segment {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    pub fn midpoint(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// Ordered pylon positions plus the open/closed flag.
///
/// The requested `closed` flag is kept as-is so it survives a temporary dip
/// below three points, but [`FencePath::is_closed`] only reports `true` when
/// the path is long enough to form a loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FencePath {
    points: Vec<Vec3>,
    closed: bool,
}

impl FencePath {
    pub fn new(points: Vec<Vec3>, closed: bool) -> Self {
        Self { points, closed }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Effective closed state.
    pub fn is_closed(&self) -> bool {
        self.closed && self.points.len() >= MIN_CLOSED_POINTS
    }

    /// Closed state as requested, before the three point rule is applied.
    pub fn closed_requested(&self) -> bool {
        self.closed
    }

    pub fn force_open(&mut self) {
        self.closed = false;
    }

    /// Appends a new point at `anchor` and returns its index.
    pub fn append_point(&mut self, anchor: Vec3) -> usize {
        self.points.push(anchor);
        self.points.len() - 1
    }

    pub fn segment_count(&self) -> usize {
        if self.is_closed() {
            self.points.len()
        } else {
            self.points.len().saturating_sub(1)
        }
    }

    /// Adjacent pairs in path order, followed by the last-to-first pair when closed.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.points.len();
        (0..self.segment_count())
            .map(move |i| Segment::new(self.points[i], self.points[(i + 1) % n]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<Vec3> {
        (0..n).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect()
    }

    #[test]
    fn open_path_has_one_less_segment_than_points() {
        for n in 2..8 {
            let path = FencePath::new(line(n), false);
            assert_eq!(path.segments().count(), n - 1);
            assert_eq!(path.segment_count(), n - 1);
        }
    }

    #[test]
    fn closed_path_has_one_segment_per_point() {
        for n in 3..8 {
            let path = FencePath::new(line(n), true);
            assert_eq!(path.segments().count(), n);
            let last = path.segments().last().unwrap();
            assert_eq!(last.start, path.points()[n - 1]);
            assert_eq!(last.end, path.points()[0]);
        }
    }

    #[test]
    fn two_point_path_is_never_closed() {
        let path = FencePath::new(line(2), true);
        assert!(!path.is_closed());
        assert_eq!(path.segments().count(), 1);
    }

    #[test]
    fn degenerate_paths_have_no_segments() {
        assert_eq!(FencePath::new(Vec::new(), true).segments().count(), 0);
        assert_eq!(FencePath::new(line(1), true).segments().count(), 0);
    }

    #[test]
    fn closed_request_applies_once_enough_points_exist() {
        let mut path = FencePath::new(line(2), true);
        assert!(!path.is_closed());
        path.append_point(Vec3::new(5.0, 0.0, 5.0));
        assert!(path.is_closed());
        path.force_open();
        assert!(!path.is_closed());
        assert!(!path.closed_requested());
    }

    #[test]
    fn append_point_keeps_order() {
        let mut path = FencePath::default();
        assert_eq!(path.append_point(Vec3::ZERO), 0);
        assert_eq!(path.append_point(Vec3::X), 1);
        assert_eq!(path.points(), &[Vec3::ZERO, Vec3::X]);
    }

    #[test]
    fn square_with_diagonal_closing_segment() {
        let path = FencePath::new(
            vec![
                Vec3::ZERO,
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 10.0),
            ],
            true,
        );
        let lengths: Vec<f32> = path.segments().map(|s| s.length()).collect();
        assert_eq!(lengths.len(), 3);
        assert!((lengths[0] - 10.0).abs() < 1e-5);
        assert!((lengths[1] - 10.0).abs() < 1e-5);
        assert!((lengths[2] - 200f32.sqrt()).abs() < 1e-4);
    }
}
