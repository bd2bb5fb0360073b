//! Curve and long line flattening
//!
//! The scheduler moves the cables linearly, which bends straight lines on the
//! sheet. Long lines are therefore cut into short pieces, and Bézier curves
//! are sampled at fixed parameter steps.

use drawall_core::Point;

/// Longest axis-aligned extent drawn without splitting, in drawing units
pub const DEFAULT_SPLIT_THRESHOLD: f64 = 5.0;

/// Parameter increment used to sample curves
pub const CURVE_STEP: f64 = 0.01;

const CURVE_SAMPLES: usize = 100;

/// Number of equal pieces a line from `from` to `to` is cut into.
///
/// Zero when neither extent exceeds `threshold`.
pub fn sub_segment_count(from: Point, to: Point, threshold: f64) -> usize {
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();
    if threshold <= 0.0 || (dx <= threshold && dy <= threshold) {
        return 0;
    }
    (dx.max(dy) / threshold).ceil() as usize
}

/// Intermediate targets of a long line, ending on `to`.
///
/// The caller still draws a final segment to the exact end point.
pub fn split_line(from: Point, to: Point, threshold: f64) -> Vec<Point> {
    let count = sub_segment_count(from, to, threshold);
    let step = (to - from) * (1.0 / count.max(1) as f64);
    (1..=count).map(|i| from + step * i as f64).collect()
}

/// Cubic Bernstein polynomial at `t`
pub fn cubic_at(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * t * u * u) + p2 * (3.0 * t * t * u) + p3 * (t * t * t)
}

/// Quadratic Bernstein polynomial at `t`
pub fn quadratic_at(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    let u = 1.0 - t;
    p0 * (u * u) + p1 * (2.0 * t * u) + p2 * (t * t)
}

/// Samples of a cubic curve at t = 0, 0.01, ..., 1 (101 points).
pub fn cubic_points(p0: Point, p1: Point, p2: Point, p3: Point) -> Vec<Point> {
    (0..=CURVE_SAMPLES)
        .map(|i| cubic_at(p0, p1, p2, p3, i as f64 * CURVE_STEP))
        .collect()
}

/// Samples of a quadratic curve at t = 0, 0.01, ..., 1 (101 points).
pub fn quadratic_points(p0: Point, p1: Point, p2: Point) -> Vec<Point> {
    (0..=CURVE_SAMPLES)
        .map(|i| quadratic_at(p0, p1, p2, i as f64 * CURVE_STEP))
        .collect()
}

/// Length of the polyline through `points`
pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_twelve_by_five() {
        let points = split_line(Point::ZERO, Point::new(12.0, 0.0), 5.0);
        assert_eq!(points.len(), 3);
        assert!((points[0].x - 4.0).abs() < 1e-9);
        assert!((points[1].x - 8.0).abs() < 1e-9);
        assert!((points[2].x - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_lines_are_not_split() {
        assert!(split_line(Point::ZERO, Point::new(5.0, -5.0), 5.0).is_empty());
        assert_eq!(
            sub_segment_count(Point::ZERO, Point::new(3.0, -20.0), 5.0),
            4
        );
    }

    #[test]
    fn test_cubic_samples() {
        let p0 = Point::new(0.0, 0.0);
        let p3 = Point::new(30.0, 0.0);
        let points = cubic_points(p0, Point::new(10.0, 10.0), Point::new(20.0, 10.0), p3);
        assert_eq!(points.len(), 101);
        assert_eq!(points[0], p0);
        assert!(points[100].distance(p3) < 1e-9);
        // symmetric control polygon peaks at t = 0.5
        assert!((points[50].y - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_cubic_has_no_length() {
        let p = Point::new(12.5, -3.0);
        let points = cubic_points(p, p, p, p);
        assert!(points.iter().all(|q| q.distance(p) < 1e-9));
        assert!(polyline_length(&points) < 1e-9);
    }

    #[test]
    fn test_quadratic_midpoint() {
        let points = quadratic_points(
            Point::new(0.0, 0.0),
            Point::new(10.0, 20.0),
            Point::new(20.0, 0.0),
        );
        assert_eq!(points.len(), 101);
        assert!((points[50].x - 10.0).abs() < 1e-9);
        assert!((points[50].y - 10.0).abs() < 1e-9);
    }
}
