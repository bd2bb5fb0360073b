//! Polar kinematics
//!
//! Converts a position on the sheet into the two cable lengths, in motor
//! steps, by triangulation against the anchors. The left anchor is the origin
//! of the machine frame, the right anchor sits `span` millimetres to its right
//! and the sheet hangs below them. Y is measured downward from the top edge of
//! the sheet.

use drawall_core::{CableLengths, ErrorCode, Geometry, Point};

/// Result of bounding a target to the sheet
#[derive(Debug, Clone, PartialEq)]
pub struct Clamped {
    /// The target, inside the sheet
    pub point: Point,
    /// One limit code per violated edge, empty when the target was inside
    pub limits: Vec<ErrorCode>,
}

impl Clamped {
    pub fn was_clamped(&self) -> bool {
        !self.limits.is_empty()
    }
}

/// Pure conversion between sheet positions and cable lengths
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    geometry: Geometry,
}

impl Kinematics {
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Left cable length, in steps, for the sheet position (`x`, `y`).
    pub fn left_length(&self, x: f64, y: f64) -> u64 {
        let g = &self.geometry;
        to_steps(
            (g.sheet_position_x + x) / g.step_length,
            (g.sheet_position_y + y) / g.step_length,
        )
    }

    /// Right cable length, in steps, for the sheet position (`x`, `y`).
    pub fn right_length(&self, x: f64, y: f64) -> u64 {
        let g = &self.geometry;
        to_steps(
            (g.span - g.sheet_position_x - x) / g.step_length,
            (g.sheet_position_y + y) / g.step_length,
        )
    }

    pub fn lengths(&self, p: Point) -> CableLengths {
        CableLengths::new(self.left_length(p.x, p.y), self.right_length(p.x, p.y))
    }

    /// Bound `p` to the sheet rectangle.
    ///
    /// Horizontal limits are reported before vertical ones.
    pub fn clamp(&self, p: Point) -> Clamped {
        let g = &self.geometry;
        let mut limits = Vec::new();
        let mut point = p;

        if p.x < 0.0 {
            point.x = 0.0;
            limits.push(ErrorCode::LeftLimit);
        } else if p.x > g.sheet_width {
            point.x = g.sheet_width;
            limits.push(ErrorCode::RightLimit);
        }

        if p.y < 0.0 {
            point.y = 0.0;
            limits.push(ErrorCode::UpperLimit);
        } else if p.y > g.sheet_height {
            point.y = g.sheet_height;
            limits.push(ErrorCode::LowerLimit);
        }

        Clamped { point, limits }
    }

    /// Sheet position of the carriage for the given cable lengths.
    ///
    /// Inverse of [`Kinematics::lengths`] up to the rounding of one step.
    pub fn position_from_lengths(&self, lengths: CableLengths) -> Point {
        let g = &self.geometry;
        let a = lengths.left as f64 * g.step_length;
        let b = lengths.right as f64 * g.step_length;

        // Intersection of the two circles centred on the anchors
        let machine_x = (a * a - b * b + g.span * g.span) / (2.0 * g.span);
        let machine_y = (a * a - machine_x * machine_x).max(0.0).sqrt();

        Point::new(
            machine_x - g.sheet_position_x,
            machine_y - g.sheet_position_y,
        )
    }
}

fn to_steps(dx: f64, dy: f64) -> u64 {
    // hypot is never negative; the cast saturates on NaN and infinity
    dx.hypot(dy).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn centred() -> Kinematics {
        Kinematics::new(Geometry {
            span: 1000.0,
            sheet_width: 600.0,
            sheet_height: 400.0,
            sheet_position_x: 200.0,
            sheet_position_y: 300.0,
            step_length: 0.2,
        })
    }

    #[test]
    fn test_upper_left_corner() {
        let k = centred();
        // (200, 300) from the left anchor is 360.555 mm
        assert_eq!(k.left_length(0.0, 0.0), 1803);
        // (800, 300) from the right anchor is 854.4 mm
        assert_eq!(k.right_length(0.0, 0.0), 4272);
    }

    #[test]
    fn test_clamp_reports_edges() {
        let k = centred();
        let inside = k.clamp(Point::new(10.0, 10.0));
        assert!(!inside.was_clamped());
        assert_eq!(inside.point, Point::new(10.0, 10.0));

        let corner = k.clamp(Point::new(-5.0, 450.0));
        assert_eq!(corner.point, Point::new(0.0, 400.0));
        assert_eq!(
            corner.limits,
            vec![ErrorCode::LeftLimit, ErrorCode::LowerLimit]
        );

        let top_right = k.clamp(Point::new(700.0, -1.0));
        assert_eq!(top_right.point, Point::new(600.0, 0.0));
        assert_eq!(
            top_right.limits,
            vec![ErrorCode::RightLimit, ErrorCode::UpperLimit]
        );
    }

    #[test]
    fn test_inverse_kinematics() {
        let k = centred();
        let target = Point::new(123.0, 321.0);
        let found = k.position_from_lengths(k.lengths(target));
        assert!(found.distance(target) < 0.5, "found {}", found);
    }

    proptest! {
        #[test]
        fn lengths_are_finite_and_positive(x in 0.0f64..=600.0, y in 0.0f64..=400.0) {
            let k = centred();
            let lengths = k.lengths(Point::new(x, y));
            // the sheet hangs below the anchors, so no cable can be slack
            prop_assert!(lengths.left > 0);
            prop_assert!(lengths.right > 0);
        }

        #[test]
        fn centred_sheet_is_symmetric(y in 0.0f64..=400.0) {
            let k = centred();
            let g = *k.geometry();
            prop_assert_eq!(g.sheet_position_x, g.right_margin());
            prop_assert_eq!(
                k.left_length(g.sheet_width / 2.0, y),
                k.right_length(g.sheet_width / 2.0, y)
            );
        }

        #[test]
        fn mirrored_points_swap_lengths(x in 0.0f64..=600.0, y in 0.0f64..=400.0) {
            let k = centred();
            let mirrored = 600.0 - x;
            prop_assert_eq!(k.left_length(x, y), k.right_length(mirrored, y));
        }
    }
}
