use crate::data::Point;
use crate::error::{Error, ErrorCode, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Fixed machine geometry, in millimetres
///
/// The left anchor is the origin of the machine frame. The sheet's upper left
/// corner sits at (`sheet_position_x`, `sheet_position_y`) from it and the
/// right anchor at (`span`, 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Distance between the two anchors
    pub span: f64,
    pub sheet_width: f64,
    pub sheet_height: f64,
    /// Horizontal offset of the sheet from the left anchor
    pub sheet_position_x: f64,
    /// Vertical offset of the sheet below the anchors
    pub sheet_position_y: f64,
    /// Millimetres of cable moved by one motor step
    pub step_length: f64,
}

impl Geometry {
    /// Step length for a pinion of `diameter_um` micrometres driven by a
    /// motor of `steps` steps per revolution.
    ///
    /// The step line is toggled once per step and only rising edges advance
    /// the driver, hence the factor two.
    pub fn step_length_for(steps: u32, diameter_um: u32) -> f64 {
        (PI * f64::from(diameter_um) / 1000.0) / (f64::from(steps) * 2.0)
    }

    /// Check that the sheet fits between the anchors and that a step moves
    /// the cable by a finite, positive length.
    pub fn validate(&self) -> Result<()> {
        if self.span < self.sheet_width + self.sheet_position_x {
            return Err(Error::fatal(
                ErrorCode::TooShortSpan,
                format!(
                    "span {} < sheet width {} + sheet position {}",
                    self.span, self.sheet_width, self.sheet_position_x
                ),
            ));
        }
        if !(self.step_length > 0.0 && self.step_length.is_finite()) {
            return Err(Error::fatal(
                ErrorCode::TooFewParameters,
                format!("invalid step length {}", self.step_length),
            ));
        }
        Ok(())
    }

    /// Whether `p` lies on the sheet, borders included
    pub fn contains(&self, p: Point) -> bool {
        (0.0..=self.sheet_width).contains(&p.x) && (0.0..=self.sheet_height).contains(&p.y)
    }

    /// Distance from the left anchor to the sheet's right edge on the far side
    pub fn right_margin(&self) -> f64 {
        self.span - self.sheet_position_x - self.sheet_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(span: f64) -> Geometry {
        Geometry {
            span,
            sheet_width: 650.0,
            sheet_height: 500.0,
            sheet_position_x: 175.0,
            sheet_position_y: 250.0,
            step_length: 0.1,
        }
    }

    #[test]
    fn test_step_length() {
        // 200 steps, 20 mm pinion: 62.83 mm per turn over 400 edges
        let length = Geometry::step_length_for(200, 20_000);
        assert!((length - 0.15708).abs() < 1e-5);
    }

    #[test]
    fn test_span_check() {
        assert!(geometry(1000.0).validate().is_ok());
        assert!(geometry(825.0).validate().is_ok());
        let err = geometry(800.0).validate().unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::TooShortSpan));
    }

    #[test]
    fn test_step_length_check() {
        let mut g = geometry(1000.0);
        g.step_length = Geometry::step_length_for(0, 20_000);
        let err = g.validate().unwrap_err();
        assert!(matches!(err, Error::Fatal { .. }));
        assert_eq!(err.code(), Some(ErrorCode::TooFewParameters));

        g.step_length = 0.0;
        assert_eq!(
            g.validate().unwrap_err().code(),
            Some(ErrorCode::TooFewParameters)
        );
    }

    #[test]
    fn test_contains() {
        let g = geometry(1000.0);
        assert!(g.contains(Point::new(0.0, 0.0)));
        assert!(g.contains(Point::new(650.0, 500.0)));
        assert!(!g.contains(Point::new(-0.1, 10.0)));
        assert!(!g.contains(Point::new(10.0, 500.5)));
        assert_eq!(g.right_margin(), 175.0);
    }
}
