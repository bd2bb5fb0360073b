//! Placement of a drawing on the sheet
//!
//! A drawing point `p` lands on the sheet at
//! `p * scale * calibration.scale + offset + calibration.offset`.

use drawall_core::{Anchor, Geometry, Point};
use serde::{Deserialize, Serialize};

/// How a drawing is scaled onto the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawingSize {
    /// One drawing unit is one millimetre
    Original,
    /// Largest scale that fits the sheet, keeping the aspect ratio
    #[default]
    Fit,
}

/// Machine-specific correction applied after placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawingTransform {
    scale: f64,
    offset: Point,
    calibration: Calibration,
}

impl Default for DrawingTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl DrawingTransform {
    /// Drawing units are sheet millimetres.
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            offset: Point::ZERO,
            calibration: Calibration::default(),
        }
    }

    /// Transform that only applies the calibration
    pub fn calibrated(calibration: Calibration) -> Self {
        Self {
            calibration,
            ..Self::identity()
        }
    }

    /// Place a `width` x `height` drawing on the sheet at `anchor`.
    ///
    /// A drawing without a usable size is placed unscaled at the upper left
    /// corner.
    pub fn compute(
        geometry: &Geometry,
        width: f64,
        height: f64,
        size: DrawingSize,
        anchor: Anchor,
        calibration: Calibration,
    ) -> Self {
        if !(width > 0.0 && height > 0.0) {
            tracing::warn!("Drawing size {}x{} unusable, placing unscaled", width, height);
            return Self::calibrated(calibration);
        }

        let scale = match size {
            DrawingSize::Original => 1.0,
            DrawingSize::Fit => {
                (geometry.sheet_width / width).min(geometry.sheet_height / height)
            }
        };

        // Free space around the scaled drawing, distributed by the anchor
        let free_x = geometry.sheet_width - width * scale;
        let free_y = geometry.sheet_height - height * scale;
        let offset = anchor.locate(free_x, free_y);

        tracing::debug!(
            "Drawing {}x{} placed at {} with scale {:.4}",
            width,
            height,
            offset,
            scale
        );

        Self {
            scale,
            offset,
            calibration,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Sheet position of the drawing point `p`
    pub fn apply(&self, p: Point) -> Point {
        let c = &self.calibration;
        Point::new(
            p.x * self.scale * c.scale_x + self.offset.x + c.offset_x,
            p.y * self.scale * c.scale_y + self.offset.y + c.offset_y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> Geometry {
        Geometry {
            span: 1000.0,
            sheet_width: 600.0,
            sheet_height: 400.0,
            sheet_position_x: 200.0,
            sheet_position_y: 300.0,
            step_length: 0.2,
        }
    }

    #[test]
    fn test_fit_wide_drawing() {
        let t = DrawingTransform::compute(
            &geometry(),
            300.0,
            100.0,
            DrawingSize::Fit,
            Anchor::Center,
            Calibration::default(),
        );
        assert_eq!(t.scale(), 2.0);
        // 600x200 on a 600x400 sheet, centred vertically
        assert_eq!(t.offset(), Point::new(0.0, 100.0));
        assert_eq!(t.apply(Point::new(300.0, 100.0)), Point::new(600.0, 300.0));
    }

    #[test]
    fn test_original_size_anchors() {
        let lower_right = DrawingTransform::compute(
            &geometry(),
            100.0,
            50.0,
            DrawingSize::Original,
            Anchor::LowerRight,
            Calibration::default(),
        );
        assert_eq!(lower_right.scale(), 1.0);
        assert_eq!(lower_right.offset(), Point::new(500.0, 350.0));

        let upper_left = DrawingTransform::compute(
            &geometry(),
            100.0,
            50.0,
            DrawingSize::Original,
            Anchor::UpperLeft,
            Calibration::default(),
        );
        assert_eq!(upper_left.offset(), Point::ZERO);
    }

    #[test]
    fn test_calibration_applies_last() {
        let calibration = Calibration {
            scale_x: 0.5,
            scale_y: 1.0,
            offset_x: 3.0,
            offset_y: -2.0,
        };
        let t = DrawingTransform::calibrated(calibration);
        assert_eq!(t.apply(Point::new(10.0, 10.0)), Point::new(8.0, 8.0));
    }

    #[test]
    fn test_degenerate_size_keeps_identity() {
        let t = DrawingTransform::compute(
            &geometry(),
            0.0,
            100.0,
            DrawingSize::Fit,
            Anchor::Center,
            Calibration::default(),
        );
        assert_eq!(t, DrawingTransform::identity());
    }
}
