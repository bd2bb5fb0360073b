//! Drawing primitives
//!
//! The interface between the drawing parsers (SVG path data, GCode) and the
//! motion engine. Coordinates are absolute, in drawing units; the sink owns
//! the mapping onto the physical sheet.

use crate::data::Point;
use crate::error::{ErrorCode, Result};

/// Receiver of parsed drawing primitives
pub trait DrawingSink {
    /// Declare the native size of the drawing about to be streamed.
    fn begin_drawing(&mut self, width: f64, height: f64) -> Result<()>;

    /// Move to `to` without drawing.
    fn move_to(&mut self, to: Point) -> Result<()>;

    /// Draw a straight line to `to`.
    fn line_to(&mut self, to: Point) -> Result<()>;

    /// Draw a cubic Bézier curve from the current point.
    fn cubic_to(&mut self, c1: Point, c2: Point, to: Point) -> Result<()>;

    /// Draw a quadratic Bézier curve from the current point.
    fn quadratic_to(&mut self, c: Point, to: Point) -> Result<()>;

    /// Pause for `seconds`.
    fn dwell(&mut self, seconds: f64) -> Result<()>;

    /// Report an advisory condition found while parsing.
    fn warn(&mut self, code: ErrorCode, detail: &str);

    /// Report a fatal condition found while parsing. Lifts the pen and halts.
    fn fail(&mut self, code: ErrorCode, detail: &str) -> crate::Error;

    /// The drawing has been fully streamed.
    fn end_drawing(&mut self) -> Result<()>;
}
