//! SVG document driver
//!
//! Only the parts of the document the plotter understands are read: the
//! `width` and `height` of the root element and the `d` attribute of every
//! path, in document order. Transforms, styles and other shapes are ignored.

use crate::attributes::get_numeric_attribute;
use crate::path::PathInterpreter;
use crate::reader::CharSource;
use crate::scan;
use drawall_core::{DrawingSink, ErrorCode, Result};

/// What a document contained
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SvgSummary {
    pub width: f64,
    pub height: f64,
    /// Number of `d` attributes interpreted
    pub paths: usize,
    /// Number of parameter groups executed over all paths
    pub commands: usize,
}

/// Declared size of the document, in user units.
///
/// A missing or non-numeric dimension reads as zero.
pub fn svg_size<S, D>(src: &mut S, sink: &mut D) -> Result<(f64, f64)>
where
    S: CharSource + ?Sized,
    D: DrawingSink + ?Sized,
{
    src.seek_to_start()?;
    if !scan::find(src, b"<svg") {
        return Err(sink.fail(ErrorCode::NotSvgFile, "no <svg element"));
    }
    let width = get_numeric_attribute(src, "width")?.unwrap_or(0.0);
    let height = get_numeric_attribute(src, "height")?.unwrap_or(0.0);
    Ok((width, height))
}

/// Stream every path of the document into `sink`.
pub fn draw_svg<S, D>(src: &mut S, sink: &mut D) -> Result<SvgSummary>
where
    S: CharSource + ?Sized,
    D: DrawingSink + ?Sized,
{
    let (width, height) = svg_size(src, sink)?;
    sink.begin_drawing(width, height)?;

    if !scan::find(src, b"<path") {
        return Err(sink.fail(ErrorCode::NotSvgPath, "no <path element"));
    }

    let mut summary = SvgSummary {
        width,
        height,
        ..SvgSummary::default()
    };
    while scan::find_attribute(src, "d") {
        let mut interpreter = PathInterpreter::new();
        interpreter.run(src, sink)?;
        summary.paths += 1;
        summary.commands += interpreter.commands();
        tracing::debug!(
            "Path {} done, {} commands",
            summary.paths,
            interpreter.commands()
        );
    }

    sink.end_drawing()?;
    tracing::info!(
        "Drawn {} paths ({} commands) from a {}x{} document",
        summary.paths,
        summary.commands,
        width,
        height
    );
    Ok(summary)
}
