//! # Drawall Parser
//!
//! Streaming interpreters feeding a [`drawall_core::DrawingSink`]:
//!
//! - [`PathInterpreter`] for SVG path data, read character by character
//!   from a [`CharSource`] positioned after `d="`
//! - [`svg`] to locate the drawing size and every path of a document
//! - [`GcodeInterpreter`] for the line-oriented GCode subset
//!
//! Nothing here materializes a whole file in memory; the only random access
//! needed is the seek used by attribute lookups.

pub mod attributes;
pub mod gcode;
pub mod path;
pub mod reader;
pub mod scan;
pub mod svg;

pub use attributes::{get_attribute, get_numeric_attribute, split_unit};
pub use gcode::{GcodeFunction, GcodeInterpreter, GcodeSummary};
pub use path::{CommandKind, PathCommand, PathCursor, PathInterpreter, ReflectionState};
pub use reader::{CharSource, FileSource, StringSource};
pub use svg::{draw_svg, svg_size, SvgSummary};
