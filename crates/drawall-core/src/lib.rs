//! # Drawall Core
//!
//! Core types, traits, and utilities shared by the Drawall crates.
//! Provides the fundamental abstractions for the plotter hardware,
//! the status protocol sent to the companion visualizer, error codes,
//! and the drawing primitives that parsers feed into the motion engine.

pub mod data;
pub mod drawing;
pub mod error;
pub mod hal;
pub mod telemetry;
pub mod units;

pub use data::{Anchor, Axis, CableLengths, Geometry, PenState, Point};

pub use drawing::DrawingSink;

pub use error::{Error, ErrorCode, Result};

pub use hal::Hardware;

pub use telemetry::{
    InitReport, JsonLinesTelemetry, NullTelemetry, RecordingTelemetry, SerialCode,
    SerialTelemetry, StatusEvent, Telemetry,
};

pub use units::SvgUnit;
