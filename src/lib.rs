//! # Drawall
//!
//! Firmware core for a two-motor, cable-suspended wall plotter. The pen
//! hangs from two cables wound on stepper-driven pinions; drawings read as
//! SVG path data or GCode are turned into synchronized motor steps.
//!
//! ## Architecture
//!
//! Drawall is organized as a workspace with multiple crates:
//!
//! 1. **drawall-core** - Shared types, error codes, hardware and telemetry traits
//! 2. **drawall-motion** - Kinematics, step scheduling, pen control, the motion engine
//! 3. **drawall-parser** - SVG path data and GCode interpreters
//! 4. **drawall-settings** - Configuration catalog and persistence
//! 5. **drawall** - Session orchestration and the command-line simulator

pub mod session;

pub use drawall_core::{
    Anchor, Axis, CableLengths, DrawingSink, Error, ErrorCode, Geometry, Hardware,
    JsonLinesTelemetry, NullTelemetry, PenState, Point, RecordingTelemetry, Result,
    SerialTelemetry, StatusEvent, Telemetry,
};
pub use drawall_motion::{DrawingSize, Plotter, SimulatedHardware};
pub use drawall_parser::{FileSource, StringSource};
pub use drawall_settings::{load_config, PlotterConfig, SettingsError};
pub use session::{load_config_reported, DrawingFormat, DrawingSummary, Session};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Logs go to stderr so that stdout stays free for the telemetry stream.
/// The `RUST_LOG` environment variable refines the default INFO level.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env()?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
