//! Drawing session
//!
//! A [`Session`] is one power cycle of the plotter: it starts at the
//! configured initial position, draws any number of files and ends parked at
//! the configured end position with the motors off.

use drawall_core::{
    Anchor, DrawingSink, Error, Hardware, NullTelemetry, Point, Result, StatusEvent, Telemetry,
};
use drawall_motion::{DrawingSize, Plotter};
use drawall_parser::{
    draw_svg, svg_size, CharSource, FileSource, GcodeInterpreter, GcodeSummary, SvgSummary,
};
use drawall_settings::{load_config, PlotterConfig, SettingsError};
use std::path::Path;

/// Load a configuration file and report its status codes to `telemetry`.
///
/// Catalog warnings become warning events. A failure carrying a fatal code is
/// emitted as an error event before being returned.
pub fn load_config_reported<T: Telemetry + ?Sized>(
    path: &Path,
    telemetry: &mut T,
) -> std::result::Result<PlotterConfig, SettingsError> {
    match load_config(path) {
        Ok(report) => {
            for warning in &report.warnings {
                tracing::warn!("{}: {}", path.display(), warning);
                telemetry.emit(StatusEvent::Warning {
                    code: warning.code,
                    detail: warning.to_string(),
                });
            }
            Ok(report.config)
        }
        Err(err) => {
            tracing::error!("{}: {}", path.display(), err);
            if let Some(code) = err.code() {
                telemetry.emit(StatusEvent::Error {
                    code,
                    detail: err.to_string(),
                });
            }
            Err(err)
        }
    }
}

/// Drawing language, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawingFormat {
    Svg,
    Gcode,
}

impl DrawingFormat {
    /// `.svg` files are SVG documents, everything else is GCode.
    pub fn from_path(path: &Path) -> Self {
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
        {
            Self::Svg
        } else {
            Self::Gcode
        }
    }
}

/// What a drawn file contained
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawingSummary {
    Svg(SvgSummary),
    Gcode(GcodeSummary),
}

pub struct Session<H: Hardware, T: Telemetry = NullTelemetry> {
    plotter: Plotter<H, T>,
    end_position: Anchor,
}

impl<H: Hardware> Session<H> {
    /// Start a session without a visualizer.
    pub fn headless(hw: H, config: &PlotterConfig) -> Result<Self> {
        Session::begin(hw, NullTelemetry, config)
    }
}

impl<H: Hardware, T: Telemetry> Session<H, T> {
    /// Build the plotter from `config`, wait the initial delay and
    /// initialize at the configured initial position.
    ///
    /// Fails, after reporting it, when the geometry is invalid.
    pub fn begin(hw: H, telemetry: T, config: &PlotterConfig) -> Result<Self> {
        let mut plotter = Plotter::new(hw, telemetry, config.geometry())
            .with_servo(config.servo())
            .with_polarity(config.polarity())
            .with_calibration(config.calibration())
            .with_speed(config.default_speed);

        if config.initial_delay > 0 {
            tracing::debug!("Waiting {} ms before start", config.initial_delay);
            plotter.hardware_mut().delay_ms(config.initial_delay);
        }
        plotter.initialize(config.init_position)?;

        Ok(Self {
            plotter,
            end_position: config.end_position,
        })
    }

    pub fn plotter(&self) -> &Plotter<H, T> {
        &self.plotter
    }

    pub fn plotter_mut(&mut self) -> &mut Plotter<H, T> {
        &mut self.plotter
    }

    /// Drawing speed, in mm/s
    pub fn set_speed(&mut self, speed: f64) {
        self.plotter.set_speed(speed);
    }

    /// Open a drawing file. A missing or unreadable file halts the plotter.
    pub fn open(&mut self, path: &Path) -> Result<FileSource> {
        self.ensure_running()?;
        FileSource::open(path).map_err(|err| match err {
            Error::Fatal { code, detail } => self.plotter.fatal(code, &detail),
            other => other,
        })
    }

    /// Draw the file at `path`, as SVG or GCode depending on its extension.
    pub fn draw_file(
        &mut self,
        path: &Path,
        size: DrawingSize,
        anchor: Anchor,
    ) -> Result<DrawingSummary> {
        let mut src = self.open(path)?;
        tracing::info!("Drawing {}", path.display());
        match DrawingFormat::from_path(path) {
            DrawingFormat::Svg => self.draw_svg(&mut src, size, anchor).map(DrawingSummary::Svg),
            DrawingFormat::Gcode => self
                .draw_gcode(&mut src, size, anchor)
                .map(DrawingSummary::Gcode),
        }
    }

    /// Draw every path of an SVG document.
    pub fn draw_svg<S: CharSource + ?Sized>(
        &mut self,
        src: &mut S,
        size: DrawingSize,
        anchor: Anchor,
    ) -> Result<SvgSummary> {
        self.ensure_running()?;
        self.plotter.set_placement(size, anchor);
        draw_svg(src, &mut self.plotter)
    }

    /// Run a GCode program.
    pub fn draw_gcode<S: CharSource + ?Sized>(
        &mut self,
        src: &mut S,
        size: DrawingSize,
        anchor: Anchor,
    ) -> Result<GcodeSummary> {
        self.ensure_running()?;
        self.plotter.set_placement(size, anchor);
        GcodeInterpreter::starting_at(self.plotter.cursor()).run(src, &mut self.plotter)
    }

    /// Trace the rectangle an SVG document would cover, without drawing it.
    ///
    /// Returns the document size in drawing units.
    pub fn draw_area<S: CharSource + ?Sized>(
        &mut self,
        src: &mut S,
        size: DrawingSize,
        anchor: Anchor,
    ) -> Result<(f64, f64)> {
        self.ensure_running()?;
        let (width, height) = svg_size(src, &mut self.plotter)?;
        self.plotter.set_placement(size, anchor);
        self.plotter.begin_drawing(width, height)?;
        self.plotter.draw_rectangle(Point::ZERO, width, height)?;
        self.plotter.end_drawing()?;
        tracing::info!("Drawing area {}x{} traced", width, height);
        Ok((width, height))
    }

    /// Park at the end position, power down and hand back the hardware.
    pub fn end(mut self) -> Result<(H, T)> {
        self.plotter.move_to_anchor(self.end_position)?;
        self.plotter.power(false)?;
        tracing::info!("Session ended at {}", self.end_position);
        Ok(self.plotter.into_parts())
    }

    fn ensure_running(&self) -> Result<()> {
        if self.plotter.is_halted() {
            Err(Error::Halted)
        } else {
            Ok(())
        }
    }
}
