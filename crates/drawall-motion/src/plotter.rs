//! The motion engine
//!
//! [`Plotter`] owns the hardware, the telemetry link and the [`MotionState`].
//! Every drawing primitive ends up in one straight segment: the target is
//! placed on the sheet, bounded to it, converted to cable lengths and stepped.
//!
//! A fatal error lifts the pen and latches the plotter: from then on every
//! primitive returns [`Error::Halted`] without moving.

use crate::flattener::{cubic_points, quadratic_points, split_line, DEFAULT_SPLIT_THRESHOLD};
use crate::kinematics::Kinematics;
use crate::pen::{PenController, ServoSettings};
use crate::scheduler::{MotorPolarity, StepScheduler};
use crate::transform::{Calibration, DrawingSize, DrawingTransform};
use drawall_core::{
    Anchor, CableLengths, DrawingSink, Error, ErrorCode, Geometry, Hardware, InitReport,
    NullTelemetry, PenState, Point, Result, StatusEvent, Telemetry,
};

/// Default cable speed, in millimetres per second
pub const DEFAULT_SPEED: f64 = 20.0;

/// Mutable state of the carriage
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionState {
    /// Carriage position on the sheet, in millimetres
    pub position: Point,
    /// Cable lengths matching `position`
    pub lengths: CableLengths,
    pub pen: PenState,
}

pub struct Plotter<H: Hardware, T: Telemetry = NullTelemetry> {
    hw: H,
    telemetry: T,
    kinematics: Kinematics,
    scheduler: StepScheduler,
    pen: PenController,
    polarity: MotorPolarity,
    transform: DrawingTransform,
    size: DrawingSize,
    anchor: Anchor,
    calibration: Calibration,
    split_threshold: f64,
    state: MotionState,
    /// Last target in drawing units, before bounding to the sheet
    cursor: Point,
    halted: bool,
}

impl<H: Hardware> Plotter<H> {
    /// A plotter reporting to no visualizer.
    pub fn headless(hw: H, geometry: Geometry) -> Self {
        Plotter::new(hw, NullTelemetry, geometry)
    }
}

impl<H: Hardware, T: Telemetry> Plotter<H, T> {
    pub fn new(hw: H, telemetry: T, geometry: Geometry) -> Self {
        Self {
            hw,
            telemetry,
            kinematics: Kinematics::new(geometry),
            scheduler: StepScheduler::from_speed(geometry.step_length, DEFAULT_SPEED),
            pen: PenController::new(ServoSettings::default()),
            polarity: MotorPolarity::default(),
            transform: DrawingTransform::identity(),
            size: DrawingSize::default(),
            anchor: Anchor::default(),
            calibration: Calibration::default(),
            split_threshold: DEFAULT_SPLIT_THRESHOLD,
            state: MotionState::default(),
            cursor: Point::ZERO,
            halted: false,
        }
    }

    pub fn with_servo(mut self, servo: ServoSettings) -> Self {
        self.pen = PenController::new(servo);
        self
    }

    pub fn with_polarity(mut self, polarity: MotorPolarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.set_speed(speed);
        self
    }

    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self.transform = DrawingTransform::calibrated(calibration);
        self
    }

    /// Extent above which lines are split, in drawing units.
    pub fn with_split_threshold(mut self, threshold: f64) -> Self {
        self.split_threshold = threshold;
        self
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    pub fn kinematics(&self) -> &Kinematics {
        &self.kinematics
    }

    pub fn geometry(&self) -> &Geometry {
        self.kinematics.geometry()
    }

    pub fn scheduler(&self) -> &StepScheduler {
        &self.scheduler
    }

    pub fn transform(&self) -> &DrawingTransform {
        &self.transform
    }

    /// Current point in drawing units
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn hardware(&self) -> &H {
        &self.hw
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    pub fn telemetry(&self) -> &T {
        &self.telemetry
    }

    pub fn telemetry_mut(&mut self) -> &mut T {
        &mut self.telemetry
    }

    pub fn into_parts(self) -> (H, T) {
        (self.hw, self.telemetry)
    }

    /// Size and anchor used to place the next drawing.
    pub fn set_placement(&mut self, size: DrawingSize, anchor: Anchor) {
        self.size = size;
        self.anchor = anchor;
    }

    pub fn set_transform(&mut self, transform: DrawingTransform) {
        self.transform = transform;
    }

    /// Cable speed in mm/s; recomputes the per-step delay.
    pub fn set_speed(&mut self, speed: f64) {
        self.scheduler
            .set_speed(self.kinematics.geometry().step_length, speed);
        tracing::debug!(
            "Speed {} mm/s, {} us per step",
            speed,
            self.scheduler.base_delay_us()
        );
    }

    /// Validate the geometry, park the pen at `anchor` and power the motors.
    ///
    /// The carriage is assumed to hang at `anchor`; cable lengths are derived
    /// from it and reported to the visualizer.
    pub fn initialize(&mut self, anchor: Anchor) -> Result<()> {
        self.ensure_running()?;
        if let Err(err) = self.kinematics.geometry().validate() {
            return Err(match err {
                Error::Fatal { code, detail } => self.fatal(code, &detail),
                other => other,
            });
        }

        self.pen.park(&mut self.hw);
        let geometry = *self.kinematics.geometry();
        let position = anchor.locate(geometry.sheet_width, geometry.sheet_height);
        self.state = MotionState {
            position,
            lengths: self.kinematics.lengths(position),
            pen: self.pen.state(),
        };
        self.cursor = position;

        self.telemetry.emit(StatusEvent::Init(InitReport {
            span: geometry.span,
            sheet_position_x: geometry.sheet_position_x,
            sheet_position_y: geometry.sheet_position_y,
            sheet_width: geometry.sheet_width,
            sheet_height: geometry.sheet_height,
            lengths: self.state.lengths,
            step_length_um: geometry.step_length * 1000.0,
        }));
        tracing::info!(
            "Plotter initialized at {} ({}), cables {}",
            anchor,
            position,
            self.state.lengths
        );

        self.power(true)
    }

    /// Enable or disable the motor drivers. The pen is lifted first when
    /// powering down.
    pub fn power(&mut self, enabled: bool) -> Result<()> {
        if !enabled {
            self.lift_pen();
        }
        self.hw.set_motor_power(enabled);
        self.telemetry.emit(StatusEvent::MotorPower(enabled));
        tracing::debug!("Motors {}", if enabled { "enabled" } else { "disabled" });
        Ok(())
    }

    /// Travel, pen up, to one of the nine sheet anchors.
    pub fn move_to_anchor(&mut self, anchor: Anchor) -> Result<()> {
        self.ensure_running()?;
        let geometry = self.kinematics.geometry();
        let target = anchor.locate(geometry.sheet_width, geometry.sheet_height);
        self.travel(target, false);
        self.cursor = target;
        Ok(())
    }

    /// Outline a `width` x `height` rectangle from `origin`, in drawing units.
    pub fn draw_rectangle(&mut self, origin: Point, width: f64, height: f64) -> Result<()> {
        self.move_to(origin)?;
        self.line_to(origin + Point::new(width, 0.0))?;
        self.line_to(origin + Point::new(width, height))?;
        self.line_to(origin + Point::new(0.0, height))?;
        self.line_to(origin)
    }

    /// Report an advisory condition and carry on.
    pub fn warning(&mut self, code: ErrorCode, detail: &str) {
        tracing::warn!("{}: {}", code, detail);
        self.telemetry.emit(StatusEvent::Warning {
            code,
            detail: detail.to_string(),
        });
    }

    /// Report a fatal condition, lift the pen and halt.
    pub fn fatal(&mut self, code: ErrorCode, detail: &str) -> Error {
        tracing::error!("{}: {}", code, detail);
        self.telemetry.emit(StatusEvent::Error {
            code,
            detail: detail.to_string(),
        });
        self.lift_pen();
        self.halted = true;
        Error::fatal(code, detail)
    }

    fn ensure_running(&self) -> Result<()> {
        if self.halted {
            Err(Error::Halted)
        } else {
            Ok(())
        }
    }

    fn lift_pen(&mut self) {
        self.pen
            .set_writing(&mut self.hw, &mut self.telemetry, false);
        self.state.pen = self.pen.state();
    }

    /// One straight segment to the drawing point `to`, unsplit.
    fn segment(&mut self, to: Point, writing: bool) {
        let target = self.transform.apply(to);
        self.travel(target, writing);
        self.cursor = to;
    }

    /// One straight segment to a sheet position.
    fn travel(&mut self, target: Point, writing: bool) {
        let clamped = self.kinematics.clamp(target);
        for code in &clamped.limits {
            self.warning(*code, &format!("target {} bounded to the sheet", target));
        }
        let writing = writing && !clamped.was_clamped();

        self.pen
            .set_writing(&mut self.hw, &mut self.telemetry, writing);
        self.state.pen = self.pen.state();

        let lengths = self.kinematics.lengths(clamped.point);
        let report = self.scheduler.run(
            &mut self.hw,
            &mut self.telemetry,
            &mut self.state.lengths,
            lengths,
            self.polarity,
        );
        self.state.position = clamped.point;

        tracing::debug!(
            "Segment to {} ({}), {} / {} steps",
            clamped.point,
            self.state.lengths,
            report.left_pulses,
            report.right_pulses
        );
    }
}

impl<H: Hardware, T: Telemetry> DrawingSink for Plotter<H, T> {
    fn begin_drawing(&mut self, width: f64, height: f64) -> Result<()> {
        self.ensure_running()?;
        self.transform = DrawingTransform::compute(
            self.kinematics.geometry(),
            width,
            height,
            self.size,
            self.anchor,
            self.calibration,
        );
        tracing::info!("Drawing {}x{} started", width, height);
        Ok(())
    }

    fn move_to(&mut self, to: Point) -> Result<()> {
        self.ensure_running()?;
        self.segment(to, false);
        Ok(())
    }

    fn line_to(&mut self, to: Point) -> Result<()> {
        self.ensure_running()?;
        for point in split_line(self.cursor, to, self.split_threshold) {
            self.segment(point, true);
        }
        self.segment(to, true);
        Ok(())
    }

    fn cubic_to(&mut self, c1: Point, c2: Point, to: Point) -> Result<()> {
        self.ensure_running()?;
        for point in cubic_points(self.cursor, c1, c2, to) {
            self.segment(point, true);
        }
        self.segment(to, true);
        Ok(())
    }

    fn quadratic_to(&mut self, c: Point, to: Point) -> Result<()> {
        self.ensure_running()?;
        for point in quadratic_points(self.cursor, c, to) {
            self.segment(point, true);
        }
        self.segment(to, true);
        Ok(())
    }

    fn dwell(&mut self, seconds: f64) -> Result<()> {
        self.ensure_running()?;
        let millis = (seconds.max(0.0) * 1000.0).round() as u64;
        self.telemetry.emit(StatusEvent::Sleep { millis });
        // delay_ms takes at most u32::MAX per call
        let mut left = millis;
        while left > 0 {
            let chunk = left.min(u64::from(u32::MAX));
            self.hw.delay_ms(chunk as u32);
            left -= chunk;
        }
        Ok(())
    }

    fn warn(&mut self, code: ErrorCode, detail: &str) {
        self.warning(code, detail);
    }

    fn fail(&mut self, code: ErrorCode, detail: &str) -> Error {
        self.fatal(code, detail)
    }

    fn end_drawing(&mut self) -> Result<()> {
        self.ensure_running()?;
        self.lift_pen();
        self.transform = DrawingTransform::calibrated(self.calibration);
        self.telemetry.emit(StatusEvent::EndDrawing);
        tracing::info!("Drawing finished at {}", self.state.position);
        Ok(())
    }
}
