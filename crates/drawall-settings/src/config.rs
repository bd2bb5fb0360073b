//! Plotter configuration
//!
//! One flat record of everything the firmware reads at startup: the machine
//! geometry, the pen servo, the motors, the calibration applied to every
//! drawing and the placement of the pen before and after a session.
//!
//! Field names follow the keys of the configuration file (`camelCase`) so the
//! same record can be read from key/value, JSON and TOML files.

use crate::error::{ConfigError, Result};
use drawall_core::{Anchor, Geometry};
use drawall_motion::{Calibration, MotorPolarity, ServoSettings, DEFAULT_SPEED};
use serde::{Deserialize, Serialize};

/// Complete plotter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlotterConfig {
    /// Distance between the two motor axes, in mm
    pub span: f64,
    pub sheet_width: f64,
    pub sheet_height: f64,
    /// Horizontal distance from the left axis to the sheet, in mm
    pub sheet_position_x: f64,
    /// Vertical distance from the axes to the top of the sheet, in mm
    pub sheet_position_y: f64,

    /// Servo angle while drawing, in degrees
    pub servo_writing_angle: u16,
    /// Servo angle while travelling, in degrees
    #[serde(alias = "servoMoovingAngle")]
    pub servo_moving_angle: u16,
    /// Pause before moving the servo, in ms
    pub pre_servo_delay: u32,
    /// Pause after moving the servo, in ms
    pub post_servo_delay: u32,

    /// Motor steps per revolution
    pub steps: u32,
    /// Pinion diameter, in µm
    pub diameter: u32,
    /// Direction output shortening the left cable
    pub left_direction: bool,
    /// Direction output shortening the right cable
    pub right_direction: bool,

    /// Pause before the first movement, in ms
    pub initial_delay: u32,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Shift applied to every drawing, in mm
    pub offset_x: f64,
    pub offset_y: f64,
    /// Drawing speed, in mm/s
    pub default_speed: f64,
    /// Pen position when the session starts
    pub init_position: Anchor,
    /// Pen position when the session ends
    pub end_position: Anchor,
}

impl Default for PlotterConfig {
    fn default() -> Self {
        let servo = ServoSettings::default();
        let polarity = MotorPolarity::default();
        let calibration = Calibration::default();
        Self {
            span: 1000.0,
            sheet_width: 650.0,
            sheet_height: 500.0,
            sheet_position_x: 175.0,
            sheet_position_y: 250.0,
            servo_writing_angle: servo.writing_angle,
            servo_moving_angle: servo.moving_angle,
            pre_servo_delay: servo.pre_delay_ms,
            post_servo_delay: servo.post_delay_ms,
            steps: 200,
            diameter: 12_730,
            left_direction: polarity.left,
            right_direction: polarity.right,
            initial_delay: 1000,
            scale_x: calibration.scale_x,
            scale_y: calibration.scale_y,
            offset_x: calibration.offset_x,
            offset_y: calibration.offset_y,
            default_speed: DEFAULT_SPEED,
            init_position: Anchor::Center,
            end_position: Anchor::UpperCenter,
        }
    }
}

impl PlotterConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Machine geometry, with the step length derived from the motor and
    /// pinion.
    pub fn geometry(&self) -> Geometry {
        Geometry {
            span: self.span,
            sheet_width: self.sheet_width,
            sheet_height: self.sheet_height,
            sheet_position_x: self.sheet_position_x,
            sheet_position_y: self.sheet_position_y,
            step_length: Geometry::step_length_for(self.steps, self.diameter),
        }
    }

    pub fn servo(&self) -> ServoSettings {
        ServoSettings {
            writing_angle: self.servo_writing_angle,
            moving_angle: self.servo_moving_angle,
            pre_delay_ms: self.pre_servo_delay,
            post_delay_ms: self.post_servo_delay,
        }
    }

    pub fn polarity(&self) -> MotorPolarity {
        MotorPolarity {
            left: self.left_direction,
            right: self.right_direction,
        }
    }

    pub fn calibration(&self) -> Calibration {
        Calibration {
            scale_x: self.scale_x,
            scale_y: self.scale_y,
            offset_x: self.offset_x,
            offset_y: self.offset_y,
        }
    }

    /// Validate the configuration.
    ///
    /// Values that would make the step length or the step delay meaningless
    /// are rejected first; a sheet that does not fit between the axes is a
    /// fatal [`drawall_core::ErrorCode::TooShortSpan`].
    pub fn validate(&self) -> Result<()> {
        if self.steps == 0 {
            return Err(out_of_range("steps", self.steps));
        }
        if self.diameter == 0 {
            return Err(out_of_range("diameter", self.diameter));
        }
        if !(self.default_speed > 0.0 && self.default_speed.is_finite()) {
            return Err(out_of_range("defaultSpeed", self.default_speed));
        }
        if !(self.sheet_width > 0.0 && self.sheet_height > 0.0) {
            return Err(out_of_range(
                "sheetWidth",
                format!("{}x{}", self.sheet_width, self.sheet_height),
            ));
        }
        self.geometry().validate()?;
        Ok(())
    }
}

fn out_of_range(key: &str, value: impl ToString) -> crate::error::SettingsError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
    .into()
}
