//! Status protocol sent to the companion visualizer
//!
//! The motion engine reports every pulse, pen change, warning and error as a
//! [`StatusEvent`]. The protocol is one-way: nothing the visualizer does can
//! influence the plotter, and the engine behaves identically when no
//! visualizer is attached ([`NullTelemetry`]).

use crate::data::{Axis, CableLengths, PenState};
use crate::error::ErrorCode;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Byte codes of the serial protocol
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SerialCode {
    PushLeft = 0,
    PullLeft,
    PushRight,
    PullRight,
    Writing,
    Moving,
    StartMessage,
    EndMessage,
    EnableMotors,
    DisableMotors,
    Sleep,
    ChangeTool,
    EndDrawing,
    Warning,
    EndWarning,
    Error,
    EndError,
    Start = 100,
    StartInstructions,
    EndInstructions,
}

/// Session parameters sent once before drawing starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitReport {
    pub span: f64,
    pub sheet_position_x: f64,
    pub sheet_position_y: f64,
    pub sheet_width: f64,
    pub sheet_height: f64,
    pub lengths: CableLengths,
    /// Step length in micrometres
    pub step_length_um: f64,
}

/// One status event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatusEvent {
    /// One step on `axis`; `pull` shortens the cable.
    Pulse { axis: Axis, pull: bool },
    /// The pen changed state.
    Pen(PenState),
    /// Motor drivers enabled or disabled.
    MotorPower(bool),
    /// Advisory condition.
    Warning { code: ErrorCode, detail: String },
    /// Fatal condition; the plotter halts.
    Error { code: ErrorCode, detail: String },
    /// Session parameters framed by start/end instruction markers.
    Init(InitReport),
    /// Pause for a dwell instruction.
    Sleep { millis: u64 },
    /// A drawing has been completely processed.
    EndDrawing,
}

impl StatusEvent {
    /// Byte code that opens this event on the serial link
    pub fn serial_code(&self) -> SerialCode {
        match self {
            Self::Pulse { axis: Axis::Left, pull: false } => SerialCode::PushLeft,
            Self::Pulse { axis: Axis::Left, pull: true } => SerialCode::PullLeft,
            Self::Pulse { axis: Axis::Right, pull: false } => SerialCode::PushRight,
            Self::Pulse { axis: Axis::Right, pull: true } => SerialCode::PullRight,
            Self::Pen(PenState::Writing) => SerialCode::Writing,
            Self::Pen(PenState::Moving) => SerialCode::Moving,
            Self::MotorPower(true) => SerialCode::EnableMotors,
            Self::MotorPower(false) => SerialCode::DisableMotors,
            Self::Warning { .. } => SerialCode::Warning,
            Self::Error { .. } => SerialCode::Error,
            Self::Init(_) => SerialCode::StartInstructions,
            Self::Sleep { .. } => SerialCode::Sleep,
            Self::EndDrawing => SerialCode::EndDrawing,
        }
    }
}

/// Receiver of status events
pub trait Telemetry {
    /// Report one event.
    fn emit(&mut self, event: StatusEvent);
}

impl<T: Telemetry + ?Sized> Telemetry for &mut T {
    fn emit(&mut self, event: StatusEvent) {
        (**self).emit(event);
    }
}

/// Telemetry sink used when no visualizer is attached
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTelemetry;

impl Telemetry for NullTelemetry {
    fn emit(&mut self, _event: StatusEvent) {}
}

/// Keeps every event in memory
#[derive(Debug, Default, Clone)]
pub struct RecordingTelemetry {
    pub events: Vec<StatusEvent>,
}

impl RecordingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pulses recorded on `axis`
    pub fn pulses(&self, axis: Axis) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, StatusEvent::Pulse { axis: a, .. } if *a == axis))
            .count()
    }

    /// Warning codes, in emission order
    pub fn warnings(&self) -> Vec<ErrorCode> {
        self.events
            .iter()
            .filter_map(|e| match e {
                StatusEvent::Warning { code, .. } => Some(*code),
                _ => None,
            })
            .collect()
    }

    /// Error codes, in emission order
    pub fn errors(&self) -> Vec<ErrorCode> {
        self.events
            .iter()
            .filter_map(|e| match e {
                StatusEvent::Error { code, .. } => Some(*code),
                _ => None,
            })
            .collect()
    }

    /// Pen transitions, in emission order
    pub fn pen_changes(&self) -> Vec<PenState> {
        self.events
            .iter()
            .filter_map(|e| match e {
                StatusEvent::Pen(state) => Some(*state),
                _ => None,
            })
            .collect()
    }
}

impl Telemetry for RecordingTelemetry {
    fn emit(&mut self, event: StatusEvent) {
        self.events.push(event);
    }
}

/// Byte protocol understood by the companion visualizer
///
/// Pulses and state changes are a single byte. Warnings and errors are the
/// opening byte, the code byte, a text line and the closing byte. The init
/// block is one value per line between the start and end instruction bytes.
pub struct SerialTelemetry<W: Write> {
    writer: W,
    failed_writes: u64,
}

impl<W: Write> SerialTelemetry<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            failed_writes: 0,
        }
    }

    /// Writes lost because the link reported an error
    pub fn failed_writes(&self) -> u64 {
        self.failed_writes
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn encode(&mut self, event: &StatusEvent) -> std::io::Result<()> {
        self.writer.write_all(&[event.serial_code() as u8])?;
        match event {
            StatusEvent::Warning { code, detail } => {
                self.writer.write_all(&[code.code()])?;
                writeln!(self.writer, "{}", detail)?;
                self.writer.write_all(&[SerialCode::EndWarning as u8])?;
            }
            StatusEvent::Error { code, detail } => {
                self.writer.write_all(&[code.code()])?;
                writeln!(self.writer, "{}", detail)?;
                self.writer.write_all(&[SerialCode::EndError as u8])?;
            }
            StatusEvent::Init(report) => {
                writeln!(self.writer, "{}", report.span)?;
                writeln!(self.writer, "{}", report.sheet_position_x)?;
                writeln!(self.writer, "{}", report.sheet_position_y)?;
                writeln!(self.writer, "{}", report.sheet_width)?;
                writeln!(self.writer, "{}", report.sheet_height)?;
                writeln!(self.writer, "{}", report.lengths.left)?;
                writeln!(self.writer, "{}", report.lengths.right)?;
                writeln!(self.writer, "{}", report.step_length_um)?;
                self.writer.write_all(&[SerialCode::EndInstructions as u8])?;
            }
            StatusEvent::Sleep { millis } => {
                writeln!(self.writer, "{}", millis)?;
            }
            _ => {}
        }
        Ok(())
    }
}

impl<W: Write> Telemetry for SerialTelemetry<W> {
    fn emit(&mut self, event: StatusEvent) {
        if let Err(e) = self.encode(&event) {
            self.failed_writes += 1;
            tracing::debug!("Telemetry write failed: {}", e);
        }
    }
}

/// One JSON object per line, for recording sessions to disk
pub struct JsonLinesTelemetry<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesTelemetry<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Telemetry for JsonLinesTelemetry<W> {
    fn emit(&mut self, event: StatusEvent) {
        let result = serde_json::to_writer(&mut self.writer, &event)
            .map_err(std::io::Error::from)
            .and_then(|_| self.writer.write_all(b"\n"));
        if let Err(e) = result {
            tracing::debug!("Telemetry write failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_codes() {
        let pull_left = StatusEvent::Pulse {
            axis: Axis::Left,
            pull: true,
        };
        let push_right = StatusEvent::Pulse {
            axis: Axis::Right,
            pull: false,
        };
        assert_eq!(pull_left.serial_code() as u8, 1);
        assert_eq!(push_right.serial_code() as u8, 2);
        assert_eq!(StatusEvent::EndDrawing.serial_code() as u8, 12);
    }

    #[test]
    fn test_serial_warning_framing() {
        let mut telemetry = SerialTelemetry::new(Vec::new());
        telemetry.emit(StatusEvent::Warning {
            code: ErrorCode::LeftLimit,
            detail: "x=-3".to_string(),
        });
        let bytes = telemetry.into_inner();
        assert_eq!(bytes[0], SerialCode::Warning as u8);
        assert_eq!(bytes[1], ErrorCode::LeftLimit.code());
        assert_eq!(&bytes[2..7], b"x=-3\n");
        assert_eq!(bytes[7], SerialCode::EndWarning as u8);
    }

    #[test]
    fn test_serial_init_block() {
        let mut telemetry = SerialTelemetry::new(Vec::new());
        telemetry.emit(StatusEvent::Init(InitReport {
            span: 1000.0,
            sheet_position_x: 100.0,
            sheet_position_y: 200.0,
            sheet_width: 800.0,
            sheet_height: 600.0,
            lengths: CableLengths::new(12, 34),
            step_length_um: 7.5,
        }));
        let bytes = telemetry.into_inner();
        assert_eq!(bytes[0], SerialCode::StartInstructions as u8);
        assert_eq!(*bytes.last().unwrap(), SerialCode::EndInstructions as u8);
        let text = String::from_utf8_lossy(&bytes[1..bytes.len() - 1]).to_string();
        assert_eq!(text, "1000\n100\n200\n800\n600\n12\n34\n7.5\n");
    }

    #[test]
    fn test_json_lines() {
        let mut telemetry = JsonLinesTelemetry::new(Vec::new());
        telemetry.emit(StatusEvent::Pen(PenState::Writing));
        telemetry.emit(StatusEvent::EndDrawing);
        let text = String::from_utf8(telemetry.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let event: StatusEvent = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(event, StatusEvent::Pen(PenState::Writing));
    }

    #[test]
    fn test_recording_queries() {
        let mut telemetry = RecordingTelemetry::new();
        telemetry.emit(StatusEvent::Pulse {
            axis: Axis::Left,
            pull: false,
        });
        telemetry.emit(StatusEvent::Warning {
            code: ErrorCode::UpperLimit,
            detail: String::new(),
        });
        assert_eq!(telemetry.pulses(Axis::Left), 1);
        assert_eq!(telemetry.pulses(Axis::Right), 0);
        assert_eq!(telemetry.warnings(), vec![ErrorCode::UpperLimit]);
    }
}
