//! Error handling for Drawall
//!
//! Two severities exist:
//! - fatal codes (< 100) stop the plotter: the pen is lifted and the motion
//!   engine refuses any further movement
//! - warning codes (>= 100) are reported and processing continues
//!
//! All error types use `thiserror` for ergonomic error handling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use thiserror::Error;

/// Numeric codes shared with the companion visualizer.
///
/// Fatal errors start at 0, warnings start at 100. The numbering must stay in
/// sync with the visualizer, which decodes the byte it receives.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// The storage card was not found or cannot be read.
    CardNotFound = 0,
    /// The requested file does not exist.
    FileNotFound,
    /// The file exists but could not be opened.
    FileNotReadable,
    /// The span is shorter than the sheet width plus its horizontal position.
    TooShortSpan,
    /// Some configuration entries were not found.
    TooFewParameters,
    /// A configuration entry was given more than once.
    TooManyParameters,
    /// The file does not contain an `<svg` element.
    NotSvgFile,
    /// The svg file does not contain any `<path` element.
    NotSvgPath,
    /// The end of the file was reached inside path data.
    IncompleteSvg,

    /// Byte received by the visualizer that it does not understand.
    UnknownSerialCode = 100,
    /// Malformed configuration line. Detail: line number.
    WrongConfigLine,
    /// Configuration line exceeding the line buffer. Detail: line number.
    TooLongConfigLine,
    /// Unknown configuration key. Detail: key and line number.
    UnknownConfigKey,
    /// Unknown placement name in the configuration.
    UnknownConfigPosition,
    /// Unknown GCode function.
    UnknownGcodeFunction,
    /// Unknown GCode parameter letter.
    UnknownGcodeParameter,
    /// GCode parameter that could not be read as a number.
    WrongGcodeParameter,
    /// Target clamped to the left edge of the sheet.
    LeftLimit,
    /// Target clamped to the right edge of the sheet.
    RightLimit,
    /// Target clamped to the upper edge of the sheet.
    UpperLimit,
    /// Target clamped to the lower edge of the sheet.
    LowerLimit,
    /// Unknown command letter in path data.
    UnknownSvgCommand,
    /// Numeric token that could not be read.
    MalformedNumber,
}

impl ErrorCode {
    /// Fatal codes halt the plotter, the others are advisory.
    pub fn is_fatal(self) -> bool {
        (self as u8) < 100
    }

    /// Wire value of this code.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::CardNotFound => "storage not found",
            Self::FileNotFound => "file not found",
            Self::FileNotReadable => "file not readable",
            Self::TooShortSpan => "span shorter than sheet width plus sheet position",
            Self::TooFewParameters => "missing configuration entries",
            Self::TooManyParameters => "duplicated configuration entries",
            Self::NotSvgFile => "not an svg file",
            Self::NotSvgPath => "svg file without path",
            Self::IncompleteSvg => "incomplete path data",
            Self::UnknownSerialCode => "unknown serial code",
            Self::WrongConfigLine => "malformed configuration line",
            Self::TooLongConfigLine => "configuration line too long",
            Self::UnknownConfigKey => "unknown configuration key",
            Self::UnknownConfigPosition => "unknown configuration position",
            Self::UnknownGcodeFunction => "unknown gcode function",
            Self::UnknownGcodeParameter => "unknown gcode parameter",
            Self::WrongGcodeParameter => "unreadable gcode parameter",
            Self::LeftLimit => "left limit reached",
            Self::RightLimit => "right limit reached",
            Self::UpperLimit => "upper limit reached",
            Self::LowerLimit => "lower limit reached",
            Self::UnknownSvgCommand => "unknown path command",
            Self::MalformedNumber => "malformed number",
        };
        write!(f, "{} ({})", text, self.code())
    }
}

/// Main error type for Drawall
#[derive(Error, Debug)]
pub enum Error {
    /// A fatal condition was detected. The plotter is halted.
    #[error("Fatal error {code}: {detail}")]
    Fatal {
        /// The fatal code reported to the visualizer.
        code: ErrorCode,
        /// Free-form context (file name, line number...).
        detail: String,
    },

    /// The plotter was halted by an earlier fatal error.
    #[error("Plotter halted")]
    Halted,

    /// Malformed input that is not tied to a status code.
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O error from the storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Build a fatal error from its code.
    pub fn fatal(code: ErrorCode, detail: impl Into<String>) -> Self {
        debug_assert!(code.is_fatal(), "{code:?} is a warning code");
        Self::Fatal {
            code,
            detail: detail.into(),
        }
    }

    /// The fatal code carried by this error, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Fatal { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Result type for Drawall operations
pub type Result<T> = std::result::Result<T, Error>;
