//! SVG path data interpreter
//!
//! Reads path data from a [`CharSource`] positioned just after `d="` and
//! streams the primitives into a [`DrawingSink`] until the closing quote.
//! Numbers following a complete parameter group repeat the last command.

use crate::reader::CharSource;
use crate::scan::{self, Scanned};
use drawall_core::{DrawingSink, ErrorCode, Point, Result};
use std::fmt;

/// Path command families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Move,
    Line,
    Horizontal,
    Vertical,
    Cubic,
    SmoothCubic,
    Quadratic,
    SmoothQuadratic,
    Close,
    /// Elliptical arc, parsed and ignored
    Arc,
}

impl CommandKind {
    /// Number of parameters in one group
    pub fn arity(self) -> usize {
        match self {
            Self::Move | Self::Line | Self::SmoothQuadratic => 2,
            Self::Horizontal | Self::Vertical => 1,
            Self::Cubic => 6,
            Self::SmoothCubic | Self::Quadratic => 4,
            Self::Close => 0,
            Self::Arc => 7,
        }
    }
}

const COMMANDS: [(u8, CommandKind); 10] = [
    (b'M', CommandKind::Move),
    (b'L', CommandKind::Line),
    (b'H', CommandKind::Horizontal),
    (b'V', CommandKind::Vertical),
    (b'C', CommandKind::Cubic),
    (b'S', CommandKind::SmoothCubic),
    (b'Q', CommandKind::Quadratic),
    (b'T', CommandKind::SmoothQuadratic),
    (b'Z', CommandKind::Close),
    (b'A', CommandKind::Arc),
];

/// A command letter: its family and whether its coordinates are relative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathCommand {
    pub kind: CommandKind,
    pub relative: bool,
}

impl PathCommand {
    /// Decode a command letter; lowercase letters are relative.
    pub fn from_letter(letter: u8) -> Option<Self> {
        let upper = letter.to_ascii_uppercase();
        COMMANDS
            .iter()
            .find(|(l, _)| *l == upper)
            .map(|(_, kind)| Self {
                kind: *kind,
                relative: letter.is_ascii_lowercase(),
            })
    }

    pub fn arity(&self) -> usize {
        self.kind.arity()
    }

    pub fn letter(&self) -> char {
        let upper = COMMANDS
            .iter()
            .find(|(_, kind)| *kind == self.kind)
            .map_or(b'?', |(l, _)| *l);
        if self.relative {
            upper.to_ascii_lowercase() as char
        } else {
            upper as char
        }
    }
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Trailing control points of the last curve, one slot per family
///
/// A slot is only filled while the last primitive was a curve of that family.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReflectionState {
    cubic: Option<Point>,
    quadratic: Option<Point>,
}

impl ReflectionState {
    /// First control point of a smooth cubic starting at `current`.
    pub fn cubic_control(&self, current: Point) -> Point {
        self.cubic.map_or(current, |c| current.reflect(c))
    }

    /// Control point of a smooth quadratic starting at `current`.
    pub fn quadratic_control(&self, current: Point) -> Point {
        self.quadratic.map_or(current, |c| current.reflect(c))
    }

    pub fn record_cubic(&mut self, second_control: Point) {
        self.cubic = Some(second_control);
        self.quadratic = None;
    }

    pub fn record_quadratic(&mut self, control: Point) {
        self.quadratic = Some(control);
        self.cubic = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn last_cubic(&self) -> Option<Point> {
        self.cubic
    }

    pub fn last_quadratic(&self) -> Option<Point> {
        self.quadratic
    }
}

/// Interpreter state local to one path
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PathCursor {
    /// Current point, in drawing units
    pub current: Point,
    /// Start of the current figure, target of close commands
    pub figure_start: Point,
    pub reflection: ReflectionState,
}

#[derive(Debug, Clone, Default)]
pub struct PathInterpreter {
    cursor: PathCursor,
    commands: usize,
}

impl PathInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> &PathCursor {
        &self.cursor
    }

    /// Number of parameter groups executed so far
    pub fn commands(&self) -> usize {
        self.commands
    }

    /// Interpret path data up to and including the closing quote.
    ///
    /// Reaching the end of the stream first is fatal.
    pub fn run<S, D>(&mut self, src: &mut S, sink: &mut D) -> Result<()>
    where
        S: CharSource + ?Sized,
        D: DrawingSink + ?Sized,
    {
        let mut current: Option<PathCommand> = None;

        loop {
            scan::skip_delimiters(src);
            let Some(byte) = src.peek_byte() else {
                return Err(sink.fail(
                    ErrorCode::IncompleteSvg,
                    &format!("path data ended at offset {}", src.position()),
                ));
            };

            if byte == b'"' {
                src.read_byte();
                return Ok(());
            }

            if scan::starts_number(byte) {
                match current {
                    Some(command) if command.arity() > 0 => {
                        current = self.group(src, sink, command)?;
                    }
                    _ => {
                        // parameters of a skipped or parameterless command
                        let skipped = scan::scan_number(src);
                        tracing::debug!("Skipped {:?} outside of any command", skipped);
                    }
                }
                continue;
            }

            src.read_byte();
            match PathCommand::from_letter(byte) {
                Some(command) if command.arity() == 0 => {
                    self.execute(command, &[], sink)?;
                    current = Some(command);
                }
                Some(command) => {
                    current = self.group(src, sink, command)?;
                }
                None => {
                    sink.warn(
                        ErrorCode::UnknownSvgCommand,
                        &format!("'{}' at offset {}", byte as char, src.position() - 1),
                    );
                    current = None;
                }
            }
        }
    }

    /// Read and execute one parameter group. Returns the command to repeat,
    /// or `None` when the group was abandoned.
    fn group<S, D>(
        &mut self,
        src: &mut S,
        sink: &mut D,
        command: PathCommand,
    ) -> Result<Option<PathCommand>>
    where
        S: CharSource + ?Sized,
        D: DrawingSink + ?Sized,
    {
        let mut args = [0.0; 7];
        for slot in args.iter_mut().take(command.arity()) {
            scan::skip_delimiters(src);
            match scan::scan_number(src) {
                Scanned::Number(value) => *slot = value,
                Scanned::Malformed(token) => {
                    sink.warn(
                        ErrorCode::MalformedNumber,
                        &format!("'{}' in {} command", token, command),
                    );
                    return Ok(None);
                }
                Scanned::NotANumber => {
                    if !src.available() {
                        return Err(sink.fail(
                            ErrorCode::IncompleteSvg,
                            &format!("path data ended inside {} command", command),
                        ));
                    }
                    sink.warn(
                        ErrorCode::MalformedNumber,
                        &format!("missing parameter for {} command", command),
                    );
                    return Ok(None);
                }
            }
        }
        self.execute(command, &args[..command.arity()], sink)?;
        Ok(Some(command))
    }

    /// Execute one command with a complete parameter group.
    pub fn execute<D>(&mut self, command: PathCommand, args: &[f64], sink: &mut D) -> Result<()>
    where
        D: DrawingSink + ?Sized,
    {
        debug_assert_eq!(args.len(), command.arity());
        let cursor = &mut self.cursor;
        let origin = cursor.current;
        let point = |x: f64, y: f64| {
            if command.relative {
                origin + Point::new(x, y)
            } else {
                Point::new(x, y)
            }
        };

        match command.kind {
            CommandKind::Move => {
                let to = point(args[0], args[1]);
                sink.move_to(to)?;
                cursor.current = to;
                cursor.figure_start = to;
                cursor.reflection.reset();
            }
            CommandKind::Line => {
                let to = point(args[0], args[1]);
                sink.line_to(to)?;
                cursor.current = to;
                cursor.reflection.reset();
            }
            CommandKind::Horizontal => {
                let x = if command.relative {
                    origin.x + args[0]
                } else {
                    args[0]
                };
                let to = Point::new(x, origin.y);
                sink.line_to(to)?;
                cursor.current = to;
                cursor.reflection.reset();
            }
            CommandKind::Vertical => {
                let y = if command.relative {
                    origin.y + args[0]
                } else {
                    args[0]
                };
                let to = Point::new(origin.x, y);
                sink.line_to(to)?;
                cursor.current = to;
                cursor.reflection.reset();
            }
            CommandKind::Cubic => {
                let c1 = point(args[0], args[1]);
                let c2 = point(args[2], args[3]);
                let to = point(args[4], args[5]);
                sink.cubic_to(c1, c2, to)?;
                cursor.current = to;
                cursor.reflection.record_cubic(c2);
            }
            CommandKind::SmoothCubic => {
                let c1 = cursor.reflection.cubic_control(origin);
                let c2 = point(args[0], args[1]);
                let to = point(args[2], args[3]);
                sink.cubic_to(c1, c2, to)?;
                cursor.current = to;
                cursor.reflection.record_cubic(c2);
            }
            CommandKind::Quadratic => {
                let c = point(args[0], args[1]);
                let to = point(args[2], args[3]);
                sink.quadratic_to(c, to)?;
                cursor.current = to;
                cursor.reflection.record_quadratic(c);
            }
            CommandKind::SmoothQuadratic => {
                let c = cursor.reflection.quadratic_control(origin);
                let to = point(args[0], args[1]);
                sink.quadratic_to(c, to)?;
                cursor.current = to;
                cursor.reflection.record_quadratic(c);
            }
            CommandKind::Close => {
                let to = cursor.figure_start;
                sink.line_to(to)?;
                cursor.current = to;
                cursor.reflection.reset();
            }
            CommandKind::Arc => {
                tracing::debug!("Arc command ignored: {:?}", args);
            }
        }

        self.commands += 1;
        Ok(())
    }
}
