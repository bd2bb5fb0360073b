//! GCode-like drawing language
//!
//! One instruction per line: a function word followed by parameter words,
//! e.g. `G01 X10 Y20`. Supported functions are `G0`/`G00` (travel),
//! `G1`/`G01` (draw) and `G4`/`G04` (dwell, in seconds). A line made only of
//! parameters repeats the last travel or draw function.
//!
//! The drawing size is declared by `width = N` and `height = N` header lines
//! before the first instruction. Comments start with `;` or are enclosed in
//! parentheses.

use crate::reader::CharSource;
use crate::scan;
use drawall_core::{DrawingSink, ErrorCode, Point, Result};
use regex::Regex;
use std::sync::OnceLock;

/// A recognized function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GcodeFunction {
    /// `G0`: travel with the pen up
    Move,
    /// `G1`: draw a straight line
    Line,
    /// `G4`: pause
    Dwell,
    /// Understood and deliberately ignored (units, end of program)
    Ignored,
}

impl GcodeFunction {
    /// Decode a function word such as `G01` or `M30`.
    pub fn parse(word: &str) -> Option<Self> {
        let mut chars = word.chars();
        let letter = chars.next()?.to_ascii_uppercase();
        let number: u32 = chars.as_str().parse().ok()?;
        match (letter, number) {
            ('G', 0) => Some(Self::Move),
            ('G', 1) => Some(Self::Line),
            ('G', 4) => Some(Self::Dwell),
            ('G', 20 | 21 | 90) | ('M', 2 | 30) => Some(Self::Ignored),
            _ => None,
        }
    }
}

/// What a program contained
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GcodeSummary {
    pub width: f64,
    pub height: f64,
    /// Instructions executed
    pub instructions: usize,
    /// Lines skipped with a warning
    pub skipped: usize,
}

fn comment_regex() -> &'static Regex {
    static COMMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    COMMENT_REGEX.get_or_init(|| Regex::new(r"\([^)]*\)|;.*").expect("invalid regex pattern"))
}

fn header_regex() -> &'static Regex {
    static HEADER_REGEX: OnceLock<Regex> = OnceLock::new();
    HEADER_REGEX.get_or_init(|| {
        Regex::new(r"(?i)^(width|height)\s*=\s*(\S+)$").expect("invalid regex pattern")
    })
}

fn word_regex() -> &'static Regex {
    static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
    WORD_REGEX.get_or_init(|| Regex::new(r"[A-Za-z][^A-Za-z\s]*").expect("invalid regex pattern"))
}

/// Line interpreter with modal motion state
#[derive(Debug, Clone, Default)]
pub struct GcodeInterpreter {
    position: Point,
    modal: Option<GcodeFunction>,
    line_number: usize,
    started: bool,
    summary: GcodeSummary,
}

impl GcodeInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpreter whose first motion continues from `position`, so that an
    /// axis missing from it keeps the driver's current coordinate.
    pub fn starting_at(position: Point) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Last commanded point, in drawing units
    pub fn position(&self) -> Point {
        self.position
    }

    /// Interpret every line of `src`, then end the drawing.
    pub fn run<S, D>(&mut self, src: &mut S, sink: &mut D) -> Result<GcodeSummary>
    where
        S: CharSource + ?Sized,
        D: DrawingSink + ?Sized,
    {
        while let Some(line) = scan::read_line(src) {
            self.line_number += 1;
            self.process_line(&line, sink)?;
        }
        self.start(sink)?;
        sink.end_drawing()?;
        tracing::info!(
            "GCode done: {} instructions, {} lines skipped",
            self.summary.instructions,
            self.summary.skipped
        );
        Ok(self.summary)
    }

    /// Interpret one line.
    pub fn process_line<D>(&mut self, line: &str, sink: &mut D) -> Result<()>
    where
        D: DrawingSink + ?Sized,
    {
        let code = comment_regex().replace_all(line, "");
        let code = code.trim();
        if code.is_empty() {
            return Ok(());
        }

        if let Some(caps) = header_regex().captures(code) {
            self.header(&caps[1], &caps[2], sink);
            return Ok(());
        }
        self.start(sink)?;

        let mut words = word_regex().find_iter(code).map(|m| m.as_str()).peekable();
        let function = match words.peek() {
            Some(word) if is_parameter(word) => match self.modal {
                Some(function) => function,
                None => {
                    return self.skip(sink, ErrorCode::UnknownGcodeFunction, "no active motion");
                }
            },
            Some(word) => {
                let word = *word;
                words.next();
                match GcodeFunction::parse(word) {
                    Some(function) => function,
                    None => {
                        return self.skip(sink, ErrorCode::UnknownGcodeFunction, word);
                    }
                }
            }
            None => {
                return self.skip(sink, ErrorCode::WrongGcodeParameter, code);
            }
        };

        let mut params = Params::default();
        for word in words {
            let (letter, value) = word.split_at(1);
            let letter = letter.to_ascii_uppercase();
            let Ok(value) = value.parse::<f64>() else {
                self.warn(sink, ErrorCode::WrongGcodeParameter, word);
                continue;
            };
            match letter.as_str() {
                "X" => params.x = Some(value),
                "Y" => params.y = Some(value),
                "Z" => tracing::debug!("Line {}: Z{} ignored", self.line_number, value),
                "P" | "S" => params.time = params.time.or(Some(value)),
                _ => self.warn(sink, ErrorCode::UnknownGcodeParameter, word),
            }
            params.first = params.first.or(Some(value));
        }

        self.execute(function, params, sink)
    }

    fn execute<D>(&mut self, function: GcodeFunction, params: Params, sink: &mut D) -> Result<()>
    where
        D: DrawingSink + ?Sized,
    {
        match function {
            GcodeFunction::Move | GcodeFunction::Line => {
                let to = Point::new(
                    params.x.unwrap_or(self.position.x),
                    params.y.unwrap_or(self.position.y),
                );
                if function == GcodeFunction::Move {
                    sink.move_to(to)?;
                } else {
                    sink.line_to(to)?;
                }
                self.position = to;
                self.modal = Some(function);
            }
            GcodeFunction::Dwell => {
                sink.dwell(params.time.or(params.first).unwrap_or(0.0))?;
            }
            GcodeFunction::Ignored => {}
        }
        self.summary.instructions += 1;
        Ok(())
    }

    fn header<D: DrawingSink + ?Sized>(&mut self, key: &str, value: &str, sink: &mut D) {
        if self.started {
            self.warn(sink, ErrorCode::UnknownGcodeFunction, "size declared after drawing started");
            return;
        }
        match value.parse::<f64>() {
            Ok(v) if key.eq_ignore_ascii_case("width") => self.summary.width = v,
            Ok(v) => self.summary.height = v,
            Err(_) => self.warn(sink, ErrorCode::WrongGcodeParameter, value),
        }
    }

    fn start<D: DrawingSink + ?Sized>(&mut self, sink: &mut D) -> Result<()> {
        if !self.started {
            self.started = true;
            sink.begin_drawing(self.summary.width, self.summary.height)?;
        }
        Ok(())
    }

    fn warn<D: DrawingSink + ?Sized>(&self, sink: &mut D, code: ErrorCode, what: &str) {
        sink.warn(code, &format!("line {}: {}", self.line_number, what));
    }

    fn skip<D: DrawingSink + ?Sized>(&mut self, sink: &mut D, code: ErrorCode, what: &str) -> Result<()> {
        self.warn(sink, code, what);
        self.summary.skipped += 1;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Params {
    x: Option<f64>,
    y: Option<f64>,
    time: Option<f64>,
    first: Option<f64>,
}

fn is_parameter(word: &str) -> bool {
    matches!(
        word.as_bytes().first().map(u8::to_ascii_uppercase),
        Some(b'X' | b'Y' | b'Z' | b'P' | b'S')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_words() {
        assert_eq!(GcodeFunction::parse("G00"), Some(GcodeFunction::Move));
        assert_eq!(GcodeFunction::parse("G0"), Some(GcodeFunction::Move));
        assert_eq!(GcodeFunction::parse("g01"), Some(GcodeFunction::Line));
        assert_eq!(GcodeFunction::parse("G04"), Some(GcodeFunction::Dwell));
        assert_eq!(GcodeFunction::parse("M30"), Some(GcodeFunction::Ignored));
        assert_eq!(GcodeFunction::parse("G02"), None);
        assert_eq!(GcodeFunction::parse("G"), None);
    }

    #[test]
    fn test_comment_stripping() {
        let stripped = comment_regex().replace_all("G1 (pen) X1 ; trailing", "");
        assert_eq!(stripped.split_whitespace().collect::<Vec<_>>(), ["G1", "X1"]);
    }

    #[test]
    fn test_words_split_without_spaces() {
        let words: Vec<&str> = word_regex()
            .find_iter("G1X10.5Y-3")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(words, ["G1", "X10.5", "Y-3"]);
    }
}
