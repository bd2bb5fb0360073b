use drawall_core::{DrawingSink, Error, ErrorCode, Point, Result};

/// A primitive received by [`RecordingSink`]
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Begin(f64, f64),
    Move(Point),
    Line(Point),
    Cubic(Point, Point, Point),
    Quadratic(Point, Point),
    Dwell(f64),
    End,
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub primitives: Vec<Primitive>,
    pub warnings: Vec<ErrorCode>,
    pub failures: Vec<ErrorCode>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Primitives other than the begin and end markers
    pub fn drawn(&self) -> Vec<Primitive> {
        self.primitives
            .iter()
            .filter(|p| !matches!(p, Primitive::Begin(..) | Primitive::End))
            .cloned()
            .collect()
    }
}

impl DrawingSink for RecordingSink {
    fn begin_drawing(&mut self, width: f64, height: f64) -> Result<()> {
        self.primitives.push(Primitive::Begin(width, height));
        Ok(())
    }

    fn move_to(&mut self, to: Point) -> Result<()> {
        self.primitives.push(Primitive::Move(to));
        Ok(())
    }

    fn line_to(&mut self, to: Point) -> Result<()> {
        self.primitives.push(Primitive::Line(to));
        Ok(())
    }

    fn cubic_to(&mut self, c1: Point, c2: Point, to: Point) -> Result<()> {
        self.primitives.push(Primitive::Cubic(c1, c2, to));
        Ok(())
    }

    fn quadratic_to(&mut self, c: Point, to: Point) -> Result<()> {
        self.primitives.push(Primitive::Quadratic(c, to));
        Ok(())
    }

    fn dwell(&mut self, seconds: f64) -> Result<()> {
        self.primitives.push(Primitive::Dwell(seconds));
        Ok(())
    }

    fn warn(&mut self, code: ErrorCode, _detail: &str) {
        self.warnings.push(code);
    }

    fn fail(&mut self, code: ErrorCode, detail: &str) -> Error {
        self.failures.push(code);
        Error::fatal(code, detail)
    }

    fn end_drawing(&mut self) -> Result<()> {
        self.primitives.push(Primitive::End);
        Ok(())
    }
}
