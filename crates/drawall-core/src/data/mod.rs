//! Data models for positions, cable lengths and pen state
//!
//! This module provides:
//! - Planar points in millimetres (sheet space) or drawing units
//! - Cable lengths in motor steps
//! - Pen state (writing or moving)
//! - The nine placement anchors of the sheet
//! - The fixed geometry of the machine
//!
//! Sheet coordinates have their origin at the upper left corner of the sheet,
//! X grows to the right and Y grows downward.

mod geometry;

pub use geometry::Geometry;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

/// A planar point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate (downward)
    pub y: f64,
}

impl Point {
    /// Origin of the coordinate space
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    /// Create a new point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Mirror `other` through this point: `2 * self - other`
    pub fn reflect(self, other: Point) -> Point {
        Point::new(2.0 * self.x - other.x, 2.0 * self.y - other.y)
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Cable lengths, in motor steps
///
/// The authoritative actuator state: after every completed move it equals the
/// kinematic conversion of the carriage position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CableLengths {
    /// Length of the left cable
    pub left: u64,
    /// Length of the right cable
    pub right: u64,
}

impl CableLengths {
    /// Create cable lengths from both sides
    pub const fn new(left: u64, right: u64) -> Self {
        Self { left, right }
    }

    /// Length on one side
    pub fn get(&self, axis: Axis) -> u64 {
        match axis {
            Axis::Left => self.left,
            Axis::Right => self.right,
        }
    }

    /// Mutable length on one side
    pub fn get_mut(&mut self, axis: Axis) -> &mut u64 {
        match axis {
            Axis::Left => &mut self.left,
            Axis::Right => &mut self.right,
        }
    }

    /// Signed step deltas needed to reach `target`
    pub fn delta_to(&self, target: CableLengths) -> (i64, i64) {
        (
            target.left as i64 - self.left as i64,
            target.right as i64 - self.right as i64,
        )
    }
}

impl fmt::Display for CableLengths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{} R{}", self.left, self.right)
    }
}

/// One of the two cable motors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Motor on the left anchor
    Left,
    /// Motor on the right anchor
    Right,
}

impl Axis {
    /// Both axes, left first
    pub const ALL: [Axis; 2] = [Axis::Left, Axis::Right];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Pen state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PenState {
    /// Pen lifted, the carriage moves without drawing
    #[default]
    Moving,
    /// Pen pressed against the surface
    Writing,
}

impl PenState {
    /// State matching a "should write" request
    pub fn from_writing(writing: bool) -> Self {
        if writing {
            Self::Writing
        } else {
            Self::Moving
        }
    }

    /// Whether the pen touches the surface
    pub fn is_writing(self) -> bool {
        matches!(self, Self::Writing)
    }
}

impl fmt::Display for PenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Moving => write!(f, "moving"),
            Self::Writing => write!(f, "writing"),
        }
    }
}

/// Placement anchor on a rectangle: the eight cardinal points plus the centre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Anchor {
    LowerLeft,
    LowerCenter,
    LowerRight,
    LeftCenter,
    #[default]
    Center,
    RightCenter,
    UpperLeft,
    UpperCenter,
    UpperRight,
}

impl Anchor {
    /// All anchors, in configuration order
    pub const ALL: [Anchor; 9] = [
        Anchor::LowerLeft,
        Anchor::LowerCenter,
        Anchor::LowerRight,
        Anchor::LeftCenter,
        Anchor::Center,
        Anchor::RightCenter,
        Anchor::UpperLeft,
        Anchor::UpperCenter,
        Anchor::UpperRight,
    ];

    /// Horizontal factor: 0 for left, 0.5 for centre, 1 for right
    pub fn horizontal(self) -> f64 {
        match self {
            Self::LowerLeft | Self::LeftCenter | Self::UpperLeft => 0.0,
            Self::LowerCenter | Self::Center | Self::UpperCenter => 0.5,
            Self::LowerRight | Self::RightCenter | Self::UpperRight => 1.0,
        }
    }

    /// Vertical factor: 0 for upper, 0.5 for centre, 1 for lower (Y grows downward)
    pub fn vertical(self) -> f64 {
        match self {
            Self::UpperLeft | Self::UpperCenter | Self::UpperRight => 0.0,
            Self::LeftCenter | Self::Center | Self::RightCenter => 0.5,
            Self::LowerLeft | Self::LowerCenter | Self::LowerRight => 1.0,
        }
    }

    /// Location of this anchor on a `width` x `height` rectangle
    pub fn locate(self, width: f64, height: f64) -> Point {
        Point::new(width * self.horizontal(), height * self.vertical())
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LowerLeft => "LOWER_LEFT",
            Self::LowerCenter => "LOWER_CENTER",
            Self::LowerRight => "LOWER_RIGHT",
            Self::LeftCenter => "LEFT_CENTER",
            Self::Center => "CENTER",
            Self::RightCenter => "RIGHT_CENTER",
            Self::UpperLeft => "UPPER_LEFT",
            Self::UpperCenter => "UPPER_CENTER",
            Self::UpperRight => "UPPER_RIGHT",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Anchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Anchor::ALL
            .into_iter()
            .find(|anchor| anchor.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown position: {}", s))
    }
}
