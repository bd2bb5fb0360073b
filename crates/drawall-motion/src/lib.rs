//! # Drawall Motion
//!
//! The motion engine of the wall plotter: conversion of sheet positions into
//! cable lengths, the proportional dual-axis step scheduler, the pen gate,
//! curve flattening and the [`Plotter`] that ties them together behind the
//! [`drawall_core::DrawingSink`] interface.

pub mod flattener;
pub mod kinematics;
pub mod pen;
pub mod plotter;
pub mod scheduler;
pub mod sim;
pub mod transform;

pub use flattener::{cubic_points, quadratic_points, split_line, DEFAULT_SPLIT_THRESHOLD};
pub use kinematics::{Clamped, Kinematics};
pub use pen::{PenController, ServoSettings};
pub use plotter::{MotionState, Plotter, DEFAULT_SPEED};
pub use scheduler::{MotorPolarity, StepReport, StepScheduler};
pub use sim::{PulseRecord, SimulatedHardware};
pub use transform::{Calibration, DrawingSize, DrawingTransform};
