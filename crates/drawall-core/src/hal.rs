//! Hardware abstraction
//!
//! Everything the motion engine needs from the board: two step/direction
//! drivers, the pen servo, motor power and a monotonic microsecond clock.
//! Implementations exist for real boards and for the off-target simulator.

use crate::data::Axis;

/// Interface to the plotter electronics.
pub trait Hardware {
    /// Drive the step line of `axis` to `level`.
    ///
    /// The driver advances on the rising edge only; the engine toggles the
    /// line once per step so the level is the parity of the new cable length.
    fn step_pulse(&mut self, axis: Axis, level: bool);

    /// Set the direction output of `axis`.
    fn set_direction(&mut self, axis: Axis, level: bool);

    /// Move the pen servo to `angle` degrees.
    fn set_pen_angle(&mut self, angle: u16);

    /// Enable or disable both motor drivers.
    fn set_motor_power(&mut self, enabled: bool);

    /// Microseconds elapsed since an arbitrary, fixed reference point.
    fn now_micros(&mut self) -> u64;

    /// Block for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Microseconds elapsed since `since` (a previous [`Hardware::now_micros`] value).
    fn elapsed_since(&mut self, since: u64) -> u64 {
        self.now_micros().saturating_sub(since)
    }
}

impl<H: Hardware + ?Sized> Hardware for &mut H {
    fn step_pulse(&mut self, axis: Axis, level: bool) {
        (**self).step_pulse(axis, level);
    }

    fn set_direction(&mut self, axis: Axis, level: bool) {
        (**self).set_direction(axis, level);
    }

    fn set_pen_angle(&mut self, angle: u16) {
        (**self).set_pen_angle(angle);
    }

    fn set_motor_power(&mut self, enabled: bool) {
        (**self).set_motor_power(enabled);
    }

    fn now_micros(&mut self) -> u64 {
        (**self).now_micros()
    }

    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms);
    }
}
