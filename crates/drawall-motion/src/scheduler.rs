//! Proportional dual-axis stepping
//!
//! Both motors are driven from one polling loop. The axis with more steps to
//! do pulses every `base` microseconds; the other one waits proportionally
//! longer between pulses so that both finish at about the same time. This is
//! an approximation: the integer delay ratio drifts over long segments.

use drawall_core::{Axis, CableLengths, Hardware, StatusEvent, Telemetry};
use serde::{Deserialize, Serialize};

/// Direction output that shortens each cable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorPolarity {
    pub left: bool,
    pub right: bool,
}

impl Default for MotorPolarity {
    fn default() -> Self {
        Self {
            left: true,
            right: true,
        }
    }
}

impl MotorPolarity {
    pub fn new(left: bool, right: bool) -> Self {
        Self { left, right }
    }

    /// Direction level for `axis` when the cable must grow (`lengthen`) or shrink.
    pub fn direction(&self, axis: Axis, lengthen: bool) -> bool {
        let polarity = match axis {
            Axis::Left => self.left,
            Axis::Right => self.right,
        };
        if lengthen {
            !polarity
        } else {
            polarity
        }
    }
}

/// Pulse counts and duration of one scheduled segment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub left_pulses: u64,
    pub right_pulses: u64,
    /// Microseconds between the first clock read and the last pulse
    pub elapsed_us: u64,
}

impl StepReport {
    pub fn pulses(&self, axis: Axis) -> u64 {
        match axis {
            Axis::Left => self.left_pulses,
            Axis::Right => self.right_pulses,
        }
    }
}

/// Paces the pulses of both motors for one straight segment in cable space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepScheduler {
    base_delay_us: u64,
}

impl StepScheduler {
    pub fn new(base_delay_us: u64) -> Self {
        Self { base_delay_us }
    }

    /// Scheduler moving cables at `speed` mm/s with steps of `step_length` mm.
    pub fn from_speed(step_length: f64, speed: f64) -> Self {
        Self::new(base_delay_for(step_length, speed))
    }

    pub fn base_delay_us(&self) -> u64 {
        self.base_delay_us
    }

    pub fn set_speed(&mut self, step_length: f64, speed: f64) {
        self.base_delay_us = base_delay_for(step_length, speed);
    }

    /// Inter-step delays for the left and right axes.
    ///
    /// An axis with nothing to do keeps the base delay; it never pulses.
    pub fn delays(&self, steps_left: u64, steps_right: u64) -> (u64, u64) {
        let base = self.base_delay_us;
        if steps_left == 0 || steps_right == 0 {
            return (base, base);
        }
        if steps_left > steps_right {
            (base, base * steps_left / steps_right)
        } else {
            (base * steps_right / steps_left, base)
        }
    }

    /// Drive both cables from `lengths` to `target`.
    ///
    /// Blocks until every pulse has been emitted. `lengths` is updated one
    /// step at a time and equals `target` on return.
    pub fn run<H, T>(
        &self,
        hw: &mut H,
        telemetry: &mut T,
        lengths: &mut CableLengths,
        target: CableLengths,
        polarity: MotorPolarity,
    ) -> StepReport
    where
        H: Hardware + ?Sized,
        T: Telemetry + ?Sized,
    {
        let (delta_left, delta_right) = lengths.delta_to(target);
        let lengthen = [delta_left >= 0, delta_right >= 0];
        let mut remaining = [delta_left.unsigned_abs(), delta_right.unsigned_abs()];
        let (delay_left, delay_right) = self.delays(remaining[0], remaining[1]);
        let delay = [delay_left, delay_right];

        for (i, axis) in Axis::ALL.into_iter().enumerate() {
            hw.set_direction(axis, polarity.direction(axis, lengthen[i]));
        }

        let mut report = StepReport {
            left_pulses: remaining[0],
            right_pulses: remaining[1],
            elapsed_us: 0,
        };

        let start = hw.now_micros();
        let mut last = [start; 2];
        let mut now = start;

        while remaining.iter().any(|&n| n > 0) {
            now = hw.now_micros();
            for (i, axis) in Axis::ALL.into_iter().enumerate() {
                if remaining[i] == 0 || now.saturating_sub(last[i]) < delay[i] {
                    continue;
                }
                last[i] = now;
                remaining[i] -= 1;

                let length = lengths.get_mut(axis);
                if lengthen[i] {
                    *length += 1;
                } else {
                    *length = length.saturating_sub(1);
                }
                hw.step_pulse(axis, *length % 2 == 1);
                telemetry.emit(StatusEvent::Pulse {
                    axis,
                    pull: !lengthen[i],
                });
            }
        }

        report.elapsed_us = now.saturating_sub(start);
        tracing::trace!(
            "Stepped L{} R{} in {} us (delays {} / {})",
            report.left_pulses,
            report.right_pulses,
            report.elapsed_us,
            delay_left,
            delay_right
        );
        report
    }
}

/// Microseconds per step for a linear cable speed of `speed` mm/s.
pub fn base_delay_for(step_length: f64, speed: f64) -> u64 {
    if speed <= 0.0 || !speed.is_finite() {
        return 0;
    }
    (1_000_000.0 * step_length / speed).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedHardware;
    use drawall_core::{NullTelemetry, RecordingTelemetry};

    #[test]
    fn test_polarity() {
        let polarity = MotorPolarity::new(true, false);
        assert!(!polarity.direction(Axis::Left, true));
        assert!(polarity.direction(Axis::Left, false));
        assert!(polarity.direction(Axis::Right, true));
        assert!(!polarity.direction(Axis::Right, false));
    }

    #[test]
    fn test_delays_are_proportional() {
        let scheduler = StepScheduler::new(500);
        assert_eq!(scheduler.delays(400, 100), (500, 2000));
        assert_eq!(scheduler.delays(100, 400), (2000, 500));
        assert_eq!(scheduler.delays(10, 10), (500, 500));
        assert_eq!(scheduler.delays(0, 7), (500, 500));
    }

    #[test]
    fn test_base_delay_from_speed() {
        // 0.1 mm per step at 20 mm/s
        assert_eq!(base_delay_for(0.1, 20.0), 5000);
        assert_eq!(base_delay_for(0.1, 0.0), 0);
        let mut scheduler = StepScheduler::from_speed(0.1, 20.0);
        scheduler.set_speed(0.1, 40.0);
        assert_eq!(scheduler.base_delay_us(), 2500);
    }

    #[test]
    fn test_run_reaches_target() {
        let mut hw = SimulatedHardware::new();
        let mut telemetry = RecordingTelemetry::new();
        let mut lengths = CableLengths::new(1000, 1000);
        let target = CableLengths::new(1013, 994);

        let report = StepScheduler::new(20).run(
            &mut hw,
            &mut telemetry,
            &mut lengths,
            target,
            MotorPolarity::default(),
        );

        assert_eq!(lengths, target);
        assert_eq!(report.left_pulses, 13);
        assert_eq!(report.right_pulses, 6);
        assert_eq!(hw.pulse_count(Axis::Left), 13);
        assert_eq!(hw.pulse_count(Axis::Right), 6);
        assert_eq!(telemetry.pulses(Axis::Left), 13);
        assert!(telemetry.events.iter().any(|e| matches!(
            e,
            StatusEvent::Pulse {
                axis: Axis::Right,
                pull: true
            }
        )));
    }

    #[test]
    fn test_step_level_is_length_parity() {
        let mut hw = SimulatedHardware::new();
        let mut lengths = CableLengths::new(10, 10);
        StepScheduler::new(5).run(
            &mut hw,
            &mut NullTelemetry,
            &mut lengths,
            CableLengths::new(13, 10),
            MotorPolarity::default(),
        );
        let levels: Vec<bool> = hw.pulses(Axis::Left).map(|p| p.level).collect();
        assert_eq!(levels, vec![true, false, true]);
    }

    #[test]
    fn test_directions_set_before_stepping() {
        let mut hw = SimulatedHardware::new();
        let mut lengths = CableLengths::new(10, 10);
        StepScheduler::new(5).run(
            &mut hw,
            &mut NullTelemetry,
            &mut lengths,
            CableLengths::new(12, 8),
            MotorPolarity::new(true, true),
        );
        assert_eq!(hw.direction(Axis::Left), Some(false));
        assert_eq!(hw.direction(Axis::Right), Some(true));
    }

    #[test]
    fn test_shortening_writes_configured_level() {
        let mut hw = SimulatedHardware::new();
        let mut lengths = CableLengths::new(10, 10);
        StepScheduler::new(5).run(
            &mut hw,
            &mut NullTelemetry,
            &mut lengths,
            CableLengths::new(8, 12),
            MotorPolarity::new(true, true),
        );
        assert_eq!(hw.direction(Axis::Left), Some(true));
        assert_eq!(hw.direction(Axis::Right), Some(false));

        let mut hw = SimulatedHardware::new();
        let mut lengths = CableLengths::new(10, 10);
        StepScheduler::new(5).run(
            &mut hw,
            &mut NullTelemetry,
            &mut lengths,
            CableLengths::new(8, 12),
            MotorPolarity::new(false, false),
        );
        assert_eq!(hw.direction(Axis::Left), Some(false));
        assert_eq!(hw.direction(Axis::Right), Some(true));
    }

    #[test]
    fn test_zero_move_emits_nothing() {
        let mut hw = SimulatedHardware::new();
        let mut lengths = CableLengths::new(10, 10);
        let target = lengths;
        let report = StepScheduler::new(5).run(
            &mut hw,
            &mut NullTelemetry,
            &mut lengths,
            target,
            MotorPolarity::default(),
        );
        assert_eq!(report, StepReport::default());
        assert_eq!(hw.total_pulses(), 0);
    }

    #[test]
    fn test_idle_axis_gets_lengthening_level() {
        let mut hw = SimulatedHardware::new();
        let mut lengths = CableLengths::new(10, 10);
        StepScheduler::new(5).run(
            &mut hw,
            &mut NullTelemetry,
            &mut lengths,
            CableLengths::new(7, 10),
            MotorPolarity::new(true, true),
        );
        assert_eq!(hw.direction(Axis::Left), Some(true));
        assert_eq!(hw.direction(Axis::Right), Some(false));
        assert_eq!(lengths, CableLengths::new(7, 10));
    }
}
