//! Off-target hardware
//!
//! [`SimulatedHardware`] implements [`Hardware`] with a virtual microsecond
//! clock and records everything the engine asks the board to do. The clock
//! advances by a fixed tick on every read, so a polling loop always makes
//! progress, and `delay_ms` advances it by the requested amount.

use drawall_core::{Axis, Hardware};

/// One step pulse seen by the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseRecord {
    pub axis: Axis,
    /// Step line level after the pulse
    pub level: bool,
    /// Virtual time of the pulse, in microseconds
    pub at_us: u64,
}

#[derive(Debug, Clone)]
pub struct SimulatedHardware {
    clock_us: u64,
    tick_us: u64,
    pulses: Vec<PulseRecord>,
    directions: [Option<bool>; 2],
    direction_writes: usize,
    direction_changes: usize,
    pen_angles: Vec<u16>,
    motors_powered: bool,
    dwell_ms: u64,
}

impl Default for SimulatedHardware {
    fn default() -> Self {
        Self::with_tick(1)
    }
}

impl SimulatedHardware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulator whose clock advances `tick_us` per read (at least 1).
    pub fn with_tick(tick_us: u64) -> Self {
        Self {
            clock_us: 0,
            tick_us: tick_us.max(1),
            pulses: Vec::new(),
            directions: [None; 2],
            direction_writes: 0,
            direction_changes: 0,
            pen_angles: Vec::new(),
            motors_powered: false,
            dwell_ms: 0,
        }
    }

    /// Current virtual time, without advancing the clock
    pub fn clock_us(&self) -> u64 {
        self.clock_us
    }

    pub fn pulses(&self, axis: Axis) -> impl Iterator<Item = &PulseRecord> + '_ {
        self.pulses.iter().filter(move |p| p.axis == axis)
    }

    pub fn all_pulses(&self) -> &[PulseRecord] {
        &self.pulses
    }

    pub fn pulse_count(&self, axis: Axis) -> usize {
        self.pulses(axis).count()
    }

    pub fn total_pulses(&self) -> usize {
        self.pulses.len()
    }

    /// Time of the last pulse on `axis`
    pub fn last_pulse_at(&self, axis: Axis) -> Option<u64> {
        self.pulses(axis).last().map(|p| p.at_us)
    }

    /// Last direction level written for `axis`
    pub fn direction(&self, axis: Axis) -> Option<bool> {
        self.directions[index(axis)]
    }

    /// Number of direction writes, two per scheduled segment
    pub fn direction_writes(&self) -> usize {
        self.direction_writes
    }

    /// Number of times a direction output actually changed level
    pub fn direction_changes(&self) -> usize {
        self.direction_changes
    }

    pub fn pen_angles(&self) -> &[u16] {
        &self.pen_angles
    }

    pub fn motors_powered(&self) -> bool {
        self.motors_powered
    }

    /// Total time spent in `delay_ms`
    pub fn dwell_ms(&self) -> u64 {
        self.dwell_ms
    }

    /// Forget recorded pulses, keeping the clock and outputs.
    pub fn clear_pulses(&mut self) {
        self.pulses.clear();
    }
}

impl Hardware for SimulatedHardware {
    fn step_pulse(&mut self, axis: Axis, level: bool) {
        self.pulses.push(PulseRecord {
            axis,
            level,
            at_us: self.clock_us,
        });
    }

    fn set_direction(&mut self, axis: Axis, level: bool) {
        self.direction_writes += 1;
        let slot = &mut self.directions[index(axis)];
        if *slot != Some(level) {
            self.direction_changes += 1;
        }
        *slot = Some(level);
    }

    fn set_pen_angle(&mut self, angle: u16) {
        self.pen_angles.push(angle);
    }

    fn set_motor_power(&mut self, enabled: bool) {
        self.motors_powered = enabled;
    }

    fn now_micros(&mut self) -> u64 {
        self.clock_us += self.tick_us;
        self.clock_us
    }

    fn delay_ms(&mut self, ms: u32) {
        self.dwell_ms += u64::from(ms);
        self.clock_us += u64::from(ms) * 1000;
    }
}

fn index(axis: Axis) -> usize {
    match axis {
        Axis::Left => 0,
        Axis::Right => 1,
    }
}
