//! Pen gate
//!
//! Two states, Moving and Writing. A transition waits `pre_delay_ms`, moves
//! the servo and waits `post_delay_ms` so the carriage never travels while the
//! pen is half lowered. Requesting the current state does nothing.

use drawall_core::{Hardware, PenState, StatusEvent, Telemetry};
use serde::{Deserialize, Serialize};

/// Servo angles and settling delays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServoSettings {
    /// Angle pressing the pen against the surface
    pub writing_angle: u16,
    /// Angle holding the pen away from the surface
    pub moving_angle: u16,
    pub pre_delay_ms: u32,
    pub post_delay_ms: u32,
}

impl Default for ServoSettings {
    fn default() -> Self {
        Self {
            writing_angle: 45,
            moving_angle: 90,
            pre_delay_ms: 50,
            post_delay_ms: 50,
        }
    }
}

impl ServoSettings {
    pub fn angle(&self, state: PenState) -> u16 {
        match state {
            PenState::Writing => self.writing_angle,
            PenState::Moving => self.moving_angle,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PenController {
    settings: ServoSettings,
    state: PenState,
}

impl PenController {
    /// A controller assuming the pen is lifted.
    pub fn new(settings: ServoSettings) -> Self {
        Self {
            settings,
            state: PenState::Moving,
        }
    }

    pub fn state(&self) -> PenState {
        self.state
    }

    pub fn settings(&self) -> &ServoSettings {
        &self.settings
    }

    /// Request the pen to write or to move. Returns whether the servo moved.
    pub fn set_writing<H, T>(&mut self, hw: &mut H, telemetry: &mut T, writing: bool) -> bool
    where
        H: Hardware + ?Sized,
        T: Telemetry + ?Sized,
    {
        self.set_state(hw, telemetry, PenState::from_writing(writing))
    }

    pub fn set_state<H, T>(&mut self, hw: &mut H, telemetry: &mut T, wanted: PenState) -> bool
    where
        H: Hardware + ?Sized,
        T: Telemetry + ?Sized,
    {
        if wanted == self.state {
            return false;
        }
        self.actuate(hw, wanted);
        self.state = wanted;
        telemetry.emit(StatusEvent::Pen(wanted));
        tracing::debug!("Pen {}", wanted);
        true
    }

    /// Drive the servo to the lifted angle whatever the tracked state.
    ///
    /// Used once at power-up, when the physical pen position is unknown.
    pub fn park<H: Hardware + ?Sized>(&mut self, hw: &mut H) {
        self.actuate(hw, PenState::Moving);
        self.state = PenState::Moving;
    }

    fn actuate<H: Hardware + ?Sized>(&self, hw: &mut H, state: PenState) {
        hw.delay_ms(self.settings.pre_delay_ms);
        hw.set_pen_angle(self.settings.angle(state));
        hw.delay_ms(self.settings.post_delay_ms);
    }
}
