//! # Timer Module
//!
//! Tick-driven countdowns. Expiry is reported through return values rather
//! than stored callbacks: `start`/`tick` return `true` exactly once per arming,
//! on the call where the timer expires.
//!
//! ## Key Types
//! - `Timer`: Idle -> Running -> Expired countdown.
//! - `TwoStageTimer`: A delay followed by an optional duration, reporting
//!   `began`/`ended` transitions.

use crate::config::TICKS_PER_SECOND;
use crate::errors::PictureError;
use tracing::trace;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimerState {
    #[default]
    Idle,
    Running,
    Expired,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timer {
    duration: u32,
    elapsed: u32,
    state: TimerState,
}

impl Timer {
    /// Rejects negative durations.
    pub fn new(duration: i64) -> Result<Self, PictureError> {
        let duration = u32::try_from(duration).map_err(|_| PictureError::InvalidDuration(duration as f64))?;
        Ok(Self::ticks(duration))
    }

    /// Builds a timer from seconds at the engine tick rate. Rejects NaN,
    /// infinite and negative values.
    pub fn from_seconds(seconds: f64) -> Result<Self, PictureError> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(PictureError::InvalidDuration(seconds));
        }
        let ticks = (seconds * TICKS_PER_SECOND as f64).round();
        if ticks > u32::MAX as f64 {
            return Err(PictureError::InvalidDuration(seconds));
        }
        Ok(Self::ticks(ticks as u32))
    }

    pub fn ticks(duration: u32) -> Self {
        Self {
            duration,
            elapsed: 0,
            state: TimerState::Idle,
        }
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_expired(&self) -> bool {
        self.state == TimerState::Expired
    }

    /// Takes effect on the next tick comparison; never fires retroactively.
    pub fn set_duration(&mut self, duration: i64) -> Result<(), PictureError> {
        self.duration = u32::try_from(duration).map_err(|_| PictureError::InvalidDuration(duration as f64))?;
        Ok(())
    }

    /// Restarts from zero. Returns `true` if the timer expired immediately (zero duration).
    pub fn start(&mut self) -> bool {
        self.elapsed = 0;
        if self.duration == 0 {
            self.state = TimerState::Expired;
            return true;
        }
        self.state = TimerState::Running;
        false
    }

    /// Advances one tick. Returns `true` on the tick that expires the timer.
    pub fn tick(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.elapsed += 1;
        if self.elapsed >= self.duration {
            self.state = TimerState::Expired;
            trace!(duration = self.duration, "timer expired");
            return true;
        }
        false
    }

    /// Forces the timer idle without reporting expiry.
    pub fn stop(&mut self) {
        self.elapsed = 0;
        self.state = TimerState::Idle;
    }
}

/// Transitions reported by a [`TwoStageTimer`] for one `start` or `tick` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageEvents {
    pub began: bool,
    pub ended: bool,
}

/// Delay, then duration. `began` fires when the delay expires, `ended` when the
/// duration does. Without a duration the second stage lasts until stopped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TwoStageTimer {
    delay: Timer,
    duration: Option<Timer>,
}

impl TwoStageTimer {
    pub fn new(delay: Timer, duration: Option<Timer>) -> Self {
        Self { delay, duration }
    }

    pub fn delay(&self) -> &Timer {
        &self.delay
    }

    pub fn duration(&self) -> Option<&Timer> {
        self.duration.as_ref()
    }

    pub fn set_delay(&mut self, delay: Timer) {
        self.delay = delay;
    }

    pub fn set_duration(&mut self, duration: Option<Timer>) {
        self.duration = duration;
    }

    pub fn start(&mut self) -> StageEvents {
        self.stop();
        let mut events = StageEvents::default();
        if self.delay.start() {
            self.begin(&mut events);
        }
        events
    }

    pub fn tick(&mut self) -> StageEvents {
        let mut events = StageEvents::default();
        if self.delay.tick() {
            self.begin(&mut events);
        } else if let Some(duration) = &mut self.duration {
            events.ended = duration.tick();
        }
        events
    }

    fn begin(&mut self, events: &mut StageEvents) {
        events.began = true;
        if let Some(duration) = &mut self.duration {
            events.ended = duration.start();
        }
    }

    pub fn stop(&mut self) {
        self.delay.stop();
        if let Some(duration) = &mut self.duration {
            duration.stop();
        }
    }

    pub fn has_begun(&self) -> bool {
        self.delay.is_expired()
    }

    pub fn has_ended(&self) -> bool {
        self.duration.as_ref().is_some_and(Timer::is_expired)
    }

    /// Between `began` and `ended`.
    pub fn is_active(&self) -> bool {
        self.has_begun() && !self.has_ended()
    }
}
