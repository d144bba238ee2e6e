use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::schedule::Periodic;

/// How often the displayed elapsed time is refreshed while running
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerState {
    Stopped,
    Running,
}

/// Stopwatch that can be paused and resumed without losing elapsed time
#[derive(Debug)]
pub struct ElapsedTimer<C: Clock = SystemClock> {
    clock: C,
    state: TimerState,
    /// Elapsed time frozen at the last stop
    accumulated: Duration,
    /// Virtual start instant: `now - accumulated` at the moment of starting
    started_at: Option<Duration>,
    displayed: Duration,
    sampler: Option<Periodic>,
}

impl ElapsedTimer<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for ElapsedTimer<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ElapsedTimer<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            state: TimerState::Stopped,
            accumulated: Duration::ZERO,
            started_at: None,
            displayed: Duration::ZERO,
            sampler: None,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        let now = self.clock.now();
        self.state = TimerState::Running;
        self.started_at = Some(now.saturating_sub(self.accumulated));
        self.sampler = Some(Periodic::every(now, SAMPLE_INTERVAL));
    }

    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.accumulated = self.elapsed();
        self.displayed = self.accumulated;
        self.state = TimerState::Stopped;
        self.started_at = None;
        self.sampler = None;
    }

    pub fn reset(&mut self) {
        self.state = TimerState::Stopped;
        self.accumulated = Duration::ZERO;
        self.started_at = None;
        self.displayed = Duration::ZERO;
        self.sampler = None;
    }

    /// Exact elapsed time at this instant
    pub fn elapsed(&self) -> Duration {
        match (self.state, self.started_at) {
            (TimerState::Running, Some(start)) => {
                self.clock.now().saturating_sub(start).max(self.accumulated)
            }
            _ => self.accumulated,
        }
    }

    /// Elapsed time as of the last periodic sample
    pub fn displayed(&self) -> Duration {
        self.displayed
    }

    /// Refreshes the displayed value if a sample is due.
    /// Returns true when the displayed value changed.
    pub fn on_tick(&mut self) -> bool {
        let now = self.clock.now();
        let due = match self.sampler.as_mut() {
            Some(sampler) => sampler.poll(now),
            None => false,
        };
        if !due {
            return false;
        }
        let sample = self.elapsed().max(self.displayed);
        let changed = sample != self.displayed;
        self.displayed = sample;
        changed
    }

    pub fn is_sampling(&self) -> bool {
        self.sampler.is_some()
    }
}
