//! Deadline-based scheduled work.
//!
//! Nothing here spawns threads or registers callbacks. A schedule is a plain
//! value owned by whoever needs the work done, and the event loop polls it
//! with the current time on every tick. Cancelling means dropping (or
//! replacing) the value, so no recurring work can outlive its owner.

use std::time::Duration;

/// Fires once, at or after `due`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OneShot {
    due: Duration,
}

impl OneShot {
    pub fn after(now: Duration, delay: Duration) -> Self {
        Self { due: now + delay }
    }

    pub fn due(&self) -> Duration {
        self.due
    }

    pub fn is_due(&self, now: Duration) -> bool {
        now >= self.due
    }
}

/// Fires every `interval`, starting one interval after creation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Periodic {
    interval: Duration,
    next_due: Duration,
}

impl Periodic {
    pub fn every(now: Duration, interval: Duration) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true when at least one period elapsed since the last firing.
    /// Missed periods are coalesced into a single firing.
    pub fn poll(&mut self, now: Duration) -> bool {
        if now < self.next_due {
            return false;
        }
        if self.interval.is_zero() {
            self.next_due = now;
            return true;
        }
        let behind = now - self.next_due;
        let skipped = (behind.as_nanos() / self.interval.as_nanos()) as u32;
        self.next_due += self.interval * (skipped + 1);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn one_shot_fires_at_deadline() {
        let shot = OneShot::after(ms(100), ms(200));
        assert!(!shot.is_due(ms(299)));
        assert!(shot.is_due(ms(300)));
        assert!(shot.is_due(ms(1000)));
    }

    #[test]
    fn periodic_fires_once_per_interval() {
        let mut tick = Periodic::every(ms(0), ms(10));
        assert!(!tick.poll(ms(5)));
        assert!(tick.poll(ms(10)));
        assert!(!tick.poll(ms(15)));
        assert!(tick.poll(ms(21)));
    }

    #[test]
    fn periodic_coalesces_missed_periods() {
        let mut tick = Periodic::every(ms(0), ms(10));
        assert!(tick.poll(ms(95)));
        // next deadline is aligned to the grid, not to the late poll
        assert!(!tick.poll(ms(99)));
        assert!(tick.poll(ms(100)));
    }
}
