//! Countdown clock for timed attempts.

/// Outcome of one timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Still counting; carries the updated remaining seconds.
    Running(u32),
    /// Just reached zero. Reported exactly once.
    Expired,
    /// Already expired; the timer no longer ticks.
    Stopped,
}

/// Pause-free countdown with second-granularity ticks.
///
/// The owner drives `tick` once per elapsed wall-clock second; the
/// timer itself keeps no clock. Reaching zero yields `Expired` exactly
/// once, after which every tick is `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTimer {
    remaining: u32,
    expired_reported: bool,
}

impl CountdownTimer {
    /// A timer with the full attempt budget ahead of it.
    #[must_use]
    pub fn new(total_seconds: u32) -> Self {
        Self {
            remaining: total_seconds,
            expired_reported: false,
        }
    }

    /// Restores a timer from a resume snapshot.
    #[must_use]
    pub fn from_remaining(seconds_remaining: u32) -> Self {
        Self::new(seconds_remaining)
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// True once `Expired` has been reported.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expired_reported
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> TimerTick {
        if self.expired_reported {
            return TimerTick::Stopped;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.expired_reported = true;
            TimerTick::Expired
        } else {
            TimerTick::Running(self.remaining)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_one_second_per_tick() {
        let mut timer = CountdownTimer::new(3);
        assert_eq!(timer.tick(), TimerTick::Running(2));
        assert_eq!(timer.tick(), TimerTick::Running(1));
        assert_eq!(timer.remaining(), 1);
    }

    #[test]
    fn expiry_fires_exactly_once_then_stops() {
        let mut timer = CountdownTimer::new(2);
        assert_eq!(timer.tick(), TimerTick::Running(1));
        assert_eq!(timer.tick(), TimerTick::Expired);
        assert!(timer.is_expired());
        assert_eq!(timer.tick(), TimerTick::Stopped);
        assert_eq!(timer.tick(), TimerTick::Stopped);
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn zero_budget_expires_on_first_tick() {
        let mut timer = CountdownTimer::new(0);
        assert_eq!(timer.tick(), TimerTick::Expired);
        assert_eq!(timer.tick(), TimerTick::Stopped);
    }

    #[test]
    fn restored_timer_resumes_from_snapshot_value() {
        let mut timer = CountdownTimer::from_remaining(42);
        assert_eq!(timer.remaining(), 42);
        assert_eq!(timer.tick(), TimerTick::Running(41));
    }
}
