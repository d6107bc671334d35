use std::time::{Duration, Instant};

/// Periodic tick source with an interval that may change between ticks.
///
/// Time is always passed in, so the owner decides what "now" is. After each
/// tick the owner pulls the new interval from the game and calls
/// [`set_interval`](TickTimer::set_interval) followed by
/// [`reschedule`](TickTimer::reschedule).
#[derive(Clone, Debug)]
pub struct TickTimer {
    interval: Duration,
    next_tick: Instant,
    enabled: bool,
}

impl TickTimer {
    pub fn new(interval: Duration, now: Instant) -> Self {
        TickTimer { interval, next_tick: now + interval, enabled: true }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Schedules the next tick one interval after `now`.
    pub fn reschedule(&mut self, now: Instant) {
        self.next_tick = now + self.interval;
    }

    pub fn restart(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        self.enabled = true;
        self.reschedule(now);
    }

    pub fn enable(&mut self, now: Instant) {
        self.enabled = true;
        self.reschedule(now);
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.enabled && now >= self.next_tick
    }

    /// How long to wait for input before the next tick, or `None` when stopped.
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        if !self.enabled {
            return None;
        }
        Some(self.next_tick.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn fires_after_one_interval() {
        let start = Instant::now();
        let timer = TickTimer::new(400 * MS, start);

        assert!(!timer.is_due(start));
        assert!(!timer.is_due(start + 399 * MS));
        assert!(timer.is_due(start + 400 * MS));
        assert_eq!(timer.time_until_tick(start + 150 * MS), Some(250 * MS));
        assert_eq!(timer.time_until_tick(start + 500 * MS), Some(Duration::ZERO));
    }

    #[test]
    fn new_interval_applies_from_reschedule() {
        let start = Instant::now();
        let mut timer = TickTimer::new(400 * MS, start);

        let tick = start + 400 * MS;
        timer.set_interval(398 * MS);
        timer.reschedule(tick);

        assert!(!timer.is_due(tick + 397 * MS));
        assert!(timer.is_due(tick + 398 * MS));
    }

    #[test]
    fn disabled_timer_never_fires() {
        let start = Instant::now();
        let mut timer = TickTimer::new(100 * MS, start);
        timer.disable();

        assert!(!timer.is_due(start + 1000 * MS));
        assert_eq!(timer.time_until_tick(start), None);

        timer.enable(start + 1000 * MS);
        assert!(!timer.is_due(start + 1050 * MS));
        assert!(timer.is_due(start + 1100 * MS));
    }

    #[test]
    fn restart_resets_interval_and_enables() {
        let start = Instant::now();
        let mut timer = TickTimer::new(150 * MS, start);
        timer.disable();

        timer.restart(400 * MS, start);
        assert_eq!(timer.time_until_tick(start), Some(400 * MS));
        assert_eq!(timer.interval(), 400 * MS);
        assert!(timer.is_due(start + 400 * MS));
    }
}
