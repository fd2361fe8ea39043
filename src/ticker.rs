// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

/// Something that decides when the next tick is due.
pub trait TickSource {
    fn start(&mut self, interval: Duration, now: Instant);

    fn stop(&mut self);

    /// Cancels whatever tick is pending and restarts at `interval`.
    fn reschedule(&mut self, interval: Duration, now: Instant) {
        self.stop();
        self.start(interval, now);
    }

    fn is_running(&self) -> bool;

    /// When the host should wake up next, if running.
    fn deadline(&self) -> Option<Instant>;

    /// Consumes at most one due tick.
    fn take_tick(&mut self, now: Instant) -> bool;
}

/// Fixed cadence on the monotonic clock. Late polls coalesce into a single
/// tick and the schedule restarts from `now`, so no backlog builds up.
#[derive(Clone, Debug, Default)]
pub struct IntervalTicker {
    interval: Duration,
    next: Option<Instant>,
}

impl IntervalTicker {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl TickSource for IntervalTicker {
    fn start(&mut self, interval: Duration, now: Instant) {
        self.interval = interval.max(Duration::from_millis(1));
        self.next = Some(now + self.interval);
    }

    fn stop(&mut self) {
        self.next = None;
    }

    fn is_running(&self) -> bool {
        self.next.is_some()
    }

    fn deadline(&self) -> Option<Instant> {
        self.next
    }

    fn take_tick(&mut self, now: Instant) -> bool {
        let Some(next) = self.next else {
            return false;
        };
        if now < next {
            return false;
        }
        let mut following = next + self.interval;
        if following <= now {
            following = now + self.interval;
        }
        self.next = Some(following);
        true
    }
}

/// Ticks only when told to.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub struct ManualTicker {
    pub interval: Option<Duration>,
    pub pending: u32,
    pub starts: u32,
}

#[cfg(test)]
impl ManualTicker {
    pub fn fire(&mut self) {
        if self.interval.is_some() {
            self.pending += 1;
        }
    }
}

#[cfg(test)]
impl TickSource for ManualTicker {
    fn start(&mut self, interval: Duration, _now: Instant) {
        self.interval = Some(interval);
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.interval = None;
        self.pending = 0;
    }

    fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    fn deadline(&self) -> Option<Instant> {
        None
    }

    fn take_tick(&mut self, _now: Instant) -> bool {
        if self.pending == 0 {
            return false;
        }
        self.pending -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn fires_once_per_interval() {
        let t0 = Instant::now();
        let mut t = IntervalTicker::new();
        t.start(MS * 10, t0);
        assert!(!t.take_tick(t0 + MS * 5));
        assert!(t.take_tick(t0 + MS * 10));
        assert!(!t.take_tick(t0 + MS * 12));
        assert!(t.take_tick(t0 + MS * 20));
        assert_eq!(t.deadline(), Some(t0 + MS * 30));
    }

    #[test]
    fn late_poll_coalesces_instead_of_queueing() {
        let t0 = Instant::now();
        let mut t = IntervalTicker::new();
        t.start(MS * 10, t0);
        let late = t0 + MS * 95;
        assert!(t.take_tick(late));
        assert!(!t.take_tick(late));
        assert_eq!(t.deadline(), Some(late + MS * 10));
    }

    #[test]
    fn reschedule_drops_the_pending_tick() {
        let t0 = Instant::now();
        let mut t = IntervalTicker::new();
        t.start(MS * 10, t0);
        t.reschedule(MS * 50, t0 + MS * 9);
        assert!(!t.take_tick(t0 + MS * 10));
        assert!(t.take_tick(t0 + MS * 59));
        assert_eq!(t.interval(), MS * 50);
    }

    #[test]
    fn stopped_ticker_never_fires() {
        let t0 = Instant::now();
        let mut t = IntervalTicker::new();
        assert!(!t.take_tick(t0));
        t.start(MS, t0);
        t.stop();
        assert!(!t.is_running());
        assert!(!t.take_tick(t0 + MS * 100));
    }

    #[test]
    fn manual_ticker_reschedule_cancels_pending() {
        let mut t = ManualTicker::default();
        t.start(MS * 33, Instant::now());
        t.fire();
        t.fire();
        assert!(t.take_tick(Instant::now()));
        t.reschedule(MS * 10, Instant::now());
        assert!(!t.take_tick(Instant::now()));
        assert_eq!(t.starts, 2);
    }
}
