//! Clock module - converts wall-clock time into discrete logic cycles
//!
//! The clock accumulates `elapsed * cycles_per_second` as cycle debt; whole
//! cycles become available to [`Clock::has_elapsed_cycle`], the fractional
//! remainder carries over to the next update. Time is always passed in by
//! the caller so the clock runs the same way under test as in the game loop.

use std::time::Instant;

#[derive(Debug, Clone)]
pub struct Clock {
    millis_per_cycle: f64,
    last_update: Instant,
    elapsed_cycles: u32,
    excess_millis: f64,
    paused: bool,
}

impl Clock {
    /// Create a running clock at `cycles_per_second`, anchored at `now`
    pub fn new(cycles_per_second: f32, now: Instant) -> Self {
        let mut clock = Self {
            millis_per_cycle: 1000.0,
            last_update: now,
            elapsed_cycles: 0,
            excess_millis: 0.0,
            paused: false,
        };
        clock.set_cycles_per_second(cycles_per_second);
        clock
    }

    /// Change the cycle rate. Takes effect on the next [`Clock::update`];
    /// already accumulated cycles are kept.
    pub fn set_cycles_per_second(&mut self, cycles_per_second: f32) {
        let cps = f64::from(cycles_per_second).max(f64::MIN_POSITIVE);
        self.millis_per_cycle = 1000.0 / cps;
    }

    pub fn cycles_per_second(&self) -> f32 {
        (1000.0 / self.millis_per_cycle) as f32
    }

    /// Drop all accumulated cycles and restart measurement from `now`
    pub fn reset(&mut self, now: Instant) {
        self.elapsed_cycles = 0;
        self.excess_millis = 0.0;
        self.last_update = now;
    }

    /// Account for wall time since the previous update
    ///
    /// Time spent paused is discarded: the reference point still advances.
    pub fn update(&mut self, now: Instant) {
        let delta = now.saturating_duration_since(self.last_update).as_nanos() as f64 / 1_000_000.0;
        if !self.paused {
            let total = delta + self.excess_millis;
            let whole = (total / self.millis_per_cycle).floor();
            self.elapsed_cycles = self.elapsed_cycles.saturating_add(whole as u32);
            self.excess_millis = total - whole * self.millis_per_cycle;
        }
        self.last_update = now;
    }

    /// Instant of the most recent update or reset
    pub fn last_update(&self) -> Instant {
        self.last_update
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Consume one elapsed cycle, if any
    pub fn has_elapsed_cycle(&mut self) -> bool {
        if self.elapsed_cycles > 0 {
            self.elapsed_cycles -= 1;
            true
        } else {
            false
        }
    }

    /// Whether a cycle is pending, without consuming it
    pub fn peek_elapsed_cycle(&self) -> bool {
        self.elapsed_cycles > 0
    }

    /// Number of whole cycles waiting to be consumed
    pub fn pending_cycles(&self) -> u32 {
        self.elapsed_cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_accumulates_whole_cycles() {
        let t0 = Instant::now();
        let mut clock = Clock::new(1.0, t0);

        clock.update(t0 + ms(999));
        assert!(!clock.peek_elapsed_cycle());

        clock.update(t0 + ms(1000));
        assert!(clock.has_elapsed_cycle());
        assert!(!clock.has_elapsed_cycle());
    }

    #[test]
    fn test_remainder_carries_over() {
        let t0 = Instant::now();
        let mut clock = Clock::new(4.0, t0); // 250ms per cycle

        clock.update(t0 + ms(600));
        assert_eq!(clock.pending_cycles(), 2);

        // 100ms carried + 150ms new = one more cycle.
        clock.update(t0 + ms(750));
        assert_eq!(clock.pending_cycles(), 3);
    }

    #[test]
    fn test_paused_time_is_discarded() {
        let t0 = Instant::now();
        let mut clock = Clock::new(1.0, t0);

        clock.set_paused(true);
        clock.update(t0 + ms(60_000));
        assert_eq!(clock.pending_cycles(), 0);

        clock.set_paused(false);
        clock.update(t0 + ms(60_500));
        assert_eq!(clock.pending_cycles(), 0);
        clock.update(t0 + ms(61_000));
        assert_eq!(clock.pending_cycles(), 1);
    }

    #[test]
    fn test_rate_change_is_not_retroactive() {
        let t0 = Instant::now();
        let mut clock = Clock::new(1.0, t0);

        clock.update(t0 + ms(500));
        clock.set_cycles_per_second(10.0);
        assert_eq!(clock.pending_cycles(), 0);

        // 500ms excess plus 100ms new, all at the new 100ms cycle.
        clock.update(t0 + ms(600));
        assert_eq!(clock.pending_cycles(), 6);
    }

    #[test]
    fn test_reset_drops_pending_cycles() {
        let t0 = Instant::now();
        let mut clock = Clock::new(25.0, t0);
        clock.update(t0 + ms(400));
        assert!(clock.pending_cycles() > 0);

        clock.reset(t0 + ms(400));
        assert_eq!(clock.pending_cycles(), 0);
        clock.update(t0 + ms(430));
        assert_eq!(clock.pending_cycles(), 0);
    }

    #[test]
    fn test_cycles_per_second_reads_back() {
        let clock = Clock::new(1.035, Instant::now());
        assert!((clock.cycles_per_second() - 1.035).abs() < 1e-5);
    }
}
