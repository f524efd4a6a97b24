use std::time::{Duration, Instant};

/// Monotonic time source for the timed region.
///
/// Readings are offsets from an arbitrary fixed origin; only differences matter.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// `std::time::Instant`-backed clock.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline(always)]
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

pub(crate) fn duration_ms(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_clock_never_goes_back() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn converts_to_exact_milliseconds() {
        assert_eq!(duration_ms(Duration::from_micros(2_500)), 2.5);
        assert_eq!(duration_ms(Duration::from_millis(4)), 4.0);
        assert_eq!(duration_ms(Duration::ZERO), 0.0);
    }
}
