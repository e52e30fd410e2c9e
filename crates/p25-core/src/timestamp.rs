use core::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Point in time in milliseconds since the Unix epoch.
/// Every controller operation receives the current time as an argument, so tests
/// can drive the clock by hand. Only the binaries call `now()`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    pub ms: i64,
}

impl Timestamp {
    pub const fn from_millis(ms: i64) -> Self {
        Timestamp { ms }
    }

    pub fn from_secs_f64(secs: f64) -> Self {
        Timestamp { ms: (secs * 1000.0).round() as i64 }
    }

    /// Wall clock time
    pub fn now() -> Self {
        let ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        Timestamp { ms }
    }

    pub fn add_millis(self, ms: i64) -> Self {
        Timestamp { ms: self.ms.saturating_add(ms) }
    }

    /// Difference `self - b` in milliseconds
    pub fn diff(self, b: Self) -> i64 {
        self.ms - b.ms
    }

    /// Age of this Timestamp compared to now, in milliseconds
    #[inline(always)]
    pub fn age(self, now: Timestamp) -> i64 {
        now.diff(self)
    }

    pub fn as_secs_f64(self) -> f64 {
        self.ms as f64 / 1000.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.ms.div_euclid(1000), self.ms.rem_euclid(1000))
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_diff() {
        let t0 = Timestamp::from_secs_f64(1000.0);
        let t1 = t0.add_millis(2500);
        assert_eq!(t1.diff(t0), 2500);
        assert_eq!(t0.diff(t1), -2500);
        assert_eq!(t0.age(t1), 2500);
        assert!(t1 > t0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Timestamp::from_millis(1_234_567).to_string(), "1234.567");
        assert_eq!(Timestamp::from_millis(-1).to_string(), "-1.999");
        assert_eq!(Timestamp::from_secs_f64(1.5).ms, 1500);
    }
}
