/// Time primitives.
///
/// Instants are integer milliseconds (epoch-relative). Every windowing rule
/// in this system is expressed in whole milliseconds, so integer time keeps
/// comparisons and offsets exact.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeMs(pub i64);

impl TimeMs {
    pub fn offset_by(self, ms: i64) -> TimeMs {
        TimeMs(self.0 + ms)
    }

    /// Signed delta `self - earlier` in milliseconds.
    pub fn since(self, earlier: TimeMs) -> i64 {
        self.0 - earlier.0
    }

    /// Absolute distance to `other` in milliseconds.
    pub fn abs_diff(self, other: TimeMs) -> i64 {
        (self.0 - other.0).abs()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimeSpan {
    pub start: TimeMs,
    pub end: TimeMs,
}

impl TimeSpan {
    pub fn new(start: TimeMs, end: TimeMs) -> Self {
        Self { start, end }
    }

    pub fn instant(t: TimeMs) -> Self {
        Self { start: t, end: t }
    }

    pub fn duration_ms(&self) -> i64 {
        (self.end.0 - self.start.0).max(0)
    }

    pub fn contains(&self, t: TimeMs) -> bool {
        t >= self.start && t <= self.end
    }

    /// Instant at `fraction` of the span (clamped to [0, 1]).
    pub fn at_fraction(&self, fraction: f64) -> TimeMs {
        let f = fraction.clamp(0.0, 1.0);
        TimeMs(self.start.0 + (self.duration_ms() as f64 * f).round() as i64)
    }
}
