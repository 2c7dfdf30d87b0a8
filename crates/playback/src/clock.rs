use foundation::time::{TimeMs, TimeSpan};

/// Shared animation timebase.
///
/// Created empty, populated by a synchronization pass, advanced by the
/// scheduler every tick while playing. Intentionally small and plain so a
/// timeline UI can read it directly.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClock {
    pub current: Option<TimeMs>,
    pub start: Option<TimeMs>,
    pub end: Option<TimeMs>,
    /// Playback-rate multiplier applied to wall-clock deltas.
    pub speed: f64,
    pub playing: bool,
    pub last_tick: Option<TimeMs>,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self {
            current: None,
            start: None,
            end: None,
            speed: 1.0,
            playing: false,
            last_tick: None,
        }
    }

    pub fn window(&self) -> Option<TimeSpan> {
        Some(TimeSpan::new(self.start?, self.end?))
    }

    /// Installs the global window. `current` is only initialized when it was
    /// unset, so scrub position survives re-synchronization.
    pub fn set_window(&mut self, span: TimeSpan) {
        self.start = Some(span.start);
        self.end = Some(span.end);
        if self.current.is_none() {
            self.current = Some(span.start);
        }
    }

    /// Position of `current` inside the window as a [0, 1] fraction, for
    /// timeline-slider display.
    pub fn fraction(&self) -> Option<f64> {
        let window = self.window()?;
        let current = self.current?;
        let duration = window.duration_ms();
        if duration <= 0 {
            return None;
        }
        Some((current.since(window.start) as f64 / duration as f64).clamp(0.0, 1.0))
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new()
    }
}
