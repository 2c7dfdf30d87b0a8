use foundation::time::TimeMs;

/// Why playback terminated.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The clock reached the end of the global window.
    ReachedEndTime,
    /// A track passed within the finish gate's proximity radius.
    ReachedFinishGate,
    /// A track's synced series was exhausted (no finish gate set).
    OutOfData,
}

/// Playback status codes.
///
/// Collaborators match on the code; the user-facing wording exists only in
/// [`PlaybackStatus::text`], at the presentation boundary.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaybackStatus {
    Started,
    Stopped,
    Reset,
    Complete(StopReason),
    NoData,
}

impl PlaybackStatus {
    pub fn text(&self) -> &'static str {
        match self {
            PlaybackStatus::Started => "Animation started",
            PlaybackStatus::Stopped => "Animation stopped",
            PlaybackStatus::Reset => "Animation reset to start",
            PlaybackStatus::Complete(StopReason::ReachedEndTime) => {
                "Animation complete: reached end time"
            }
            PlaybackStatus::Complete(StopReason::ReachedFinishGate) => {
                "Animation complete: reached finish"
            }
            PlaybackStatus::Complete(StopReason::OutOfData) => {
                "Animation complete: ran out of data"
            }
            PlaybackStatus::NoData => "No data to animate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    pub at: TimeMs,
    pub status: PlaybackStatus,
}

/// Collects status events for the surrounding UI to drain once per frame.
#[derive(Debug, Default)]
pub struct StatusBus {
    events: Vec<StatusEvent>,
}

impl StatusBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, at: TimeMs, status: PlaybackStatus) {
        self.events.push(StatusEvent { at, status });
    }

    pub fn events(&self) -> &[StatusEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<StatusEvent> {
        std::mem::take(&mut self.events)
    }
}
