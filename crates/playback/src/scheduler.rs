use course::TrackSet;
use foundation::math::{distance, GeoPoint};
use foundation::time::TimeMs;

use crate::clock::AnimationClock;
use crate::status::{PlaybackStatus, StatusBus, StopReason};

/// Cap on per-frame wall-clock elapsed time, so a stalled frame cannot make
/// the clock jump.
pub const MAX_FRAME_STEP_MS: i64 = 100;

/// A track within this flat-earth distance of the finish gate ends the run.
pub const FINISH_PROXIMITY_M: f64 = 10.0;

/// Optional collaborator notified whenever the clock commits a new current
/// time (timeline slider, marker layer). Resolved once at construction.
pub trait TickObserver {
    fn on_tick(&mut self, current: TimeMs);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; nothing happened.
    Idle,
    /// Clock advanced; playback continues.
    Advanced,
    /// A termination condition fired; playback stopped.
    Completed(StopReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// No global window: synchronization has not run.
    NoWindow,
    /// No visible track has a synced series.
    NoData,
}

impl std::fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackError::NoWindow => write!(f, "no time window; synchronize before playing"),
            PlaybackError::NoData => write!(f, "no visible track with synced samples"),
        }
    }
}

impl std::error::Error for PlaybackError {}

/// Advances the shared clock frame-by-frame and evaluates termination
/// conditions each tick.
///
/// Single-threaded and cooperative: the caller invokes [`tick`] once per
/// animation frame, and each tick runs to completion. Any operation that
/// invalidates synced series must be followed by re-synchronization before
/// the next tick (ordering, not locking, is the correctness model).
///
/// [`tick`]: PlaybackScheduler::tick
pub struct PlaybackScheduler {
    clock: AnimationClock,
    finish_gate: Option<GeoPoint>,
    observer: Option<Box<dyn TickObserver>>,
}

impl PlaybackScheduler {
    pub fn new() -> Self {
        Self {
            clock: AnimationClock::new(),
            finish_gate: None,
            observer: None,
        }
    }

    pub fn with_observer(observer: Box<dyn TickObserver>) -> Self {
        Self {
            clock: AnimationClock::new(),
            finish_gate: None,
            observer: Some(observer),
        }
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    /// The synchronizer writes the window through this.
    pub fn clock_mut(&mut self) -> &mut AnimationClock {
        &mut self.clock
    }

    /// Sets (or clears) the finish-gate position checked on every tick.
    pub fn set_finish_gate(&mut self, gate: Option<GeoPoint>) {
        self.finish_gate = gate;
    }

    pub fn set_speed(&mut self, multiplier: f64) {
        self.clock.speed = multiplier;
    }

    /// Begins playback from the window start.
    ///
    /// Re-running synchronization first is the caller's responsibility and
    /// is mandatory before play; this only verifies the results exist.
    pub fn start(
        &mut self,
        tracks: &TrackSet,
        now: TimeMs,
        bus: &mut StatusBus,
    ) -> Result<(), PlaybackError> {
        let Some(window) = self.clock.window() else {
            return Err(PlaybackError::NoWindow);
        };
        let has_data = tracks.visible().any(|(_, t)| !t.synced().is_empty());
        if !has_data {
            bus.emit(now, PlaybackStatus::NoData);
            return Err(PlaybackError::NoData);
        }

        self.clock.current = Some(window.start);
        self.clock.playing = true;
        self.clock.last_tick = Some(now);
        bus.emit(now, PlaybackStatus::Started);
        Ok(())
    }

    /// One cooperative tick at wall-clock `now`.
    ///
    /// Termination conditions, in order:
    /// 1. candidate time reaches the window end (clamped to it);
    /// 2. with a finish gate: any visible track's time-nearest synced sample
    ///    lies within [`FINISH_PROXIMITY_M`] of the gate;
    /// 3. without a gate: any visible track's synced series is exhausted;
    /// 4. otherwise the candidate time is committed and playback continues.
    pub fn tick(&mut self, tracks: &TrackSet, now: TimeMs, bus: &mut StatusBus) -> TickOutcome {
        if !self.clock.playing {
            return TickOutcome::Idle;
        }
        let (Some(current), Some(end)) = (self.clock.current, self.clock.end) else {
            // Playing without a populated clock is a state bug; fail safe.
            self.clock.playing = false;
            bus.emit(now, PlaybackStatus::Stopped);
            return TickOutcome::Idle;
        };

        let last = self.clock.last_tick.unwrap_or(now);
        let raw_step = now.since(last).clamp(0, MAX_FRAME_STEP_MS);
        let elapsed = (raw_step as f64 * self.clock.speed).round() as i64;
        self.clock.last_tick = Some(now);

        let candidate = current.offset_by(elapsed);

        if candidate >= end {
            self.commit(end);
            return self.complete(now, StopReason::ReachedEndTime, bus);
        }

        if let Some(gate) = self.finish_gate {
            for (_, track) in tracks.visible() {
                let Some(idx) = track.synced_index_at(candidate) else {
                    continue;
                };
                if distance(track.synced()[idx].point, gate) < FINISH_PROXIMITY_M {
                    self.commit(candidate);
                    return self.complete(now, StopReason::ReachedFinishGate, bus);
                }
            }
        } else {
            for (_, track) in tracks.visible() {
                let Some(last_synced) = track.synced().last() else {
                    continue;
                };
                if last_synced.time <= candidate {
                    self.commit(candidate);
                    return self.complete(now, StopReason::OutOfData, bus);
                }
            }
        }

        self.commit(candidate);
        TickOutcome::Advanced
    }

    /// Idempotent stop.
    pub fn stop(&mut self, now: TimeMs, bus: &mut StatusBus) {
        if self.clock.playing {
            self.clock.playing = false;
            bus.emit(now, PlaybackStatus::Stopped);
        }
    }

    /// Stop and rewind to the window start.
    pub fn reset(&mut self, now: TimeMs, bus: &mut StatusBus) {
        self.stop(now, bus);
        if let Some(start) = self.clock.start {
            self.commit(start);
        }
        bus.emit(now, PlaybackStatus::Reset);
    }

    /// Scrub to `percent` (0..100) of the window without touching `playing`.
    pub fn seek(&mut self, percent: f64) {
        if let Some(window) = self.clock.window() {
            self.commit(window.at_fraction(percent / 100.0));
        }
    }

    fn commit(&mut self, time: TimeMs) {
        self.clock.current = Some(time);
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.on_tick(time);
        }
    }

    fn complete(&mut self, now: TimeMs, reason: StopReason, bus: &mut StatusBus) -> TickOutcome {
        self.clock.playing = false;
        bus.emit(now, PlaybackStatus::Complete(reason));
        TickOutcome::Completed(reason)
    }
}

impl Default for PlaybackScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{PlaybackError, PlaybackScheduler, TickOutcome};
    use crate::status::{PlaybackStatus, StatusBus, StopReason};
    use course::ingest::{track_from_records, RawSample};
    use course::{SyncedSample, TrackSet};
    use foundation::math::GeoPoint;
    use foundation::time::{TimeMs, TimeSpan};

    /// A northward track sampled every second, synced onto its own times.
    fn synced_set(n: usize) -> TrackSet {
        let records: Vec<RawSample> = (0..n)
            .map(|i| RawSample {
                time_ms: i as i64 * 1000,
                lon_deg: 0.0,
                lat_deg: i as f64 * 0.001,
                alt_m: 0.0,
            })
            .collect();
        let mut track = track_from_records("t", &records).expect("valid");
        let synced = track
            .samples()
            .iter()
            .map(|s| SyncedSample::new(s.time, s.point))
            .collect();
        track.set_synced(synced);

        let mut set = TrackSet::new();
        set.add(track);
        set
    }

    fn started(set: &TrackSet, end_ms: i64) -> (PlaybackScheduler, StatusBus) {
        let mut scheduler = PlaybackScheduler::new();
        scheduler
            .clock_mut()
            .set_window(TimeSpan::new(TimeMs(0), TimeMs(end_ms)));
        let mut bus = StatusBus::new();
        scheduler.start(set, TimeMs(0), &mut bus).expect("starts");
        (scheduler, bus)
    }

    #[test]
    fn start_requires_window_and_data() {
        let mut scheduler = PlaybackScheduler::new();
        let mut bus = StatusBus::new();
        let set = synced_set(3);
        assert_eq!(
            scheduler.start(&set, TimeMs(0), &mut bus).unwrap_err(),
            PlaybackError::NoWindow
        );

        scheduler
            .clock_mut()
            .set_window(TimeSpan::new(TimeMs(0), TimeMs(10_000)));
        let empty = TrackSet::new();
        assert_eq!(
            scheduler.start(&empty, TimeMs(0), &mut bus).unwrap_err(),
            PlaybackError::NoData
        );
        assert_eq!(bus.events().last().unwrap().status, PlaybackStatus::NoData);
    }

    #[test]
    fn hundred_ms_ticks_reach_the_end_exactly() {
        // Window of 10 s; a long track so out-of-data never fires first.
        let set = synced_set(120);
        let (mut scheduler, mut bus) = started(&set, 10_000);

        let mut completed_at = None;
        for i in 1..=101 {
            let now = TimeMs(i * 100);
            match scheduler.tick(&set, now, &mut bus) {
                TickOutcome::Advanced => {
                    assert!(scheduler.clock().current.unwrap() < TimeMs(10_000));
                }
                TickOutcome::Completed(reason) => {
                    assert_eq!(reason, StopReason::ReachedEndTime);
                    completed_at = Some(i);
                    break;
                }
                TickOutcome::Idle => panic!("scheduler went idle mid-run"),
            }
        }
        assert!(completed_at.is_some());
        assert_eq!(scheduler.clock().current, Some(TimeMs(10_000)));
        assert!(!scheduler.clock().playing);
        // Further ticks are no-ops.
        assert_eq!(
            scheduler.tick(&set, TimeMs(99_999), &mut bus),
            TickOutcome::Idle
        );
    }

    #[test]
    fn elapsed_wall_time_is_capped() {
        let set = synced_set(120);
        let (mut scheduler, mut bus) = started(&set, 60_000);
        // A 5-second stall still advances the clock by at most 100 ms.
        scheduler.tick(&set, TimeMs(5_000), &mut bus);
        assert_eq!(scheduler.clock().current, Some(TimeMs(100)));
    }

    #[test]
    fn speed_multiplier_scales_the_step() {
        let set = synced_set(120);
        let (mut scheduler, mut bus) = started(&set, 60_000);
        scheduler.set_speed(4.0);
        scheduler.tick(&set, TimeMs(100), &mut bus);
        assert_eq!(scheduler.clock().current, Some(TimeMs(400)));
    }

    #[test]
    fn finish_gate_stops_playback() {
        let set = synced_set(60);
        let (mut scheduler, mut bus) = started(&set, 59_000);
        // Gate on the sample the track reaches at t = 2 s.
        let gate = set.get(0).unwrap().samples()[2].point;
        scheduler.set_finish_gate(Some(gate));

        let mut outcome = TickOutcome::Advanced;
        let mut now = 0;
        while outcome == TickOutcome::Advanced {
            now += 100;
            outcome = scheduler.tick(&set, TimeMs(now), &mut bus);
        }
        assert_eq!(outcome, TickOutcome::Completed(StopReason::ReachedFinishGate));
        // The nearest synced sample snaps to the gate well before the window
        // end; samples a second apart sit ~110 m apart, far outside the
        // proximity radius, so only the gate sample triggers.
        assert!(scheduler.clock().current.unwrap() < TimeMs(4_000));
    }

    #[test]
    fn exhausted_series_stops_without_a_gate() {
        // 3-sample track ends at t = 2 s, window runs to 10 s.
        let set = synced_set(3);
        let (mut scheduler, mut bus) = started(&set, 10_000);

        let mut outcome = TickOutcome::Advanced;
        let mut now = 0;
        while outcome == TickOutcome::Advanced {
            now += 100;
            outcome = scheduler.tick(&set, TimeMs(now), &mut bus);
        }
        assert_eq!(outcome, TickOutcome::Completed(StopReason::OutOfData));
        assert_eq!(
            bus.events().last().unwrap().status.text(),
            "Animation complete: ran out of data"
        );
    }

    #[test]
    fn seek_positions_without_playing() {
        let mut scheduler = PlaybackScheduler::new();
        scheduler
            .clock_mut()
            .set_window(TimeSpan::new(TimeMs(0), TimeMs(20_000)));
        scheduler.seek(25.0);
        assert_eq!(scheduler.clock().current, Some(TimeMs(5_000)));
        assert!(!scheduler.clock().playing);
    }

    #[test]
    fn observer_sees_every_committed_time() {
        use std::cell::RefCell;
        use std::rc::Rc;

        struct Recorder(Rc<RefCell<Vec<TimeMs>>>);
        impl super::TickObserver for Recorder {
            fn on_tick(&mut self, current: TimeMs) {
                self.0.borrow_mut().push(current);
            }
        }

        let seen = Rc::new(RefCell::new(Vec::new()));
        let set = synced_set(120);
        let mut scheduler = PlaybackScheduler::with_observer(Box::new(Recorder(seen.clone())));
        scheduler
            .clock_mut()
            .set_window(TimeSpan::new(TimeMs(0), TimeMs(60_000)));
        let mut bus = StatusBus::new();
        scheduler.start(&set, TimeMs(0), &mut bus).expect("starts");

        scheduler.tick(&set, TimeMs(100), &mut bus);
        scheduler.tick(&set, TimeMs(200), &mut bus);
        scheduler.seek(50.0);

        assert_eq!(
            *seen.borrow(),
            vec![TimeMs(100), TimeMs(200), TimeMs(30_000)]
        );
    }

    #[test]
    fn reset_rewinds_to_start() {
        let set = synced_set(120);
        let (mut scheduler, mut bus) = started(&set, 30_000);
        scheduler.tick(&set, TimeMs(100), &mut bus);
        scheduler.reset(TimeMs(200), &mut bus);
        assert_eq!(scheduler.clock().current, Some(TimeMs(0)));
        assert!(!scheduler.clock().playing);
        // stop() inside reset() already ran; a second stop is a no-op.
        let before = bus.events().len();
        scheduler.stop(TimeMs(300), &mut bus);
        assert_eq!(bus.events().len(), before);
    }
}
