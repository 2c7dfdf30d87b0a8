use course::{SyncedSample, TrackSet};
use foundation::math::{GeoPoint, distance, stable_total_cmp_f64};
use foundation::time::{TimeMs, TimeSpan};
use playback::AnimationClock;

use crate::reference::{ReferencePoint, ReferenceSelection};

/// Minimum global window. A start/finish pair closer than this is extended
/// so playback is never instantaneous.
pub const MIN_WINDOW_MS: i64 = 5_000;

/// Window length used when no finish can be resolved at all.
pub const FALLBACK_WINDOW_MS: i64 = 10 * 60 * 1000;

/// The shared [start, end] range all tracks are compared within.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GlobalWindow {
    pub start: TimeMs,
    pub end: TimeMs,
}

impl GlobalWindow {
    pub fn span(&self) -> TimeSpan {
        TimeSpan::new(self.start, self.end)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Synchronized(GlobalWindow),
    /// Nothing to synchronize; state untouched.
    NoVisibleTracks,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The start reference names a track or sample that does not exist.
    ReferenceResolution,
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::ReferenceResolution => {
                write!(f, "no valid track/sample for the start reference")
            }
        }
    }
}

impl std::error::Error for SyncError {}

/// Establishes one global window and one synced series per visible track so
/// cross-track comparisons are meaningful.
///
/// Each track is shifted by a constant offset, never time-scaled, so a
/// track's internal pacing survives synchronization and relative speed
/// differences stay physically meaningful.
///
/// On [`SyncError`] the clock is untouched; prior playback state survives.
pub fn synchronize(
    tracks: &mut TrackSet,
    selection: &ReferenceSelection,
    clock: &mut AnimationClock,
) -> Result<SyncOutcome, SyncError> {
    if tracks.visible().next().is_none() {
        return Ok(SyncOutcome::NoVisibleTracks);
    }

    // 1. Start reference: explicit snap, free-coordinate resolution across
    //    all visible tracks, or the most-sampled visible track at index 0.
    let (start_track, start_index) = match selection.start {
        Some(reference) => {
            resolve_reference(tracks, reference).ok_or(SyncError::ReferenceResolution)?
        }
        None => {
            let track = tracks
                .most_sampled_visible()
                .ok_or(SyncError::ReferenceResolution)?;
            (track, 0)
        }
    };
    let start_sample = sample_at(tracks, start_track, start_index)
        .ok_or(SyncError::ReferenceResolution)?;
    let window_start = start_sample.time;
    let start_position = start_sample.point;

    // 2./3. Finish reference and window end, with the fallback chain:
    //    finish sample -> shortest visible track's end -> start + 10 min.
    let finish = selection.finish.and_then(|r| resolve_reference(tracks, r));
    let window_end = match finish {
        Some((track, index)) => match sample_at(tracks, track, index) {
            Some(sample) => sample.time,
            None => fallback_end(tracks, window_start),
        },
        None => match selection.finish {
            // A finish was requested but resolves nowhere.
            Some(_) => fallback_end(tracks, window_start),
            // No finish at all: the start reference track's last sample.
            None => tracks
                .get(start_track)
                .and_then(|t| t.end_time())
                .unwrap_or_else(|| fallback_end(tracks, window_start)),
        },
    };
    let window_end = enforce_minimum(window_start, window_end);
    let window = GlobalWindow {
        start: window_start,
        end: window_end,
    };

    // 4. Per-track constant offset: each track independently finds where it
    //    passes nearest the start position and shifts that onto the window
    //    start. Positions are never altered, only times.
    let visible: Vec<usize> = tracks.visible().map(|(i, _)| i).collect();
    for index in visible {
        let Some(track) = tracks.get_mut(index) else {
            continue;
        };
        let Some(local_start) = track.find_closest_sample(start_position) else {
            continue;
        };
        let offset = window_start.since(track.samples()[local_start].time);
        let series = track
            .samples()
            .iter()
            .map(|s| SyncedSample::new(s.time.offset_by(offset), s.point))
            .collect();
        track.set_synced(series);
    }

    // 5. Publish the window to the clock.
    clock.set_window(window.span());

    Ok(SyncOutcome::Synchronized(window))
}

/// Resolves a reference to a concrete (track, sample) pair. A free
/// coordinate snaps to the globally closest sample across visible tracks;
/// a snapped pair is validated against the current set.
pub fn resolve_reference(
    tracks: &TrackSet,
    reference: ReferencePoint,
) -> Option<(usize, usize)> {
    match reference {
        ReferencePoint::Snapped { track, sample } => {
            let t = tracks.get(track)?;
            if sample < t.len() {
                Some((track, sample))
            } else {
                None
            }
        }
        ReferencePoint::Free(point) => closest_across_visible(tracks, point),
    }
}

/// Globally closest sample to `point` across all visible tracks.
///
/// Ordering contract: distance ties keep the earliest track index (and the
/// first sample found within it).
pub fn closest_across_visible(tracks: &TrackSet, point: GeoPoint) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize, f64)> = None;
    for (i, track) in tracks.visible() {
        let Some(sample_index) = track.find_closest_sample(point) else {
            continue;
        };
        let d = distance(point, track.samples()[sample_index].point);
        let closer = match best {
            None => true,
            Some((_, _, bd)) => stable_total_cmp_f64(d, bd).is_lt(),
        };
        if closer {
            best = Some((i, sample_index, d));
        }
    }
    best.map(|(t, s, _)| (t, s))
}

fn sample_at(tracks: &TrackSet, track: usize, index: usize) -> Option<course::Sample> {
    tracks.get(track)?.samples().get(index).copied()
}

fn fallback_end(tracks: &TrackSet, start: TimeMs) -> TimeMs {
    if let Some(shortest) = tracks.shortest_visible()
        && let Some(end) = tracks.get(shortest).and_then(|t| t.end_time())
    {
        return end;
    }
    start.offset_by(FALLBACK_WINDOW_MS)
}

fn enforce_minimum(start: TimeMs, end: TimeMs) -> TimeMs {
    if end.since(start) < MIN_WINDOW_MS {
        start.offset_by(MIN_WINDOW_MS)
    } else {
        end
    }
}
