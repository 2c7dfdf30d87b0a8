use course::TrackSet;
use foundation::math::{GeoPoint, distance, stable_total_cmp_f64};

use crate::reference::{ReferencePoint, ReferenceSelection};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FlagKind {
    Start,
    Finish,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    /// A pick further than this from every visible sample places nothing.
    pub max_distance_m: f64,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            max_distance_m: 50.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    /// A flag snapped onto a track; the caller must re-synchronize before
    /// the next tick or metric computation reads the selection.
    Placed {
        kind: FlagKind,
        track: usize,
        sample: usize,
    },
    /// The pick position was not near any visible track; the picker disarms.
    NoTrackNearby,
    /// The picker was not armed; the event is for someone else.
    Inactive,
}

/// Flag placement over an explicit pointer-event interface.
///
/// The surrounding UI projects pointer positions into geographic space
/// (hit-testing stays external) and feeds them here. Arming selects which
/// flag the next pointer-up places; `cancel` is the explicit way out of an
/// in-progress pick (there is no timeout).
#[derive(Debug, Default)]
pub struct FlagPicker {
    options: PickOptions,
    armed: Option<FlagKind>,
    hover: Option<GeoPoint>,
}

impl FlagPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: PickOptions) -> Self {
        Self {
            options,
            armed: None,
            hover: None,
        }
    }

    /// Arms the picker: the next pointer-up places this flag.
    pub fn arm(&mut self, kind: FlagKind) {
        self.armed = Some(kind);
    }

    pub fn armed(&self) -> Option<FlagKind> {
        self.armed
    }

    /// Explicitly abandons an in-progress pick; the selection is untouched.
    pub fn cancel(&mut self) {
        self.armed = None;
        self.hover = None;
    }

    pub fn on_pointer_down(&mut self, at: GeoPoint) {
        if self.armed.is_some() {
            self.hover = Some(at);
        }
    }

    /// Tracks the pick position while armed, for ghost-flag rendering.
    pub fn on_pointer_move(&mut self, at: GeoPoint) {
        if self.armed.is_some() {
            self.hover = Some(at);
        }
    }

    /// Position the external ghost-flag rendering should follow, if any.
    pub fn hover(&self) -> Option<GeoPoint> {
        self.hover
    }

    /// Completes a pick: snaps to the closest sample of the closest visible
    /// track within radius, then refines the index away from noisy boundary
    /// samples. Disarms whether or not a track was found.
    pub fn on_pointer_up(
        &mut self,
        tracks: &TrackSet,
        selection: &mut ReferenceSelection,
        at: GeoPoint,
    ) -> PickOutcome {
        let Some(kind) = self.armed else {
            return PickOutcome::Inactive;
        };
        self.armed = None;
        self.hover = None;

        let mut best: Option<(usize, usize, f64)> = None;
        for (i, track) in tracks.visible() {
            let Some(sample_index) = track.find_closest_sample(at) else {
                continue;
            };
            let d = distance(at, track.samples()[sample_index].point);
            if d > self.options.max_distance_m {
                continue;
            }
            let closer = match best {
                None => true,
                Some((_, _, bd)) => stable_total_cmp_f64(d, bd).is_lt(),
            };
            if closer {
                best = Some((i, sample_index, d));
            }
        }

        let Some((track_index, sample_index, _)) = best else {
            return PickOutcome::NoTrackNearby;
        };

        let refined = match tracks.get(track_index) {
            Some(track) => track.find_optimal_animation_point(sample_index),
            None => sample_index,
        };

        let point = ReferencePoint::Snapped {
            track: track_index,
            sample: refined,
        };
        match kind {
            FlagKind::Start => selection.start = Some(point),
            FlagKind::Finish => selection.finish = Some(point),
        }

        PickOutcome::Placed {
            kind,
            track: track_index,
            sample: refined,
        }
    }
}
