use serde::{Deserialize, Serialize};

use course::{Track, TrackSet};
use foundation::math::{distance, stable_total_cmp_f64};
use timeline::ReferenceSelection;

use crate::legend::PipelineConfig;

/// Which scalar gets encoded onto the track segments.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricMode {
    None,
    Speed,
    Acceleration,
    TimeDifference,
    LostTime,
}

/// Per-track scalar output of one pipeline pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    /// The plotted scalar, one per sample index (raw units; the legend
    /// normalizes before color lookup).
    pub values: Vec<f64>,
    /// Signed nearest-neighbor time delta in seconds, retained for
    /// inspection/tooltips. Present in `LostTime` mode only.
    pub absolute_lost_time: Option<Vec<f64>>,
}

impl MetricSeries {
    fn plain(values: Vec<f64>) -> Self {
        Self {
            values,
            absolute_lost_time: None,
        }
    }
}

/// The reference track for comparative modes: the start-flag track when one
/// is snapped, else the most-sampled visible track.
pub fn reference_track(tracks: &TrackSet, selection: &ReferenceSelection) -> Option<usize> {
    if let Some(track) = selection.start_track()
        && track < tracks.len()
    {
        return Some(track);
    }
    tracks.most_sampled_visible()
}

/// Computes one scalar series per track for the configured metric mode.
///
/// The result is index-aligned with the track set. `None` marks tracks with
/// nothing to plot: invisible tracks, and in comparative modes the
/// reference track itself (drawn in its base color by the renderer) or
/// tracks without a synced series. Comparative modes require a prior
/// synchronization pass; this never runs one itself.
pub fn compute(
    tracks: &TrackSet,
    selection: &ReferenceSelection,
    config: &PipelineConfig,
) -> Vec<Option<MetricSeries>> {
    let mut out: Vec<Option<MetricSeries>> = (0..tracks.len()).map(|_| None).collect();

    match config.mode {
        MetricMode::None => {}
        MetricMode::Speed => {
            for (i, track) in tracks.visible() {
                let converted = track
                    .speed_mps()
                    .iter()
                    .map(|&v| config.speed_unit.convert(v))
                    .collect();
                out[i] = Some(MetricSeries::plain(converted));
            }
        }
        MetricMode::Acceleration => {
            for (i, track) in tracks.visible() {
                out[i] = Some(MetricSeries::plain(track.acceleration_mps2().to_vec()));
            }
        }
        MetricMode::TimeDifference => {
            let Some(reference) = comparative_reference(tracks, selection) else {
                return out;
            };
            for (i, track) in tracks.visible() {
                if i == reference.index || track.synced().is_empty() {
                    continue;
                }
                let deltas = nearest_neighbor_deltas(track, reference.track);
                out[i] = Some(MetricSeries::plain(
                    deltas.iter().map(|d| d.abs()).collect(),
                ));
            }
        }
        MetricMode::LostTime => {
            let Some(reference) = comparative_reference(tracks, selection) else {
                return out;
            };
            for (i, track) in tracks.visible() {
                if i == reference.index || track.synced().is_empty() {
                    continue;
                }
                let absolute = nearest_neighbor_deltas(track, reference.track);
                let mut derivative = Vec::with_capacity(absolute.len());
                derivative.push(0.0);
                for j in 1..absolute.len() {
                    derivative.push(absolute[j] - absolute[j - 1]);
                }
                out[i] = Some(MetricSeries {
                    values: derivative,
                    absolute_lost_time: Some(absolute),
                });
            }
        }
    }

    out
}

struct Reference<'a> {
    index: usize,
    track: &'a Track,
}

fn comparative_reference<'a>(
    tracks: &'a TrackSet,
    selection: &ReferenceSelection,
) -> Option<Reference<'a>> {
    let index = reference_track(tracks, selection)?;
    let track = tracks.get(index)?;
    if track.synced().is_empty() {
        return None;
    }
    Some(Reference { index, track })
}

/// For each of `track`'s synced samples, the signed time delta in seconds
/// against the spatially nearest synced sample of the reference track.
///
/// Deliberately a full scan per sample (spatial nearest neighbor, not
/// time-indexed): the tracks run the same course but pass any given point
/// at different times, which is exactly the signal being measured.
fn nearest_neighbor_deltas(track: &Track, reference: &Track) -> Vec<f64> {
    let mut deltas = Vec::with_capacity(track.synced().len());
    for sample in track.synced() {
        let mut best: Option<(usize, f64)> = None;
        for (k, ref_sample) in reference.synced().iter().enumerate() {
            let d = distance(sample.point, ref_sample.point);
            let closer = match best {
                None => true,
                Some((_, bd)) => stable_total_cmp_f64(d, bd).is_lt(),
            };
            if closer {
                best = Some((k, d));
            }
        }
        match best {
            Some((k, _)) => {
                let delta_ms = sample.time.since(reference.synced()[k].time);
                deltas.push(delta_ms as f64 / 1000.0);
            }
            None => deltas.push(0.0),
        }
    }
    deltas
}
