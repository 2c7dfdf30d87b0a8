use foundation::math::{GeoPoint, distance, lerp, stable_total_cmp_f64};
use foundation::time::TimeMs;

use crate::error::TrackError;
use crate::ingest::TrackId;
use crate::sample::{Sample, SyncedSample};
use crate::units::SpeedUnit;

/// One trajectory's time-ordered samples plus derived per-sample metrics.
///
/// Ownership contract:
/// - The track owns its samples exclusively. Derived arrays (`speed_mps`,
///   `acceleration_mps2`) are recomputed wholesale, never mutated in place
///   after a length change.
/// - `base_samples` holds the source numbers; elevation edits and the one
///   densification pass replay from it, so repeated edits never compound.
/// - The synced series is written by the synchronizer and cleared by any
///   operation that changes the underlying samples.
#[derive(Debug, Clone)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    pub visible: bool,
    samples: Vec<Sample>,
    base_samples: Vec<Sample>,
    speed_mps: Vec<f64>,
    acceleration_mps2: Vec<f64>,
    synced: Vec<SyncedSample>,
    densified: bool,
    elevation_offset_m: f64,
}

impl Track {
    /// Builds a track from decoded samples: sorts by time, derives metrics.
    ///
    /// Fails with [`TrackError::NoUsableSamples`] on an empty sample list;
    /// callers skip that track and continue with the rest.
    pub fn new(id: TrackId, name: impl Into<String>, mut samples: Vec<Sample>) -> Result<Self, TrackError> {
        if samples.is_empty() {
            return Err(TrackError::NoUsableSamples);
        }
        samples.sort_by_key(|s| s.time);

        let mut track = Self {
            id,
            name: name.into(),
            visible: true,
            base_samples: samples.clone(),
            samples,
            speed_mps: Vec::new(),
            acceleration_mps2: Vec::new(),
            synced: Vec::new(),
            densified: false,
            elevation_offset_m: 0.0,
        };
        track.derive_metrics();
        Ok(track)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn speed_mps(&self) -> &[f64] {
        &self.speed_mps
    }

    pub fn acceleration_mps2(&self) -> &[f64] {
        &self.acceleration_mps2
    }

    pub fn is_densified(&self) -> bool {
        self.densified
    }

    pub fn elevation_offset_m(&self) -> f64 {
        self.elevation_offset_m
    }

    pub fn start_time(&self) -> Option<TimeMs> {
        self.samples.first().map(|s| s.time)
    }

    pub fn end_time(&self) -> Option<TimeMs> {
        self.samples.last().map(|s| s.time)
    }

    /// Total recorded duration in milliseconds.
    pub fn duration_ms(&self) -> Option<i64> {
        Some(self.end_time()?.since(self.start_time()?))
    }

    /// The track's samples on the shared global time axis. Empty until a
    /// synchronization pass has run (or after any sample-changing edit).
    pub fn synced(&self) -> &[SyncedSample] {
        &self.synced
    }

    /// Installs a synced series. The series must be index-aligned with the
    /// current samples; a mismatched length is a synchronizer bug.
    pub fn set_synced(&mut self, series: Vec<SyncedSample>) {
        debug_assert_eq!(series.len(), self.samples.len());
        self.synced = series;
    }

    pub fn clear_synced(&mut self) {
        self.synced.clear();
    }

    /// Recomputes the per-sample speed and acceleration arrays.
    ///
    /// For i > 0, `speed[i]` is the flat-earth distance to the previous
    /// sample over the elapsed seconds; a non-positive time step repeats the
    /// previous value (0 if none yet). `speed[0]` copies `speed[1]`. The
    /// acceleration array applies the same rules to the speed array. Both
    /// arrays always match the sample count.
    pub fn derive_metrics(&mut self) {
        let n = self.samples.len();
        if n < 2 {
            self.speed_mps = vec![0.0; n];
            self.acceleration_mps2 = vec![0.0; n];
            return;
        }

        let mut speeds = Vec::with_capacity(n);
        for i in 1..n {
            let dt_ms = self.samples[i].time.since(self.samples[i - 1].time);
            if dt_ms > 0 {
                let dist = distance(self.samples[i - 1].point, self.samples[i].point);
                speeds.push(dist / (dt_ms as f64 / 1000.0));
            } else {
                speeds.push(speeds.last().copied().unwrap_or(0.0));
            }
        }
        speeds.insert(0, speeds[0]);

        let mut accels = Vec::with_capacity(n);
        for i in 1..n {
            let dt_ms = self.samples[i].time.since(self.samples[i - 1].time);
            if dt_ms > 0 {
                accels.push((speeds[i] - speeds[i - 1]) / (dt_ms as f64 / 1000.0));
            } else {
                accels.push(accels.last().copied().unwrap_or(0.0));
            }
        }
        accels.insert(0, accels[0]);

        self.speed_mps = speeds;
        self.acceleration_mps2 = accels;
    }

    /// One-shot densification: between every consecutive sample pair, insert
    /// exactly 5 evenly time-spaced samples, linear in time, position,
    /// speed and acceleration (fractions 1/6..5/6). Original samples are
    /// kept, so n samples become `1 + 6(n-1)`.
    ///
    /// Invalidates the synced series.
    pub fn densify(&mut self) -> Result<(), TrackError> {
        if self.densified {
            return Err(TrackError::AlreadyDensified);
        }
        let n = self.samples.len();
        if n < 2 {
            return Err(TrackError::InsufficientSamples);
        }

        let mut samples = Vec::with_capacity(1 + 6 * (n - 1));
        let mut speeds = Vec::with_capacity(samples.capacity());
        let mut accels = Vec::with_capacity(samples.capacity());

        samples.push(self.samples[0]);
        speeds.push(self.speed_mps[0]);
        accels.push(self.acceleration_mps2[0]);

        for i in 0..n - 1 {
            let a = self.samples[i];
            let b = self.samples[i + 1];
            let dt_ms = b.time.since(a.time);
            for j in 1..=5 {
                let frac = j as f64 / 6.0;
                let time = a.time.offset_by((dt_ms as f64 * frac).round() as i64);
                samples.push(Sample::new(time, lerp(a.point, b.point, frac)));
                speeds.push(self.speed_mps[i] + (self.speed_mps[i + 1] - self.speed_mps[i]) * frac);
                accels.push(
                    self.acceleration_mps2[i]
                        + (self.acceleration_mps2[i + 1] - self.acceleration_mps2[i]) * frac,
                );
            }
            samples.push(b);
            speeds.push(self.speed_mps[i + 1]);
            accels.push(self.acceleration_mps2[i + 1]);
        }

        // The baseline keeps source altitudes (offset removed) so later
        // elevation edits still replay from source numbers.
        let offset = self.elevation_offset_m;
        self.base_samples = samples
            .iter()
            .map(|s| {
                let mut p = s.point;
                p.alt_m -= offset;
                Sample::new(s.time, p)
            })
            .collect();

        self.samples = samples;
        self.speed_mps = speeds;
        self.acceleration_mps2 = accels;
        self.densified = true;
        self.synced.clear();
        Ok(())
    }

    /// Applies a uniform altitude offset, replaying from the baseline so
    /// repeated edits never compound. A uniform shift leaves the vertical
    /// deltas (and therefore the derived arrays) unchanged.
    ///
    /// Invalidates the synced series.
    pub fn set_elevation_offset(&mut self, meters: f64) {
        self.elevation_offset_m = meters;
        for (sample, base) in self.samples.iter_mut().zip(&self.base_samples) {
            sample.point.alt_m = base.point.alt_m + meters;
        }
        self.synced.clear();
    }

    /// Index of the sample closest to `point` by flat-earth 3-D distance.
    ///
    /// Ordering contract: ties keep the first index found.
    pub fn find_closest_sample(&self, point: GeoPoint) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, sample) in self.samples.iter().enumerate() {
            let d = distance(point, sample.point);
            if best.is_none_or(|(_, bd)| stable_total_cmp_f64(d, bd).is_lt()) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Refines a clicked index to a better anchor for animation, searching a
    /// window of `min(20, len/4)` samples around it. Candidates score:
    /// +100 for a valid timestamp (always, here), +50 for positive speed,
    /// +30 weighted toward the first tenth of the track, +20 weighted toward
    /// the clicked index. First-found best wins. This keeps a flag off noisy
    /// boundary samples.
    pub fn find_optimal_animation_point(&self, initial: usize) -> usize {
        let n = self.samples.len();
        if n < 2 || initial >= n {
            return initial;
        }
        let radius = 20.min(n / 4);
        if radius == 0 {
            return initial;
        }

        let lo = initial.saturating_sub(radius);
        let hi = (initial + radius).min(n - 1);

        let mut best_index = initial;
        let mut best_score = f64::NEG_INFINITY;
        for i in lo..=hi {
            let mut score = 100.0;
            if self.speed_mps[i] > 0.0 {
                score += 50.0;
            }
            let position_factor = 1.0 - (i as f64 / (n - 1) as f64 - 0.1).abs();
            score += 30.0 * position_factor;
            let proximity_factor = 1.0 - (i as f64 - initial as f64).abs() / radius as f64;
            score += 20.0 * proximity_factor;

            if score > best_score {
                best_score = score;
                best_index = i;
            }
        }
        best_index
    }

    /// Index of the synced sample nearest `time`. Linear scan; `None` until
    /// synchronized.
    pub fn synced_index_at(&self, time: TimeMs) -> Option<usize> {
        let mut best: Option<(usize, i64)> = None;
        for (i, s) in self.synced.iter().enumerate() {
            let diff = s.time.abs_diff(time);
            if best.is_none_or(|(_, bd)| diff < bd) {
                best = Some((i, diff));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Observed speed range in the requested unit, for legend auto-ranging.
    pub fn speed_range(&self, unit: SpeedUnit) -> Option<(f64, f64)> {
        min_max(self.speed_mps.iter().map(|&v| unit.convert(v)))
    }

    /// Observed acceleration range, for legend auto-ranging.
    pub fn acceleration_range(&self) -> Option<(f64, f64)> {
        min_max(self.acceleration_mps2.iter().copied())
    }

    /// Running flat-earth distance along the samples, plus the total.
    pub fn cumulative_distances(&self) -> (Vec<f64>, f64) {
        if self.samples.len() < 2 {
            return (vec![0.0; self.samples.len()], 0.0);
        }
        let mut out = Vec::with_capacity(self.samples.len());
        let mut so_far = 0.0;
        out.push(0.0);
        for pair in self.samples.windows(2) {
            so_far += distance(pair[0].point, pair[1].point);
            out.push(so_far);
        }
        (out, so_far)
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut out: Option<(f64, f64)> = None;
    for v in values {
        out = Some(match out {
            None => (v, v),
            Some((min, max)) => (min.min(v), max.max(v)),
        });
    }
    out
}
