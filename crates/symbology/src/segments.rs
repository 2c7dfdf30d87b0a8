use crate::color::Color;
use crate::scale::ColorScale;

/// One renderable run of track samples: the inclusive index range
/// `[start, end]` drawn in `color`. Adjacent runs share their boundary
/// sample so the rendered polyline stays connected.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SegmentRun {
    pub start: usize,
    pub end: usize,
    pub color: Color,
}

impl SegmentRun {
    pub fn new(start: usize, end: usize, color: Color) -> Self {
        Self { start, end, color }
    }
}

/// Continuous coloring: one run per sample edge, colored by the edge's
/// average normalized value.
pub fn continuous_runs(scale: &ColorScale, normalized: &[f64]) -> Vec<SegmentRun> {
    if normalized.len() < 2 {
        return Vec::new();
    }
    let mut runs = Vec::with_capacity(normalized.len() - 1);
    for i in 0..normalized.len() - 1 {
        let avg = (normalized[i] + normalized[i + 1]) / 2.0;
        runs.push(SegmentRun::new(i, i + 1, scale.interpolate(avg)));
    }
    runs
}

/// Stepped coloring: samples bucketed into `band_count()` equal-width value
/// bands, one run per maximal contiguous same-band sequence. A run closes
/// when the band changes or the series ends; runs spanning no edge are not
/// emitted.
pub fn stepped_runs(scale: &ColorScale, normalized: &[f64]) -> Vec<SegmentRun> {
    if normalized.len() < 2 {
        return Vec::new();
    }

    let bands = scale.band_count();
    if bands == 0 {
        // Single-stop scale: the whole series is one run in that stop.
        return vec![SegmentRun::new(
            0,
            normalized.len() - 1,
            scale.stops()[0].color,
        )];
    }

    let band_of = |v: f64| -> usize {
        let clamped = v.clamp(0.0, 1.0);
        ((clamped * bands as f64) as usize).min(bands - 1)
    };

    let mut runs = Vec::new();
    let mut current_band = band_of(normalized[0]);
    let mut run_start = 0usize;
    for (i, &v) in normalized.iter().enumerate().skip(1) {
        let band = band_of(v);
        if band != current_band {
            runs.push(SegmentRun::new(
                run_start,
                i,
                scale.stops()[current_band].color,
            ));
            current_band = band;
            run_start = i;
        }
    }
    if run_start < normalized.len() - 1 {
        runs.push(SegmentRun::new(
            run_start,
            normalized.len() - 1,
            scale.stops()[current_band].color,
        ));
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::{continuous_runs, stepped_runs, SegmentRun};
    use crate::color::Color;
    use crate::scale::{ColorScale, ColorStop};

    fn three_stop() -> ColorScale {
        // Two bands: [0, 0.5) and [0.5, 1].
        ColorScale::new(vec![
            ColorStop::new(0.0, Color::RED),
            ColorStop::new(0.5, Color::WHITE),
            ColorStop::new(1.0, Color::GREEN),
        ])
        .expect("valid scale")
    }

    #[test]
    fn continuous_emits_one_run_per_edge() {
        let runs = continuous_runs(&three_stop(), &[0.0, 0.5, 1.0]);
        assert_eq!(runs.len(), 2);
        assert_eq!((runs[0].start, runs[0].end), (0, 1));
        assert_eq!((runs[1].start, runs[1].end), (1, 2));
        // Edge averages 0.25 and 0.75 land mid-bracket.
        assert_eq!(runs[0].color, Color::RED.lerp(Color::WHITE, 0.5));
        assert_eq!(runs[1].color, Color::WHITE.lerp(Color::GREEN, 0.5));
    }

    #[test]
    fn continuous_needs_an_edge() {
        assert!(continuous_runs(&three_stop(), &[0.3]).is_empty());
    }

    #[test]
    fn stepped_splits_at_band_boundary() {
        let runs = stepped_runs(&three_stop(), &[0.1, 0.2, 0.8, 0.9]);
        assert_eq!(
            runs,
            vec![
                SegmentRun::new(0, 2, Color::RED),
                SegmentRun::new(2, 3, Color::WHITE),
            ]
        );
    }

    #[test]
    fn stepped_single_band_is_one_run() {
        let runs = stepped_runs(&three_stop(), &[0.1, 0.2, 0.3, 0.4]);
        assert_eq!(runs, vec![SegmentRun::new(0, 3, Color::RED)]);
    }

    #[test]
    fn stepped_top_value_stays_in_last_band() {
        let runs = stepped_runs(&three_stop(), &[1.0, 1.0]);
        assert_eq!(runs, vec![SegmentRun::new(0, 1, Color::WHITE)]);
    }

    #[test]
    fn stepped_trailing_change_still_closes() {
        // Band changes on the final sample: the closing run spans one edge,
        // and no empty trailing run is emitted.
        let runs = stepped_runs(&three_stop(), &[0.1, 0.9]);
        assert_eq!(runs, vec![SegmentRun::new(0, 1, Color::RED)]);
    }
}
