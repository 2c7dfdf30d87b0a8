use crate::track::Track;

/// Ordered collection of tracks. Insertion order is the track index space
/// reference points use; removal compacts indices, so callers holding
/// snapped references must clear them on removal.
#[derive(Debug, Default)]
pub struct TrackSet {
    tracks: Vec<Track>,
}

impl TrackSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, track: Track) -> usize {
        self.tracks.push(track);
        self.tracks.len() - 1
    }

    pub fn remove(&mut self, index: usize) -> Option<Track> {
        if index < self.tracks.len() {
            Some(self.tracks.remove(index))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Track> {
        self.tracks.get_mut(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Visible tracks with their indices, in insertion order.
    pub fn visible(&self) -> impl Iterator<Item = (usize, &Track)> {
        self.tracks.iter().enumerate().filter(|(_, t)| t.visible)
    }

    /// Index of the visible track with the most samples (first wins on ties).
    pub fn most_sampled_visible(&self) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (i, t) in self.visible() {
            if best.is_none_or(|(_, n)| t.len() > n) {
                best = Some((i, t.len()));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Index of the visible track with the shortest total duration, among
    /// tracks with at least two samples. Used as the window-end fallback.
    pub fn shortest_visible(&self) -> Option<usize> {
        let mut best: Option<(usize, i64)> = None;
        for (i, t) in self.visible() {
            if t.len() < 2 {
                continue;
            }
            let Some(duration) = t.duration_ms() else {
                continue;
            };
            if best.is_none_or(|(_, d)| duration < d) {
                best = Some((i, duration));
            }
        }
        best.map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::TrackSet;
    use crate::ingest::{track_from_records, RawSample};
    use crate::track::Track;

    fn track_with(n: usize, step_ms: i64) -> Track {
        let records: Vec<RawSample> = (0..n)
            .map(|i| RawSample {
                time_ms: i as i64 * step_ms,
                lon_deg: 0.0,
                lat_deg: i as f64 * 0.001,
                alt_m: 0.0,
            })
            .collect();
        track_from_records("t", &records).expect("valid")
    }

    #[test]
    fn visibility_gates_iteration() {
        let mut set = TrackSet::new();
        set.add(track_with(3, 1000));
        let hidden = set.add(track_with(5, 1000));
        set.get_mut(hidden).unwrap().visible = false;

        let visible: Vec<usize> = set.visible().map(|(i, _)| i).collect();
        assert_eq!(visible, vec![0]);
        assert_eq!(set.most_sampled_visible(), Some(0));
    }

    #[test]
    fn most_sampled_prefers_first_on_ties() {
        let mut set = TrackSet::new();
        set.add(track_with(4, 1000));
        set.add(track_with(4, 1000));
        assert_eq!(set.most_sampled_visible(), Some(0));
    }

    #[test]
    fn shortest_ignores_single_sample_tracks() {
        let mut set = TrackSet::new();
        set.add(track_with(1, 1000));
        set.add(track_with(10, 1000)); // 9 s
        set.add(track_with(4, 1000)); // 3 s
        assert_eq!(set.shortest_visible(), Some(2));
    }

    #[test]
    fn removal_compacts_indices() {
        let mut set = TrackSet::new();
        set.add(track_with(2, 1000));
        set.add(track_with(3, 1000));
        let removed = set.remove(0).expect("present");
        assert_eq!(removed.len(), 2);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0).unwrap().len(), 3);
        assert!(set.remove(5).is_none());
    }
}
