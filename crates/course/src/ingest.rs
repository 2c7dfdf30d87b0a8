//! Decoded-record ingestion boundary.
//!
//! Format parsing (KML and friends) happens upstream; this module accepts
//! already-decoded sample lists and turns them into [`Track`]s. Track ids
//! are content-derived so re-ingesting the same recording yields the same
//! id regardless of file name.

use serde::{Deserialize, Serialize};

use foundation::math::GeoPoint;
use foundation::time::TimeMs;

use crate::error::TrackError;
use crate::sample::Sample;
use crate::track::Track;

/// One decoded sample record as supplied by a loader.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    pub time_ms: i64,
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub alt_m: f64,
}

/// One decoded trajectory as supplied by a loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTrack {
    pub name: String,
    pub samples: Vec<RawSample>,
}

/// Content-derived track identity (blake3 over the usable records).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackId(String);

impl TrackId {
    pub fn from_raw(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn id_for_records(records: &[RawSample]) -> TrackId {
    let mut hasher = blake3::Hasher::new();
    for r in records {
        hasher.update(&r.time_ms.to_le_bytes());
        hasher.update(&r.lon_deg.to_le_bytes());
        hasher.update(&r.lat_deg.to_le_bytes());
        hasher.update(&r.alt_m.to_le_bytes());
    }
    TrackId(hasher.finalize().to_hex().to_string())
}

/// Builds a track from decoded records, dropping records with non-finite
/// coordinates. Fails only when no usable record remains.
pub fn track_from_records(
    name: impl Into<String>,
    records: &[RawSample],
) -> Result<Track, TrackError> {
    let usable: Vec<RawSample> = records
        .iter()
        .copied()
        .filter(|r| GeoPoint::new(r.lon_deg, r.lat_deg, r.alt_m).is_finite())
        .collect();
    if usable.is_empty() {
        return Err(TrackError::NoUsableSamples);
    }

    let id = id_for_records(&usable);
    let samples = usable
        .iter()
        .map(|r| {
            Sample::new(
                TimeMs(r.time_ms),
                GeoPoint::new(r.lon_deg, r.lat_deg, r.alt_m),
            )
        })
        .collect();
    Track::new(id, name, samples)
}

/// Result of a multi-track ingestion: tracks that loaded, and the ones that
/// were skipped with their reasons. A bad track never aborts the batch.
#[derive(Debug)]
pub struct IngestReport {
    pub tracks: Vec<Track>,
    pub skipped: Vec<(String, TrackError)>,
}

/// Decodes a JSON array of [`RawTrack`]s and ingests each.
pub fn tracks_from_json(json: &str) -> Result<IngestReport, TrackError> {
    let raw: Vec<RawTrack> =
        serde_json::from_str(json).map_err(|e| TrackError::Decode(e.to_string()))?;

    let mut report = IngestReport {
        tracks: Vec::new(),
        skipped: Vec::new(),
    };
    for rt in raw {
        match track_from_records(rt.name.clone(), &rt.samples) {
            Ok(track) => report.tracks.push(track),
            Err(e) => report.skipped.push((rt.name, e)),
        }
    }
    Ok(report)
}
