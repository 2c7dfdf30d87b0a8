/// Local, recoverable track-level failures.
///
/// Nothing here is fatal to the process: a track that fails to ingest is
/// skipped, an operation that cannot run is a no-op reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackError {
    /// Ingestion produced no usable samples (all records rejected or empty).
    NoUsableSamples,
    /// The operation needs at least two samples.
    InsufficientSamples,
    /// `densify` was already applied to this track.
    AlreadyDensified,
    /// The decoded-record payload could not be deserialized.
    Decode(String),
}

impl std::fmt::Display for TrackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackError::NoUsableSamples => write!(f, "no usable samples in track"),
            TrackError::InsufficientSamples => write!(f, "track needs at least two samples"),
            TrackError::AlreadyDensified => write!(f, "track is already densified"),
            TrackError::Decode(msg) => write!(f, "track records malformed: {msg}"),
        }
    }
}

impl std::error::Error for TrackError {}
