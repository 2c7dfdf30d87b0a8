use foundation::math::GeoPoint;
use foundation::time::TimeMs;

/// One recorded (time, position) pair. Immutable once recorded.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sample {
    pub time: TimeMs,
    pub point: GeoPoint,
}

impl Sample {
    pub fn new(time: TimeMs, point: GeoPoint) -> Self {
        Self { time, point }
    }
}

/// A sample re-expressed on the shared global time axis.
///
/// The synchronizer shifts time only; the position is always the underlying
/// sample's position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SyncedSample {
    pub time: TimeMs,
    pub point: GeoPoint,
}

impl SyncedSample {
    pub fn new(time: TimeMs, point: GeoPoint) -> Self {
        Self { time, point }
    }
}
