use serde::{Deserialize, Serialize};

/// Display unit for speed values. Derived speeds are always stored in m/s;
/// conversion happens at the metric/legend boundary.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedUnit {
    Mph,
    Kph,
}

impl SpeedUnit {
    pub fn convert(self, meters_per_second: f64) -> f64 {
        match self {
            SpeedUnit::Mph => meters_per_second * 2.23694,
            SpeedUnit::Kph => meters_per_second * 3.6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SpeedUnit::Mph => "mph",
            SpeedUnit::Kph => "kph",
        }
    }
}

impl Default for SpeedUnit {
    fn default() -> Self {
        SpeedUnit::Mph
    }
}

#[cfg(test)]
mod tests {
    use super::SpeedUnit;

    #[test]
    fn converts_from_meters_per_second() {
        assert!((SpeedUnit::Mph.convert(10.0) - 22.3694).abs() < 1e-9);
        assert!((SpeedUnit::Kph.convert(10.0) - 36.0).abs() < 1e-9);
    }
}
