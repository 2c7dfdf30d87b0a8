use serde::{Deserialize, Serialize};

use course::SpeedUnit;

use crate::pipeline::MetricMode;
use crate::statistics;

/// The [min, max] window scalar values are clamped into before being
/// normalized to [0, 1] for color lookup.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendRange {
    pub min: f64,
    pub max: f64,
}

impl LegendRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// The stock range for a metric mode, used until the user overrides it.
    pub fn default_for(mode: MetricMode) -> Self {
        match mode {
            MetricMode::None => Self::new(0.0, 1.0),
            MetricMode::Speed => Self::new(0.0, 25.0),
            MetricMode::Acceleration => Self::new(-15.0, 15.0),
            MetricMode::TimeDifference => Self::new(0.0, 10.0),
            MetricMode::LostTime => Self::new(-3.0, 3.0),
        }
    }

    /// Range fitted to an observed series: tight min/max for one-sided
    /// modes, symmetric around zero for signed ones.
    pub fn fit(mode: MetricMode, values: &[f64]) -> Option<Self> {
        match mode {
            MetricMode::Acceleration | MetricMode::LostTime => {
                let half = statistics::abs_max(values)?;
                Some(Self::new(-half, half))
            }
            _ => {
                let (min, max) = statistics::min_max(values)?;
                Some(Self::new(min, max))
            }
        }
    }

    /// Clamps `v` into the range and normalizes to [0, 1]. A degenerate
    /// range maps everything to 0.
    pub fn normalize(&self, v: f64) -> f64 {
        if self.max <= self.min {
            return 0.0;
        }
        ((v - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    pub fn normalize_series(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.normalize(v)).collect()
    }
}

/// The configuration surface collaborators supply (legend bounds, units,
/// rendering style, metric mode).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub mode: MetricMode,
    pub speed_unit: SpeedUnit,
    /// Continuous per-edge coloring, or stepped band runs.
    pub continuous_colors: bool,
    /// User override of the legend minimum; `None` keeps the mode default.
    pub legend_min: Option<f64>,
    /// User override of the legend maximum; `None` keeps the mode default.
    pub legend_max: Option<f64>,
}

impl PipelineConfig {
    /// The effective legend range: mode default with user overrides applied.
    pub fn legend_range(&self) -> LegendRange {
        let default = LegendRange::default_for(self.mode);
        LegendRange::new(
            self.legend_min.unwrap_or(default.min),
            self.legend_max.unwrap_or(default.max),
        )
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: MetricMode::Speed,
            speed_unit: SpeedUnit::default(),
            continuous_colors: true,
            legend_min: None,
            legend_max: None,
        }
    }
}
