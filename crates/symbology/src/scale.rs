use crate::color::Color;

/// One stop of a value→color scale. `value` lives on the normalized [0, 1]
/// axis the legend produces.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub value: f64,
    pub color: Color,
}

impl ColorStop {
    pub fn new(value: f64, color: Color) -> Self {
        Self { value, color }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaleError {
    Empty,
    /// Stop values must be non-decreasing; `index` is the offending stop.
    Unordered { index: usize },
}

impl std::fmt::Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::Empty => write!(f, "color scale needs at least one stop"),
            ScaleError::Unordered { index } => {
                write!(f, "color scale stop {index} decreases in value")
            }
        }
    }
}

impl std::error::Error for ScaleError {}

/// Ordered value→color stops with piecewise-linear interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    stops: Vec<ColorStop>,
}

impl ColorScale {
    pub fn new(stops: Vec<ColorStop>) -> Result<Self, ScaleError> {
        if stops.is_empty() {
            return Err(ScaleError::Empty);
        }
        for (i, pair) in stops.windows(2).enumerate() {
            if pair[1].value < pair[0].value {
                return Err(ScaleError::Unordered { index: i + 1 });
            }
        }
        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Number of equal-width bands used by stepped rendering.
    pub fn band_count(&self) -> usize {
        self.stops.len() - 1
    }

    /// Color at normalized `v`.
    ///
    /// Clamps `v` to [0, 1]; a single-stop scale always returns its stop.
    /// Otherwise the first bracketing stop pair in order wins, with a
    /// zero-width bracket resolving to its low stop.
    pub fn interpolate(&self, v: f64) -> Color {
        let v = v.clamp(0.0, 1.0);
        if self.stops.len() == 1 {
            return self.stops[0].color;
        }
        if v <= self.stops[0].value {
            return self.stops[0].color;
        }
        let last = self.stops[self.stops.len() - 1];
        if v >= last.value {
            return last.color;
        }

        // v is strictly inside (first, last), so a bracketing pair exists;
        // take the first one in stop order.
        let mut bracket = 0;
        for i in 0..self.stops.len() - 1 {
            if v >= self.stops[i].value && v <= self.stops[i + 1].value {
                bracket = i;
                break;
            }
        }
        let lo = self.stops[bracket];
        let hi = self.stops[bracket + 1];
        let range = hi.value - lo.value;
        let frac = if range != 0.0 {
            ((v - lo.value) / range) as f32
        } else {
            0.0
        };
        lo.color.lerp(hi.color, frac)
    }

    // Built-in scales: stop colors as shipped in the source material.

    /// Red (slow) through yellow to green (fast).
    pub fn speed() -> Self {
        Self::from_stops(&[
            (0.0, Color::RED),
            (0.1, Color::rgb8(0xFF, 0x33, 0x00)),
            (0.2, Color::rgb8(0xFF, 0x66, 0x00)),
            (0.3, Color::rgb8(0xFF, 0x99, 0x00)),
            (0.4, Color::YELLOW),
            (0.5, Color::rgb8(0xCC, 0xFF, 0x00)),
            (0.6, Color::rgb8(0x99, 0xFF, 0x00)),
            (0.7, Color::rgb8(0x66, 0xFF, 0x00)),
            (0.8, Color::rgb8(0x33, 0xFF, 0x00)),
            (0.9, Color::rgb8(0x00, 0xFF, 0x00)),
            (1.0, Color::GREEN),
        ])
    }

    /// Red (braking) through white (steady) to green (accelerating).
    pub fn acceleration() -> Self {
        Self::from_stops(&[
            (0.0, Color::RED),
            (0.1, Color::rgb8(0xFF, 0x33, 0x00)),
            (0.2, Color::rgb8(0xFF, 0x66, 0x00)),
            (0.3, Color::rgb8(0xFF, 0x99, 0x00)),
            (0.4, Color::rgb8(0xFF, 0xCC, 0x00)),
            (0.5, Color::WHITE),
            (0.6, Color::rgb8(0xCC, 0xFF, 0xCC)),
            (0.7, Color::rgb8(0x99, 0xFF, 0x99)),
            (0.8, Color::rgb8(0x66, 0xFF, 0x66)),
            (0.9, Color::rgb8(0x33, 0xFF, 0x33)),
            (1.0, Color::GREEN),
        ])
    }

    /// White (level) deepening to red (far behind).
    pub fn time_difference() -> Self {
        Self::from_stops(&[
            (0.0, Color::WHITE),
            (0.1, Color::rgb8(0xFF, 0xEE, 0xEE)),
            (0.2, Color::rgb8(0xFF, 0xDD, 0xDD)),
            (0.3, Color::rgb8(0xFF, 0xCC, 0xCC)),
            (0.4, Color::rgb8(0xFF, 0xBB, 0xBB)),
            (0.5, Color::rgb8(0xFF, 0xAA, 0xAA)),
            (0.6, Color::rgb8(0xFF, 0x88, 0x88)),
            (0.7, Color::rgb8(0xFF, 0x66, 0x66)),
            (0.8, Color::rgb8(0xFF, 0x44, 0x44)),
            (0.9, Color::rgb8(0xFF, 0x22, 0x22)),
            (1.0, Color::RED),
        ])
    }

    /// Green (gaining) through white (neutral) to red (losing).
    pub fn lost_time() -> Self {
        Self::from_stops(&[
            (0.0, Color::rgb8(0x00, 0xAA, 0x00)),
            (0.1, Color::rgb8(0x22, 0xCC, 0x22)),
            (0.2, Color::rgb8(0x44, 0xDD, 0x44)),
            (0.3, Color::rgb8(0x88, 0xEE, 0xAA)),
            (0.4, Color::rgb8(0xCC, 0xFF, 0xCC)),
            (0.5, Color::WHITE),
            (0.6, Color::rgb8(0xFF, 0xDD, 0xDD)),
            (0.7, Color::rgb8(0xFF, 0xBB, 0xBB)),
            (0.8, Color::rgb8(0xFF, 0x88, 0x88)),
            (0.9, Color::rgb8(0xFF, 0x44, 0x44)),
            (1.0, Color::rgb8(0xCC, 0x00, 0x00)),
        ])
    }

    // Built-in stop lists are ordered by construction.
    fn from_stops(stops: &[(f64, Color)]) -> Self {
        Self {
            stops: stops
                .iter()
                .map(|&(value, color)| ColorStop::new(value, color))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, ColorScale, ColorStop, ScaleError};

    fn two_stop() -> ColorScale {
        ColorScale::new(vec![
            ColorStop::new(0.0, Color::rgb8(0, 0, 0)),
            ColorStop::new(1.0, Color::rgb8(255, 255, 255)),
        ])
        .expect("valid scale")
    }

    #[test]
    fn rejects_empty_and_unordered() {
        assert_eq!(ColorScale::new(Vec::new()).unwrap_err(), ScaleError::Empty);
        let err = ColorScale::new(vec![
            ColorStop::new(0.5, Color::WHITE),
            ColorStop::new(0.2, Color::RED),
        ])
        .unwrap_err();
        assert_eq!(err, ScaleError::Unordered { index: 1 });
    }

    #[test]
    fn endpoints_hit_extreme_stops() {
        let s = two_stop();
        assert_eq!(s.interpolate(0.0), s.stops()[0].color);
        assert_eq!(s.interpolate(1.0), s.stops()[1].color);
        // Out-of-range values clamp.
        assert_eq!(s.interpolate(-3.0), s.stops()[0].color);
        assert_eq!(s.interpolate(7.0), s.stops()[1].color);
    }

    #[test]
    fn single_stop_always_wins() {
        let s = ColorScale::new(vec![ColorStop::new(0.4, Color::RED)]).expect("valid");
        assert_eq!(s.interpolate(0.0), Color::RED);
        assert_eq!(s.interpolate(0.9), Color::RED);
    }

    #[test]
    fn zero_width_bracket_takes_low_stop() {
        let s = ColorScale::new(vec![
            ColorStop::new(0.0, Color::rgb8(0, 0, 0)),
            ColorStop::new(0.5, Color::RED),
            ColorStop::new(0.5, Color::GREEN),
            ColorStop::new(1.0, Color::WHITE),
        ])
        .expect("valid");
        assert_eq!(s.interpolate(0.5), Color::RED);
    }

    #[test]
    fn monotonic_between_stops() {
        let s = two_stop();
        let mut prev = -1.0f32;
        for i in 0..=10 {
            let c = s.interpolate(i as f64 / 10.0);
            assert!(c.r >= prev);
            prev = c.r;
        }
    }

    #[test]
    fn builtin_scales_have_eleven_stops() {
        for scale in [
            ColorScale::speed(),
            ColorScale::acceleration(),
            ColorScale::time_difference(),
            ColorScale::lost_time(),
        ] {
            assert_eq!(scale.stops().len(), 11);
            assert_eq!(scale.band_count(), 10);
            assert!((scale.stops()[0].value - 0.0).abs() < 1e-12);
            assert!((scale.stops()[10].value - 1.0).abs() < 1e-12);
        }
    }
}
