//! Series statistics backing legend auto-ranging.

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    let mut min = first;
    let mut max = first;
    for &v in values.iter().skip(1) {
        min = min.min(v);
        max = max.max(v);
    }
    Some((min, max))
}

/// Largest absolute value; the natural half-range for signed series
/// (acceleration, lost time) whose legends are symmetric around zero.
pub fn abs_max(values: &[f64]) -> Option<f64> {
    let (min, max) = min_max(values)?;
    Some(min.abs().max(max.abs()))
}
