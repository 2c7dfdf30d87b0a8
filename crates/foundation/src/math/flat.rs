//! Flat-earth local approximation.
//!
//! Distances here are course-scale (kilometers, not continents), so degrees
//! of longitude/latitude map to meters through fixed per-degree factors, with
//! longitude scaled by the cosine of the mean latitude of the two points.
//! No geodesic library is warranted at this scale.

/// Meters per degree of latitude.
pub const METERS_PER_DEG_LAT: f64 = 110_540.0;
/// Meters per degree of longitude at the equator.
pub const METERS_PER_DEG_LON: f64 = 111_320.0;

/// Geographic position: degrees of longitude/latitude, meters of altitude.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub alt_m: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64, alt_m: f64) -> Self {
        Self {
            lon_deg,
            lat_deg,
            alt_m,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.lon_deg.is_finite() && self.lat_deg.is_finite() && self.alt_m.is_finite()
    }
}

/// Local east/north/up displacement from `a` to `b`, in meters.
pub fn displacement(a: GeoPoint, b: GeoPoint) -> [f64; 3] {
    let mean_lat_rad = ((a.lat_deg + b.lat_deg) / 2.0).to_radians();
    let east = (b.lon_deg - a.lon_deg) * METERS_PER_DEG_LON * mean_lat_rad.cos();
    let north = (b.lat_deg - a.lat_deg) * METERS_PER_DEG_LAT;
    let up = b.alt_m - a.alt_m;
    [east, north, up]
}

/// 3-D flat-earth distance in meters.
pub fn distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let [dx, dy, dz] = displacement(a, b);
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Component-wise linear interpolation, `frac` in [0, 1] at the caller's
/// discretion (values outside extrapolate).
pub fn lerp(a: GeoPoint, b: GeoPoint, frac: f64) -> GeoPoint {
    GeoPoint::new(
        a.lon_deg + (b.lon_deg - a.lon_deg) * frac,
        a.lat_deg + (b.lat_deg - a.lat_deg) * frac,
        a.alt_m + (b.alt_m - a.alt_m) * frac,
    )
}

#[cfg(test)]
mod tests {
    use super::{GeoPoint, METERS_PER_DEG_LAT, distance, displacement, lerp};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = GeoPoint::new(11.5, 47.2, 800.0);
        assert_eq!(distance(p, p), 0.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        let a = GeoPoint::new(0.0, 0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0, 0.0);
        assert_close(distance(a, b), METERS_PER_DEG_LAT, 1e-6);
    }

    #[test]
    fn longitude_shrinks_with_latitude() {
        let eq = distance(GeoPoint::new(0.0, 0.0, 0.0), GeoPoint::new(0.1, 0.0, 0.0));
        let north = distance(GeoPoint::new(0.0, 60.0, 0.0), GeoPoint::new(0.1, 60.0, 0.0));
        assert!(north < eq * 0.6);
    }

    #[test]
    fn vertical_only_displacement() {
        let a = GeoPoint::new(8.0, 46.0, 100.0);
        let b = GeoPoint::new(8.0, 46.0, 130.0);
        let [dx, dy, dz] = displacement(a, b);
        assert_eq!(dx, 0.0);
        assert_eq!(dy, 0.0);
        assert_eq!(dz, 30.0);
        assert_close(distance(a, b), 30.0, 1e-12);
    }

    #[test]
    fn lerp_midpoint() {
        let a = GeoPoint::new(0.0, 0.0, 0.0);
        let b = GeoPoint::new(2.0, 4.0, 100.0);
        let m = lerp(a, b, 0.5);
        assert_eq!(m, GeoPoint::new(1.0, 2.0, 50.0));
    }
}
