//! Geocentric cartesian coordinates and their conversion to/from geodetic latitude/longitude.

use super::ellipsoid::Ellipsoid;

/// Earth-centred, earth-fixed position in metres relative to one ellipsoid's frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CartesianPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CartesianPoint {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

const MAX_ITERATIONS: usize = 10;
const LATITUDE_TOLERANCE: f64 = 1e-12; // radians, ~6 µm on the ground

/// Geodetic (lon_rad, lat_rad), ellipsoidal height 0 -> cartesian.
pub fn from_geodetic(ellipsoid: &Ellipsoid, lon: f64, lat: f64) -> CartesianPoint {
    from_geodetic_with_height(ellipsoid, lon, lat, 0.0)
}

/// Geodetic (lon_rad, lat_rad, height_m) -> cartesian.
pub fn from_geodetic_with_height(
    ellipsoid: &Ellipsoid,
    lon: f64,
    lat: f64,
    height: f64,
) -> CartesianPoint {
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();
    // Radius of curvature in the prime vertical
    let nu = ellipsoid.a / (1.0 - ellipsoid.e2 * sin_lat * sin_lat).sqrt();

    CartesianPoint {
        x: (nu + height) * cos_lat * cos_lon,
        y: (nu + height) * cos_lat * sin_lon,
        z: ((1.0 - ellipsoid.e2) * nu + height) * sin_lat,
    }
}

/// Cartesian -> geodetic (lon_rad, lat_rad). Height is discarded.
///
/// Fixed-point iteration on latitude, seeded with the spherical-height estimate.
pub fn to_geodetic(ellipsoid: &Ellipsoid, point: &CartesianPoint) -> (f64, f64) {
    let e2 = ellipsoid.e2;
    let p = point.x.hypot(point.y);
    let lon = point.y.atan2(point.x);

    let mut lat = point.z.atan2(p * (1.0 - e2));
    for _ in 0..MAX_ITERATIONS {
        let sin_lat = lat.sin();
        let nu = ellipsoid.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let next = (point.z + e2 * nu * sin_lat).atan2(p);
        let delta = (next - lat).abs();
        lat = next;
        if delta < LATITUDE_TOLERANCE {
            break;
        }
    }

    (lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proj::ellipsoid::{AIRY1830, WGS84};
    use approx::assert_relative_eq;

    #[test]
    fn test_equator_prime_meridian() {
        let c = from_geodetic(&WGS84, 0.0, 0.0);
        assert_relative_eq!(c.x, WGS84.a, epsilon = 1e-6);
        assert_relative_eq!(c.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(c.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_north_pole() {
        let c = from_geodetic(&WGS84, 0.0, std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(c.z, WGS84.b, epsilon = 1e-6);
        assert!(c.x.abs() < 1e-6);
    }

    #[test]
    fn test_os_worked_example() {
        // OS guide, worked example B.1: 52°39'27.2531"N 1°43'4.5177"E, H = 24.7 m on Airy 1830
        let lat = (52.0_f64 + 39.0 / 60.0 + 27.2531 / 3600.0).to_radians();
        let lon = (1.0_f64 + 43.0 / 60.0 + 4.5177 / 3600.0).to_radians();
        let c = from_geodetic_with_height(&AIRY1830, lon, lat, 24.7);
        assert_relative_eq!(c.x, 3_874_938.849, epsilon = 1e-3);
        assert_relative_eq!(c.y, 116_218.624, epsilon = 1e-3);
        assert_relative_eq!(c.z, 5_047_168.208, epsilon = 1e-3);
    }

    #[test]
    fn test_roundtrip() {
        for &(lon_deg, lat_deg) in &[(-2.0, 49.0), (1.7, 52.65), (-6.3, 58.2), (-179.0, -80.0)] {
            let lon = f64::to_radians(lon_deg);
            let lat = f64::to_radians(lat_deg);
            let c = from_geodetic(&AIRY1830, lon, lat);
            let (lon2, lat2) = to_geodetic(&AIRY1830, &c);
            assert_relative_eq!(lon2, lon, epsilon = 1e-12);
            assert_relative_eq!(lat2, lat, epsilon = 1e-11);
        }
    }

    #[test]
    fn test_non_finite_propagates() {
        let (lon, lat) = to_geodetic(&WGS84, &CartesianPoint::new(f64::NAN, 0.0, 1.0));
        assert!(lon.is_nan());
        assert!(lat.is_nan());
    }
}
