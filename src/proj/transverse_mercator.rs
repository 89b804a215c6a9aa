//! Transverse Mercator projection: Krüger n-series, 6th order.
//!
//! Implements the Karney (2011) formulation with 6th-order α/β series coefficients.
//! Accurate to well under a millimetre across the whole British National Grid.

use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::grid::ProjectedGrid;

pub struct TransverseMercator {
    ellipsoid: Ellipsoid,
    lon0: f64,
    k0: f64,
    false_easting: f64,
    false_northing: f64,
    // Precomputed constants
    e: f64,          // first eccentricity
    a_hat: f64,      // A = a/(1+n) * (1 + n²/4 + n⁴/64)
    alpha: [f64; 6], // Forward series coefficients
    beta: [f64; 6],  // Inverse series coefficients
    m0: f64,         // Normalized meridional arc at lat0
}

impl TransverseMercator {
    /// Angles in radians.
    pub fn new(
        ellipsoid: Ellipsoid,
        lon0: f64,
        lat0: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let n = ellipsoid.n;
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        let n5 = n4 * n;
        let n6 = n5 * n;

        let a_hat = ellipsoid.a / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0);

        let alpha = Self::alpha_coefficients(n, n2, n3, n4, n5, n6);
        let beta = Self::beta_coefficients(n, n2, n3, n4, n5, n6);

        let m0 = Self::meridional_arc_normalized(lat0, n);

        Self {
            ellipsoid,
            lon0,
            k0,
            false_easting,
            false_northing,
            e: ellipsoid.eccentricity(),
            a_hat,
            alpha,
            beta,
            m0,
        }
    }

    /// Projection for a published grid definition.
    pub fn from_grid(grid: &ProjectedGrid) -> Self {
        Self::new(
            grid.ellipsoid,
            grid.lon0.to_radians(),
            grid.lat0.to_radians(),
            grid.k0,
            grid.false_easting,
            grid.false_northing,
        )
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// Forward series coefficients α₁..α₆ (Krüger, 6th order).
    fn alpha_coefficients(n: f64, n2: f64, n3: f64, n4: f64, n5: f64, n6: f64) -> [f64; 6] {
        [
            // α₁
            n / 2.0 - 2.0 / 3.0 * n2 + 5.0 / 16.0 * n3 + 41.0 / 180.0 * n4 - 127.0 / 288.0 * n5
                + 7891.0 / 37800.0 * n6,
            // α₂
            13.0 / 48.0 * n2 - 3.0 / 5.0 * n3 + 557.0 / 1440.0 * n4 + 281.0 / 630.0 * n5
                - 1983433.0 / 1935360.0 * n6,
            // α₃
            61.0 / 240.0 * n3 - 103.0 / 140.0 * n4
                + 15061.0 / 26880.0 * n5
                + 167603.0 / 181440.0 * n6,
            // α₄
            49561.0 / 161280.0 * n4 - 179.0 / 168.0 * n5 + 6601661.0 / 7257600.0 * n6,
            // α₅
            34729.0 / 80640.0 * n5 - 3418889.0 / 1995840.0 * n6,
            // α₆
            212378941.0 / 319334400.0 * n6,
        ]
    }

    /// Inverse series coefficients β₁..β₆ (Krüger, 6th order).
    fn beta_coefficients(n: f64, n2: f64, n3: f64, n4: f64, n5: f64, n6: f64) -> [f64; 6] {
        [
            // β₁
            n / 2.0 - 2.0 / 3.0 * n2 + 37.0 / 96.0 * n3 - 1.0 / 360.0 * n4 - 81.0 / 512.0 * n5
                + 96199.0 / 604800.0 * n6,
            // β₂
            1.0 / 48.0 * n2 + 1.0 / 15.0 * n3 - 437.0 / 1440.0 * n4 + 46.0 / 105.0 * n5
                - 1118711.0 / 3870720.0 * n6,
            // β₃
            17.0 / 480.0 * n3 - 37.0 / 840.0 * n4 - 209.0 / 4480.0 * n5 + 5569.0 / 90720.0 * n6,
            // β₄
            4397.0 / 161280.0 * n4 - 11.0 / 504.0 * n5 - 830251.0 / 7257600.0 * n6,
            // β₅
            4583.0 / 161280.0 * n5 - 108847.0 / 3991680.0 * n6,
            // β₆
            20648693.0 / 638668800.0 * n6,
        ]
    }

    /// Normalized meridional arc distance (ξ₀), i.e. the rectifying latitude of phi.
    fn meridional_arc_normalized(phi: f64, n: f64) -> f64 {
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;

        let a2 = -3.0 / 2.0 * n + 9.0 / 16.0 * n3;
        let a4 = 15.0 / 16.0 * n2 - 15.0 / 32.0 * n4;
        let a6 = -35.0 / 48.0 * n3;
        let a8 = 315.0 / 512.0 * n4;

        phi + a2 * (2.0 * phi).sin()
            + a4 * (4.0 * phi).sin()
            + a6 * (6.0 * phi).sin()
            + a8 * (8.0 * phi).sin()
    }

    /// Convert geodetic tangent τ to conformal tangent τ'.
    fn tau_to_tau_prime(&self, tau: f64) -> f64 {
        let e = self.e;
        let tau1 = (1.0 + tau * tau).sqrt(); // = sec(φ) = hypot(1, τ)
        let sigma = (e * (e * tau / tau1).atanh()).sinh();
        tau * (1.0 + sigma * sigma).sqrt() - sigma * tau1
    }

    /// Convert conformal tangent τ' back to geodetic tangent τ via Newton iteration.
    fn tau_prime_to_tau(&self, tau_prime: f64) -> f64 {
        let e2 = self.ellipsoid.e2;
        let mut tau = tau_prime; // initial guess

        for _ in 0..15 {
            let tau1 = (1.0 + tau * tau).sqrt();
            let sigma = (self.e * (self.e * tau / tau1).atanh()).sinh();
            let tau_prime_est = tau * (1.0 + sigma * sigma).sqrt() - sigma * tau1;
            let dtau = (tau_prime - tau_prime_est) * (1.0 + (1.0 - e2) * tau * tau)
                / ((1.0 - e2) * tau1 * (1.0 + tau_prime_est * tau_prime_est).sqrt());
            tau += dtau;
            if dtau.abs() < 1e-14 * (1.0 + tau.abs()) {
                break;
            }
        }
        tau
    }

    /// Forward: (lon_rad, lat_rad) -> (easting, northing)
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let dlam = lon - self.lon0;

        // Convert geodetic tangent to conformal tangent
        let tau = lat.tan();
        let tau_prime = self.tau_to_tau_prime(tau);

        // ξ' = atan2(τ', cos(Δλ))
        let xi_prime = tau_prime.atan2(dlam.cos());
        // η' = asinh(sin(Δλ) / hypot(τ', cos(Δλ)))
        let eta_prime = (dlam.sin() / tau_prime.hypot(dlam.cos())).asinh();

        // Apply α series (forward)
        let mut xi = xi_prime;
        let mut eta = eta_prime;
        for (j, &a) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            xi += a * (k * xi_prime).sin() * (k * eta_prime).cosh();
            eta += a * (k * xi_prime).cos() * (k * eta_prime).sinh();
        }

        let x = self.k0 * self.a_hat * eta + self.false_easting;
        let y = self.k0 * self.a_hat * (xi - self.m0) + self.false_northing;

        (x, y)
    }

    /// Inverse: (easting, northing) -> (lon_rad, lat_rad)
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let eta = (x - self.false_easting) / (self.k0 * self.a_hat);
        let xi = (y - self.false_northing) / (self.k0 * self.a_hat) + self.m0;

        // Apply β series (inverse)
        let mut xi_prime = xi;
        let mut eta_prime = eta;
        for (j, &b) in self.beta.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            xi_prime -= b * (k * xi).sin() * (k * eta).cosh();
            eta_prime -= b * (k * xi).cos() * (k * eta).sinh();
        }

        // τ' = sin(ξ') / hypot(sinh(η'), cos(ξ'))
        let sinh_eta = eta_prime.sinh();
        let cos_xi = xi_prime.cos();
        let sin_xi = xi_prime.sin();
        let tau_prime = sin_xi / sinh_eta.hypot(cos_xi);

        // Recover geodetic tangent τ from conformal tangent τ'
        let tau = self.tau_prime_to_tau(tau_prime);

        let lat = tau.atan();
        let lon = self.lon0 + sinh_eta.atan2(cos_xi);

        (lon, lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proj::grid::BRITISH_NATIONAL_GRID;
    use approx::assert_relative_eq;

    fn dms(deg: f64, min: f64, sec: f64) -> f64 {
        deg + min / 60.0 + sec / 3600.0
    }

    #[test]
    fn test_true_origin_maps_to_false_origin() {
        let tm = TransverseMercator::from_grid(&BRITISH_NATIONAL_GRID);
        let (e, n) = tm.forward((-2.0_f64).to_radians(), 49.0_f64.to_radians());
        assert_relative_eq!(e, 400_000.0, epsilon = 1e-6);
        assert_relative_eq!(n, -100_000.0, epsilon = 1e-4);
    }

    #[test]
    fn test_os_worked_example_forward() {
        // OS guide, worked example C.1: 52°39'27.2531"N 1°43'4.5177"E on Airy 1830
        let tm = TransverseMercator::from_grid(&BRITISH_NATIONAL_GRID);
        let lat = dms(52.0, 39.0, 27.2531).to_radians();
        let lon = dms(1.0, 43.0, 4.5177).to_radians();
        let (e, n) = tm.forward(lon, lat);
        assert_relative_eq!(e, 651_409.903, epsilon = 5e-3);
        assert_relative_eq!(n, 313_177.270, epsilon = 5e-3);
    }

    #[test]
    fn test_os_worked_example_inverse() {
        let tm = TransverseMercator::from_grid(&BRITISH_NATIONAL_GRID);
        let (lon, lat) = tm.inverse(651_409.903, 313_177.270);
        assert_relative_eq!(lat.to_degrees(), dms(52.0, 39.0, 27.2531), epsilon = 1e-7);
        assert_relative_eq!(lon.to_degrees(), dms(1.0, 43.0, 4.5177), epsilon = 1e-7);
    }

    #[test]
    fn test_roundtrip_across_grid() {
        let tm = TransverseMercator::from_grid(&BRITISH_NATIONAL_GRID);
        let cases: &[(f64, f64)] = &[
            (-2.0, 49.0), // true origin
            (-2.0, 55.0), // central meridian
            (-7.5, 50.0), // Scilly, far west
            (1.75, 52.6), // Norfolk, far east
            (-1.0, 60.8), // Shetland
            (-6.2, 57.5), // Skye
        ];
        for &(lon_deg, lat_deg) in cases {
            let lon = lon_deg.to_radians();
            let lat = lat_deg.to_radians();
            let (x, y) = tm.forward(lon, lat);
            let (lon2, lat2) = tm.inverse(x, y);
            assert_relative_eq!(lon2, lon, epsilon = 1e-12);
            assert_relative_eq!(lat2, lat, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_central_meridian_easting() {
        let tm = TransverseMercator::from_grid(&BRITISH_NATIONAL_GRID);
        let (e, _) = tm.forward((-2.0_f64).to_radians(), 54.0_f64.to_radians());
        assert_relative_eq!(e, 400_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_non_finite_input_propagates() {
        let tm = TransverseMercator::from_grid(&BRITISH_NATIONAL_GRID);
        let (e, n) = tm.forward(f64::NAN, 0.9);
        assert!(e.is_nan() && n.is_nan());
        let (lon, lat) = tm.inverse(f64::INFINITY, 300_000.0);
        assert!(!lon.is_finite() || !lat.is_finite());
    }
}
