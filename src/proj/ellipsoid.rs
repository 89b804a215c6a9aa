/// Reference ellipsoid parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis (metres)
    pub a: f64,
    /// Semi-minor axis (metres)
    pub b: f64,
    /// Flattening: (a - b) / a
    pub f: f64,
    /// First eccentricity squared: (a² - b²) / a²
    pub e2: f64,
    /// Third flattening: (a - b) / (a + b)
    pub n: f64,
}

impl Ellipsoid {
    /// Build from semi-major axis and flattening.
    pub const fn new(a: f64, f: f64) -> Self {
        Self::from_axes(a, a * (1.0 - f))
    }

    /// Build from both semi-axes, the form the Ordnance Survey publishes Airy 1830 in.
    pub const fn from_axes(a: f64, b: f64) -> Self {
        let f = (a - b) / a;
        let e2 = (a * a - b * b) / (a * a);
        let n = (a - b) / (a + b);
        Self { a, b, f, e2, n }
    }

    /// First eccentricity (computed at runtime, `sqrt` is not const).
    pub fn eccentricity(&self) -> f64 {
        self.e2.sqrt()
    }
}

pub const WGS84: Ellipsoid = Ellipsoid::new(6_378_137.0, 1.0 / 298.257_223_563);
pub const AIRY1830: Ellipsoid = Ellipsoid::from_axes(6_377_563.396, 6_356_256.909);
