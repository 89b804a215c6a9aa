//! Seven-parameter Helmert datum shift between cartesian frames.
//!
//! Small-angle, position-vector convention:
//!   [x']   [tx]           [ 1  -rz  ry] [x]
//!   [y'] = [ty] + (1 + s) [ rz  1  -rx] [y]
//!   [z']   [tz]           [-ry  rx  1 ] [z]

use super::cartesian::CartesianPoint;

const ARC_SECONDS_TO_RADIANS: f64 = std::f64::consts::PI / (180.0 * 3600.0);

/// Translation in metres, rotation in arc-seconds, scale in parts per million.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HelmertParameters {
    pub tx: f64,
    pub ty: f64,
    pub tz: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
    pub s_ppm: f64,
}

impl HelmertParameters {
    /// The parameter set for the opposite direction (first-order inverse: every term negated).
    pub const fn inverse(&self) -> Self {
        Self {
            tx: -self.tx,
            ty: -self.ty,
            tz: -self.tz,
            rx: -self.rx,
            ry: -self.ry,
            rz: -self.rz,
            s_ppm: -self.s_ppm,
        }
    }

    pub fn apply(&self, p: &CartesianPoint) -> CartesianPoint {
        let rx = self.rx * ARC_SECONDS_TO_RADIANS;
        let ry = self.ry * ARC_SECONDS_TO_RADIANS;
        let rz = self.rz * ARC_SECONDS_TO_RADIANS;
        let scale = 1.0 + self.s_ppm * 1e-6;

        CartesianPoint {
            x: self.tx + scale * (p.x - rz * p.y + ry * p.z),
            y: self.ty + scale * (rz * p.x + p.y - rx * p.z),
            z: self.tz + scale * (-ry * p.x + rx * p.y + p.z),
        }
    }
}

/// OSGB36 (Airy 1830) -> ETRS89, which is taken as coincident with WGS84.
pub const OSGB36_TO_ETRS89: HelmertParameters = HelmertParameters {
    tx: 446.448,
    ty: -125.157,
    tz: 542.060,
    rx: 0.1502,
    ry: 0.2470,
    rz: 0.8421,
    s_ppm: -20.4894,
};

/// ETRS89 -> OSGB36 (Airy 1830).
pub const ETRS89_TO_OSGB36: HelmertParameters = OSGB36_TO_ETRS89.inverse();
