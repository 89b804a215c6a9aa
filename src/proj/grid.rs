//! Projected grid definitions.

use super::ellipsoid::{Ellipsoid, AIRY1830};

/// A Transverse Mercator grid: the ellipsoid it is cast on plus its origin and scale.
///
/// Angles are stored in degrees, as published; the projection converts once
/// at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedGrid {
    pub ellipsoid: Ellipsoid,
    /// Latitude of true origin (degrees)
    pub lat0: f64,
    /// Longitude of true origin / central meridian (degrees)
    pub lon0: f64,
    /// Easting of true origin (metres)
    pub false_easting: f64,
    /// Northing of true origin (metres)
    pub false_northing: f64,
    /// Scale factor on the central meridian
    pub k0: f64,
}

/// Ordnance Survey National Grid (OSGB36 / EPSG:27700).
pub const BRITISH_NATIONAL_GRID: ProjectedGrid = ProjectedGrid {
    ellipsoid: AIRY1830,
    lat0: 49.0,
    lon0: -2.0,
    false_easting: 400_000.0,
    false_northing: -100_000.0,
    k0: 0.999_601_271_7,
};
