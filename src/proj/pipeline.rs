//! Pipeline: the British National Grid <-> WGS84 transform chain.
//!
//! grid -> geodetic:  TM inverse (Airy 1830) -> cartesian -> Helmert -> geodetic (WGS84)
//! geodetic -> grid:  cartesian (WGS84) -> inverse Helmert -> geodetic (Airy 1830) -> TM forward
//!
//! Neither direction validates its input: out-of-domain coordinates produce
//! meaningless numbers, non-finite input produces non-finite output.

use crate::proj::cartesian;
use crate::proj::ellipsoid::{Ellipsoid, WGS84};
use crate::proj::grid::{ProjectedGrid, BRITISH_NATIONAL_GRID};
use crate::proj::helmert::{HelmertParameters, ETRS89_TO_OSGB36, OSGB36_TO_ETRS89};
use crate::proj::transverse_mercator::TransverseMercator;

/// Latitude/longitude in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeodeticPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeodeticPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Easting/northing in metres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPoint {
    pub easting: f64,
    pub northing: f64,
}

impl GridPoint {
    pub const fn new(easting: f64, northing: f64) -> Self {
        Self { easting, northing }
    }
}

/// Refinement stops once a correction drops below this (metres).
const REFINE_TOLERANCE: f64 = 1e-8;
const MAX_REFINEMENTS: usize = 5;

/// A grid paired with a geodetic datum and the Helmert sets linking their frames.
pub struct GridTransform {
    projection: TransverseMercator,
    geodetic: Ellipsoid,
    to_geodetic: HelmertParameters,
    to_grid: HelmertParameters,
}

impl GridTransform {
    pub fn new(
        grid: &ProjectedGrid,
        geodetic: Ellipsoid,
        to_geodetic: HelmertParameters,
        to_grid: HelmertParameters,
    ) -> Self {
        Self {
            projection: TransverseMercator::from_grid(grid),
            geodetic,
            to_geodetic,
            to_grid,
        }
    }

    /// British National Grid on Airy 1830 <-> WGS84.
    pub fn british_national_grid() -> Self {
        Self::new(
            &BRITISH_NATIONAL_GRID,
            WGS84,
            OSGB36_TO_ETRS89,
            ETRS89_TO_OSGB36,
        )
    }

    pub fn grid_to_geodetic(&self, point: GridPoint) -> GeodeticPoint {
        let (lon, lat) = self.projection.inverse(point.easting, point.northing);
        let local = cartesian::from_geodetic(self.projection.ellipsoid(), lon, lat);
        let shifted = self.to_geodetic.apply(&local);
        let (lon, lat) = cartesian::to_geodetic(&self.geodetic, &shifted);
        GeodeticPoint::new(lat.to_degrees(), lon.to_degrees())
    }

    /// Exact inverse of [`grid_to_geodetic`](Self::grid_to_geodetic) up to rounding.
    ///
    /// The straight chain is only a millimetre-level inverse: the reverse Helmert
    /// set is the negated forward set, and both directions assume zero height on
    /// their own ellipsoid. Its error is smooth and tiny, so the chain result is
    /// corrected by fixed-point iteration against the forward direction.
    pub fn geodetic_to_grid(&self, point: GeodeticPoint) -> GridPoint {
        let target = self.chain_to_grid(point);
        let mut estimate = target;

        for _ in 0..MAX_REFINEMENTS {
            let reprojected = self.chain_to_grid(self.grid_to_geodetic(estimate));
            let de = target.easting - reprojected.easting;
            let dn = target.northing - reprojected.northing;
            estimate.easting += de;
            estimate.northing += dn;
            if de.abs() < REFINE_TOLERANCE && dn.abs() < REFINE_TOLERANCE {
                break;
            }
        }

        estimate
    }

    fn chain_to_grid(&self, point: GeodeticPoint) -> GridPoint {
        let global = cartesian::from_geodetic(
            &self.geodetic,
            point.longitude.to_radians(),
            point.latitude.to_radians(),
        );
        let shifted = self.to_grid.apply(&global);
        let (lon, lat) = cartesian::to_geodetic(self.projection.ellipsoid(), &shifted);
        let (easting, northing) = self.projection.forward(lon, lat);
        GridPoint::new(easting, northing)
    }
}
