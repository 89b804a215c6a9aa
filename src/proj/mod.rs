//! Ellipsoid and grid models plus the pure functions that move coordinates between them.

pub mod cartesian;
pub mod ellipsoid;
pub mod grid;
pub mod helmert;
pub mod pipeline;
pub mod transverse_mercator;

pub use pipeline::{GeodeticPoint, GridPoint, GridTransform};
