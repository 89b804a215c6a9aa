//! British National Grid ⇄ WGS84 conversion, exposed as a streaming analytics extension.

pub mod error;
pub mod proj;
pub mod sse;

pub use error::DispatchError;
pub use proj::{GeodeticPoint, GridPoint, GridTransform};
pub use sse::Dispatcher;
