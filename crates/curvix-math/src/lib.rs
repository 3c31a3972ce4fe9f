pub mod control_point;
pub mod homogeneous;

pub use nalgebra::{Matrix2, SVector, Vector2};
pub use control_point::ControlPoint;
pub use homogeneous::Homogeneous;

/// A point (or vector) in `D`-dimensional ambient space.
pub type Point<const D: usize> = SVector<f64, D>;

pub type Point2 = Point<2>;
pub type Point3 = Point<3>;
