//! curvix geometry: Bezier, B-spline and NURBS curves and surfaces, with
//! point inversion and differential queries.

pub mod basis;
pub mod curve;
pub mod surface;

pub use curve::{AnyCurve, BSplineCurve, BezierCurve, Curve, NurbsCurve, RationalBezierCurve};
pub use surface::{AnyPatch, BSplineSurface, BezierSurface, NurbsSurface, Surface};
