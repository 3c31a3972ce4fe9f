//! Non-rational basis evaluation: Bernstein polynomials and B-spline knot vectors.

pub mod bernstein;
pub mod deboor;
pub mod knot;

pub use knot::{basis_functions, ders_basis_functions, find_span, knot_domain, num_spans, validate_knots};
