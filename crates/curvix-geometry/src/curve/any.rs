//! Closed set of curve variants behind one type.

use curvix_core::Result;
use curvix_math::Point;
use serde::{Deserialize, Serialize};

use super::{BSplineCurve, BezierCurve, Curve, NurbsCurve, RationalBezierCurve};

/// Any supported curve in `D` dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnyCurve<const D: usize> {
    Bezier(BezierCurve<Point<D>>),
    RationalBezier(RationalBezierCurve<D>),
    BSpline(BSplineCurve<Point<D>>),
    Nurbs(NurbsCurve<D>),
}

macro_rules! dispatch {
    ($self:ident, $curve:ident => $body:expr) => {
        match $self {
            AnyCurve::Bezier($curve) => $body,
            AnyCurve::RationalBezier($curve) => $body,
            AnyCurve::BSpline($curve) => $body,
            AnyCurve::Nurbs($curve) => $body,
        }
    };
}

impl<const D: usize> AnyCurve<D> {
    pub fn is_rational(&self) -> bool {
        matches!(self, AnyCurve::RationalBezier(_) | AnyCurve::Nurbs(_))
    }

    /// Build the homogeneous lift of a rational variant; a no-op otherwise.
    pub fn initialize(&mut self) -> Result<()> {
        match self {
            AnyCurve::RationalBezier(c) => c.initialize(),
            AnyCurve::Nurbs(c) => c.initialize(),
            AnyCurve::Bezier(_) | AnyCurve::BSpline(_) => Ok(()),
        }
    }
}

impl<const D: usize> Curve<D> for AnyCurve<D> {
    fn evaluate(&self, t: f64) -> Result<Point<D>> {
        dispatch!(self, c => c.evaluate(t))
    }

    fn evaluate_derivative(&self, t: f64) -> Result<Point<D>> {
        dispatch!(self, c => c.evaluate_derivative(t))
    }

    fn evaluate_2nd_derivative(&self, t: f64) -> Result<Point<D>> {
        dispatch!(self, c => c.evaluate_2nd_derivative(t))
    }

    fn get_domain_lower_bound(&self) -> f64 {
        dispatch!(self, c => c.get_domain_lower_bound())
    }

    fn get_domain_upper_bound(&self) -> f64 {
        dispatch!(self, c => c.get_domain_upper_bound())
    }

    fn degree(&self) -> usize {
        dispatch!(self, c => Curve::<D>::degree(c))
    }

    fn inversion_samples(&self) -> usize {
        dispatch!(self, c => c.inversion_samples())
    }

    fn compute_inflections(&self, lower: f64, upper: f64) -> Result<Vec<f64>> {
        dispatch!(self, c => c.compute_inflections(lower, upper))
    }

    fn reduce_turning_angle(&self, lower: f64, upper: f64) -> Result<Vec<f64>> {
        dispatch!(self, c => c.reduce_turning_angle(lower, upper))
    }

    fn compute_singularities(&self, lower: f64, upper: f64) -> Result<Vec<f64>> {
        dispatch!(self, c => c.compute_singularities(lower, upper))
    }
}

impl<const D: usize> From<BezierCurve<Point<D>>> for AnyCurve<D> {
    fn from(curve: BezierCurve<Point<D>>) -> Self {
        AnyCurve::Bezier(curve)
    }
}

impl<const D: usize> From<RationalBezierCurve<D>> for AnyCurve<D> {
    fn from(curve: RationalBezierCurve<D>) -> Self {
        AnyCurve::RationalBezier(curve)
    }
}

impl<const D: usize> From<BSplineCurve<Point<D>>> for AnyCurve<D> {
    fn from(curve: BSplineCurve<Point<D>>) -> Self {
        AnyCurve::BSpline(curve)
    }
}

impl<const D: usize> From<NurbsCurve<D>> for AnyCurve<D> {
    fn from(curve: NurbsCurve<D>) -> Self {
        AnyCurve::Nurbs(curve)
    }
}
