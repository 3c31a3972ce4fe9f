//! Closed set of surface variants behind one type.

use curvix_core::Result;
use curvix_math::Point;
use serde::{Deserialize, Serialize};

use super::{BSplineSurface, BezierSurface, NurbsSurface, Surface};

/// Any supported patch in `D` dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnyPatch<const D: usize> {
    Bezier(BezierSurface<Point<D>>),
    BSpline(BSplineSurface<Point<D>>),
    Nurbs(NurbsSurface<D>),
}

macro_rules! dispatch {
    ($self:ident, $patch:ident => $body:expr) => {
        match $self {
            AnyPatch::Bezier($patch) => $body,
            AnyPatch::BSpline($patch) => $body,
            AnyPatch::Nurbs($patch) => $body,
        }
    };
}

impl<const D: usize> AnyPatch<D> {
    /// Build the homogeneous lift of a NURBS patch; a no-op otherwise.
    pub fn initialize(&mut self) -> Result<()> {
        match self {
            AnyPatch::Nurbs(patch) => patch.initialize(),
            AnyPatch::Bezier(_) | AnyPatch::BSpline(_) => Ok(()),
        }
    }
}

impl<const D: usize> Surface<D> for AnyPatch<D> {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point<D>> {
        dispatch!(self, p => p.evaluate(u, v))
    }

    fn evaluate_derivative_u(&self, u: f64, v: f64) -> Result<Point<D>> {
        dispatch!(self, p => p.evaluate_derivative_u(u, v))
    }

    fn evaluate_derivative_v(&self, u: f64, v: f64) -> Result<Point<D>> {
        dispatch!(self, p => p.evaluate_derivative_v(u, v))
    }

    fn evaluate_2nd_derivatives(&self, u: f64, v: f64) -> Result<[Point<D>; 3]> {
        dispatch!(self, p => p.evaluate_2nd_derivatives(u, v))
    }

    fn domain_u(&self) -> (f64, f64) {
        dispatch!(self, p => p.domain_u())
    }

    fn domain_v(&self) -> (f64, f64) {
        dispatch!(self, p => p.domain_v())
    }

    fn degree_u(&self) -> usize {
        dispatch!(self, p => Surface::<D>::degree_u(p))
    }

    fn degree_v(&self) -> usize {
        dispatch!(self, p => Surface::<D>::degree_v(p))
    }

    fn inversion_samples_u(&self) -> usize {
        dispatch!(self, p => p.inversion_samples_u())
    }

    fn inversion_samples_v(&self) -> usize {
        dispatch!(self, p => p.inversion_samples_v())
    }
}

impl<const D: usize> From<BezierSurface<Point<D>>> for AnyPatch<D> {
    fn from(patch: BezierSurface<Point<D>>) -> Self {
        AnyPatch::Bezier(patch)
    }
}

impl<const D: usize> From<BSplineSurface<Point<D>>> for AnyPatch<D> {
    fn from(patch: BSplineSurface<Point<D>>) -> Self {
        AnyPatch::BSpline(patch)
    }
}

impl<const D: usize> From<NurbsSurface<D>> for AnyPatch<D> {
    fn from(patch: NurbsSurface<D>) -> Self {
        AnyPatch::Nurbs(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curvix_math::Point3;

    fn unit_square() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_variants_agree_on_bilinear_patch() {
        let knots = vec![0.0, 0.0, 1.0, 1.0];
        let patches: Vec<AnyPatch<3>> = vec![
            BezierSurface::new(1, 1, unit_square()).into(),
            BSplineSurface::new(1, 1, knots.clone(), knots.clone(), unit_square()).into(),
            NurbsSurface::try_new(1, 1, knots.clone(), knots, unit_square(), vec![3.0; 4])
                .unwrap()
                .into(),
        ];
        for patch in &patches {
            let p = patch.evaluate(0.25, 0.75).unwrap();
            assert!((p - Point3::new(0.75, 0.25, 0.0)).norm() < 1e-12);
            assert_eq!(patch.degree_u(), 1);
            assert!((patch.evaluate_normal(0.5, 0.5).unwrap() + Point3::z()).norm() < 1e-12);
        }
    }

    #[test]
    fn test_initialize_nurbs_variant() {
        let knots = vec![0.0, 0.0, 1.0, 1.0];
        let mut patch: AnyPatch<3> =
            NurbsSurface::new(1, 1, knots.clone(), knots, unit_square(), vec![1.0; 4]).into();
        assert!(patch.evaluate(0.5, 0.5).is_err());
        patch.initialize().unwrap();
        assert!(patch.evaluate(0.5, 0.5).is_ok());
    }
}
