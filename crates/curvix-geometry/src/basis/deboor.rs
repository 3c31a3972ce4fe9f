//! De Boor evaluation of B-spline curves and surfaces.
//!
//! Every routine is generic over [`ControlPoint`], so rational entities run
//! the same code over their lifted homogeneous control points.

use curvix_math::ControlPoint;

use super::knot::{basis_functions, ders_basis_functions, find_span};

/// Evaluate a B-spline curve point at parameter `t`.
pub fn curve_point<P: ControlPoint>(degree: usize, knots: &[f64], control_points: &[P], t: f64) -> P {
    let n = control_points.len() - 1;
    let span = find_span(degree, knots, n, t);
    let basis = basis_functions(degree, knots, span, t);

    let mut point = P::zero();
    for (i, b) in basis.iter().enumerate() {
        point = point + control_points[span - degree + i] * *b;
    }

    point
}

/// Evaluate a B-spline curve and its derivatives up to `order` at `t`.
///
/// Entry `k` of the result is the `k`-th derivative; entries above the
/// degree are zero.
pub fn curve_derivatives<P: ControlPoint>(
    degree: usize,
    knots: &[f64],
    control_points: &[P],
    t: f64,
    order: usize,
) -> Vec<P> {
    let n = control_points.len() - 1;
    let span = find_span(degree, knots, n, t);
    let ders = ders_basis_functions(degree, knots, span, t, order);

    ders.iter()
        .map(|row| {
            row.iter().enumerate().fold(P::zero(), |acc, (j, b)| {
                acc + control_points[span - degree + j] * *b
            })
        })
        .collect()
}

/// Evaluate partial derivatives `S^(k,l)` of a B-spline surface with `k + l <= order`.
///
/// `control_grid` is u-major: the point at u-index `i`, v-index `j` is
/// `control_grid[i * num_v + j]`. Entries of the result with `k + l > order`
/// are left at zero.
#[allow(clippy::too_many_arguments)]
pub fn surface_derivatives<P: ControlPoint>(
    degree_u: usize,
    degree_v: usize,
    knots_u: &[f64],
    knots_v: &[f64],
    control_grid: &[P],
    num_v: usize,
    u: f64,
    v: f64,
    order: usize,
) -> Vec<Vec<P>> {
    let num_u = control_grid.len() / num_v;
    let span_u = find_span(degree_u, knots_u, num_u - 1, u);
    let span_v = find_span(degree_v, knots_v, num_v - 1, v);
    let ders_u = ders_basis_functions(degree_u, knots_u, span_u, u, order);
    let ders_v = ders_basis_functions(degree_v, knots_v, span_v, v, order);

    let mut skl = vec![vec![P::zero(); order + 1]; order + 1];
    for k in 0..=order {
        for l in 0..=(order - k) {
            let mut s = P::zero();
            for (i, bu) in ders_u[k].iter().enumerate() {
                let u_idx = span_u - degree_u + i;
                for (j, bv) in ders_v[l].iter().enumerate() {
                    let v_idx = span_v - degree_v + j;
                    s = s + control_grid[u_idx * num_v + v_idx] * (bu * bv);
                }
            }
            skl[k][l] = s;
        }
    }

    skl
}

/// Control points of the curve running along u at fixed `v`.
pub fn iso_curve_u<P: ControlPoint>(
    degree_v: usize,
    knots_v: &[f64],
    control_grid: &[P],
    num_v: usize,
    v: f64,
) -> Vec<P> {
    let span_v = find_span(degree_v, knots_v, num_v - 1, v);
    let basis_v = basis_functions(degree_v, knots_v, span_v, v);

    control_grid
        .chunks(num_v)
        .map(|row| {
            basis_v.iter().enumerate().fold(P::zero(), |acc, (j, b)| {
                acc + row[span_v - degree_v + j] * *b
            })
        })
        .collect()
}

/// Control points of the curve running along v at fixed `u`.
pub fn iso_curve_v<P: ControlPoint>(
    degree_u: usize,
    knots_u: &[f64],
    control_grid: &[P],
    num_v: usize,
    u: f64,
) -> Vec<P> {
    let num_u = control_grid.len() / num_v;
    let span_u = find_span(degree_u, knots_u, num_u - 1, u);
    let basis_u = basis_functions(degree_u, knots_u, span_u, u);

    (0..num_v)
        .map(|j| {
            basis_u.iter().enumerate().fold(P::zero(), |acc, (i, b)| {
                acc + control_grid[(span_u - degree_u + i) * num_v + j] * *b
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use curvix_math::{Point2, Point3};

    #[test]
    fn test_curve_point_linear() {
        let degree = 1;
        let knots = vec![0.0, 0.0, 1.0, 2.0, 2.0];
        let cps = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];

        let p = curve_point(degree, &knots, &cps, 0.5);
        assert!((p.x - 0.5).abs() < 1e-10);
        assert!(p.y.abs() < 1e-10);

        let p = curve_point(degree, &knots, &cps, 1.5);
        assert!((p.x - 1.0).abs() < 1e-10);
        assert!((p.y - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_curve_derivatives_quadratic() {
        let degree = 2;
        let knots = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let cps = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.5, 1.0),
            Point2::new(1.0, 0.0),
        ];

        let d = curve_derivatives(degree, &knots, &cps, 0.5, 2);
        assert!((d[0] - Point2::new(0.5, 0.5)).norm() < 1e-10);
        // Apex of the arch: horizontal tangent, constant second derivative
        assert!((d[1] - Point2::new(1.0, 0.0)).norm() < 1e-10);
        assert!((d[2] - Point2::new(0.0, -4.0)).norm() < 1e-10);
    }

    #[test]
    fn test_surface_point_bilinear() {
        let knots = vec![0.0, 0.0, 1.0, 1.0];
        let grid = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];

        let skl = surface_derivatives(1, 1, &knots, &knots, &grid, 2, 0.5, 0.5, 1);
        assert!((skl[0][0] - Point3::new(0.5, 0.5, 0.0)).norm() < 1e-10);
        // u runs along the rows (y), v along the columns (x)
        assert!((skl[1][0] - Point3::new(0.0, 1.0, 0.0)).norm() < 1e-10);
        assert!((skl[0][1] - Point3::new(1.0, 0.0, 0.0)).norm() < 1e-10);
    }

    #[test]
    fn test_iso_curves_bilinear() {
        let knots = vec![0.0, 0.0, 1.0, 1.0];
        let grid = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
        ];

        let along_u = iso_curve_u(1, &knots, &grid, 2, 0.25);
        assert_eq!(along_u, vec![Point2::new(0.25, 0.0), Point2::new(0.25, 1.0)]);

        let along_v = iso_curve_v(1, &knots, &grid, 2, 0.75);
        assert_eq!(along_v, vec![Point2::new(0.0, 0.75), Point2::new(1.0, 0.75)]);
    }
}
