//! Property-based check that, near satisfaction, a constraint's analytical
//! gradient agrees with a central finite difference of its own residual.

use proptest::prelude::*;

use crate::{ConstraintEvaluator, ConstraintKind, Geometry, IdGenerator};

const H: f64 = 1e-6;

/// Central finite difference of `evaluate(...).error` with respect to
/// `point_id.x` and `.y`, holding everything else fixed.
fn numerical_gradient(g: &Geometry, k: &crate::Id, point_id: &crate::Id) -> (f64, f64) {
    let evaluator = ConstraintEvaluator;
    let constraint = g.constraint(k).unwrap().clone();
    let (x, y) = g.point(point_id).unwrap();

    let mut eval_at = |x: f64, y: f64| {
        let moved = g.update_point(point_id, x, y).unwrap();
        evaluator.evaluate(k, &constraint, &moved).error
    };
    let dfdx = (eval_at(x + H, y) - eval_at(x - H, y)) / (2.0 * H);
    let dfdy = (eval_at(x, y + H) - eval_at(x, y - H)) / (2.0 * H);
    (dfdx, dfdy)
}

proptest! {
    /// `distance(p1, p2, v)`'s analytical gradient matches a finite-difference
    /// estimate, away from the coincident-points degenerate case.
    #[test]
    fn distance_gradient_matches_finite_difference(
        x1 in -50.0f64..50.0,
        y1 in -50.0f64..50.0,
        x2 in -50.0f64..50.0,
        y2 in -50.0f64..50.0,
        v in 0.0f64..20.0,
    ) {
        let mut ids = IdGenerator::default();
        let g = Geometry::new();
        let (g, p1) = g.with_point(&mut ids, x1, y1).unwrap();
        let (g, p2) = g.with_point(&mut ids, x2, y2).unwrap();
        let dist = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
        prop_assume!(dist > 1e-2);

        let (g, k) = g
            .with_constraint(&mut ids, ConstraintKind::Distance, vec![p1.clone(), p2.clone()], Some(v))
            .unwrap();
        let constraint = g.constraint(&k).unwrap().clone();
        let violation = ConstraintEvaluator.evaluate(&k, &constraint, &g);

        let (num_dx1, num_dy1) = numerical_gradient(&g, &k, &p1);
        let (analytical_dx1, analytical_dy1) = violation.gradient.get(&p1).copied().unwrap_or((0.0, 0.0));
        prop_assert!((num_dx1 - analytical_dx1).abs() < 1e-3, "{num_dx1} vs {analytical_dx1}");
        prop_assert!((num_dy1 - analytical_dy1).abs() < 1e-3, "{num_dy1} vs {analytical_dy1}");
    }

    /// For a single `x(p, v)` constraint, shifting `v` by a small `delta`
    /// near satisfaction changes `error` linearly to first order, matching
    /// the analytical derivative `d(error)/d(v) = -2r`.
    #[test]
    fn axis_position_error_is_linear_in_target_shift_near_satisfaction(
        x in -100.0f64..100.0,
        r0 in -0.05f64..0.05,
        delta in -1e-3f64..1e-3,
    ) {
        let mut ids = IdGenerator::default();
        let g = Geometry::new();
        let (g, p) = g.with_point(&mut ids, x, 0.0).unwrap();
        let target0 = x - r0;

        let (g0, k0) = g
            .with_constraint(&mut ids, ConstraintKind::X, vec![p.clone()], Some(target0))
            .unwrap();
        let c0 = g0.constraint(&k0).unwrap().clone();
        let base = ConstraintEvaluator.evaluate(&k0, &c0, &g0);

        let (g1, k1) = g
            .with_constraint(&mut ids, ConstraintKind::X, vec![p], Some(target0 + delta))
            .unwrap();
        let c1 = g1.constraint(&k1).unwrap().clone();
        let shifted = ConstraintEvaluator.evaluate(&k1, &c1, &g1);

        // error(v) = (x - v)^2 ; d(error)/d(v) = -2*(x - v) = -2*r0 at v = target0.
        let predicted = base.error + (-2.0 * r0) * delta;
        prop_assert!((shifted.error - predicted).abs() < 1e-4);
    }

    /// `line-tangent-to-circle(line, c)`'s analytical gradient on the
    /// circle's center, its radius point, and the line's endpoints all
    /// match a finite-difference estimate, on both sides of the line (i.e.
    /// for both signs of the center's perpendicular offset).
    #[test]
    fn line_tangent_to_circle_gradient_matches_finite_difference(
        cx in -20.0f64..20.0,
        cy in -20.0f64..20.0,
        radius in 0.5f64..10.0,
        lx in -20.0f64..20.0,
        y0 in -20.0f64..0.0,
        y1 in 0.0f64..20.0,
        side in any::<bool>(),
    ) {
        let lx = if side { lx } else { -lx };
        let mut ids = IdGenerator::default();
        let g = Geometry::new();
        let (g, center) = g.with_point(&mut ids, cx, cy).unwrap();
        let (g, circle) = g.with_circle(&mut ids, center.clone(), radius).unwrap();
        let (g, p0) = g.with_point(&mut ids, lx, cy + y0).unwrap();
        let (g, p1) = g.with_point(&mut ids, lx, cy + y1).unwrap();
        prop_assume!((y1 - y0).abs() > 1e-2);
        let (g, line) = g.with_line(&mut ids, p0.clone(), p1.clone());

        // The line runs straight up and down at x = lx, so the center's
        // perpendicular distance to it is just the horizontal gap.
        let perp_distance = (cx - lx).abs();
        prop_assume!(perp_distance > 0.5);
        prop_assume!((perp_distance - radius).abs() > 0.5);

        let (g, k) = g
            .with_constraint(
                &mut ids,
                ConstraintKind::LineTangentToCircle,
                vec![line, circle.clone()],
                None,
            )
            .unwrap();
        let constraint = g.constraint(&k).unwrap().clone();
        let violation = ConstraintEvaluator.evaluate(&k, &constraint, &g);

        let radius_point = g.circle(&circle).unwrap().radius_point_id.clone();
        for point_id in [center.clone(), radius_point, p0, p1] {
            let (num_dx, num_dy) = numerical_gradient(&g, &k, &point_id);
            let (dx, dy) = violation.gradient.get(&point_id).copied().unwrap_or((0.0, 0.0));
            prop_assert!((num_dx - dx).abs() < 1e-2, "{num_dx} vs {dx}");
            prop_assert!((num_dy - dy).abs() < 1e-2, "{num_dy} vs {dy}");
        }
    }
}
