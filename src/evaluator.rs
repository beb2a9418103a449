//! Turns a [`Constraint`] and a [`Geometry`] snapshot into a residual/gradient
//! pair the solver can descend.
//!
//! Evaluation never fails. A constraint whose entity ids no longer resolve
//! against the geometry (a point was removed, say), whose arity is wrong, or
//! whose required value is missing simply contributes no violation: zero
//! error, empty gradient (the "no-op" policy). Likewise, a constraint whose
//! gradient is mathematically undefined at the current configuration (two
//! coincident points asked to be at a nonzero distance apart, say) reports an
//! empty gradient for that step; the residual may still be nonzero (e.g. a
//! degenerate `distance` constraint still reports how far the current,
//! zero-length, separation is from the target).

use std::f64::consts::PI;

use indexmap::IndexMap;

use crate::constraints::{Constraint, ConstraintKind};
use crate::geometry::Geometry;
use crate::id::Id;
use crate::vector::V;

/// Below this magnitude, a vector (or a denominator built from one) is
/// treated as degenerate rather than divided by.
const EPSILON: f64 = 1e-10;

/// A gradient with respect to one point's two coordinates. Internal
/// arithmetic helper; the public, per-constraint result exposes plain
/// `(f64, f64)` pairs (see [`ConstraintViolation::gradient`]).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Grad {
    pub dx: f64,
    pub dy: f64,
}

impl Grad {
    fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    fn x(v: f64) -> Self {
        Self { dx: v, dy: 0.0 }
    }

    fn y(v: f64) -> Self {
        Self { dx: 0.0, dy: v }
    }
}

impl std::ops::Add for Grad {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.dx + rhs.dx, self.dy + rhs.dy)
    }
}

impl std::ops::Sub for Grad {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.dx - rhs.dx, self.dy - rhs.dy)
    }
}

impl std::ops::Neg for Grad {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.dx, -self.dy)
    }
}

impl std::ops::Mul<f64> for Grad {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.dx * rhs, self.dy * rhs)
    }
}

/// The residual/gradient row produced by evaluating one [`Constraint`]
/// against a [`Geometry`] snapshot.
///
/// `error` is always the non-negative squared residual of the constraint's
/// governing equation (zero exactly when the constraint is satisfied).
/// `gradient` carries the partial derivative of `error` with respect to each
/// involved point's coordinates; a point that does not appear in the
/// residual, or whose derivative is undefined at this configuration, simply
/// has no entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConstraintViolation {
    /// Which constraint this row came from.
    pub constraint_id: Id,
    /// Non-negative squared residual. Zero means this constraint is exactly
    /// satisfied at the current configuration.
    pub error: f64,
    /// `d(error)/d(point.x)` and `d(error)/d(point.y)` for every point this
    /// constraint's residual depends on and whose derivative is currently
    /// defined.
    pub gradient: IndexMap<Id, (f64, f64)>,
}

impl ConstraintViolation {
    fn no_op(constraint_id: Id) -> Self {
        Self {
            constraint_id,
            error: 0.0,
            gradient: IndexMap::new(),
        }
    }

    fn degenerate(constraint_id: Id, error: f64) -> Self {
        Self {
            constraint_id,
            error,
            gradient: IndexMap::new(),
        }
    }

    /// Accumulate `grad` into this row's gradient map, summing when a point
    /// already has an entry (consecutive `same-x`/`same-y` pairs can share an
    /// interior point).
    fn add(&mut self, id: Id, grad: Grad) {
        let entry = self.gradient.entry(id).or_insert((0.0, 0.0));
        entry.0 += grad.dx;
        entry.1 += grad.dy;
    }
}

/// Stateless evaluator: one [`ConstraintEvaluator::evaluate`] call per
/// constraint per solver step.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConstraintEvaluator;

impl ConstraintEvaluator {
    /// Evaluate `constraint` (keyed by `constraint_id` in its owning
    /// [`Geometry`]) against `geometry`.
    pub fn evaluate(
        &self,
        constraint_id: &Id,
        constraint: &Constraint,
        geometry: &Geometry,
    ) -> ConstraintViolation {
        use ConstraintKind::*;
        let id = constraint_id.clone();
        match constraint.kind() {
            Distance => self.distance_between(
                id,
                constraint.entity_ids(),
                constraint.value(),
                geometry,
            ),
            XDistance => self.signed_axis_distance(id, constraint, geometry, Axis::X),
            YDistance => self.signed_axis_distance(id, constraint, geometry, Axis::Y),
            Horizontal => self.same_axis(id, constraint, geometry, Axis::Y),
            Vertical => self.same_axis(id, constraint, geometry, Axis::X),
            Parallel => self.parallel(id, constraint, geometry),
            Perpendicular => self.perpendicular(id, constraint, geometry),
            Angle => self.angle(id, constraint, geometry),
            X => self.axis_position(id, constraint, geometry, Axis::X),
            Y => self.axis_position(id, constraint, geometry, Axis::Y),
            Radius => self.radius(id, constraint, geometry),
            PointOnCircle => self.point_on_circle(id, constraint, geometry),
            LineTangentToCircle => self.line_tangent_to_circle(id, constraint, geometry),
        }
    }

    fn point_xy(&self, geometry: &Geometry, id: &Id) -> Option<V> {
        geometry.point(id).map(|(x, y)| V::new(x, y))
    }

    fn line_points(&self, geometry: &Geometry, line_id: &Id) -> Option<(Id, Id, V, V)> {
        let line = geometry.line(line_id)?;
        let p0 = self.point_xy(geometry, &line.point1_id)?;
        let p1 = self.point_xy(geometry, &line.point2_id)?;
        Some((line.point1_id.clone(), line.point2_id.clone(), p0, p1))
    }

    /// `distance(p1, p2, v)` and, via re-expression, `radius(c, v)`.
    fn distance_between(
        &self,
        constraint_id: Id,
        entity_ids: &[Id],
        value: Option<f64>,
        geometry: &Geometry,
    ) -> ConstraintViolation {
        let [id0, id1] = match entity_ids {
            [a, b] => [a.clone(), b.clone()],
            _ => return ConstraintViolation::no_op(constraint_id),
        };
        let (Some(p0), Some(p1)) = (self.point_xy(geometry, &id0), self.point_xy(geometry, &id1))
        else {
            return ConstraintViolation::no_op(constraint_id);
        };
        let target = value.unwrap_or(0.0);
        let dist = p0.euclidean_distance(p1);
        let r = dist - target;
        if dist < EPSILON {
            // Points coincide: direction is undefined, but the residual (the
            // current zero separation falling short of `target`) is not.
            return ConstraintViolation::degenerate(constraint_id, r * r);
        }
        let unit = (p0 - p1) * (1.0 / dist);
        let mut violation = ConstraintViolation {
            constraint_id,
            error: r * r,
            gradient: IndexMap::new(),
        };
        violation.add(id0, Grad::new(unit.x, unit.y) * (2.0 * r));
        violation.add(id1, Grad::new(-unit.x, -unit.y) * (2.0 * r));
        violation
    }

    fn signed_axis_distance(
        &self,
        constraint_id: Id,
        constraint: &Constraint,
        geometry: &Geometry,
        axis: Axis,
    ) -> ConstraintViolation {
        let [id0, id1] = match constraint.entity_ids() {
            [a, b] => [a.clone(), b.clone()],
            _ => return ConstraintViolation::no_op(constraint_id),
        };
        let (Some(p0), Some(p1)) = (self.point_xy(geometry, &id0), self.point_xy(geometry, &id1))
        else {
            return ConstraintViolation::no_op(constraint_id);
        };
        let target = constraint.value().unwrap_or(0.0);
        let r = (axis.of(p1) - axis.of(p0)) - target;
        let mut violation = ConstraintViolation {
            constraint_id,
            error: r * r,
            gradient: IndexMap::new(),
        };
        violation.add(id0, axis.grad(-2.0 * r));
        violation.add(id1, axis.grad(2.0 * r));
        violation
    }

    fn axis_position(
        &self,
        constraint_id: Id,
        constraint: &Constraint,
        geometry: &Geometry,
        axis: Axis,
    ) -> ConstraintViolation {
        let [id] = match constraint.entity_ids() {
            [a] => [a.clone()],
            _ => return ConstraintViolation::no_op(constraint_id),
        };
        let Some(p) = self.point_xy(geometry, &id) else {
            return ConstraintViolation::no_op(constraint_id);
        };
        let target = constraint.value().unwrap_or(0.0);
        let r = axis.of(p) - target;
        let mut violation = ConstraintViolation {
            constraint_id,
            error: r * r,
            gradient: IndexMap::new(),
        };
        violation.add(id, axis.grad(2.0 * r));
        violation
    }

    /// `Horizontal`/`Vertical`: one entity id means "this line's two
    /// endpoints share the axis" (`r = p2 - p1` on that axis, `error = r²`);
    /// two-or-more mean "these points, taken consecutively, all share the
    /// axis" (the `same-x`/`same-y` sugar), whose error is the sum of each
    /// consecutive pair's squared residual and whose gradient accumulates
    /// linearly across pairs.
    fn same_axis(
        &self,
        constraint_id: Id,
        constraint: &Constraint,
        geometry: &Geometry,
        axis: Axis,
    ) -> ConstraintViolation {
        let ids = constraint.entity_ids();
        if ids.len() == 1 {
            let Some((id0, id1, p0, p1)) = self.line_points(geometry, &ids[0]) else {
                return ConstraintViolation::no_op(constraint_id);
            };
            let r = axis.of(p1) - axis.of(p0);
            let mut violation = ConstraintViolation {
                constraint_id,
                error: r * r,
                gradient: IndexMap::new(),
            };
            violation.add(id0, axis.grad(-2.0 * r));
            violation.add(id1, axis.grad(2.0 * r));
            return violation;
        }

        let mut violation = ConstraintViolation::no_op(constraint_id);
        for pair in ids.windows(2) {
            let (id0, id1) = (pair[0].clone(), pair[1].clone());
            let (Some(p0), Some(p1)) = (
                self.point_xy(geometry, &id0),
                self.point_xy(geometry, &id1),
            ) else {
                continue;
            };
            let r = axis.of(p1) - axis.of(p0);
            violation.error += r * r;
            violation.add(id0, axis.grad(-2.0 * r));
            violation.add(id1, axis.grad(2.0 * r));
        }
        violation
    }

    /// `Parallel`: slope-difference formulation (see the design notes on why
    /// this, rather than a normalized dot/cross product, is used). A line is
    /// treated as vertical when `|v.x| < EPSILON`.
    fn parallel(
        &self,
        constraint_id: Id,
        constraint: &Constraint,
        geometry: &Geometry,
    ) -> ConstraintViolation {
        let [line0, line1] = match constraint.entity_ids() {
            [a, b] => [a.clone(), b.clone()],
            _ => return ConstraintViolation::no_op(constraint_id),
        };
        let (Some((a0, a1, pa0, pa1)), Some((b0, b1, pb0, pb1))) = (
            self.line_points(geometry, &line0),
            self.line_points(geometry, &line1),
        ) else {
            return ConstraintViolation::no_op(constraint_id);
        };

        let va = pa1 - pa0;
        let vb = pb1 - pb0;
        if va.dot(&va) < EPSILON || vb.dot(&vb) < EPSILON {
            return ConstraintViolation::degenerate(constraint_id, 0.0);
        }

        let a_vertical = libm::fabs(va.x) < EPSILON;
        let b_vertical = libm::fabs(vb.x) < EPSILON;

        if a_vertical && b_vertical {
            return ConstraintViolation::degenerate(constraint_id, 0.0);
        }

        if a_vertical != b_vertical {
            // One line vertical, the other not: push the non-vertical line's
            // slope toward vertical.
            let (slope, dv, p_neg, p_pos) = if a_vertical {
                (vb.y / vb.x, vb, b0.clone(), b1.clone())
            } else {
                (va.y / va.x, va, a0.clone(), a1.clone())
            };
            let error = 1.0 + slope * slope;
            // d(slope)/d(v.x) = -slope/v.x ; d(slope)/d(v.y) = 1/v.x.
            let dslope_dv = Grad::new(-slope / dv.x, 1.0 / dv.x);
            let dslope = dslope_dv * (2.0 * slope);
            let mut violation = ConstraintViolation {
                constraint_id,
                error,
                gradient: IndexMap::new(),
            };
            violation.add(p_neg, -dslope);
            violation.add(p_pos, dslope);
            return violation;
        }

        let slope_a = va.y / va.x;
        let slope_b = vb.y / vb.x;
        let r = slope_a - slope_b;
        let error = r * r;

        if error < 1e-6 {
            return ConstraintViolation::degenerate(constraint_id, error);
        }

        let len_a = va.magnitude();
        let len_b = vb.magnitude();
        let avg_len = 2.0 * len_a * len_b / (len_a + len_b);
        let scale = libm::fmax(10.0, avg_len / 10.0);

        let dslope_a_dv = Grad::new(-slope_a / va.x, 1.0 / va.x);
        let dslope_b_dv = Grad::new(-slope_b / vb.x, 1.0 / vb.x);
        let d_error = dslope_a_dv * (2.0 * r * scale);
        let d_error_b = dslope_b_dv * (-2.0 * r * scale);

        let mut violation = ConstraintViolation {
            constraint_id,
            error,
            gradient: IndexMap::new(),
        };
        violation.add(a0, -d_error);
        violation.add(a1, d_error);
        violation.add(b0, -d_error_b);
        violation.add(b1, d_error_b);
        violation
    }

    /// `Perpendicular`: `error = d²` where `d` is the normalized dot product
    /// of the two lines' direction vectors.
    fn perpendicular(
        &self,
        constraint_id: Id,
        constraint: &Constraint,
        geometry: &Geometry,
    ) -> ConstraintViolation {
        let [line0, line1] = match constraint.entity_ids() {
            [a, b] => [a.clone(), b.clone()],
            _ => return ConstraintViolation::no_op(constraint_id),
        };
        let (Some((a0, a1, pa0, pa1)), Some((b0, b1, pb0, pb1))) = (
            self.line_points(geometry, &line0),
            self.line_points(geometry, &line1),
        ) else {
            return ConstraintViolation::no_op(constraint_id);
        };

        let va = pa1 - pa0;
        let vb = pb1 - pb0;
        let mag_a = va.magnitude();
        let mag_b = vb.magnitude();
        if mag_a < EPSILON || mag_b < EPSILON {
            return ConstraintViolation::degenerate(constraint_id, 0.0);
        }

        let n = va.dot(&vb);
        let d = n / (mag_a * mag_b);
        let error = d * d;

        if libm::fabs(d) < 1e-6 {
            return ConstraintViolation::degenerate(constraint_id, error);
        }

        // d(d)/d(va) = vb/(|va||vb|) - n*va/(|va|^3 |vb|); symmetric in vb.
        let dd_dva = vb * (1.0 / (mag_a * mag_b)) - va * (n / (mag_a.powi(3) * mag_b));
        let dd_dvb = va * (1.0 / (mag_a * mag_b)) - vb * (n / (mag_a * mag_b.powi(3)));

        let scale = 2.0 * d;
        let g_va = Grad::new(dd_dva.x, dd_dva.y) * scale;
        let g_vb = Grad::new(dd_dvb.x, dd_dvb.y) * scale;

        let mut violation = ConstraintViolation {
            constraint_id,
            error,
            gradient: IndexMap::new(),
        };
        violation.add(a0, -g_va);
        violation.add(a1, g_va);
        violation.add(b0, -g_vb);
        violation.add(b1, g_vb);
        violation
    }

    /// `angle(p1, vertex, p2, theta_degrees)`: unsigned angle at `vertex`
    /// between rays to `p1` and `p2` (see the design notes on why only the
    /// unsigned form is supported).
    fn angle(
        &self,
        constraint_id: Id,
        constraint: &Constraint,
        geometry: &Geometry,
    ) -> ConstraintViolation {
        let [id_p1, id_vertex, id_p2] = match constraint.entity_ids() {
            [a, b, c] => [a.clone(), b.clone(), c.clone()],
            _ => return ConstraintViolation::no_op(constraint_id),
        };
        let (Some(p1), Some(vertex), Some(p2)) = (
            self.point_xy(geometry, &id_p1),
            self.point_xy(geometry, &id_vertex),
            self.point_xy(geometry, &id_p2),
        ) else {
            return ConstraintViolation::no_op(constraint_id);
        };
        let Some(target_deg) = constraint.value() else {
            return ConstraintViolation::no_op(constraint_id);
        };
        let target_rad = target_deg * PI / 180.0;

        let v1 = p1 - vertex;
        let v2 = p2 - vertex;
        let mag1 = v1.magnitude();
        let mag2 = v2.magnitude();
        if mag1 < EPSILON || mag2 < EPSILON {
            return ConstraintViolation::degenerate(constraint_id, 0.0);
        }

        let n = v1.dot(&v2);
        let d = mag1 * mag2;
        let cos_theta = (n / d).clamp(-1.0, 1.0);
        let theta = libm::acos(cos_theta);
        let r = theta - target_rad;
        let error = r * r;

        let sin_theta = libm::sin(theta);
        if libm::fabs(r) < (0.1 * PI / 180.0) || sin_theta < 1e-6 {
            return ConstraintViolation::degenerate(constraint_id, error);
        }

        // d(theta)/d(cos_theta) = -1/sin(theta).
        let dtheta_dcos = -1.0 / sin_theta;
        // d(cos_theta)/d(v1) = v2/(mag1*mag2) - n*v1/(mag1^3*mag2); symmetric in v2.
        let dcos_dv1 = v2 * (1.0 / d) - v1 * (n / (mag1.powi(3) * mag2));
        let dcos_dv2 = v1 * (1.0 / d) - v2 * (n / (mag1 * mag2.powi(3)));

        let scale = 2.0 * r * dtheta_dcos;
        let g_v1 = Grad::new(dcos_dv1.x, dcos_dv1.y) * scale;
        let g_v2 = Grad::new(dcos_dv2.x, dcos_dv2.y) * scale;

        let mut violation = ConstraintViolation {
            constraint_id,
            error,
            gradient: IndexMap::new(),
        };
        violation.add(id_p1, g_v1);
        violation.add(id_p2, g_v2);
        violation.add(id_vertex, -(g_v1 + g_v2));
        violation
    }

    /// `radius(c, v)`: re-expressed as `distance(center_id, radius_point_id, v)`.
    fn radius(
        &self,
        constraint_id: Id,
        constraint: &Constraint,
        geometry: &Geometry,
    ) -> ConstraintViolation {
        let [circle_id] = match constraint.entity_ids() {
            [a] => [a.clone()],
            _ => return ConstraintViolation::no_op(constraint_id),
        };
        let Some(circle) = geometry.circle(&circle_id) else {
            return ConstraintViolation::no_op(constraint_id);
        };
        let entity_ids = [circle.center_id.clone(), circle.radius_point_id.clone()];
        self.distance_between(constraint_id, &entity_ids, constraint.value(), geometry)
    }

    /// `point-on-circle(p, c)`: `r = ‖p − center‖ − radius(c)`.
    fn point_on_circle(
        &self,
        constraint_id: Id,
        constraint: &Constraint,
        geometry: &Geometry,
    ) -> ConstraintViolation {
        let [point_id, circle_id] = match constraint.entity_ids() {
            [a, b] => [a.clone(), b.clone()],
            _ => return ConstraintViolation::no_op(constraint_id),
        };
        let Some(circle) = geometry.circle(&circle_id) else {
            return ConstraintViolation::no_op(constraint_id);
        };
        let (Some(p), Some(center), Some(radius_point)) = (
            self.point_xy(geometry, &point_id),
            self.point_xy(geometry, &circle.center_id),
            self.point_xy(geometry, &circle.radius_point_id),
        ) else {
            return ConstraintViolation::no_op(constraint_id);
        };
        let d1 = p.euclidean_distance(center);
        let d2 = center.euclidean_distance(radius_point);
        let r = d1 - d2;
        if d1 < EPSILON || d2 < EPSILON {
            return ConstraintViolation::degenerate(constraint_id, r * r);
        }

        let a = (p - center) * (1.0 / d1);
        let b = (center - radius_point) * (1.0 / d2);
        let scale = 2.0 * r;

        let mut violation = ConstraintViolation {
            constraint_id,
            error: r * r,
            gradient: IndexMap::new(),
        };
        violation.add(point_id, Grad::new(a.x, a.y) * scale);
        violation.add(
            circle.center_id.clone(),
            (Grad::new(-a.x, -a.y) - Grad::new(b.x, b.y)) * scale,
        );
        violation.add(circle.radius_point_id.clone(), Grad::new(b.x, b.y) * scale);
        violation
    }

    /// `line-tangent-to-circle(line, c)`: `r = |perpendicular distance from
    /// center to line| − radius(c)`.
    fn line_tangent_to_circle(
        &self,
        constraint_id: Id,
        constraint: &Constraint,
        geometry: &Geometry,
    ) -> ConstraintViolation {
        let [line_id, circle_id] = match constraint.entity_ids() {
            [a, b] => [a.clone(), b.clone()],
            _ => return ConstraintViolation::no_op(constraint_id),
        };
        let Some(circle) = geometry.circle(&circle_id) else {
            return ConstraintViolation::no_op(constraint_id);
        };
        let (Some((id0, id1, p0, p1)), Some(center), Some(radius_point)) = (
            self.line_points(geometry, &line_id),
            self.point_xy(geometry, &circle.center_id),
            self.point_xy(geometry, &circle.radius_point_id),
        ) else {
            return ConstraintViolation::no_op(constraint_id);
        };

        let v = p1 - p0;
        let mag_v = v.magnitude();
        if mag_v < EPSILON {
            return ConstraintViolation::degenerate(constraint_id, 0.0);
        }
        let w = center - p0;
        let cross = v.cross_2d(&w);
        let signed_perp = cross / mag_v;
        if libm::fabs(signed_perp) < EPSILON {
            // Center lies exactly on the line: the |.| kink makes the
            // gradient undefined here.
            return ConstraintViolation::degenerate(constraint_id, 0.0);
        }

        let radius = center.euclidean_distance(radius_point);
        let sign = signed_perp.signum();
        let r = libm::fabs(signed_perp) - radius;
        let error = r * r;

        let mag_v_cubed = mag_v * mag_v * mag_v;
        let dsp_dp0 = Grad::new(
            (-w.y + v.y) / mag_v + cross * v.x / mag_v_cubed,
            (-v.x + w.x) / mag_v + cross * v.y / mag_v_cubed,
        );
        let dsp_dp1 = Grad::new(
            w.y / mag_v - cross * v.x / mag_v_cubed,
            -w.x / mag_v - cross * v.y / mag_v_cubed,
        );
        let dsp_dcenter = Grad::new(-v.y / mag_v, v.x / mag_v);

        // Scaling factor keeps convergence responsive on long lines, mirroring
        // the `parallel` constraint's `max(10, len/10)` treatment.
        let endpoint_scale = libm::fmax(10.0, mag_v / 10.0);
        let dr_scale = 2.0 * r * sign;

        let mut violation = ConstraintViolation {
            constraint_id,
            error,
            gradient: IndexMap::new(),
        };
        violation.add(id0.clone(), dsp_dp0 * (dr_scale * endpoint_scale));
        violation.add(id1.clone(), dsp_dp1 * (dr_scale * endpoint_scale));

        if radius < EPSILON {
            // Radius derivative undefined; keep the tangency part of the
            // gradient but drop the radius-point contribution.
            violation.add(circle.center_id.clone(), dsp_dcenter * dr_scale);
            return violation;
        }

        // The radius term has no `sign` in it (only `|signed_perp|` does), so
        // its contribution to `error`'s gradient is scaled by a plain `2r`,
        // not by `dr_scale` (which already folds `sign` in for the tangency
        // term above).
        let rc = (radius_point - center) * (1.0 / radius);
        let d_radius_dcenter = Grad::new(-rc.x, -rc.y);
        let d_radius_drp = Grad::new(rc.x, rc.y);
        let radius_scale = 2.0 * r;

        violation.add(
            circle.center_id.clone(),
            dsp_dcenter * dr_scale - d_radius_dcenter * radius_scale,
        );
        violation.add(
            circle.radius_point_id.clone(),
            -d_radius_drp * radius_scale,
        );
        violation
    }
}

#[derive(Clone, Copy, Debug)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn of(self, p: V) -> f64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
        }
    }

    fn grad(self, v: f64) -> Grad {
        match self {
            Axis::X => Grad::x(v),
            Axis::Y => Grad::y(v),
        }
    }
}
