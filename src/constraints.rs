//! The closed set of constraint kinds the solver understands, and the
//! validating constructor that turns a kind plus some entity ids and an
//! optional value into a well-formed [`Constraint`].

use crate::error::ConstraintError;
use crate::id::Id;

/// Every constraint kind the solver understands. Closed set: no other
/// variants are added without a corresponding evaluator in
/// [`crate::evaluator`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum ConstraintKind {
    /// `distance(p1, p2, v)`: `‖p2 - p1‖ = v`.
    Distance,
    /// `x-distance(p1, p2, v)`: signed `p2.x - p1.x = v`.
    XDistance,
    /// `y-distance(p1, p2, v)`: signed `p2.y - p1.y = v`.
    YDistance,
    /// `horizontal(line)` (1 entity id) or `horizontal(p1..pn)` /
    /// `same-y(p1..pn)` (2+ entity ids): consecutive points share Y.
    Horizontal,
    /// `vertical(line)` (1 entity id) or `vertical(p1..pn)` / `same-x(p1..pn)`
    /// (2+ entity ids): consecutive points share X.
    Vertical,
    /// `parallel(l1, l2)`.
    Parallel,
    /// `perpendicular(l1, l2)`.
    Perpendicular,
    /// `angle(p1, vertex, p2, theta_degrees)`.
    Angle,
    /// `x(p, v)`: `p.x = v`.
    X,
    /// `y(p, v)`: `p.y = v`.
    Y,
    /// `radius(circle, v)`.
    Radius,
    /// `point-on-circle(p, circle)`.
    PointOnCircle,
    /// `line-tangent-to-circle(line, circle)`.
    LineTangentToCircle,
}

impl ConstraintKind {
    /// Human-readable name, used in [`ConstraintError`] messages.
    fn name(self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::XDistance => "x-distance",
            Self::YDistance => "y-distance",
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::Parallel => "parallel",
            Self::Perpendicular => "perpendicular",
            Self::Angle => "angle",
            Self::X => "x",
            Self::Y => "y",
            Self::Radius => "radius",
            Self::PointOnCircle => "point-on-circle",
            Self::LineTangentToCircle => "line-tangent-to-circle",
        }
    }

    fn arity_description(self) -> &'static str {
        use ConstraintKind::*;
        match self {
            Distance | XDistance | YDistance => "exactly 2 entity ids",
            Horizontal | Vertical => "1 entity id (a line) or 2+ (points)",
            Parallel | Perpendicular => "exactly 2 entity ids (lines)",
            Angle => "exactly 3 entity ids (p1, vertex, p2)",
            X | Y => "exactly 1 entity id (a point)",
            Radius => "exactly 1 entity id (a circle)",
            PointOnCircle | LineTangentToCircle => "exactly 2 entity ids",
        }
    }

}

/// A single geometric constraint: a kind, the (ordered) entities it refers
/// to, and an optional numeric value.
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    pub(crate) kind: ConstraintKind,
    pub(crate) entity_ids: Vec<Id>,
    pub(crate) value: Option<f64>,
}

impl Constraint {
    /// Build a constraint, validating that `entity_ids` and `value` match
    /// `kind`'s arity/value contract.
    ///
    /// This is the only place constructing a core type can fail: once a
    /// `Constraint` exists, evaluating it against a [`crate::Geometry`]
    /// never errors, even if the entity ids turn out to be dangling (see
    /// [`crate::ConstraintEvaluator`]).
    pub fn new(
        kind: ConstraintKind,
        entity_ids: Vec<Id>,
        value: Option<f64>,
    ) -> Result<Self, ConstraintError> {
        use ConstraintKind::*;
        let arity_ok = match kind {
            Distance | XDistance | YDistance => entity_ids.len() == 2,
            Horizontal | Vertical => !entity_ids.is_empty(),
            Parallel | Perpendicular => entity_ids.len() == 2,
            Angle => entity_ids.len() == 3,
            X | Y => entity_ids.len() == 1,
            Radius => entity_ids.len() == 1,
            PointOnCircle | LineTangentToCircle => entity_ids.len() == 2,
        };
        if !arity_ok {
            return Err(ConstraintError::WrongArity {
                kind: kind.name(),
                expected: kind.arity_description(),
                actual: entity_ids.len(),
            });
        }

        let value_required = matches!(
            kind,
            Distance | XDistance | YDistance | Angle | X | Y | Radius
        );
        match (value_required, value) {
            (true, None) => {
                return Err(ConstraintError::MissingValue { kind: kind.name() });
            }
            (false, Some(value)) => {
                return Err(ConstraintError::UnexpectedValue {
                    kind: kind.name(),
                    value,
                });
            }
            _ => {}
        }

        if let Some(value) = value {
            if matches!(kind, Distance | Radius) && value < 0.0 {
                return Err(ConstraintError::NegativeDistance {
                    kind: kind.name(),
                    value,
                });
            }
            if matches!(kind, Angle) && !(0.0..=180.0).contains(&value) {
                return Err(ConstraintError::AngleOutOfRange { degrees: value });
            }
        }

        Ok(Self {
            kind,
            entity_ids,
            value,
        })
    }

    /// Which kind of constraint this is.
    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    /// The entities this constraint refers to, in order.
    pub fn entity_ids(&self) -> &[Id] {
        &self.entity_ids
    }

    /// This constraint's numeric value, if it has one.
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// The solver's priority weight for this constraint, used by the
    /// aggregation policy's smart normalization step.
    ///
    /// `Horizontal`/`Vertical` share a kind with their `same-y`/`same-x`
    /// sugar forms but carry different weights depending on arity: a single
    /// entity id is the two-endpoint `horizontal`/`vertical` form (weight
    /// 1.2), two or more is the N-point `same-x`/`same-y` form (weight 1.1).
    pub(crate) fn priority(&self) -> f64 {
        use ConstraintKind::*;
        match self.kind {
            X | Y => 1.5,
            Distance | XDistance | YDistance => 1.3,
            Horizontal | Vertical if self.entity_ids.len() <= 1 => 1.2,
            Horizontal | Vertical => 1.1,
            Angle => 1.0,
            Parallel | Perpendicular => 0.9,
            Radius => 0.8,
            PointOnCircle | LineTangentToCircle => 1.0,
        }
    }

    /// Build a `same-x(p1..pn)` constraint: alias for `vertical` over N
    /// points.
    pub fn same_x(point_ids: Vec<Id>) -> Result<Self, ConstraintError> {
        Self::new(ConstraintKind::Vertical, point_ids, None)
    }

    /// Build a `same-y(p1..pn)` constraint: alias for `horizontal` over N
    /// points.
    pub fn same_y(point_ids: Vec<Id>) -> Result<Self, ConstraintError> {
        Self::new(ConstraintKind::Horizontal, point_ids, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_requires_two_ids_and_a_value() {
        let a = Id::from("a");
        let b = Id::from("b");
        assert!(Constraint::new(ConstraintKind::Distance, vec![a.clone()], Some(1.0)).is_err());
        assert!(Constraint::new(ConstraintKind::Distance, vec![a.clone(), b.clone()], None).is_err());
        assert!(Constraint::new(ConstraintKind::Distance, vec![a, b], Some(1.0)).is_ok());
    }

    #[test]
    fn negative_distance_is_rejected() {
        let a = Id::from("a");
        let b = Id::from("b");
        let err = Constraint::new(ConstraintKind::Distance, vec![a, b], Some(-1.0)).unwrap_err();
        assert!(matches!(err, ConstraintError::NegativeDistance { .. }));
    }

    #[test]
    fn angle_out_of_range_is_rejected() {
        let a = Id::from("a");
        let b = Id::from("b");
        let c = Id::from("c");
        let err = Constraint::new(ConstraintKind::Angle, vec![a, b, c], Some(181.0)).unwrap_err();
        assert!(matches!(err, ConstraintError::AngleOutOfRange { .. }));
    }

    #[test]
    fn horizontal_accepts_a_single_line_or_many_points() {
        let line = Id::from("l0");
        assert!(Constraint::new(ConstraintKind::Horizontal, vec![line], None).is_ok());

        let points: Vec<Id> = (0..4).map(|i| Id::from(format!("p{i}"))).collect();
        assert!(Constraint::new(ConstraintKind::Horizontal, points, None).is_ok());

        assert!(Constraint::new(ConstraintKind::Horizontal, vec![], None).is_err());
    }

    #[test]
    fn same_x_and_same_y_are_vertical_and_horizontal_aliases() {
        let points: Vec<Id> = (0..3).map(|i| Id::from(format!("p{i}"))).collect();
        assert_eq!(
            Constraint::same_x(points.clone()).unwrap().kind(),
            ConstraintKind::Vertical
        );
        assert_eq!(
            Constraint::same_y(points).unwrap().kind(),
            ConstraintKind::Horizontal
        );
    }
}
