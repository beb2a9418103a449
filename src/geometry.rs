//! The typed containers of points, lines, circles and constraints that make
//! up a sketch, plus the construction and mutation helpers that build them up
//! value-by-value.

use indexmap::IndexMap;

use crate::constraints::{Constraint, ConstraintKind};
use crate::error::GeometryError;
use crate::id::{Id, IdGenerator};

/// A straight line segment between two (owned-by-reference) points.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    /// One endpoint of the line.
    pub point1_id: Id,
    /// The other endpoint of the line.
    pub point2_id: Id,
}

/// A circle, defined by its center and a second point on its perimeter.
///
/// The radius is never stored directly: it is always the live distance
/// between `center_id` and `radius_point_id`, so moving `radius_point_id`
/// resizes the circle. See [`Geometry::radius_of`].
#[derive(Clone, Debug, PartialEq)]
pub struct Circle {
    /// Center of the circle.
    pub center_id: Id,
    /// An auxiliary point on the circle's perimeter, used only to carry the
    /// radius as a derived quantity.
    pub radius_point_id: Id,
}

/// An entity/constraint-carrying sketch: maps from id to each entity kind.
///
/// All mutation methods return a logically distinct `Geometry` rather than
/// mutating `self` in place, so callers can treat every update as an
/// independent value-level snapshot (e.g. to diff against a previous
/// snapshot, or hand a prior one to another [`crate::Solver::solve`] call).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub(crate) points: IndexMap<Id, PointRecord>,
    pub(crate) lines: IndexMap<Id, Line>,
    pub(crate) circles: IndexMap<Id, Circle>,
    pub(crate) constraints: IndexMap<Id, Constraint>,
}

/// Internal representation of a point: just the coordinates, keyed by id in
/// [`Geometry::points`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PointRecord {
    pub x: f64,
    pub y: f64,
}

impl Geometry {
    /// An empty geometry with no points, lines, circles or constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new point at `(x, y)`, returning the extended geometry and
    /// the fresh id.
    pub fn with_point(
        &self,
        ids: &mut IdGenerator,
        x: f64,
        y: f64,
    ) -> Result<(Self, Id), GeometryError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(GeometryError::NonFiniteCoordinate { x, y });
        }
        let id = ids.next_id("p");
        let mut next = self.clone();
        next.points.insert(id.clone(), PointRecord { x, y });
        Ok((next, id))
    }

    /// Replace an existing point's coordinates.
    pub fn update_point(&self, id: &Id, x: f64, y: f64) -> Result<Self, GeometryError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(GeometryError::NonFiniteCoordinate { x, y });
        }
        if !self.points.contains_key(id) {
            return Err(GeometryError::UnknownPoint(id.clone()));
        }
        let mut next = self.clone();
        next.points.insert(id.clone(), PointRecord { x, y });
        Ok(next)
    }

    /// Remove a point. Any line/circle/constraint still referring to it is
    /// orphaned, not deleted; the evaluator treats such dangling references
    /// as no-ops (see [`crate::ConstraintEvaluator`]).
    pub fn remove_point(&self, id: &Id) -> Self {
        let mut next = self.clone();
        next.points.shift_remove(id);
        next
    }

    /// Insert a new line between two (possibly not-yet-existing) points.
    ///
    /// Referential integrity is not enforced at construction time: a
    /// dangling endpoint is tolerated and simply makes every constraint that
    /// uses this line a no-op at evaluation time.
    pub fn with_line(&self, ids: &mut IdGenerator, point1_id: Id, point2_id: Id) -> (Self, Id) {
        let id = ids.next_id("l");
        let mut next = self.clone();
        next.lines.insert(
            id.clone(),
            Line {
                point1_id,
                point2_id,
            },
        );
        (next, id)
    }

    /// Remove a line.
    pub fn remove_line(&self, id: &Id) -> Self {
        let mut next = self.clone();
        next.lines.shift_remove(id);
        next
    }

    /// Insert a new circle. This also mints and inserts a fresh
    /// `radius_point`, positioned at `(center.x + initial_radius,
    /// center.y)`; the circle's live radius is the distance from its center
    /// to that point (see [`Geometry::radius_of`]).
    pub fn with_circle(
        &self,
        ids: &mut IdGenerator,
        center_id: Id,
        initial_radius: f64,
    ) -> Result<(Self, Id), GeometryError> {
        let center = self
            .points
            .get(&center_id)
            .copied()
            .unwrap_or(PointRecord { x: 0.0, y: 0.0 });
        let (with_radius_point, radius_point_id) =
            self.with_point(ids, center.x + initial_radius, center.y)?;
        let id = ids.next_id("c");
        let mut next = with_radius_point;
        next.circles.insert(
            id.clone(),
            Circle {
                center_id,
                radius_point_id,
            },
        );
        Ok((next, id))
    }

    /// Remove a circle (its center and radius point are left untouched).
    pub fn remove_circle(&self, id: &Id) -> Self {
        let mut next = self.clone();
        next.circles.shift_remove(id);
        next
    }

    /// Insert a new, already-validated constraint (see [`Constraint::new`]).
    pub fn with_constraint(
        &self,
        ids: &mut IdGenerator,
        kind: ConstraintKind,
        entity_ids: Vec<Id>,
        value: Option<f64>,
    ) -> Result<(Self, Id), GeometryError> {
        let constraint = Constraint::new(kind, entity_ids, value)?;
        let id = ids.next_id("k");
        let mut next = self.clone();
        next.constraints.insert(id.clone(), constraint);
        Ok((next, id))
    }

    /// Remove a constraint.
    pub fn remove_constraint(&self, id: &Id) -> Self {
        let mut next = self.clone();
        next.constraints.shift_remove(id);
        next
    }

    /// Look up a point's current coordinates.
    pub fn point(&self, id: &Id) -> Option<(f64, f64)> {
        self.points.get(id).map(|p| (p.x, p.y))
    }

    /// Look up a line.
    pub fn line(&self, id: &Id) -> Option<&Line> {
        self.lines.get(id)
    }

    /// Look up a circle.
    pub fn circle(&self, id: &Id) -> Option<&Circle> {
        self.circles.get(id)
    }

    /// Look up a constraint.
    pub fn constraint(&self, id: &Id) -> Option<&Constraint> {
        self.constraints.get(id)
    }

    /// Iterate over all points, in stable (insertion) order.
    pub fn points(&self) -> impl Iterator<Item = (&Id, (f64, f64))> {
        self.points.iter().map(|(id, p)| (id, (p.x, p.y)))
    }

    /// Iterate over all lines, in stable (insertion) order.
    pub fn lines(&self) -> impl Iterator<Item = (&Id, &Line)> {
        self.lines.iter()
    }

    /// Iterate over all circles, in stable (insertion) order.
    pub fn circles(&self) -> impl Iterator<Item = (&Id, &Circle)> {
        self.circles.iter()
    }

    /// Iterate over all constraints, in stable (insertion) order.
    pub fn constraints(&self) -> impl Iterator<Item = (&Id, &Constraint)> {
        self.constraints.iter()
    }

    /// The live radius of a circle: the current euclidean distance from its
    /// center to its radius point. Yields `0.0` if either point, or the
    /// circle itself, is missing (the no-op policy extends to reads).
    pub fn radius_of(&self, circle_id: &Id) -> f64 {
        let Some(circle) = self.circles.get(circle_id) else {
            return 0.0;
        };
        let (Some(center), Some(radius_point)) = (
            self.points.get(&circle.center_id),
            self.points.get(&circle.radius_point_id),
        ) else {
            return 0.0;
        };
        crate::vector::V::new(center.x, center.y)
            .euclidean_distance(crate::vector::V::new(radius_point.x, radius_point.y))
    }

    /// Crate-private direct mutation used by [`crate::Solver`] so the
    /// iteration loop doesn't clone the whole geometry on every step.
    pub(crate) fn set_point_mut(&mut self, id: &Id, x: f64, y: f64) {
        if let Some(point) = self.points.get_mut(id) {
            point.x = x;
            point.y = y;
        }
    }
}
