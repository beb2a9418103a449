//! Errors raised while *constructing* geometry and constraints.
//!
//! Nothing here crosses the solver boundary: once a [`crate::Geometry`] and its
//! constraints exist, evaluation and solving never fail (see the module docs
//! on [`crate::ConstraintEvaluator`] and [`crate::Solver`] for the no-op and
//! degenerate-configuration policies that take over instead).

use crate::Id;

/// Could not construct a [`crate::Constraint`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConstraintError {
    /// This kind of constraint expects a different number of entity ids.
    #[error("{kind} expects {expected}, but {actual} entity ids were given")]
    WrongArity {
        /// Human-readable name of the constraint kind.
        kind: &'static str,
        /// Description of the arity this kind expects.
        expected: &'static str,
        /// How many entity ids were actually given.
        actual: usize,
    },
    /// This kind of constraint requires a numeric value, but none was given.
    #[error("{kind} requires a value, but none was given")]
    MissingValue {
        /// Human-readable name of the constraint kind.
        kind: &'static str,
    },
    /// This kind of constraint does not take a value, but one was given.
    #[error("{kind} does not take a value, but {value} was given")]
    UnexpectedValue {
        /// Human-readable name of the constraint kind.
        kind: &'static str,
        /// The value that should not have been supplied.
        value: f64,
    },
    /// A distance-like value must be non-negative.
    #[error("{kind} requires a non-negative value, but {value} was given")]
    NegativeDistance {
        /// Human-readable name of the constraint kind.
        kind: &'static str,
        /// The offending value.
        value: f64,
    },
    /// An angle constraint's value must be within `0..=180` degrees.
    #[error("angle must be between 0 and 180 degrees, but {degrees} was given")]
    AngleOutOfRange {
        /// The offending value, in degrees.
        degrees: f64,
    },
}

/// Could not construct or mutate a [`crate::Geometry`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GeometryError {
    /// A point's coordinates must be finite.
    #[error("point coordinates must be finite, got ({x}, {y})")]
    NonFiniteCoordinate {
        /// The offending x coordinate.
        x: f64,
        /// The offending y coordinate.
        y: f64,
    },
    /// Tried to update a point that isn't in the geometry.
    #[error("no point with id {0} in this geometry")]
    UnknownPoint(Id),
    /// Tried to read the radius of a circle that isn't in the geometry.
    #[error("no circle with id {0} in this geometry")]
    UnknownCircle(Id),
    /// Constructing the constraint itself failed.
    #[error(transparent)]
    Constraint(#[from] ConstraintError),
}
