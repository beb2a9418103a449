//! A 2D parametric geometric constraint solver.
//!
//! Build up a [`Geometry`] value-by-value (points, lines, circles), attach
//! [`Constraint`]s to it, and hand the whole thing to a [`Solver`], which
//! nudges every point with momentum gradient descent until the constraints
//! are satisfied or the iteration budget runs out.
//!
//! ```
//! use sketch_solver::{Config, ConstraintKind, Geometry, IdGenerator, Solver};
//!
//! let mut ids = IdGenerator::default();
//! let g = Geometry::new();
//! let (g, p0) = g.with_point(&mut ids, 0.0, 0.0).unwrap();
//! let (g, p1) = g.with_point(&mut ids, 1.0, 1.0).unwrap();
//! let (g, _) = g
//!     .with_constraint(&mut ids, ConstraintKind::X, vec![p0.clone()], Some(0.0))
//!     .unwrap();
//! let (g, _) = g
//!     .with_constraint(&mut ids, ConstraintKind::Y, vec![p0.clone()], Some(0.0))
//!     .unwrap();
//! let (g, _) = g
//!     .with_constraint(
//!         &mut ids,
//!         ConstraintKind::Distance,
//!         vec![p0, p1.clone()],
//!         Some(5.0),
//!     )
//!     .unwrap();
//!
//! let mut solver = Solver::new(Config::default());
//! let result = solver.solve(g);
//! assert!(result.success);
//! let (x, y) = result.geometry.point(&p1).unwrap();
//! assert!(((x * x + y * y).sqrt() - 5.0).abs() < 1e-2);
//! ```

/// Each kind of constraint the solver understands, and the validating
/// constructor that builds one.
mod constraints;
/// Error types returned by the fallible constructors on [`Geometry`] and
/// [`Constraint`].
mod error;
/// Turns a constraint and a geometry snapshot into a residual/gradient pair.
mod evaluator;
/// The points, lines, circles and constraints that make up a sketch.
mod geometry;
/// Opaque identifiers for entities and constraints.
mod id;
/// Momentum gradient descent over a geometry's constraints.
mod solver;
/// Minimal 2D vector arithmetic shared by the constraint evaluators.
mod vector;

pub use crate::constraints::{Constraint, ConstraintKind};
pub use crate::error::{ConstraintError, GeometryError};
pub use crate::evaluator::{ConstraintEvaluator, ConstraintViolation};
pub use crate::geometry::{Circle, Geometry, Line};
pub use crate::id::{Id, IdGenerator};
pub use crate::solver::{
    Config, Solver, SolverResult, SolverState, CONSTRAINT_SATISFACTION_THRESHOLD,
};
