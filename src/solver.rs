//! Momentum gradient descent over a [`Geometry`]'s constraints.
//!
//! Each step evaluates every constraint, aggregates the per-point gradients
//! with a priority-weighted policy, applies one step of gradient descent
//! with momentum, and checks for convergence. There is no linear system to
//! assemble or factorize here: this is a flat, dependency-free loop rather
//! than a Newton-style solve.

use indexmap::IndexMap;

use crate::evaluator::{ConstraintEvaluator, ConstraintViolation};
use crate::geometry::Geometry;
use crate::id::Id;

/// A violation's residual must fall below this to count as "satisfied".
/// Shared between the solver's own success test and any caller coloring a
/// constraint satisfied/violated in a UI.
pub const CONSTRAINT_SATISFACTION_THRESHOLD: f64 = 1e-3;

/// Above this per-violation gradient magnitude, smart normalization clamps
/// the violation's contribution so one steep constraint can't drown out the
/// others.
const NORMALIZATION_CUTOFF: f64 = 100.0;
/// The magnitude smart-normalized violations are clamped toward.
const NORMALIZATION_TARGET: f64 = 50.0;
/// Ratio of largest to smallest per-violation gradient magnitude below which
/// gradients are summed directly, without smart normalization.
const DIRECT_SUM_RATIO: f64 = 50.0;

/// Tuning knobs for [`Solver::solve`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Step size applied to the (momentum-smoothed) gradient each iteration.
    pub alpha: f64,
    /// Momentum decay: how much of the previous step's velocity carries
    /// into the next one.
    pub beta: f64,
    /// Hard cap on the number of iterations before giving up.
    pub max_iterations: usize,
    /// Per-coordinate step below which a point is considered not to have
    /// moved this iteration (used by the stagnation test).
    pub movement_tolerance: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alpha: 0.01,
            beta: 0.95,
            max_iterations: 10_000,
            movement_tolerance: 1e-9,
        }
    }
}

/// What happened during a [`Solver::solve`] call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SolverState {
    /// No `solve` call has run yet.
    Idle,
    /// Currently iterating (only observed mid-callback; `solve` never
    /// returns in this state).
    Running,
    /// Every constraint's residual fell within
    /// [`CONSTRAINT_SATISFACTION_THRESHOLD`].
    Converged,
    /// No point moved by more than `Config::movement_tolerance` this
    /// iteration, and yet some constraint is still violated.
    Stagnated,
    /// Iteration count hit `Config::max_iterations` while still making
    /// progress; a caller that wants a better answer can resume with more
    /// iterations.
    Exhausted,
}

/// The outcome of a [`Solver::solve`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverResult {
    /// Whether every constraint ended up satisfied.
    pub success: bool,
    /// The geometry after solving (or after giving up): even on failure,
    /// this is the best-effort configuration the descent reached.
    pub geometry: Geometry,
    /// How the solve ended.
    pub state: SolverState,
    /// Number of iterations actually run.
    pub iterations: usize,
    /// Sum of squared residuals at the final iteration.
    pub final_error: f64,
}

/// Momentum gradient descent solver. Stateless except for the per-point
/// velocities it carries between [`Solver::solve`] calls, so the same
/// `Solver` can be reused to keep "warming up" a sketch across incremental
/// edits; call [`Solver::reset`] between unrelated solves so stale momentum
/// doesn't fight the new geometry.
#[derive(Clone, Debug, Default)]
pub struct Solver {
    config: Config,
    velocities: IndexMap<Id, (f64, f64)>,
}

impl Solver {
    /// A solver with the given configuration and no momentum history.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            velocities: IndexMap::new(),
        }
    }

    /// Drop all momentum history, e.g. after a large, discontinuous edit to
    /// the geometry that would otherwise fight the velocities built up for
    /// the old one.
    pub fn reset(&mut self) {
        self.velocities.clear();
    }

    /// Run momentum gradient descent on `geometry` until its constraints are
    /// satisfied, the iteration budget runs out, or progress stalls.
    ///
    /// Takes `geometry` by value: the input is consumed and folded into the
    /// working copy the loop mutates, so the caller's original binding
    /// (still holding its own clone) is never touched.
    pub fn solve(&mut self, geometry: Geometry) -> SolverResult {
        let mut geometry = geometry;
        let evaluator = ConstraintEvaluator;
        let mut iterations = 0;
        let mut final_error = 0.0;
        let state;

        loop {
            iterations += 1;
            let violations: Vec<(ConstraintViolation, f64)> = geometry
                .constraints()
                .map(|(id, constraint)| {
                    (
                        evaluator.evaluate(id, constraint, &geometry),
                        constraint.priority(),
                    )
                })
                .collect();

            final_error = violations.iter().map(|(v, _)| v.error).sum();
            let all_satisfied = violations.iter().all(|(v, _)| {
                v.error <= CONSTRAINT_SATISFACTION_THRESHOLD * CONSTRAINT_SATISFACTION_THRESHOLD
            });

            let aggregated = aggregate_gradients(&violations);

            let mut moved = false;
            for (id, (gx, gy)) in &aggregated {
                let velocity = self.velocities.entry(id.clone()).or_insert((0.0, 0.0));
                velocity.0 = self.config.beta * velocity.0 - self.config.alpha * gx;
                velocity.1 = self.config.beta * velocity.1 - self.config.alpha * gy;
                if velocity.0.abs() > self.config.movement_tolerance
                    || velocity.1.abs() > self.config.movement_tolerance
                {
                    moved = true;
                }
                if let Some((x, y)) = geometry.point(id) {
                    geometry.set_point_mut(id, x + velocity.0, y + velocity.1);
                }
            }

            if all_satisfied {
                state = SolverState::Converged;
                break;
            }
            if !moved {
                state = SolverState::Stagnated;
                break;
            }
            if iterations >= self.config.max_iterations {
                state = SolverState::Exhausted;
                break;
            }
        }

        SolverResult {
            success: matches!(state, SolverState::Converged),
            geometry,
            state,
            iterations,
            final_error,
        }
    }
}

/// Combine every constraint's violation into one gradient per point.
///
/// With at most two violations carrying a gradient, their contributions are
/// summed directly. With more, each violation is scaled by
/// `normalization · error_weight · priority_weight` before being summed, so
/// one steep or low-priority violation can't dominate the others.
fn aggregate_gradients(violations: &[(ConstraintViolation, f64)]) -> IndexMap<Id, (f64, f64)> {
    let contributing: Vec<&(ConstraintViolation, f64)> = violations
        .iter()
        .filter(|(v, _)| !v.gradient.is_empty())
        .collect();

    let mut result: IndexMap<Id, (f64, f64)> = IndexMap::new();
    let sum_directly = |result: &mut IndexMap<Id, (f64, f64)>| {
        for (violation, _) in &contributing {
            for (id, (dx, dy)) in &violation.gradient {
                let entry = result.entry(id.clone()).or_insert((0.0, 0.0));
                entry.0 += dx;
                entry.1 += dy;
            }
        }
    };

    if contributing.len() <= 2 {
        sum_directly(&mut result);
        return result;
    }

    let magnitudes: Vec<f64> = contributing
        .iter()
        .map(|(v, _)| {
            v.gradient
                .values()
                .map(|(dx, dy)| (dx * dx + dy * dy).sqrt())
                .fold(0.0_f64, f64::max)
        })
        .collect();
    let min_g_max = magnitudes.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_g_max = magnitudes.iter().cloned().fold(0.0_f64, f64::max);

    if max_g_max <= 0.0 || min_g_max <= 0.0 || max_g_max / min_g_max <= DIRECT_SUM_RATIO {
        sum_directly(&mut result);
        return result;
    }

    let max_sqrt_error = contributing
        .iter()
        .map(|(v, _)| v.error.sqrt())
        .fold(0.0_f64, f64::max);

    for ((violation, priority_weight), g_max) in contributing.iter().zip(&magnitudes) {
        let normalization = if *g_max > NORMALIZATION_CUTOFF {
            (NORMALIZATION_TARGET / g_max).min(1.0)
        } else {
            1.0
        };
        let error_weight = if max_sqrt_error > 0.0 {
            (violation.error.sqrt() / max_sqrt_error).min(1.0)
        } else {
            1.0
        };
        let final_scale = normalization * error_weight * priority_weight;

        for (id, (dx, dy)) in &violation.gradient {
            let entry = result.entry(id.clone()).or_insert((0.0, 0.0));
            entry.0 += dx * final_scale;
            entry.1 += dy * final_scale;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ConstraintKind;
    use crate::id::IdGenerator;

    #[track_caller]
    fn assert_nearly_eq(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-2, "{a} != {b}");
    }

    #[track_caller]
    fn assert_points_eq(geometry: &Geometry, id: &Id, expected: (f64, f64)) {
        let (x, y) = geometry.point(id).expect("point should exist");
        assert_nearly_eq(x, expected.0);
        assert_nearly_eq(y, expected.1);
    }

    #[test]
    fn distance_constraint_converges() {
        let mut ids = IdGenerator::default();
        let g = Geometry::new();
        let (g, p0) = g.with_point(&mut ids, 0.0, 0.0).unwrap();
        let (g, p1) = g.with_point(&mut ids, 3.0, 4.0).unwrap();
        let (g, _) = g
            .with_constraint(&mut ids, ConstraintKind::X, vec![p0.clone()], Some(0.0))
            .unwrap();
        let (g, _) = g
            .with_constraint(&mut ids, ConstraintKind::Y, vec![p0.clone()], Some(0.0))
            .unwrap();
        let (g, _) = g
            .with_constraint(
                &mut ids,
                ConstraintKind::Distance,
                vec![p0.clone(), p1.clone()],
                Some(10.0),
            )
            .unwrap();

        let mut solver = Solver::new(Config::default());
        let result = solver.solve(g);

        assert!(result.success);
        assert_points_eq(&result.geometry, &p0, (0.0, 0.0));
        let (x, y) = result.geometry.point(&p1).unwrap();
        assert_nearly_eq((x * x + y * y).sqrt(), 10.0);
    }

    #[test]
    fn equilateral_triangle_converges() {
        let mut ids = IdGenerator::default();
        let g = Geometry::new();
        let (g, a) = g.with_point(&mut ids, 0.0, 0.0).unwrap();
        let (g, b) = g.with_point(&mut ids, 10.0, 0.0).unwrap();
        let (g, c) = g.with_point(&mut ids, 5.0, 5.0).unwrap();
        let (g, _) = g
            .with_constraint(&mut ids, ConstraintKind::Distance, vec![a.clone(), b.clone()], Some(6.0))
            .unwrap();
        let (g, _) = g
            .with_constraint(&mut ids, ConstraintKind::Distance, vec![b.clone(), c.clone()], Some(6.0))
            .unwrap();
        let (g, _) = g
            .with_constraint(&mut ids, ConstraintKind::Distance, vec![c.clone(), a], Some(6.0))
            .unwrap();

        let config = Config {
            max_iterations: 500,
            ..Config::default()
        };
        let mut solver = Solver::new(config);
        let result = solver.solve(g);
        assert!(result.success, "expected convergence within 500 iterations");

        let (bx, by) = result.geometry.point(&b).unwrap();
        let (cx, cy) = result.geometry.point(&c).unwrap();
        assert_nearly_eq((bx * bx + by * by).sqrt(), 6.0);
        assert_nearly_eq((cx * cx + cy * cy).sqrt(), 6.0);
        assert_nearly_eq(((bx - cx).powi(2) + (by - cy).powi(2)).sqrt(), 6.0);
    }

    #[test]
    fn solving_does_not_mutate_the_caller_s_geometry() {
        let mut ids = IdGenerator::default();
        let g = Geometry::new();
        let (g, p0) = g.with_point(&mut ids, 0.0, 0.0).unwrap();
        let (g, p1) = g.with_point(&mut ids, 0.1, 0.1).unwrap();
        let (g, _) = g
            .with_constraint(&mut ids, ConstraintKind::Distance, vec![p0, p1], Some(4.0))
            .unwrap();
        let before = g.clone();
        let mut solver = Solver::new(Config::default());
        let _ = solver.solve(g.clone());
        assert_eq!(g, before);
    }

    #[test]
    fn empty_geometry_converges_immediately() {
        let mut solver = Solver::new(Config::default());
        let result = solver.solve(Geometry::new());
        assert!(result.success);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn already_satisfied_geometry_is_idempotent() {
        let mut ids = IdGenerator::default();
        let g = Geometry::new();
        let (g, p0) = g.with_point(&mut ids, 0.0, 0.0).unwrap();
        let (g, p1) = g.with_point(&mut ids, 0.0, 5.0).unwrap();
        let (g, _) = g
            .with_constraint(&mut ids, ConstraintKind::Distance, vec![p0.clone(), p1.clone()], Some(5.0))
            .unwrap();

        let mut solver = Solver::new(Config::default());
        let result = solver.solve(g);
        assert!(result.success);
        assert!(result.iterations <= 1);
        let (x0, y0) = result.geometry.point(&p0).unwrap();
        let (x1, y1) = result.geometry.point(&p1).unwrap();
        assert_nearly_eq(x0, 0.0);
        assert_nearly_eq(y0, 0.0);
        assert_nearly_eq(x1, 0.0);
        assert_nearly_eq(y1, 5.0);
    }

    #[test]
    fn contradictory_distances_stagnate_or_exhaust_without_panicking() {
        let mut ids = IdGenerator::default();
        let g = Geometry::new();
        let (g, p0) = g.with_point(&mut ids, 0.0, 0.0).unwrap();
        let (g, p1) = g.with_point(&mut ids, 1.0, 0.0).unwrap();
        let (g, _) = g
            .with_constraint(&mut ids, ConstraintKind::Distance, vec![p0.clone(), p1.clone()], Some(5.0))
            .unwrap();
        let (g, _) = g
            .with_constraint(&mut ids, ConstraintKind::Distance, vec![p0, p1], Some(10.0))
            .unwrap();

        let mut solver = Solver::new(Config::default());
        let result = solver.solve(g);
        assert!(!result.success);
        assert!(result.iterations > 0);
    }
}
