//! Fixed-point reachability over the sparse transition graph.
//!
//! This module computes forward and backward reachable closures of a seed set
//! of states under the positive-probability edges of a [`TransitionMatrix`].
//!
//! # Algorithm
//!
//! The closure is a standard fixed point: every iteration scans all stored
//! edges once and collects states adjacent (in the chosen direction) to the
//! current set; iteration stops when a full scan discovers nothing new. Each
//! iteration is `O(|edges|)` and the iteration count is bounded by the graph
//! diameter restricted to the reachable region. The procedure is correct for
//! arbitrarily cyclic and disconnected graphs. Feeding a dense matrix does not
//! break correctness, but the sparse asymptotics are lost (a documented
//! non-goal of this crate).
//!
//! Entries with stored probability `0` are never treated as edges, in either
//! direction.
//!
//! # Type Aliases
//!
//! The direction of the closure is a type-level step operator iterated by
//! [`IterativeUnion`]:
//!
//! - [`ForwardReachability`]: everything reachable *from* the seeds
//! - [`BackwardReachability`]: everything that can *reach* the seeds
//!
//! The [`reachable`] helper provides the same computation with a runtime
//! [`Direction`] argument.
//!
//! # Example
//!
//! ```
//! use dtmc_reduce::TransitionMatrix;
//! use dtmc_reduce::reachability::{Direction, reachable};
//! use std::collections::BTreeSet;
//!
//! let mut matrix = TransitionMatrix::new(3);
//! matrix.set(0, 1, 0.5);
//! matrix.set(1, 2, 1.0);
//!
//! let closure = reachable(&matrix, &BTreeSet::from([0]), Direction::Forward);
//! assert_eq!(closure, BTreeSet::from([0, 1, 2]));
//! ```

use crate::StateSet;
use crate::chain::TransitionMatrix;

mod iterative_union;
mod step_operators;


pub use iterative_union::IterativeUnion;
pub use step_operators::{BackwardStep, ForwardStep};

/// A type alias for the forward reachability closure (successors of the seeds).
pub type ForwardReachability = IterativeUnion<ForwardStep>;

/// A type alias for the backward reachability closure (predecessors of the seeds).
pub type BackwardReachability = IterativeUnion<BackwardStep>;

/// The direction of a reachability closure.
///
/// Both variants use the same generic closure routine; the direction only
/// decides which endpoint of an edge extends the reachable set. An invalid
/// direction is unrepresentable, which enforces the fail-fast contract of the
/// closure by construction.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Forward,
    Backward,
}

/// Used to reduce code repetition between the forward and backward closures.
///
/// Implementors define a single step of the fixed point: one full scan over
/// the stored edges, collecting newly discovered states. The step is then
/// iterated by [`IterativeUnion`].
pub trait ReachabilityStep {
    /// Perform a single step of reachability computation.
    ///
    /// Returns the set of newly discovered states (not already in `state`),
    /// or an empty set if the fixed point is reached.
    fn step(matrix: &TransitionMatrix, state: &StateSet) -> StateSet;
}

/// Compute the reachability closure of `seeds` in the given `direction`.
///
/// This is the runtime-dispatch form of [`ForwardReachability`] and
/// [`BackwardReachability`].
pub fn reachable(matrix: &TransitionMatrix, seeds: &StateSet, direction: Direction) -> StateSet {
    match direction {
        Direction::Forward => ForwardReachability::run(matrix, seeds.clone()),
        Direction::Backward => BackwardReachability::run(matrix, seeds.clone()),
    }
}
