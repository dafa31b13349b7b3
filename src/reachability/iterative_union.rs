use crate::chain::TransitionMatrix;
use crate::reachability::ReachabilityStep;
use crate::{StateSet, log_set, simple_type_name};
use log::debug;
use std::marker::PhantomData;

/// A helper implementation of the reachability fixed point that repeatedly calls
/// a [`ReachabilityStep`] function, collecting the results into the current `state`.
pub struct IterativeUnion<S: ReachabilityStep>(PhantomData<S>);

impl<S: ReachabilityStep> IterativeUnion<S> {
    /// Iterate `S::step` starting from `seeds` until a full scan discovers no
    /// new state, and return the resulting closure.
    ///
    /// Running the closure again on its own output returns the same set.
    pub fn run(matrix: &TransitionMatrix, seeds: StateSet) -> StateSet {
        let mut state = seeds;
        let mut iteration = 0usize;
        loop {
            iteration += 1;
            let to_union = S::step(matrix, &state);
            if to_union.is_empty() {
                debug!(
                    "[iteration:{}] Union<{}> finished with ({}).",
                    iteration,
                    simple_type_name::<S>(),
                    log_set(&state)
                );
                return state;
            }

            state.extend(to_union);

            debug!(
                "[iteration:{}] Union<{}> increased to ({}).",
                iteration,
                simple_type_name::<S>(),
                log_set(&state)
            );
        }
    }
}
