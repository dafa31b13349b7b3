use crate::chain::TransitionMatrix;
use crate::reachability::ReachabilityStep;
use crate::{StateSet, log_set};
use log::trace;

/// Computes the direct successors of the current reachable set, excluding values that are
/// already in the reachable set.
pub struct ForwardStep;

/// Computes the direct predecessors of the current reachable set, excluding values that are
/// already in the reachable set.
pub struct BackwardStep;

impl ReachabilityStep for ForwardStep {
    fn step(matrix: &TransitionMatrix, state: &StateSet) -> StateSet {
        let mut post = StateSet::new();
        for (source, dest, p) in matrix.iter() {
            // Stored zero entries are not edges.
            if p > 0.0
                && !state.contains(&dest)
                && (state.contains(&source) || post.contains(&source))
            {
                post.insert(dest);
            }
        }
        if !post.is_empty() {
            trace!("Successors discovered in one scan ({}).", log_set(&post));
        }
        post
    }
}

impl ReachabilityStep for BackwardStep {
    fn step(matrix: &TransitionMatrix, state: &StateSet) -> StateSet {
        let mut pre = StateSet::new();
        for (source, dest, p) in matrix.iter() {
            if p > 0.0
                && !state.contains(&source)
                && (state.contains(&dest) || pre.contains(&dest))
            {
                pre.insert(source);
            }
        }
        if !pre.is_empty() {
            trace!("Predecessors discovered in one scan ({}).", log_set(&pre));
        }
        pre
    }
}
