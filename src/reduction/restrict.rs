use crate::StateSet;
use crate::chain::TransitionMatrix;
use log::debug;
use std::collections::BTreeMap;

/// What a reduced state index corresponds to in the original chain.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OriginalState {
    /// A state carried over from the original chain.
    State(usize),
    /// The synthetic consolidated target state.
    Target,
    /// The synthetic fail state.
    Fail,
}

/// The two inverse dictionaries translating between the original and the
/// reduced state space.
///
/// These mappings are the only authoritative way to translate indices across a
/// reduction. The two synthetic states occupy the top two reduced indices and
/// map back to [`OriginalState::Target`] and [`OriginalState::Fail`] rather
/// than to original indices. Original target states are not part of the
/// mapping; they are represented by the consolidated target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateMapping {
    full_to_reduced: BTreeMap<usize, usize>,
    reduced_to_full: BTreeMap<usize, OriginalState>,
}

impl StateMapping {
    /// The reduced index of an original state, if the state survived reduction.
    pub fn to_reduced(&self, full: usize) -> Option<usize> {
        self.full_to_reduced.get(&full).copied()
    }

    /// What a reduced index corresponds to, if it is part of the reduced space.
    pub fn to_full(&self, reduced: usize) -> Option<OriginalState> {
        self.reduced_to_full.get(&reduced).copied()
    }

    /// The number of real (non-synthetic) states in the reduced space.
    pub fn reduced_state_count(&self) -> usize {
        self.reduced_to_full.len() - 2
    }

    /// The reduced index of the synthetic target state.
    pub fn target_index(&self) -> usize {
        self.reduced_state_count()
    }

    /// The reduced index of the synthetic fail state.
    pub fn fail_index(&self) -> usize {
        self.reduced_state_count() + 1
    }

    /// Iterate over all `(original, reduced)` index pairs of surviving states.
    pub fn surviving_states(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.full_to_reduced.iter().map(|(&full, &reduced)| (full, reduced))
    }
}

/// Project the chain onto the final reachable set and consolidate all target
/// states into the synthetic target.
///
/// Surviving non-target states receive contiguous indices `0..N-1` in ascending
/// original order; the order is stable within one reduction call and the two
/// returned mappings are mutually inverse. For every surviving source state:
///
/// - edges to other surviving non-target states are copied into the new matrix;
/// - positive edges into any target state become `to_target` mass of the source
///   (the targets themselves vanish into the consolidated target);
/// - the fail probability computed by the absorber is carried over unchanged,
///   reindexed by the same map.
///
/// Target states contribute no rows: their only meaningful transition is the
/// forced move into the consolidated target, which the merge makes implicit.
///
/// Returns the restricted matrix, the `to_target` vector, the reindexed
/// `to_fail` vector and the index mapping.
///
/// # Panics
///
/// Panics if `initial` is not in `reachable`. The reduction pipeline seeds
/// forward reachability from the initial state, so a violation indicates a
/// defect in the calling sequence and must not silently produce a disconnected
/// chain. Also panics if `initial` is itself a target state; such a reduction
/// request is degenerate (the hitting probability is trivially one).
pub fn restrict_to_reachable(
    matrix: &TransitionMatrix,
    initial: usize,
    reachable: &StateSet,
    targets: &StateSet,
    to_fail: &[f64],
) -> (TransitionMatrix, Vec<f64>, Vec<f64>, StateMapping) {
    assert!(
        reachable.contains(&initial),
        "Initial state {initial} is not reachable; reduction pipeline invariant violated."
    );
    assert!(
        !targets.contains(&initial),
        "Initial state {initial} is a target state; the reduction request is degenerate."
    );

    let mut full_to_reduced = BTreeMap::new();
    let mut reduced_to_full = BTreeMap::new();
    for (reduced, &full) in reachable.difference(targets).enumerate() {
        full_to_reduced.insert(full, reduced);
        reduced_to_full.insert(reduced, OriginalState::State(full));
    }

    let dim = full_to_reduced.len();
    reduced_to_full.insert(dim, OriginalState::Target);
    reduced_to_full.insert(dim + 1, OriginalState::Fail);

    let mut to_target = vec![0.0; dim];
    let mut to_fail_reduced = vec![0.0; dim];
    for (&full, &reduced) in &full_to_reduced {
        to_fail_reduced[reduced] = to_fail[full];
    }

    let mut restricted = TransitionMatrix::new(dim);
    for (source, dest, p) in matrix.iter() {
        let Some(&new_source) = full_to_reduced.get(&source) else {
            continue;
        };
        if targets.contains(&dest) {
            if p > 0.0 {
                to_target[new_source] += p;
            }
        } else if let Some(&new_dest) = full_to_reduced.get(&dest) {
            if p > 0.0 {
                restricted.set(new_source, new_dest, p);
            }
        }
    }

    debug!(
        "Restricted chain to {} states ({} targets consolidated).",
        dim,
        targets.len()
    );

    let mapping = StateMapping {
        full_to_reduced,
        reduced_to_full,
    };
    (restricted, to_target, to_fail_reduced, mapping)
}
