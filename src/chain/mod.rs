//! The sparse labeled chain model: a transition matrix plus a state labeling.
//!
//! A [`Dtmc`] is immutable once built. The reduction pipeline in
//! [`crate::reduction`] always produces new chains and never mutates an
//! existing one, so independent reductions can run concurrently without
//! any locking.

mod labeling;
mod transition_matrix;

pub use labeling::Labeling;
pub use transition_matrix::TransitionMatrix;

/// A discrete-time Markov chain over states `0..N-1`, given as a sparse
/// transition matrix together with a labeling of states.
///
/// The matrix invariant is that every row sums to at most `1`; missing mass is
/// either implicit fail probability (in a reduced chain) or simply absent (in
/// an unreduced chain). The chain does not enforce row normalization.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dtmc {
    transitions: TransitionMatrix,
    labeling: Labeling,
}

impl Dtmc {
    /// Create a chain from a transition matrix and a labeling.
    ///
    /// # Panics
    ///
    /// Panics if any labeled state index is outside `0..N-1` of the matrix.
    pub fn new(transitions: TransitionMatrix, labeling: Labeling) -> Dtmc {
        if let Some(max_state) = labeling.max_state() {
            assert!(
                max_state < transitions.dim(),
                "Labeled state {} out of range for {} states.",
                max_state,
                transitions.dim()
            );
        }
        Dtmc {
            transitions,
            labeling,
        }
    }

    /// The number of states of this chain.
    pub fn state_count(&self) -> usize {
        self.transitions.dim()
    }

    /// The sparse transition matrix.
    pub fn transitions(&self) -> &TransitionMatrix {
        &self.transitions
    }

    /// The state labeling.
    pub fn labeling(&self) -> &Labeling {
        &self.labeling
    }
}
