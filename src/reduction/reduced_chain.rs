use crate::StateSet;
use crate::chain::{Dtmc, Labeling, TransitionMatrix};
use log::debug;

/// A chain reduced to the states that matter for reaching the target.
///
/// The triple `(P, to_target, initial)` is equivalent to the linear equation
/// system
///
/// ```text
/// x = P x + b,    b = to_target
/// ```
///
/// whose solution `x` assigns to every reduced state its probability of
/// eventually reaching the consolidated target. Solving the system is the
/// responsibility of downstream consumers; this crate only guarantees that
/// the system is exact.
///
/// For every state `i`, the row invariant `Σ_d P(i,d) + to_target[i] ≤ 1`
/// holds; the residual is exactly the one-step probability of moving to the
/// synthetic fail state (see [`ReducedChain::to_fail`]).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReducedChain {
    transitions: TransitionMatrix,
    to_target: Vec<f64>,
    initial: usize,
}

impl ReducedChain {
    /// Assemble a reduced chain from its parts.
    ///
    /// # Panics
    ///
    /// Panics if `to_target` does not match the matrix dimension or if
    /// `initial` is out of range.
    pub fn new(transitions: TransitionMatrix, to_target: Vec<f64>, initial: usize) -> ReducedChain {
        assert_eq!(
            transitions.dim(),
            to_target.len(),
            "The to-target vector must have one entry per state."
        );
        assert!(
            initial < transitions.dim(),
            "Initial state {} out of range for {} states.",
            initial,
            transitions.dim()
        );
        ReducedChain {
            transitions,
            to_target,
            initial,
        }
    }

    /// The number of real (non-synthetic) states of the reduced chain.
    pub fn state_count(&self) -> usize {
        self.transitions.dim()
    }

    /// The restricted transition matrix `P` over the real states.
    pub fn transitions(&self) -> &TransitionMatrix {
        &self.transitions
    }

    /// The per-state one-step probability of moving into the consolidated target.
    pub fn to_target(&self) -> &[f64] {
        &self.to_target
    }

    /// The reduced index of the initial state.
    pub fn initial(&self) -> usize {
        self.initial
    }

    /// The one-step probability of moving into the synthetic fail state.
    ///
    /// This is the residual row mass `1 - to_target[state] - Σ_d P(state, d)`.
    /// Residues a few ULPs below zero (from floating summation) are clamped
    /// to zero rather than reported as negative probabilities.
    pub fn to_fail(&self, state: usize) -> f64 {
        let residual = 1.0 - self.to_target[state] - self.transitions.row_sum(state);
        residual.max(0.0)
    }

    /// Materialize the complete stochastic chain with the two absorbing states.
    ///
    /// The result has `N + 2` states: the `N` real states keep their indices
    /// and edges, index `N` is the target and index `N + 1` is the fail state.
    /// Every real state gets an edge to the target weighted by its `to_target`
    /// entry (when positive) and an edge to the fail state weighted by its
    /// residual row mass (when strictly positive). Both synthetic states carry
    /// a self-loop of weight exactly `1`.
    ///
    /// The returned chain is labeled with `init`, `target` and `fail` on the
    /// three structurally distinguished states, so it can be saved, rendered,
    /// or reduced again without any knowledge of this reduction.
    pub fn to_absorbing_chain(&self) -> Dtmc {
        let (complete, target, fail) = self.absorbing_matrix();

        let mut labeling = Labeling::new();
        labeling.add_label("init", StateSet::from([self.initial]));
        labeling.add_label("target", StateSet::from([target]));
        labeling.add_label("fail", StateSet::from([fail]));

        Dtmc::new(complete, labeling)
    }

    /// Build the completed transition matrix and the indices of the two
    /// appended absorbing states.
    ///
    /// This is the unlabeled form of [`ReducedChain::to_absorbing_chain`]; see
    /// there for the construction rules.
    pub fn absorbing_matrix(&self) -> (TransitionMatrix, usize, usize) {
        let dim = self.transitions.dim();
        let target = dim;
        let fail = dim + 1;

        let mut complete = TransitionMatrix::new(dim + 2);
        let mut kept_mass = vec![0.0; dim];
        for (source, dest, p) in self.transitions.iter() {
            if p > 0.0 {
                kept_mass[source] += p;
                complete.set(source, dest, p);
            }
        }

        for (state, &p_target) in self.to_target.iter().enumerate() {
            if p_target > 0.0 {
                complete.set(state, target, p_target);
            }
            let p_fail = 1.0 - (p_target + kept_mass[state]);
            // Numerical-noise-sized negative residues are clamped to zero
            // rather than materialized as phantom edges.
            if p_fail > 0.0 {
                complete.set(state, fail, p_fail);
            }
        }

        complete.set(target, target, 1.0);
        complete.set(fail, fail, 1.0);

        debug!(
            "Completed absorbing chain with {} states (target={target}, fail={fail}).",
            dim + 2
        );

        (complete, target, fail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{init_logger, matrix_from_edges, states};

    fn example_chain() -> ReducedChain {
        // 0 -> 1 with 0.5, the rest of state 0's mass fails; state 1 hits the
        // target with 0.8 and fails with 0.2.
        let matrix = matrix_from_edges(2, &[(0, 1, 0.5)]);
        ReducedChain::new(matrix, vec![0.0, 0.8], 0)
    }

    #[test]
    fn residual_row_mass_is_fail_probability() {
        init_logger();
        let chain = example_chain();
        assert_eq!(chain.to_fail(0), 0.5);
        assert!((chain.to_fail(1) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn fail_residual_is_clamped_at_zero() {
        init_logger();
        // Row sums to exactly one; floating summation of the three entries may
        // leave an ULP-sized negative residual.
        let matrix = matrix_from_edges(2, &[(0, 1, 0.1), (0, 0, 0.3)]);
        let chain = ReducedChain::new(matrix, vec![0.6, 1.0], 0);
        assert!(chain.to_fail(0) >= 0.0);
    }

    #[test]
    fn absorbing_chain_rows_are_stochastic() {
        init_logger();
        let chain = example_chain();
        let absorbing = chain.to_absorbing_chain();

        assert_eq!(absorbing.state_count(), 4);
        for state in 0..absorbing.state_count() {
            let row_sum = absorbing.transitions().row_sum(state);
            assert!(
                (row_sum - 1.0).abs() < 1e-12,
                "Row {} sums to {} instead of 1",
                state,
                row_sum
            );
        }
    }

    #[test]
    fn absorbing_states_are_self_loops() {
        init_logger();
        let absorbing = example_chain().to_absorbing_chain();
        let target = 2;
        let fail = 3;

        assert_eq!(absorbing.transitions().get(target, target), 1.0);
        assert_eq!(absorbing.transitions().get(fail, fail), 1.0);
        assert_eq!(absorbing.transitions().outgoing(target).count(), 1);
        assert_eq!(absorbing.transitions().outgoing(fail).count(), 1);
    }

    #[test]
    fn absorbing_chain_is_labeled() {
        init_logger();
        let absorbing = example_chain().to_absorbing_chain();
        assert_eq!(absorbing.labeling().states_of("init"), Some(&states(&[0])));
        assert_eq!(absorbing.labeling().states_of("target"), Some(&states(&[2])));
        assert_eq!(absorbing.labeling().states_of("fail"), Some(&states(&[3])));
    }

    #[test]
    fn zero_weight_edges_to_synthetic_states_are_omitted() {
        init_logger();
        // State 0 can neither hit the target nor fail in one step.
        let matrix = matrix_from_edges(2, &[(0, 1, 1.0)]);
        let chain = ReducedChain::new(matrix, vec![0.0, 1.0], 0);
        let absorbing = chain.to_absorbing_chain();

        assert_eq!(absorbing.transitions().get(0, 2), 0.0);
        assert_eq!(absorbing.transitions().get(0, 3), 0.0);
        assert_eq!(absorbing.transitions().get(1, 2), 1.0);
    }

    #[test]
    #[should_panic(expected = "one entry per state")]
    fn mismatched_to_target_length_panics() {
        let matrix = matrix_from_edges(2, &[(0, 1, 1.0)]);
        ReducedChain::new(matrix, vec![0.0], 0);
    }
}
