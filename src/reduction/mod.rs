//! The reachability-driven reduction pipeline.
//!
//! Reduction turns a labeled chain into the smallest chain with the same
//! probability of reaching the target from the initial state. The pipeline is
//! a fixed sequence of pure passes, each consuming only the previous pass's
//! output:
//!
//! 1. **Backward reachability** from the target states: everything else can
//!    never reach a target.
//! 2. **Fail absorption** ([`absorb_fail`]): probability mass flowing out of
//!    the backward-reachable region becomes per-state fail mass.
//! 3. **Forward reachability** from the initial state over the absorbed graph.
//! 4. **Target consolidation** ([`prune_unreachable_targets`]): targets
//!    reachable only through other targets are dropped before the merge.
//! 5. **Restriction** ([`restrict_to_reachable`]): surviving states get
//!    contiguous indices; all targets merge into one synthetic target.
//!
//! The terminal result is a [`ReducedChain`] in `x = Px + b` form together
//! with the [`StateMapping`] between the two index spaces. No pass mutates the
//! input chain, and no partial result is ever returned: reduction either fully
//! completes or panics on a contract violation before producing anything.
//!
//! # Example
//!
//! ```
//! use dtmc_reduce::{Dtmc, Labeling, TransitionMatrix};
//! use std::collections::BTreeSet;
//!
//! let mut matrix = TransitionMatrix::new(4);
//! matrix.set(0, 1, 0.5);
//! matrix.set(0, 2, 0.5);
//! matrix.set(1, 3, 1.0);
//! matrix.set(2, 2, 1.0);
//!
//! let mut labeling = Labeling::new();
//! labeling.add_label("init", BTreeSet::from([0]));
//! labeling.add_label("target", BTreeSet::from([3]));
//!
//! let chain = Dtmc::new(matrix, labeling);
//! let (reduced, mapping) = chain.reduce("init", "target");
//!
//! // State 2 is a fail sink and state 3 merged into the synthetic target.
//! assert_eq!(reduced.state_count(), 2);
//! assert_eq!(reduced.to_target(), &[0.0, 1.0]);
//! assert_eq!(mapping.to_reduced(2), None);
//! ```

mod absorb;
mod prune;
mod reduced_chain;
mod restrict;


use crate::StateSet;
use crate::chain::Dtmc;
use crate::reachability::{BackwardReachability, ForwardReachability};
use log::{debug, info};

pub use absorb::absorb_fail;
pub use prune::prune_unreachable_targets;
pub use reduced_chain::ReducedChain;
pub use restrict::{OriginalState, StateMapping, restrict_to_reachable};

impl Dtmc {
    /// Reduce this chain to the states that can influence the probability of
    /// reaching a `targets_label` state from the `initial_label` state.
    ///
    /// The reduced chain preserves the hitting probability exactly: solving
    /// `x = Px + to_target` over the result yields the same probability for
    /// the initial state as it would for the full chain.
    ///
    /// # Panics
    ///
    /// Panics if the labeling does not carry exactly one `initial_label`
    /// state, carries no `targets_label` state, or the initial state is itself
    /// a target. These are contract violations of the reduction request, not
    /// recoverable errors.
    pub fn reduce(&self, initial_label: &str, targets_label: &str) -> (ReducedChain, StateMapping) {
        let targets = self
            .labeling()
            .states_of(targets_label)
            .cloned()
            .unwrap_or_default();
        assert!(
            !targets.is_empty(),
            "There needs to be at least one target state."
        );

        let initial_states = self
            .labeling()
            .states_of(initial_label)
            .cloned()
            .unwrap_or_default();
        assert!(
            initial_states.len() == 1,
            "There were {} initial states given. Must be 1.",
            initial_states.len()
        );
        let initial = *initial_states.first().expect("checked above");

        debug!(
            "Reducing chain with {} states ({} targets, initial={initial}).",
            self.state_count(),
            targets.len()
        );

        // States which are able to reach the target states.
        let reaching_target = BackwardReachability::run(self.transitions(), targets.clone());
        // Mass flowing out of that region is fail mass, not a graph edge.
        let (absorbed, to_fail) = absorb_fail(self.transitions(), &reaching_target);
        // States which are reachable from the initial state.
        let reachable = ForwardReachability::run(&absorbed, StateSet::from([initial]));
        // Targets only reachable through other targets disappear in the merge.
        let (reachable, targets) = prune_unreachable_targets(&absorbed, &reachable, &targets);

        let (transitions, to_target, _to_fail, mapping) =
            restrict_to_reachable(&absorbed, initial, &reachable, &targets, &to_fail);

        let initial_reduced = mapping
            .to_reduced(initial)
            .expect("the initial state survives restriction");
        let reduced = ReducedChain::new(transitions, to_target, initial_reduced);

        info!(
            "Reduction finished: {} of {} states survive.",
            reduced.state_count(),
            self.state_count()
        );

        (reduced, mapping)
    }
}
