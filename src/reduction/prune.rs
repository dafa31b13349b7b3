use crate::StateSet;
use crate::chain::TransitionMatrix;
use log::debug;

/// Remove target states that are reachable only through other target states.
///
/// After consolidation, every target state is merged into one synthetic target.
/// A target whose every incoming edge originates in another target becomes, post
/// merge, unreachable from anything outside the merged target itself; keeping it
/// would grow the reduced state space without changing any probability.
///
/// A target state is kept only if it has at least one positive-probability
/// incoming edge from a non-target state. Non-target states are always kept if
/// reachable. Only the incoming edges of each target are inspected (column-style
/// access), never the full matrix.
///
/// Returns the filtered reachable set and the filtered target set (the latter is
/// always a subset of the former).
pub fn prune_unreachable_targets(
    matrix: &TransitionMatrix,
    reachable: &StateSet,
    targets: &StateSet,
) -> (StateSet, StateSet) {
    let mut kept = StateSet::new();

    for &state in reachable {
        if !targets.contains(&state) {
            kept.insert(state);
            continue;
        }
        let has_external_predecessor = matrix
            .incoming(state)
            .any(|(source, p)| p > 0.0 && !targets.contains(&source));
        if has_external_predecessor {
            kept.insert(state);
        } else {
            debug!("Dropping target {state} (only reachable through other targets).");
        }
    }

    let kept_targets = targets.intersection(&kept).copied().collect();
    (kept, kept_targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{init_logger, matrix_from_edges, states};

    #[test]
    fn target_behind_another_target_is_dropped() {
        init_logger();
        // Target 3 is only entered through target 4.
        let matrix = matrix_from_edges(5, &[(0, 4, 1.0), (4, 3, 1.0), (3, 3, 1.0)]);
        let reachable = states(&[0, 3, 4]);
        let targets = states(&[3, 4]);

        let (kept, kept_targets) = prune_unreachable_targets(&matrix, &reachable, &targets);

        assert_eq!(kept, states(&[0, 4]));
        assert_eq!(kept_targets, states(&[4]));
    }

    #[test]
    fn surviving_targets_have_an_external_predecessor() {
        init_logger();
        let matrix = matrix_from_edges(
            6,
            &[
                (0, 1, 0.5),
                (0, 2, 0.5),
                (1, 3, 1.0),
                (2, 4, 1.0),
                (3, 5, 1.0),
                (4, 5, 1.0),
            ],
        );
        let reachable = states(&[0, 1, 2, 3, 4, 5]);
        let targets = states(&[3, 4, 5]);

        let (kept, kept_targets) = prune_unreachable_targets(&matrix, &reachable, &targets);

        // Target 5 is only entered from targets 3 and 4, so it is dropped.
        assert_eq!(kept_targets, states(&[3, 4]));
        assert_eq!(kept, states(&[0, 1, 2, 3, 4]));
        for &target in &kept_targets {
            assert!(
                matrix
                    .incoming(target)
                    .any(|(source, p)| p > 0.0 && !targets.contains(&source)),
                "Kept target {} has no non-target predecessor",
                target
            );
        }
    }

    #[test]
    fn zero_probability_incoming_edge_does_not_save_a_target() {
        init_logger();
        let mut matrix = matrix_from_edges(3, &[(0, 1, 1.0), (1, 2, 1.0)]);
        // A stored zero entry from a non-target state must not count.
        matrix.set(0, 2, 0.0);
        let (kept, kept_targets) =
            prune_unreachable_targets(&matrix, &states(&[0, 1, 2]), &states(&[1, 2]));

        assert_eq!(kept_targets, states(&[1]));
        assert_eq!(kept, states(&[0, 1]));
    }

    #[test]
    fn non_target_states_are_always_kept() {
        init_logger();
        let matrix = matrix_from_edges(3, &[(1, 0, 1.0)]);
        let (kept, kept_targets) =
            prune_unreachable_targets(&matrix, &states(&[0, 1, 2]), &states(&[]));
        assert_eq!(kept, states(&[0, 1, 2]));
        assert!(kept_targets.is_empty());
    }
}
