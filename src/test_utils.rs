use crate::chain::{Dtmc, Labeling, TransitionMatrix};
use crate::StateSet;

/// Initialize env_logger for tests. Safe to call multiple times.
pub fn init_logger() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

/// Build a transition matrix over `dim` states from a list of
/// `(source, destination, probability)` edges.
pub fn matrix_from_edges(dim: usize, edges: &[(usize, usize, f64)]) -> TransitionMatrix {
    let mut matrix = TransitionMatrix::new(dim);
    for &(source, dest, p) in edges {
        matrix.set(source, dest, p);
    }
    matrix
}

/// Build a state set from a list of indices.
pub fn states(indices: &[usize]) -> StateSet {
    indices.iter().copied().collect()
}

/// Build a labeled chain from an edge list and a list of `(label, states)` pairs.
pub fn dtmc_from_edges(
    dim: usize,
    edges: &[(usize, usize, f64)],
    labels: &[(&str, &[usize])],
) -> Dtmc {
    let mut labeling = Labeling::new();
    for &(label, label_states) in labels {
        labeling.add_label(label, states(label_states));
    }
    Dtmc::new(matrix_from_edges(dim, edges), labeling)
}
