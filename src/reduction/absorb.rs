use crate::StateSet;
use crate::chain::TransitionMatrix;

/// Rewrite the graph so that probability mass leaving `reaching_target`
/// becomes absorbed "fail" mass instead of a graph edge.
///
/// A state outside `reaching_target` can, by definition, never reach a target
/// state. For every stored edge `(source, dest, p)` with `source` in
/// `reaching_target`:
///
/// - if `dest` is also in `reaching_target`, the edge is kept in the
///   restricted matrix;
/// - otherwise `p` is added to `to_fail[source]`.
///
/// Edges whose source lies outside `reaching_target` are dropped entirely;
/// those states are excluded later by forward reachability.
///
/// For every retained source state, the sum of its kept edges and its fail
/// mass equals the original row sum restricted to `reaching_target`-sourced
/// edges, so no probability mass is created or lost.
pub fn absorb_fail(
    matrix: &TransitionMatrix,
    reaching_target: &StateSet,
) -> (TransitionMatrix, Vec<f64>) {
    let dim = matrix.dim();
    let mut to_fail = vec![0.0; dim];
    let mut restricted = TransitionMatrix::new(dim);

    for (source, dest, p) in matrix.iter() {
        if !reaching_target.contains(&source) {
            continue;
        }
        if reaching_target.contains(&dest) {
            restricted.set(source, dest, p);
        } else {
            to_fail[source] += p;
        }
    }

    (restricted, to_fail)
}
